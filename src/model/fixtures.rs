// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sample forms shared by unit tests, integration tests and benches.

use chrono::{TimeZone, Utc};

use super::form::{Block, Form, FormHeader, Section, SectionKey, Sections};
use super::ids::{BlockId, FormId};

fn bid(value: &str) -> BlockId {
    BlockId::new(value).expect("fixture block id")
}

pub fn sample_header() -> FormHeader {
    FormHeader {
        company: "Padaria Estrela Ltda".to_owned(),
        location: "Sala de reuniões 2".to_owned(),
        date: "2024-03-05".to_owned(),
        participants_a: "Ana Souza, Bruno Lima".to_owned(),
        participants_b: "Carla Dias".to_owned(),
    }
}

/// A form with content in the fiscal and accounting sections and an untouched DP section.
pub fn sample_form() -> Form {
    let mut sections = Sections::new();
    sections.insert(
        SectionKey::Fiscal,
        Section::new(
            vec![
                Block::new(bid("b-fiscal-1"), "Apuração do ICMS", "<p>Guia emitida em março.</p>"),
                Block::new(bid("b-fiscal-2"), "", "<p><br></p>"),
                Block::new(
                    bid("b-fiscal-3"),
                    "Pendências",
                    "<p>Notas de entrada:</p><p class=\"ql-indent-1\">fornecedor A</p>",
                ),
            ],
            true,
        ),
    );
    sections.insert(SectionKey::Dp, Section::new(vec![Block::new(bid("b-dp-1"), "", "")], false));
    sections.insert(
        SectionKey::Contabil,
        Section::new(
            vec![Block::new(
                bid("b-contabil-1"),
                "Balancete",
                "<p><strong>Fechamento</strong> até dia 10.</p>",
            )],
            false,
        ),
    );

    let created_at = Utc
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("fixture timestamp");
    Form::from_parts(
        FormId::new("f-sample").expect("fixture form id"),
        sample_header(),
        sections,
        created_at,
    )
}

/// A form with `blocks_per_section` paragraph-heavy blocks in every section.
pub fn large_form(blocks_per_section: usize) -> Form {
    let sentence = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
                    tempor incididunt ut labore et dolore magna aliqua.";
    let mut sections = Sections::new();
    for key in SectionKey::ALL {
        let blocks = (0..blocks_per_section)
            .map(|idx| {
                Block::new(
                    bid(&format!("b-{key}-{idx}")),
                    format!("Item {}", idx + 1),
                    format!("<p>{sentence}</p><p class=\"ql-indent-2\"><strong>{sentence}</strong></p>"),
                )
            })
            .collect();
        sections.insert(key, Section::new(blocks, true));
    }

    let created_at = Utc
        .with_ymd_and_hms(2024, 1, 15, 8, 0, 0)
        .single()
        .expect("fixture timestamp");
    Form::from_parts(
        FormId::new("f-large").expect("fixture form id"),
        sample_header(),
        sections,
        created_at,
    )
}
