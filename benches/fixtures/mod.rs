// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use ata::model::fixtures::{large_form, sample_form};
use ata::model::Form;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Sample,
    Medium,
    Large,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Sample, Case::Medium, Case::Large];

    /// Stable case id used after the `/` in benchmark names.
    pub fn id(self) -> &'static str {
        match self {
            Case::Sample => "sample",
            Case::Medium => "medium_10_blocks",
            Case::Large => "large_60_blocks",
        }
    }
}

pub fn fixture(case: Case) -> Form {
    match case {
        Case::Sample => sample_form(),
        Case::Medium => large_form(10),
        Case::Large => large_form(60),
    }
}
