// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::content::{self, escape_text, ContentError};
use crate::model::{Block, FormHeader, Section, SectionKey, Sections};

use super::date::display_date;

pub const DOCUMENT_TITLE: &str = "Ata de Reunião";

const STYLESHEET: &str = "\
@page { size: A4; margin: 20mm; }
body { font-family: Helvetica, Arial, sans-serif; font-size: 11pt; line-height: 1.35; }
h1 { font-size: 18pt; text-align: center; }
h2 { font-size: 14pt; border-bottom: 1px solid #444; margin-top: 14pt; }
h3 { font-size: 12pt; margin-bottom: 2pt; }
p.meta { margin: 0 0 3pt 0; }
article.block { margin-bottom: 8pt; }
";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("cannot parse content of block {block_index} in section {section}: {source}")]
    Content {
        section: SectionKey,
        block_index: usize,
        source: ContentError,
    },
}

/// Renders the form into a standalone HTML document.
///
/// Sections appear in [`SectionKey::ALL`] order and only when they hold at least one non-blank
/// block; blank blocks are skipped. Block content is emitted as the editor produced it, after
/// the indentation pass.
pub fn render_document(sections: &Sections, header: &FormHeader) -> Result<String, RenderError> {
    let mut out = String::with_capacity(4096);

    out.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{DOCUMENT_TITLE}</title>\n"));
    out.push_str(&format!("<style>\n{STYLESHEET}</style>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{DOCUMENT_TITLE}</h1>\n"));

    render_header(&mut out, header);

    for key in SectionKey::ALL {
        let Some(section) = sections.get(&key) else {
            continue;
        };
        if section.has_content() {
            render_section(&mut out, key, section)?;
        }
    }

    out.push_str("</body>\n</html>\n");
    Ok(out)
}

fn render_header(out: &mut String, header: &FormHeader) {
    let date = display_date(&header.date);
    let rows = [
        ("Empresa", header.company.trim()),
        ("Local", header.location.trim()),
        ("Data", date.as_str()),
        ("Participantes da empresa", header.participants_a.trim()),
        ("Participantes do escritório", header.participants_b.trim()),
    ];

    for (label, value) in rows {
        if value.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "<p class=\"meta\"><strong>{label}:</strong> {}</p>\n",
            escape_text(value)
        ));
    }
}

fn render_section(out: &mut String, key: SectionKey, section: &Section) -> Result<(), RenderError> {
    out.push_str(&format!(
        "<section class=\"department\" data-section=\"{}\">\n<h2>{}</h2>\n",
        key.as_str(),
        escape_text(key.label())
    ));

    for (block_index, block) in section.blocks().iter().enumerate() {
        if block.is_blank() {
            continue;
        }
        render_block(out, block).map_err(|source| RenderError::Content {
            section: key,
            block_index,
            source,
        })?;
    }

    out.push_str("</section>\n");
    Ok(())
}

fn render_block(out: &mut String, block: &Block) -> Result<(), ContentError> {
    out.push_str("<article class=\"block\">\n");

    let title = block.title().trim();
    if !title.is_empty() {
        out.push_str(&format!("<h3>{}</h3>\n", escape_text(title)));
    }

    if !content::is_blank(block.content()) {
        let mut tree = content::parse(block.content())?;
        let body = if content::apply_indentation(&mut tree) {
            tree.to_markup()
        } else {
            block.content().to_owned()
        };
        out.push_str(&format!("<div class=\"content\">{body}</div>\n"));
    }

    out.push_str("</article>\n");
    Ok(())
}
