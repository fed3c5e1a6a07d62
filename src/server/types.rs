// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON shapes exchanged with the browser editor.
//!
//! Field names follow the editor's camelCase. Decoding into model types validates section keys
//! and ids; anything that fails there is a 400.

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::model::{
    Block, BlockId, Form, FormHeader, FormId, FormSummary, Section, SectionKey, Sections,
};
use crate::ops::{BlockPatch, FormOp};

use super::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderWire {
    pub company: String,
    pub location: String,
    pub date: String,
    pub participants_a: String,
    pub participants_b: String,
}

impl From<&FormHeader> for HeaderWire {
    fn from(header: &FormHeader) -> Self {
        Self {
            company: header.company.clone(),
            location: header.location.clone(),
            date: header.date.clone(),
            participants_a: header.participants_a.clone(),
            participants_b: header.participants_b.clone(),
        }
    }
}

impl From<HeaderWire> for FormHeader {
    fn from(wire: HeaderWire) -> Self {
        Self {
            company: wire.company,
            location: wire.location,
            date: wire.date,
            participants_a: wire.participants_a,
            participants_b: wire.participants_b,
        }
    }
}

/// A block as the editor sends it. The editor's freshly added blocks are `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionWire {
    pub blocks: Vec<BlockWire>,
    pub completed: bool,
}

pub type SectionsWire = BTreeMap<String, SectionWire>;

pub fn sections_to_wire(sections: &Sections) -> SectionsWire {
    sections
        .iter()
        .map(|(key, section)| {
            let blocks = section
                .blocks()
                .iter()
                .map(|block| BlockWire {
                    id: Some(block.id().to_string()),
                    title: block.title().to_owned(),
                    content: block.content().to_owned(),
                })
                .collect();
            (
                key.as_str().to_owned(),
                SectionWire {
                    blocks,
                    completed: section.completed(),
                },
            )
        })
        .collect()
}

pub fn sections_from_wire(wire: SectionsWire) -> Result<Sections, ApiError> {
    let mut sections = Sections::new();
    for (raw_key, section) in wire {
        let key = parse_section_key(&raw_key)?;
        let blocks = section
            .blocks
            .into_iter()
            .map(|block| {
                let id = match block.id {
                    Some(raw) => parse_block_id(raw)?,
                    None => BlockId::generate(),
                };
                Ok(Block::new(id, block.title, block.content))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;
        sections.insert(key, Section::new(blocks, section.completed));
    }
    Ok(sections)
}

fn parse_section_key(raw: &str) -> Result<SectionKey, ApiError> {
    raw.parse::<SectionKey>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}

fn parse_block_id(raw: String) -> Result<BlockId, ApiError> {
    BlockId::new(raw).map_err(|err| ApiError::BadRequest(format!("invalid block id: {err}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub sections: SectionsWire,
    #[serde(default)]
    pub header: Option<HeaderWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: String,
    pub header: HeaderWire,
    pub sections: SectionsWire,
    pub created_at: String,
    pub all_completed: bool,
}

impl From<&Form> for FormResponse {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id().to_string(),
            header: HeaderWire::from(form.header()),
            sections: sections_to_wire(form.sections()),
            created_at: form.created_at().to_rfc3339_opts(SecondsFormat::Millis, true),
            all_completed: form.all_sections_completed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryWire {
    pub id: String,
    pub title: String,
    pub date: String,
}

impl From<FormSummary> for SummaryWire {
    fn from(summary: FormSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            title: summary.title,
            date: summary.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub form_id: String,
}

impl From<FormId> for CreatedResponse {
    fn from(form_id: FormId) -> Self {
        Self {
            form_id: form_id.into_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: SuccessResponse = SuccessResponse { success: true };
}

/// One editor gesture, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OpWire {
    AddBlock {
        section: String,
    },
    UpdateBlock {
        section: String,
        block_id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        content: Option<String>,
    },
    RemoveBlock {
        section: String,
        block_id: String,
    },
    CompleteSection {
        section: String,
    },
    ReopenSection {
        section: String,
    },
    Reset,
}

impl TryFrom<OpWire> for FormOp {
    type Error = ApiError;

    fn try_from(wire: OpWire) -> Result<Self, Self::Error> {
        Ok(match wire {
            OpWire::AddBlock { section } => FormOp::AddBlock {
                section: parse_section_key(&section)?,
            },
            OpWire::UpdateBlock {
                section,
                block_id,
                title,
                content,
            } => FormOp::UpdateBlock {
                section: parse_section_key(&section)?,
                block_id: parse_block_id(block_id)?,
                patch: BlockPatch { title, content },
            },
            OpWire::RemoveBlock { section, block_id } => FormOp::RemoveBlock {
                section: parse_section_key(&section)?,
                block_id: parse_block_id(block_id)?,
            },
            OpWire::CompleteSection { section } => FormOp::CompleteSection {
                section: parse_section_key(&section)?,
            },
            OpWire::ReopenSection { section } => FormOp::ReopenSection {
                section: parse_section_key(&section)?,
            },
            OpWire::Reset => FormOp::Reset,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsRequest {
    pub ops: Vec<OpWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsResponse {
    pub success: bool,
    pub added: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
