// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor operations on a form.
//!
//! Each operation mirrors one editor gesture (add a block, edit it, finish a section, ...).
//! A batch is applied all-or-nothing: the sections are mutated on a copy that replaces the
//! form's sections only when every op succeeded.

use std::fmt;

use crate::model::{initial_sections, Block, BlockId, Form, Section, SectionKey, Sections};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOp {
    AddBlock { section: SectionKey },
    UpdateBlock { section: SectionKey, block_id: BlockId, patch: BlockPatch },
    RemoveBlock { section: SectionKey, block_id: BlockId },
    CompleteSection { section: SectionKey },
    ReopenSection { section: SectionKey },
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplyResult {
    pub applied: usize,
    /// Ids of blocks created by `AddBlock`, in op order. A later `Reset` in the batch clears them.
    pub added: Vec<BlockId>,
}

pub fn apply_ops(form: &mut Form, ops: &[FormOp]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult::default());
    }

    let mut sections = form.sections().clone();
    let mut added = Vec::new();

    for op in ops {
        match op {
            FormOp::AddBlock { section } => {
                added.push(add_block(&mut sections, *section)?);
            }
            FormOp::UpdateBlock {
                section,
                block_id,
                patch,
            } => update_block(&mut sections, *section, block_id, patch)?,
            FormOp::RemoveBlock { section, block_id } => {
                remove_block(&mut sections, *section, block_id)?
            }
            FormOp::CompleteSection { section } => set_completed(&mut sections, *section, true),
            FormOp::ReopenSection { section } => set_completed(&mut sections, *section, false),
            FormOp::Reset => {
                sections = initial_sections();
                added.clear();
            }
        }
    }

    form.set_sections(sections);
    Ok(ApplyResult {
        applied: ops.len(),
        added,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    BlockNotFound { section: SectionKey, block_id: BlockId },
    SectionCompleted { section: SectionKey },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockNotFound { section, block_id } => {
                write!(f, "block not found (section={section}, id={block_id})")
            }
            Self::SectionCompleted { section } => {
                write!(f, "section {section} is completed; reopen it before editing")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// Per-op mutation helpers used by `apply_ops`.
include!("ops_impl.rs");
