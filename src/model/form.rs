// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::ids::{BlockId, FormId};
use crate::content;

pub const UNTITLED_FORM_TITLE: &str = "Nova ata";

/// A department section of the minutes.
///
/// The set is closed; `ALL` is the fixed display order used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKey {
    Fiscal,
    Dp,
    Contabil,
}

impl SectionKey {
    pub const ALL: [SectionKey; 3] = [SectionKey::Fiscal, SectionKey::Dp, SectionKey::Contabil];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiscal => "fiscal",
            Self::Dp => "dp",
            Self::Contabil => "contabil",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fiscal => "Fiscal",
            Self::Dp => "DP",
            Self::Contabil => "Contábil",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section key: {0:?}")]
pub struct ParseSectionKeyError(pub String);

impl FromStr for SectionKey {
    type Err = ParseSectionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseSectionKeyError(s.to_owned()))
    }
}

/// A single title + rich-text entry inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    title: String,
    content: String,
}

impl Block {
    pub fn new(id: BlockId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// An empty block with a freshly allocated id.
    pub fn empty() -> Self {
        Self::new(BlockId::generate(), "", "")
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// True when neither the title nor the content carries visible text.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && content::is_blank(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    blocks: Vec<Block>,
    completed: bool,
}

impl Section {
    pub fn new(blocks: Vec<Block>, completed: bool) -> Self {
        Self { blocks, completed }
    }

    /// The state a section starts in: one empty block, still editable.
    pub fn initial() -> Self {
        Self::new(vec![Block::empty()], false)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn block(&self, block_id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == block_id)
    }

    pub fn block_mut(&mut self, block_id: &BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id() == block_id)
    }

    pub fn non_blank_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|block| !block.is_blank())
    }

    pub fn has_content(&self) -> bool {
        self.non_blank_blocks().next().is_some()
    }
}

pub type Sections = BTreeMap<SectionKey, Section>;

pub fn initial_sections() -> Sections {
    SectionKey::ALL
        .into_iter()
        .map(|key| (key, Section::initial()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormHeader {
    pub company: String,
    pub location: String,
    pub date: String,
    pub participants_a: String,
    pub participants_b: String,
}

/// One meeting-minutes submission in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    id: FormId,
    header: FormHeader,
    sections: Sections,
    created_at: DateTime<Utc>,
}

impl Form {
    pub fn new(id: FormId, created_at: DateTime<Utc>) -> Self {
        Self::from_parts(id, FormHeader::default(), initial_sections(), created_at)
    }

    pub fn from_parts(
        id: FormId,
        header: FormHeader,
        sections: Sections,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            header,
            sections,
            created_at,
        }
    }

    pub fn id(&self) -> &FormId {
        &self.id
    }

    pub fn header(&self) -> &FormHeader {
        &self.header
    }

    pub fn set_header(&mut self, header: FormHeader) {
        self.header = header;
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut Sections {
        &mut self.sections
    }

    pub fn set_sections(&mut self, sections: Sections) {
        self.sections = sections;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Puts every section back to its initial state. The header is kept.
    pub fn reset_sections(&mut self) {
        self.sections = initial_sections();
    }

    /// Whether every known section is marked completed; a missing section counts as open.
    pub fn all_sections_completed(&self) -> bool {
        SectionKey::ALL
            .into_iter()
            .all(|key| self.sections.get(&key).is_some_and(Section::completed))
    }

    pub fn summary(&self) -> FormSummary {
        let company = self.header.company.trim();
        let title = if company.is_empty() {
            UNTITLED_FORM_TITLE.to_owned()
        } else {
            company.to_owned()
        };

        let date = self.header.date.trim();
        let date = if date.is_empty() {
            self.created_at.format("%Y-%m-%d").to_string()
        } else {
            date.to_owned()
        };

        FormSummary {
            id: self.id.clone(),
            title,
            date,
        }
    }
}

/// Listing projection of a [`Form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSummary {
    pub id: FormId,
    pub title: String,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single().expect("valid timestamp")
    }

    #[test]
    fn new_form_has_all_sections_with_one_empty_block() {
        let form = Form::new(FormId::new("f1").expect("form id"), created());
        assert_eq!(form.sections().len(), 3);
        for key in SectionKey::ALL {
            let section = &form.sections()[&key];
            assert_eq!(section.blocks().len(), 1);
            assert!(section.blocks()[0].is_blank());
            assert!(!section.completed());
        }
        assert!(!form.all_sections_completed());
    }

    #[test]
    fn section_key_parses_wire_names_only() {
        assert_eq!("contabil".parse::<SectionKey>(), Ok(SectionKey::Contabil));
        assert!("Contabil".parse::<SectionKey>().is_err());
        assert!("rh".parse::<SectionKey>().is_err());
    }

    #[test]
    fn blank_detection_looks_through_markup() {
        let id = || BlockId::generate();
        assert!(Block::new(id(), "  ", "<p><br></p>").is_blank());
        assert!(Block::new(id(), "", "<p>&nbsp;</p>").is_blank());
        assert!(!Block::new(id(), "Pauta", "").is_blank());
        assert!(!Block::new(id(), "", "<p>texto</p>").is_blank());
    }

    #[test]
    fn summary_falls_back_to_placeholder_title_and_creation_date() {
        let mut form = Form::new(FormId::new("f1").expect("form id"), created());
        let summary = form.summary();
        assert_eq!(summary.title, UNTITLED_FORM_TITLE);
        assert_eq!(summary.date, "2024-03-01");

        form.set_header(FormHeader {
            company: " ACME Ltda ".to_owned(),
            date: "2024-03-05".to_owned(),
            ..FormHeader::default()
        });
        let summary = form.summary();
        assert_eq!(summary.title, "ACME Ltda");
        assert_eq!(summary.date, "2024-03-05");
    }

    #[test]
    fn all_sections_completed_requires_every_section() {
        let mut form = Form::new(FormId::new("f1").expect("form id"), created());
        for key in [SectionKey::Fiscal, SectionKey::Dp] {
            form.sections_mut().get_mut(&key).expect("section").set_completed(true);
        }
        assert!(!form.all_sections_completed());

        form.sections_mut()
            .get_mut(&SectionKey::Contabil)
            .expect("section")
            .set_completed(true);
        assert!(form.all_sections_completed());

        form.sections_mut().remove(&SectionKey::Dp);
        assert!(!form.all_sections_completed());
    }
}
