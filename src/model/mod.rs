// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A form holds a header plus one section per department; sections hold ordered blocks.

// Sample forms shared by unit tests, integration tests and benches.
#[doc(hidden)]
pub mod fixtures;
pub mod form;
pub mod ids;

pub use form::{
    initial_sections, Block, Form, FormHeader, FormSummary, ParseSectionKeyError, Section,
    SectionKey, Sections, UNTITLED_FORM_TITLE,
};
pub use ids::{BlockId, ExportId, FormId, Id, IdError};
