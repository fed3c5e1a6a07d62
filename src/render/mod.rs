// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document rendering.
//!
//! Turns form sections plus the header into a styled HTML document. Rendering is a pure
//! function of its inputs; the export packager owns everything that touches the filesystem.

pub mod date;
pub mod document;


pub use date::display_date;
pub use document::{render_document, RenderError, DOCUMENT_TITLE};
