// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ata: meeting-minutes forms with PDF export.
//!
//! Forms are edited section by section through a small HTTP API, persisted as JSON, rendered to
//! an HTML document and exported as a PDF (optionally zipped) for download.

pub mod config;
pub mod content;
pub mod export;
pub mod model;
pub mod ops;
pub mod render;
pub mod server;
pub mod store;
