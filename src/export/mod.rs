// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Export packaging.
//!
//! An export renders the form, lays the document out on fixed-size pages, writes it as a PDF
//! into the output directory and optionally bundles that PDF into a zip archive. Artifacts are
//! named after a freshly generated [`ExportId`] so concurrent exports never collide.

pub mod archive;
pub mod layout;
pub mod pdf;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use crate::content::{self, ContentError};
use crate::model::{ExportId, Form, FormHeader, Sections};
use crate::render::{render_document, RenderError, DOCUMENT_TITLE};

pub use archive::bundle_archive;
pub use layout::{layout_document, FontFace, PageLayout, PageSpec, TextRun};
pub use pdf::write_pdf;

/// Name of the PDF inside the archive, and the download name of a bare PDF.
pub const PDF_DOWNLOAD_NAME: &str = "ata.pdf";
pub const ARCHIVE_DOWNLOAD_NAME: &str = "ata.zip";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Failure while producing an export.
///
/// Every variant displays as the same opaque message; use [`ExportError::detail`] for logs.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("generation failed")]
    Render(#[source] RenderError),
    #[error("generation failed")]
    Content(#[source] ContentError),
    #[error("generation failed")]
    Layout(String),
    #[error("generation failed")]
    Archive(#[from] zip::result::ZipError),
    #[error("generation failed")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn detail(&self) -> String {
        match self {
            Self::Render(err) => format!("render failed: {err}"),
            Self::Content(err) => format!("rendered document is not parseable: {err}"),
            Self::Layout(message) => format!("pdf encoding failed: {message}"),
            Self::Archive(err) => format!("archive failed: {err}"),
            Self::Io { path, source } => format!("io error at {}: {source}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub page: PageSpec,
    pub archive: bool,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            page: PageSpec::default(),
            archive: true,
        }
    }
}

/// A finished export as served for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub download_name: &'static str,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct ExportPackager {
    options: ExportOptions,
}

impl ExportPackager {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn output_dir(&self) -> &Path {
        &self.options.output_dir
    }

    pub fn pdf_path(&self, export_id: &ExportId) -> PathBuf {
        self.options.output_dir.join(format!("{export_id}.pdf"))
    }

    pub fn archive_path(&self, export_id: &ExportId) -> PathBuf {
        self.options.output_dir.join(format!("{export_id}.zip"))
    }

    pub fn export(&self, form: &Form) -> Result<ExportId, ExportError> {
        self.export_sections(form.sections(), form.header())
    }

    /// Produces the export artifacts and returns their identifier.
    ///
    /// Files written before a failure are left in place.
    pub fn export_sections(
        &self,
        sections: &Sections,
        header: &FormHeader,
    ) -> Result<ExportId, ExportError> {
        let document = render_document(sections, header).map_err(ExportError::Render)?;
        let (pdf, page_count) = render_pdf(&document, &self.options.page)?;

        let output_dir = &self.options.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
            path: output_dir.clone(),
            source,
        })?;

        let export_id = ExportId::generate();
        let pdf_path = self.pdf_path(&export_id);
        std::fs::write(&pdf_path, pdf).map_err(|source| ExportError::Io {
            path: pdf_path.clone(),
            source,
        })?;

        if self.options.archive {
            bundle_archive(
                &self.archive_path(&export_id),
                &[(PDF_DOWNLOAD_NAME, pdf_path.as_path())],
            )?;
        }

        tracing::info!(
            export_id = %export_id,
            pages = page_count,
            archive = self.options.archive,
            "export written"
        );
        Ok(export_id)
    }

    /// Finds the downloadable artifact of an export, preferring the archive.
    pub fn locate(&self, export_id: &ExportId) -> Option<ExportArtifact> {
        let archive = self.archive_path(export_id);
        if archive.is_file() {
            return Some(ExportArtifact {
                path: archive,
                download_name: ARCHIVE_DOWNLOAD_NAME,
                content_type: ARCHIVE_CONTENT_TYPE,
            });
        }

        let pdf = self.pdf_path(export_id);
        pdf.is_file().then_some(ExportArtifact {
            path: pdf,
            download_name: PDF_DOWNLOAD_NAME,
            content_type: PDF_CONTENT_TYPE,
        })
    }
}

/// Lays out a rendered HTML document and encodes it as PDF, returning the bytes and page count.
pub fn render_pdf(document: &str, page: &PageSpec) -> Result<(Vec<u8>, usize), ExportError> {
    let tree = content::parse(document).map_err(ExportError::Content)?;
    let pages = layout_document(&tree, page);
    let bytes = write_pdf(&pages, page, DOCUMENT_TITLE)?;
    Ok((bytes, pages.len()))
}
