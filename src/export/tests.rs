// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs::File;
use std::io::Read;

use tempfile::TempDir;
use zip::ZipArchive;

use crate::model::fixtures::sample_form;
use crate::model::{Block, BlockId, ExportId, Form, FormId, Section, SectionKey};

use super::*;

fn packager(dir: &TempDir, archive: bool) -> ExportPackager {
    let mut options = ExportOptions::new(dir.path().join("out"));
    options.archive = archive;
    ExportPackager::new(options)
}

#[test]
fn export_writes_pdf_and_archive() {
    let dir = TempDir::new().expect("tempdir");
    let packager = packager(&dir, true);

    let export_id = packager.export(&sample_form()).expect("export");

    let pdf = std::fs::read(packager.pdf_path(&export_id)).expect("pdf on disk");
    assert!(pdf.starts_with(b"%PDF-"));

    let mut archive =
        ZipArchive::new(File::open(packager.archive_path(&export_id)).expect("zip on disk"))
            .expect("valid zip");
    assert_eq!(archive.len(), 1);
    let mut entry = archive.by_index(0).expect("entry");
    assert_eq!(entry.name(), PDF_DOWNLOAD_NAME);
    let mut archived = Vec::new();
    entry.read_to_end(&mut archived).expect("read entry");
    assert_eq!(archived, pdf);
}

#[test]
fn export_without_archive_writes_only_the_pdf() {
    let dir = TempDir::new().expect("tempdir");
    let packager = packager(&dir, false);

    let export_id = packager.export(&sample_form()).expect("export");
    assert!(packager.pdf_path(&export_id).is_file());
    assert!(!packager.archive_path(&export_id).exists());

    let artifact = packager.locate(&export_id).expect("artifact");
    assert_eq!(artifact.download_name, PDF_DOWNLOAD_NAME);
    assert_eq!(artifact.content_type, PDF_CONTENT_TYPE);
}

#[test]
fn locate_prefers_the_archive() {
    let dir = TempDir::new().expect("tempdir");
    let packager = packager(&dir, true);
    let export_id = packager.export(&sample_form()).expect("export");

    let artifact = packager.locate(&export_id).expect("artifact");
    assert_eq!(artifact.path, packager.archive_path(&export_id));
    assert_eq!(artifact.download_name, ARCHIVE_DOWNLOAD_NAME);
    assert_eq!(artifact.content_type, ARCHIVE_CONTENT_TYPE);
}

#[test]
fn locate_unknown_export_is_none() {
    let dir = TempDir::new().expect("tempdir");
    let packager = packager(&dir, true);
    assert_eq!(packager.locate(&ExportId::generate()), None);
}

#[test]
fn consecutive_exports_get_distinct_ids() {
    let dir = TempDir::new().expect("tempdir");
    let packager = packager(&dir, true);
    let form = sample_form();

    let first = packager.export(&form).expect("first");
    let second = packager.export(&form).expect("second");
    assert_ne!(first, second);
    assert!(packager.archive_path(&first).is_file());
    assert!(packager.archive_path(&second).is_file());
}

#[test]
fn empty_form_still_exports() {
    let dir = TempDir::new().expect("tempdir");
    let packager = packager(&dir, true);
    let form = Form::new(FormId::generate(), chrono::Utc::now());

    let export_id = packager.export(&form).expect("export");
    assert!(packager.locate(&export_id).is_some());
}

#[test]
fn malformed_block_content_fails_as_render_error() {
    let dir = TempDir::new().expect("tempdir");
    let packager = packager(&dir, true);
    let mut form = Form::new(FormId::generate(), chrono::Utc::now());
    form.sections_mut().insert(
        SectionKey::Fiscal,
        Section::new(vec![Block::new(BlockId::generate(), "x", "<p>a</em>")], false),
    );

    let err = packager.export(&form).unwrap_err();
    assert!(matches!(err, ExportError::Render(_)));
    assert_eq!(err.to_string(), "generation failed");
    assert!(err.detail().contains("render failed"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn unwritable_output_dir_is_an_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").expect("write blocker");
    let packager = ExportPackager::new(ExportOptions::new(blocker.join("nested")));

    let err = packager.export(&sample_form()).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert_eq!(err.to_string(), "generation failed");
}

#[test]
fn render_pdf_reports_page_count() {
    let body = (0..200).map(|idx| format!("<p>linha {idx}</p>")).collect::<String>();
    let (bytes, pages) = render_pdf(&body, &PageSpec::A4).expect("pdf");
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(pages > 1);
}
