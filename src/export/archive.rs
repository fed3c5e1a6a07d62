// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ExportError;

/// Writes a zip archive at `archive_path` holding `entries` as `(name inside archive, source file)`.
pub fn bundle_archive(archive_path: &Path, entries: &[(&str, &Path)]) -> Result<(), ExportError> {
    let file = File::create(archive_path).map_err(|source| ExportError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);

    for (name, source_path) in entries {
        let bytes = std::fs::read(source_path).map_err(|source| ExportError::Io {
            path: source_path.to_path_buf(),
            source,
        })?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(*name, options)?;
        zip.write_all(&bytes).map_err(|source| ExportError::Io {
            path: archive_path.to_path_buf(),
            source,
        })?;
    }

    zip.finish()?;
    Ok(())
}
