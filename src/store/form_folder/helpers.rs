// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormJson {
    id: String,
    created_at: String,
    #[serde(default)]
    header: HeaderJson,
    #[serde(default)]
    sections: BTreeMap<String, SectionJson>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderJson {
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    participants_a: String,
    #[serde(default)]
    participants_b: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SectionJson {
    #[serde(default)]
    blocks: Vec<BlockJson>,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlockJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FormSummaryJson {
    id: String,
    title: String,
    date: String,
}

fn form_to_json(form: &Form) -> FormJson {
    let header = form.header();
    FormJson {
        id: form.id().as_str().to_owned(),
        created_at: form
            .created_at()
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        header: HeaderJson {
            company: header.company.clone(),
            location: header.location.clone(),
            date: header.date.clone(),
            participants_a: header.participants_a.clone(),
            participants_b: header.participants_b.clone(),
        },
        sections: form
            .sections()
            .iter()
            .map(|(key, section)| {
                let blocks = section
                    .blocks()
                    .iter()
                    .map(|block| BlockJson {
                        id: Some(block.id().as_str().to_owned()),
                        title: block.title().to_owned(),
                        content: block.content().to_owned(),
                    })
                    .collect();
                (
                    key.as_str().to_owned(),
                    SectionJson {
                        blocks,
                        completed: section.completed(),
                    },
                )
            })
            .collect(),
    }
}

fn form_from_json(path: &Path, form_json: FormJson) -> Result<Form, StoreError> {
    let form_id = FormId::new(form_json.id.clone()).map_err(|source| StoreError::InvalidId {
        field: "form.id",
        value: form_json.id,
        source,
    })?;

    let created_at = DateTime::parse_from_rfc3339(&form_json.created_at)
        .map_err(|source| StoreError::InvalidTimestamp {
            path: path.to_path_buf(),
            value: form_json.created_at.clone(),
            source,
        })?
        .with_timezone(&Utc);

    let mut sections = Sections::new();
    for (raw_key, section_json) in form_json.sections {
        let key = raw_key
            .parse::<SectionKey>()
            .map_err(|source| StoreError::InvalidSection {
                path: path.to_path_buf(),
                source,
            })?;

        let mut blocks = Vec::with_capacity(section_json.blocks.len());
        for block_json in section_json.blocks {
            let block_id = match block_json.id {
                Some(raw) => BlockId::new(raw.clone()).map_err(|source| StoreError::InvalidId {
                    field: "block.id",
                    value: raw,
                    source,
                })?,
                None => BlockId::generate(),
            };
            blocks.push(Block::new(block_id, block_json.title, block_json.content));
        }
        sections.insert(key, Section::new(blocks, section_json.completed));
    }

    let header = form_json.header;
    Ok(Form::from_parts(
        form_id,
        FormHeader {
            company: header.company,
            location: header.location,
            date: header.date,
            participants_a: header.participants_a,
            participants_b: header.participants_b,
        },
        sections,
        created_at,
    ))
}

fn summary_to_json(summary: &FormSummary) -> FormSummaryJson {
    FormSummaryJson {
        id: summary.id.as_str().to_owned(),
        title: summary.title.clone(),
        date: summary.date.clone(),
    }
}

fn summary_from_json(path: &Path, entry: FormSummaryJson) -> Result<FormSummary, StoreError> {
    let id = FormId::new(entry.id.clone()).map_err(|source| StoreError::InvalidId {
        field: "index.id",
        value: entry.id,
        source,
    })?;
    tracing::trace!(index = ?path, form_id = %id, "index entry loaded");
    Ok(FormSummary {
        id,
        title: entry.title,
        date: entry.date,
    })
}

fn encode_persisted_id_segment(segment: &str) -> String {
    if !needs_windows_safe_filename_segment_encoding(segment) {
        return segment.to_owned();
    }

    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(1 + segment.len().saturating_mul(2));
    out.push('~');
    for &b in segment.as_bytes() {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

fn needs_windows_safe_filename_segment_encoding(segment: &str) -> bool {
    if segment.starts_with('~') || segment.starts_with('.') {
        return true;
    }
    if segment.ends_with(' ') || segment.ends_with('.') {
        return true;
    }

    let trimmed = segment.trim_end_matches([' ', '.']);
    let base = trimmed.split('.').next().unwrap_or(trimmed);
    if is_windows_device_name(base) {
        return true;
    }

    segment.chars().any(|ch| {
        matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
            || ch <= '\u{1f}'
            || ch == '\u{7f}'
    })
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    match base.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => base
            .strip_prefix("COM")
            .or_else(|| base.strip_prefix("LPT"))
            .is_some_and(|num| matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")),
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

static TMP_FILE_SEQ: AtomicU64 = AtomicU64::new(0);

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    fs::create_dir_all(parent).map_err(|source| StoreError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let seq = TMP_FILE_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp_path = parent.join(format!(
        ".ata.tmp.{}.{}.{nanos}.{seq}",
        file_name.to_string_lossy(),
        std::process::id(),
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
