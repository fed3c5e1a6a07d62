// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    Block, BlockId, Form, FormHeader, FormId, FormSummary, Section, SectionKey, Sections,
};

use super::{FormBackend, StoreError, WriteDurability};

const FORMS_DIRNAME: &str = "forms";
const INDEX_FILENAME: &str = "forms.index.json";

/// File-backed form storage.
///
/// Layout under `root`:
/// - `forms/<form id>.json`: one document per form;
/// - `forms.index.json`: the summary list used for listing.
///
/// Every write goes through a temp file plus rename. Index updates are serialized inside the
/// process; concurrent saves of the same form are last-writer-wins.
#[derive(Debug)]
pub struct FormFolder {
    root: PathBuf,
    durability: WriteDurability,
    index_lock: Mutex<()>,
}

impl FormFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
            index_lock: Mutex::new(()),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn forms_dir(&self) -> PathBuf {
        self.root.join(FORMS_DIRNAME)
    }

    pub fn form_path(&self, form_id: &FormId) -> PathBuf {
        let file_stem = encode_persisted_id_segment(form_id.as_str());
        self.forms_dir().join(format!("{file_stem}.json"))
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILENAME)
    }

    pub fn load_form(&self, form_id: &FormId) -> Result<Option<Form>, StoreError> {
        let path = self.form_path(form_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let form_json: FormJson = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        form_from_json(&path, form_json).map(Some)
    }

    pub fn save_form(&self, form: &Form) -> Result<(), StoreError> {
        let path = self.form_path(form.id());
        let form_str = serde_json::to_string_pretty(&form_to_json(form)).map_err(|source| {
            StoreError::Json {
                path: path.clone(),
                source,
            }
        })?;
        write_atomic(&path, format!("{form_str}\n").as_bytes(), self.durability)?;

        let summary = form.summary();
        self.update_index(|entries| {
            entries.retain(|entry| entry.id != summary.id.as_str());
            entries.push(summary_to_json(&summary));
        })
    }

    pub fn remove_form(&self, form_id: &FormId) -> Result<bool, StoreError> {
        let path = self.form_path(form_id);
        let removed_file = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(source) if source.kind() == io::ErrorKind::NotFound => false,
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let mut removed_entry = false;
        self.update_index(|entries| {
            let before = entries.len();
            entries.retain(|entry| entry.id != form_id.as_str());
            removed_entry = entries.len() != before;
        })?;

        Ok(removed_file || removed_entry)
    }

    pub fn load_index(&self) -> Result<Vec<FormSummary>, StoreError> {
        let path = self.index_path();
        self.load_index_entries()?
            .into_iter()
            .map(|entry| summary_from_json(&path, entry))
            .collect()
    }

    fn load_index_entries(&self) -> Result<Vec<FormSummaryJson>, StoreError> {
        let path = self.index_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Json { path, source })
    }

    fn update_index(
        &self,
        edit: impl FnOnce(&mut Vec<FormSummaryJson>),
    ) -> Result<(), StoreError> {
        let _guard = self.index_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = self.load_index_entries()?;
        edit(&mut entries);

        let path = self.index_path();
        let index_str =
            serde_json::to_string_pretty(&entries).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        write_atomic(&path, format!("{index_str}\n").as_bytes(), self.durability)
    }
}

impl FormBackend for FormFolder {
    fn get(&self, form_id: &FormId) -> Result<Option<Form>, StoreError> {
        self.load_form(form_id)
    }

    fn put(&self, form: &Form) -> Result<(), StoreError> {
        self.save_form(form)
    }

    fn delete(&self, form_id: &FormId) -> Result<bool, StoreError> {
        self.remove_form(form_id)
    }

    fn list(&self) -> Result<Vec<FormSummary>, StoreError> {
        self.load_index()
    }
}

// On-disk JSON shapes, id encoding and atomic writes.
include!("form_folder/helpers.rs");

#[cfg(test)]
mod tests;
