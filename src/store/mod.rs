// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Form persistence.
//!
//! [`FormStore`] is the service the HTTP layer talks to. It sits on a [`FormBackend`]
//! capability (get/put/delete/list) so the storage engine can be swapped: [`FormFolder`] keeps
//! one JSON file per form plus a summary index on disk, [`MemoryBackend`] keeps everything in a
//! map for tests and benches.

pub mod form_folder;
pub mod memory;


use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::model::{Form, FormHeader, FormId, FormSummary, IdError, ParseSectionKeyError, Sections};

pub use form_folder::FormFolder;
pub use memory::MemoryBackend;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid id for {field}: {value:?}: {source}")]
    InvalidId {
        field: &'static str,
        value: String,
        #[source]
        source: IdError,
    },
    #[error("invalid section key in {path:?}: {source}")]
    InvalidSection {
        path: PathBuf,
        #[source]
        source: ParseSectionKeyError,
    },
    #[error("invalid timestamp in {path:?}: {value:?}")]
    InvalidTimestamp {
        path: PathBuf,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
    #[error("form not found: {form_id}")]
    NotFound { form_id: FormId },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// Storage capability behind [`FormStore`].
///
/// `put` is an upsert of the form together with its summary; implementations keep the two in
/// step so that every stored form has exactly one summary.
pub trait FormBackend: fmt::Debug + Send + Sync {
    fn get(&self, form_id: &FormId) -> Result<Option<Form>, StoreError>;

    fn put(&self, form: &Form) -> Result<(), StoreError>;

    /// Removes the form and its summary. Returns whether anything was removed.
    fn delete(&self, form_id: &FormId) -> Result<bool, StoreError>;

    fn list(&self) -> Result<Vec<FormSummary>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct FormStore {
    backend: Arc<dyn FormBackend>,
}

impl FormStore {
    pub fn new(backend: impl FormBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    pub fn create_form(&self) -> Result<FormId, StoreError> {
        let form = Form::new(FormId::generate(), Utc::now());
        self.backend.put(&form)?;
        tracing::info!(form_id = %form.id(), "form created");
        Ok(form.id().clone())
    }

    pub fn read_form(&self, form_id: &FormId) -> Result<Form, StoreError> {
        self.backend
            .get(form_id)?
            .ok_or_else(|| StoreError::NotFound {
                form_id: form_id.clone(),
            })
    }

    /// Overwrites the sections, and the header when one is given.
    pub fn save_form(
        &self,
        form_id: &FormId,
        sections: Sections,
        header: Option<FormHeader>,
    ) -> Result<(), StoreError> {
        self.update_form(form_id, |form| {
            form.set_sections(sections);
            if let Some(header) = header {
                form.set_header(header);
            }
            Ok::<_, StoreError>(())
        })
    }

    /// Loads a form, lets `edit` mutate it and persists the result when `edit` succeeds.
    pub fn update_form<T, E>(
        &self,
        form_id: &FormId,
        edit: impl FnOnce(&mut Form) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut form = self.read_form(form_id)?;
        let value = edit(&mut form)?;
        self.backend.put(&form)?;
        tracing::debug!(form_id = %form_id, "form saved");
        Ok(value)
    }

    pub fn reset_form(&self, form_id: &FormId) -> Result<(), StoreError> {
        self.update_form(form_id, |form| {
            form.reset_sections();
            Ok::<_, StoreError>(())
        })
    }

    pub fn delete_form(&self, form_id: &FormId) -> Result<(), StoreError> {
        if !self.backend.delete(form_id)? {
            return Err(StoreError::NotFound {
                form_id: form_id.clone(),
            });
        }
        tracing::info!(form_id = %form_id, "form deleted");
        Ok(())
    }

    /// Summaries ordered by date, newest first; ties broken by id.
    pub fn list_forms(&self) -> Result<Vec<FormSummary>, StoreError> {
        let mut summaries = self.backend.list()?;
        summaries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }
}
