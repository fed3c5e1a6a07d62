// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::{Form, FormId, FormSummary};

use super::{FormBackend, StoreError};

/// Keeps forms in a process-local map. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    forms: Mutex<BTreeMap<FormId, Form>>,
}

impl MemoryBackend {
    fn forms(&self) -> MutexGuard<'_, BTreeMap<FormId, Form>> {
        self.forms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FormBackend for MemoryBackend {
    fn get(&self, form_id: &FormId) -> Result<Option<Form>, StoreError> {
        Ok(self.forms().get(form_id).cloned())
    }

    fn put(&self, form: &Form) -> Result<(), StoreError> {
        self.forms().insert(form.id().clone(), form.clone());
        Ok(())
    }

    fn delete(&self, form_id: &FormId) -> Result<bool, StoreError> {
        Ok(self.forms().remove(form_id).is_some())
    }

    fn list(&self) -> Result<Vec<FormSummary>, StoreError> {
        Ok(self.forms().values().map(Form::summary).collect())
    }
}
