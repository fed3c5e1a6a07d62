// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use uuid::Uuid;

/// An opaque identifier for forms, blocks and export artifacts.
///
/// Freshly allocated ids are uuid v4 strings, but any non-empty value that is a single path
/// segment is accepted so ids coming back from disk or a URL round-trip unchanged. Ids end up
/// in file names and URL paths, hence the segment rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Allocates a new random id.
    pub fn generate() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must not contain '/' or '\\'")]
    ContainsSeparator,
    #[error("id must not be '.' or '..'")]
    DotSegment,
}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains(['/', '\\']) {
        return Err(IdError::ContainsSeparator);
    }
    if value == "." || value == ".." {
        return Err(IdError::DotSegment);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormIdTag {}
pub type FormId = Id<FormIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockIdTag {}
pub type BlockId = Id<BlockIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportIdTag {}
pub type ExportId = Id<ExportIdTag>;

#[cfg(test)]
mod tests {
    use super::{FormId, Id, IdError};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_path_separators() {
        let result: Result<Id<()>, _> = Id::new("a/b");
        assert_eq!(result, Err(IdError::ContainsSeparator));
        let result: Result<Id<()>, _> = Id::new("a\\b");
        assert_eq!(result, Err(IdError::ContainsSeparator));
    }

    #[test]
    fn id_rejects_dot_segments() {
        assert_eq!("..".parse::<FormId>(), Err(IdError::DotSegment));
    }

    #[test]
    fn generated_ids_are_distinct_and_valid() {
        let a = FormId::generate();
        let b = FormId::generate();
        assert_ne!(a, b);
        assert_eq!(FormId::new(a.as_str()).expect("round-trip"), a);
    }
}
