//! Import/export codec for the tracker document.
//!
//! # Responsibility
//! - Serialize the full record list to a portable JSON array.
//! - Parse import documents, routing every entry through normalization.
//!
//! # Invariants
//! - Import never yields a partially valid list: either every entry is
//!   normalized or the whole document is rejected.
//! - Exported values round-trip through normalization unchanged.

use crate::model::discipline::Discipline;
use crate::model::normalize::{normalize_list, IdAllocator};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Suggested file name for a full export artifact.
pub const EXPORT_FILE_NAME: &str = "semtrack_export.json";

/// Import rejection reasons. The store stays untouched in both cases.
#[derive(Debug)]
pub enum ImportError {
    /// The document is not valid JSON text.
    Parse(serde_json::Error),
    /// The top-level JSON value is not an array.
    Format,
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid JSON: {err}"),
            Self::Format => write!(f, "top-level JSON value must be an array of records"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Format => None,
        }
    }
}

/// Export serialization failure. Does not affect store state.
#[derive(Debug)]
pub struct ExportError(serde_json::Error);

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "export serialization failed: {}", self.0)
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Serializes the full record list as a pretty-printed JSON array, the
/// shape offered for download and accepted back by [`import_document`].
pub fn export_document(items: &[Discipline]) -> Result<String, ExportError> {
    serde_json::to_string_pretty(items).map_err(ExportError)
}

/// Serializes one record as compact JSON for clipboard copy. Informational
/// only; this shape is not an import document.
pub fn export_record(item: &Discipline) -> Result<String, ExportError> {
    serde_json::to_string(item).map_err(ExportError)
}

/// Parses an import document into a normalized record list.
///
/// Fails with [`ImportError::Parse`] on invalid JSON and
/// [`ImportError::Format`] when the top level is not an array. Entries
/// themselves cannot fail: normalization is total.
pub fn import_document(text: &str, ids: &mut IdAllocator) -> Result<Vec<Discipline>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    normalize_list(&value, ids).ok_or(ImportError::Format)
}
