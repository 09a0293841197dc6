//! Error types for schema validation

use thiserror::Error;

use crate::normalize::NormalizeError;
use crate::version::RangeError;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema validation errors
///
/// The structural kinds (`MalformedRange`, `UnknownAttribute`,
/// `TypeMismatch`) carry the dot/bracket path of the offending attribute,
/// rooted at `message` (e.g. `message.fields[3].taggedVersions`).
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{path}: {source}")]
    MalformedRange {
        path: String,
        #[source]
        source: RangeError,
    },

    #[error("{path}: unknown attribute {attribute:?}")]
    UnknownAttribute { path: String, attribute: String },

    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Whether this is one of the structural decode errors, as opposed to
    /// an IO/syntax failure surfaced from a collaborator.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SchemaError::MalformedRange { .. }
                | SchemaError::UnknownAttribute { .. }
                | SchemaError::TypeMismatch { .. }
        )
    }
}
