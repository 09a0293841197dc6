//! Document validation and directory traversal
//!
//! The per-document pipeline (read, normalize, parse, decode) plus the
//! directory walk that applies it to every schema file under a root.
//! Batch policy is an explicit value passed by the caller, never global
//! state; each document is validated independently, so a failure in one
//! never affects another.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::decode::decode_message;
use crate::error::{Result, SchemaError};
use crate::normalize::normalize;
use crate::schema::Message;

/// What to do with the rest of the batch after a failing document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep validating and collect every outcome
    #[default]
    CollectAll,
    /// Stop the walk at the first failing document
    FailFast,
}

/// Outcome of validating a single document
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Path of the document as visited by the walk
    pub path: PathBuf,
    /// The decoded message, or the error that aborted its decode
    pub result: Result<Message>,
}

impl DocumentOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregated outcomes of a directory walk
#[derive(Debug, Default)]
pub struct ValidationSummary {
    /// Per-document outcomes, in visit order
    pub outcomes: Vec<DocumentOutcome>,
}

impl ValidationSummary {
    /// Number of documents that decoded successfully
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Number of documents that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// The failing outcomes, in visit order
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }
}

/// Validate one document given as raw relaxed-JSON text
pub fn validate_str(raw: &str) -> Result<Message> {
    let clean = normalize(raw)?;
    let doc: serde_json::Value = serde_json::from_str(&clean)?;
    decode_message(&doc)
}

/// Read and validate one schema file
pub fn validate_file(path: &Path) -> Result<Message> {
    let raw = fs::read_to_string(path)?;
    validate_str(&raw)
}

/// Validate every schema file under `dir`
///
/// Files are visited in sorted order so outcomes are deterministic. Only
/// files with the given extension (no leading dot) are considered. Walk
/// errors (an unreadable directory, say) abort with an IO error; a failing
/// document is recorded as an outcome and, under
/// [`FailurePolicy::FailFast`], ends the walk with its outcome retained.
pub fn validate_directory(
    dir: &Path,
    extension: &str,
    policy: FailurePolicy,
) -> Result<ValidationSummary> {
    let mut summary = ValidationSummary::default();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| SchemaError::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().map(|e| e != extension).unwrap_or(true) {
            continue;
        }

        debug!(path = %path.display(), "validating schema document");
        let result = validate_file(path);
        let failed = result.is_err();
        summary.outcomes.push(DocumentOutcome {
            path: path.to_path_buf(),
            result,
        });

        if failed && policy == FailurePolicy::FailFast {
            break;
        }
    }

    Ok(summary)
}
