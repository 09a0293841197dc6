//! Protocol Message Schema Validator
//!
//! Validates directories of protocol message schema documents: files that
//! describe a wire message's fields, their types, and the range of protocol
//! versions in which each field is present, nullable, tagged, or
//! flexible-encoded. The consumer is a tooling pipeline that needs
//! confidence a schema tree is well-formed before generating serialization
//! code from it.
//!
//! ## Features
//!
//! - **Strict Decoding**: unknown attributes are rejected at every nesting
//!   level, catching schema drift and typos
//! - **Version Range Grammar**: exact (`"3"`), open-ended (`"3+"`), closed
//!   (`"0-4"`), and `none` range tokens
//! - **Relaxed JSON Input**: comments and trailing commas are normalized
//!   away before decoding
//! - **Batch Policies**: fail-fast or collect-all traversal over a schema
//!   directory, selected by the caller
//!
//! ## Pipeline
//!
//! ```text
//! raw text -> normalize -> strict JSON -> decode -> Message
//!                                          |
//!                                          +-> MalformedRange
//!                                          +-> UnknownAttribute
//!                                          +-> TypeMismatch
//! ```
//!
//! Decoding a document is a pure, synchronous, single pass: no I/O, no
//! shared state, safe to run concurrently across independent documents.

pub mod config;
pub mod decode;
pub mod error;
pub mod normalize;
pub mod schema;
pub mod validate;
pub mod version;

pub use config::SchemaConfig;
pub use decode::decode_message;
pub use error::{Result, SchemaError};
pub use normalize::{normalize, NormalizeError};
pub use schema::{Field, FieldDefault, Message};
pub use validate::{
    validate_directory, validate_file, validate_str, DocumentOutcome, FailurePolicy,
    ValidationSummary,
};
pub use version::{RangeError, RangeKind, VersionRange};
