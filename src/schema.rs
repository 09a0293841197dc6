//! Message and field types
//!
//! The decoded form of one schema document: a [`Message`] owning an ordered
//! tree of [`Field`]s to unbounded depth. Values are built once per decode
//! pass and never mutated afterwards.

use serde::Serialize;

use crate::version::VersionRange;

/// Default value carried by a field
///
/// Defaults are heterogeneous across schema documents (`"-1"`, `false`,
/// `0`), so they are retained opaquely and never interpreted against the
/// field's declared type.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    #[default]
    Absent,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl FieldDefault {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldDefault::Absent)
    }
}

/// One message field, possibly nested
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name as written in the document (may be empty)
    pub name: String,
    /// Declared type name, e.g. "int16" or "[]ApiVersion"
    #[serde(rename = "type")]
    pub type_name: String,

    /// Versions in which the field is present on the wire
    #[serde(skip_serializing_if = "VersionRange::is_unset")]
    pub versions: VersionRange,
    /// Versions in which the field uses the tag-length encoding
    #[serde(skip_serializing_if = "VersionRange::is_unset")]
    pub tagged_versions: VersionRange,
    /// Versions in which the field may be null
    #[serde(skip_serializing_if = "VersionRange::is_unset")]
    pub nullable_versions: VersionRange,
    /// Versions in which the field uses the flexible wire encoding
    #[serde(skip_serializing_if = "VersionRange::is_unset")]
    pub flexible_versions: VersionRange,

    /// Whether an older reader can safely skip the field
    pub ignorable: bool,
    /// Free-text description
    pub about: String,

    /// Numeric tag, meaningful alongside `taggedVersions`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<u32>,
    /// Whether the field is the key of an enclosing map type
    pub map_key: bool,

    /// Nested fields; empty for leaf (primitive) types
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,

    /// Untyped default value, carried opaquely
    #[serde(skip_serializing_if = "FieldDefault::is_absent")]
    pub default: FieldDefault,
    /// Entity kind the value refers to, e.g. "topicName"
    pub entity_type: String,
    /// Whether decoders may borrow the bytes instead of copying
    pub zero_copy: bool,
}

impl Field {
    /// Whether this field is a leaf (primitive) type
    pub fn is_leaf(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether the field is ever tag-length encoded
    pub fn is_tagged(&self) -> bool {
        !self.tagged_versions.is_none()
    }
}

/// One decoded schema document
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Protocol operation identifier
    pub api_key: i32,
    /// Request/response classifier
    #[serde(rename = "type")]
    pub message_type: String,
    /// Listener roles the message applies to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub listeners: Vec<String>,
    /// Message name, e.g. "ApiVersionsRequest"
    pub name: String,
    /// Versions of the message that exist
    pub valid_versions: VersionRange,
    /// Whether the newest valid version is still subject to change
    pub latest_version_unstable: bool,
    /// Versions using the flexible wire encoding
    pub flexible_versions: VersionRange,
    /// The message body
    pub fields: Vec<Field>,
    /// Reusable struct definitions referenced by fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub common_structs: Vec<Field>,
}

impl Message {
    /// Look up a top-level field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a common struct definition by name
    pub fn common_struct(&self, name: &str) -> Option<&Field> {
        self.common_structs.iter().find(|f| f.name == name)
    }
}
