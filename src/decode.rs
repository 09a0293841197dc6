//! Strict schema document decoding
//!
//! Decodes one strict-JSON document into a [`Message`] by explicit
//! recursive descent. Decoding is closed-world at every nesting level: an
//! attribute outside the recognized set for the entity being decoded aborts
//! the whole document with an error naming the attribute and its path.
//! Absent attributes always take their zero value; present attributes must
//! have the declared shape.

use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::schema::{Field, FieldDefault, Message};
use crate::version::VersionRange;

/// Attributes recognized on the top-level message object
const MESSAGE_ATTRIBUTES: &[&str] = &[
    "apiKey",
    "type",
    "listeners",
    "name",
    "validVersions",
    "latestVersionUnstable",
    "flexibleVersions",
    "fields",
    "commonStructs",
];

/// Attributes recognized on a field object, at any depth
const FIELD_ATTRIBUTES: &[&str] = &[
    "name",
    "type",
    "versions",
    "taggedVersions",
    "nullableVersions",
    "flexibleVersions",
    "ignorable",
    "about",
    "tag",
    "mapKey",
    "fields",
    "default",
    "entityType",
    "zeroCopy",
];

/// Decode one schema document into a [`Message`]
///
/// All-or-nothing: the first structural error aborts the decode and no
/// partial message is produced. The call holds no state between documents
/// and is safe to run concurrently on independent inputs.
pub fn decode_message(doc: &Value) -> Result<Message> {
    let obj = doc.as_object().ok_or_else(|| SchemaError::TypeMismatch {
        path: "message".to_string(),
        attribute: "message".to_string(),
        expected: "object",
        found: kind_name(doc),
    })?;
    reject_unknown(obj, "message", MESSAGE_ATTRIBUTES)?;

    Ok(Message {
        api_key: int_attr(obj, "message", "apiKey")?.unwrap_or(0),
        message_type: string_attr(obj, "message", "type")?.unwrap_or_default(),
        listeners: string_seq_attr(obj, "message", "listeners")?,
        name: string_attr(obj, "message", "name")?.unwrap_or_default(),
        valid_versions: range_attr(obj, "message", "validVersions")?.unwrap_or_default(),
        latest_version_unstable: bool_attr(obj, "message", "latestVersionUnstable")?
            .unwrap_or(false),
        flexible_versions: range_attr(obj, "message", "flexibleVersions")?.unwrap_or_default(),
        fields: field_seq_attr(obj, "message", "fields")?,
        common_structs: field_seq_attr(obj, "message", "commonStructs")?,
    })
}

/// Decode one field object at `path`, recursing into nested fields
fn decode_field(obj: &Map<String, Value>, path: &str) -> Result<Field> {
    reject_unknown(obj, path, FIELD_ATTRIBUTES)?;

    Ok(Field {
        name: string_attr(obj, path, "name")?.unwrap_or_default(),
        type_name: string_attr(obj, path, "type")?.unwrap_or_default(),
        versions: range_attr(obj, path, "versions")?.unwrap_or_default(),
        tagged_versions: range_attr(obj, path, "taggedVersions")?.unwrap_or_default(),
        nullable_versions: range_attr(obj, path, "nullableVersions")?.unwrap_or_default(),
        flexible_versions: range_attr(obj, path, "flexibleVersions")?.unwrap_or_default(),
        ignorable: bool_attr(obj, path, "ignorable")?.unwrap_or(false),
        about: string_attr(obj, path, "about")?.unwrap_or_default(),
        tag: tag_attr(obj, path, "tag")?,
        map_key: bool_attr(obj, path, "mapKey")?.unwrap_or(false),
        fields: field_seq_attr(obj, path, "fields")?,
        default: default_attr(obj, path, "default")?,
        entity_type: string_attr(obj, path, "entityType")?.unwrap_or_default(),
        zero_copy: bool_attr(obj, path, "zeroCopy")?.unwrap_or(false),
    })
}

/// The strict-decoding check, shared by both entity kinds
fn reject_unknown(obj: &Map<String, Value>, path: &str, known: &[&str]) -> Result<()> {
    for attribute in obj.keys() {
        if !known.contains(&attribute.as_str()) {
            return Err(SchemaError::UnknownAttribute {
                path: path.to_string(),
                attribute: attribute.clone(),
            });
        }
    }
    Ok(())
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn attr_path(path: &str, attribute: &str) -> String {
    format!("{path}.{attribute}")
}

fn mismatch(path: &str, attribute: &str, expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        path: attr_path(path, attribute),
        attribute: attribute.to_string(),
        expected,
        found: kind_name(value),
    }
}

fn string_attr(obj: &Map<String, Value>, path: &str, attribute: &str) -> Result<Option<String>> {
    match obj.get(attribute) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(mismatch(path, attribute, "string", other)),
    }
}

fn bool_attr(obj: &Map<String, Value>, path: &str, attribute: &str) -> Result<Option<bool>> {
    match obj.get(attribute) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(mismatch(path, attribute, "boolean", other)),
    }
}

fn int_attr(obj: &Map<String, Value>, path: &str, attribute: &str) -> Result<Option<i32>> {
    match obj.get(attribute) {
        None => Ok(None),
        Some(value) => {
            let n = value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| mismatch(path, attribute, "integer", value))?;
            Ok(Some(n))
        }
    }
}

fn tag_attr(obj: &Map<String, Value>, path: &str, attribute: &str) -> Result<Option<u32>> {
    match obj.get(attribute) {
        None => Ok(None),
        Some(value) => {
            let n = value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| mismatch(path, attribute, "non-negative integer", value))?;
            Ok(Some(n))
        }
    }
}

fn string_seq_attr(obj: &Map<String, Value>, path: &str, attribute: &str) -> Result<Vec<String>> {
    let Some(value) = obj.get(attribute) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(path, attribute, "array", value))?;

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => out.push(s.clone()),
            other => {
                return Err(SchemaError::TypeMismatch {
                    path: format!("{path}.{attribute}[{index}]"),
                    attribute: attribute.to_string(),
                    expected: "string",
                    found: kind_name(other),
                })
            }
        }
    }
    Ok(out)
}

fn field_seq_attr(obj: &Map<String, Value>, path: &str, attribute: &str) -> Result<Vec<Field>> {
    let Some(value) = obj.get(attribute) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(path, attribute, "array", value))?;

    let mut fields = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{path}.{attribute}[{index}]");
        let item_obj = item.as_object().ok_or_else(|| SchemaError::TypeMismatch {
            path: item_path.clone(),
            attribute: attribute.to_string(),
            expected: "object",
            found: kind_name(item),
        })?;
        fields.push(decode_field(item_obj, &item_path)?);
    }
    Ok(fields)
}

/// Decode the opaque `default` attribute
///
/// Whatever scalar shape is present is retained uninterpreted; `null`
/// counts as absent.
fn default_attr(obj: &Map<String, Value>, path: &str, attribute: &str) -> Result<FieldDefault> {
    match obj.get(attribute) {
        None | Some(Value::Null) => Ok(FieldDefault::Absent),
        Some(Value::Bool(b)) => Ok(FieldDefault::Bool(*b)),
        Some(Value::Number(n)) => Ok(FieldDefault::Number(n.clone())),
        Some(Value::String(s)) => Ok(FieldDefault::String(s.clone())),
        Some(other) => Err(mismatch(path, attribute, "scalar", other)),
    }
}

/// Decode a range-valued attribute by delegating to the range parser
///
/// String values are handed over as-is; a bare number or boolean reaches
/// the grammar as its JSON text, so `"versions": 7` is an exact range.
fn range_attr(
    obj: &Map<String, Value>,
    path: &str,
    attribute: &str,
) -> Result<Option<VersionRange>> {
    let Some(value) = obj.get(attribute) else {
        return Ok(None);
    };
    let token = match value {
        Value::String(s) => s.clone(),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        other => return Err(mismatch(path, attribute, "version range string", other)),
    };
    let range = VersionRange::parse(&token).map_err(|source| SchemaError::MalformedRange {
        path: attr_path(path, attribute),
        source,
    })?;
    Ok(Some(range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::RangeKind;
    use serde_json::json;

    #[test]
    fn test_decode_request_message() {
        let doc = json!({
            "apiKey": 18,
            "type": "request",
            "name": "X",
            "validVersions": "0-4",
            "flexibleVersions": "3+",
            "fields": [
                {"name": "A", "type": "string", "versions": "3+",
                 "ignorable": true, "about": "d"}
            ]
        });

        let msg = decode_message(&doc).unwrap();
        assert_eq!(msg.api_key, 18);
        assert_eq!(msg.message_type, "request");
        assert_eq!(msg.name, "X");
        assert_eq!(msg.valid_versions.raw, "0-4");
        assert_eq!(msg.valid_versions.begin, 0);
        assert_eq!(msg.valid_versions.end, Some(4));
        assert_eq!(msg.flexible_versions.raw, "3+");
        assert_eq!(msg.flexible_versions.begin, 3);
        assert_eq!(msg.flexible_versions.end, None);

        assert_eq!(msg.fields.len(), 1);
        let field = msg.field("A").unwrap();
        assert_eq!(field.type_name, "string");
        assert_eq!(field.versions.kind, RangeKind::OpenEnded);
        assert_eq!(field.versions.begin, 3);
        assert!(field.ignorable);
        assert_eq!(field.about, "d");
        assert!(field.is_leaf());
    }

    #[test]
    fn test_unknown_attribute_top_level() {
        let doc = json!({"apiKey": 1, "name": "X", "apiKye": 2});
        match decode_message(&doc).unwrap_err() {
            SchemaError::UnknownAttribute { path, attribute } => {
                assert_eq!(path, "message");
                assert_eq!(attribute, "apiKye");
            }
            other => panic!("expected UnknownAttribute, got {other}"),
        }

        // Same document minus the typo decodes fine
        let doc = json!({"apiKey": 1, "name": "X"});
        assert!(decode_message(&doc).is_ok());
    }

    #[test]
    fn test_unknown_attribute_three_levels_deep() {
        let doc = json!({
            "name": "X",
            "fields": [
                {"name": "A", "type": "[]B", "fields": [
                    {"name": "B", "type": "[]C", "fields": [
                        {"name": "C", "type": "int8", "bogusAttr": 1}
                    ]}
                ]}
            ]
        });

        match decode_message(&doc).unwrap_err() {
            SchemaError::UnknownAttribute { path, attribute } => {
                assert_eq!(path, "message.fields[0].fields[0].fields[0]");
                assert_eq!(attribute, "bogusAttr");
            }
            other => panic!("expected UnknownAttribute, got {other}"),
        }
    }

    #[test]
    fn test_malformed_range_aborts_document() {
        let doc = json!({
            "name": "X",
            "fields": [
                {"name": "A", "type": "string", "versions": "bogus"}
            ]
        });

        match decode_message(&doc).unwrap_err() {
            SchemaError::MalformedRange { path, source } => {
                assert_eq!(path, "message.fields[0].versions");
                assert_eq!(source.token, "bogus");
            }
            other => panic!("expected MalformedRange, got {other}"),
        }
    }

    #[test]
    fn test_range_attribute_as_bare_number() {
        let doc = json!({"name": "X", "validVersions": 7});
        let msg = decode_message(&doc).unwrap();
        assert_eq!(msg.valid_versions.kind, RangeKind::Exact);
        assert_eq!(msg.valid_versions.begin, 7);
        assert_eq!(msg.valid_versions.end, Some(7));
    }

    #[test]
    fn test_range_attribute_wrong_shape() {
        let doc = json!({"name": "X", "validVersions": ["0-4"]});
        match decode_message(&doc).unwrap_err() {
            SchemaError::TypeMismatch {
                path,
                expected,
                found,
                ..
            } => {
                assert_eq!(path, "message.validVersions");
                assert_eq!(expected, "version range string");
                assert_eq!(found, "array");
            }
            other => panic!("expected TypeMismatch, got {other}"),
        }
    }

    #[test]
    fn test_boolean_attribute_holding_string() {
        let doc = json!({
            "name": "X",
            "fields": [{"name": "A", "type": "bool", "ignorable": "yes"}]
        });
        match decode_message(&doc).unwrap_err() {
            SchemaError::TypeMismatch {
                path,
                attribute,
                expected,
                found,
            } => {
                assert_eq!(path, "message.fields[0].ignorable");
                assert_eq!(attribute, "ignorable");
                assert_eq!(expected, "boolean");
                assert_eq!(found, "string");
            }
            other => panic!("expected TypeMismatch, got {other}"),
        }
    }

    #[test]
    fn test_default_shapes_retained_opaquely() {
        let doc = json!({
            "name": "X",
            "fields": [
                {"name": "A", "type": "int64", "default": "-1"},
                {"name": "B", "type": "bool", "default": false},
                {"name": "C", "type": "int32", "default": 5},
                {"name": "D", "type": "string", "default": null},
                {"name": "E", "type": "string"}
            ]
        });

        let msg = decode_message(&doc).unwrap();
        assert_eq!(
            msg.field("A").unwrap().default,
            FieldDefault::String("-1".to_string())
        );
        assert_eq!(msg.field("B").unwrap().default, FieldDefault::Bool(false));
        assert_eq!(
            msg.field("C").unwrap().default,
            FieldDefault::Number(5.into())
        );
        assert_eq!(msg.field("D").unwrap().default, FieldDefault::Absent);
        assert_eq!(msg.field("E").unwrap().default, FieldDefault::Absent);
    }

    #[test]
    fn test_default_rejects_composite_shapes() {
        let doc = json!({
            "name": "X",
            "fields": [{"name": "A", "type": "string", "default": []}]
        });
        assert!(matches!(
            decode_message(&doc).unwrap_err(),
            SchemaError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_tag_must_be_non_negative() {
        let doc = json!({
            "name": "X",
            "fields": [{"name": "A", "type": "string", "tag": -1}]
        });
        assert!(matches!(
            decode_message(&doc).unwrap_err(),
            SchemaError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_tagged_field() {
        let doc = json!({
            "name": "X",
            "fields": [{
                "name": "A", "type": "int64", "versions": "3+",
                "taggedVersions": "3+", "tag": 1, "default": "-1"
            }]
        });
        let field = decode_message(&doc).unwrap().field("A").cloned().unwrap();
        assert!(field.is_tagged());
        assert_eq!(field.tag, Some(1));
        assert_eq!(field.tagged_versions.begin, 3);
    }

    #[test]
    fn test_common_structs_decode_as_fields() {
        let doc = json!({
            "name": "X",
            "commonStructs": [
                {"name": "Cursor", "versions": "4+", "fields": [
                    {"name": "TopicName", "type": "string", "versions": "4+"}
                ]}
            ]
        });
        let msg = decode_message(&doc).unwrap();
        let cursor = msg.common_struct("Cursor").unwrap();
        assert_eq!(cursor.fields.len(), 1);
    }

    #[test]
    fn test_unknown_attribute_inside_common_structs() {
        let doc = json!({
            "name": "X",
            "commonStructs": [{"name": "Cursor", "wat": 1}]
        });
        match decode_message(&doc).unwrap_err() {
            SchemaError::UnknownAttribute { path, attribute } => {
                assert_eq!(path, "message.commonStructs[0]");
                assert_eq!(attribute, "wat");
            }
            other => panic!("expected UnknownAttribute, got {other}"),
        }
    }

    #[test]
    fn test_listeners_order_preserved() {
        let doc = json!({
            "name": "X",
            "listeners": ["zkBroker", "broker", "controller"]
        });
        let msg = decode_message(&doc).unwrap();
        assert_eq!(msg.listeners, ["zkBroker", "broker", "controller"]);
    }

    #[test]
    fn test_listener_element_wrong_shape() {
        let doc = json!({"name": "X", "listeners": ["broker", 3]});
        match decode_message(&doc).unwrap_err() {
            SchemaError::TypeMismatch { path, .. } => {
                assert_eq!(path, "message.listeners[1]");
            }
            other => panic!("expected TypeMismatch, got {other}"),
        }
    }

    #[test]
    fn test_empty_field_name_is_legal() {
        let doc = json!({"name": "X", "fields": [{"type": "string"}]});
        let msg = decode_message(&doc).unwrap();
        assert_eq!(msg.fields[0].name, "");
    }

    #[test]
    fn test_document_root_must_be_object() {
        assert!(matches!(
            decode_message(&json!([1, 2])).unwrap_err(),
            SchemaError::TypeMismatch { found: "array", .. }
        ));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let doc = json!({
            "apiKey": 19,
            "type": "request",
            "name": "CreateTopicsRequest",
            "validVersions": "0-7",
            "flexibleVersions": "5+",
            "fields": [
                {"name": "Topics", "type": "[]CreatableTopic",
                 "versions": "0+", "fields": [
                    {"name": "Name", "type": "string", "versions": "0+",
                     "mapKey": true, "entityType": "topicName"}
                ]}
            ]
        });
        let first = decode_message(&doc).unwrap();
        let second = decode_message(&doc).unwrap();
        assert_eq!(first, second);
    }
}
