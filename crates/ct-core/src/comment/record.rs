//! JSON-backed comment records

use super::model::ThreadedComment;
use crate::config::{InputConfig, RootSentinel};
use crate::error::{Result, TreeError};
use crate::types::CommentId;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A comment read from a JSON document
///
/// The original object is kept verbatim in `fields`, identifier and parent
/// field included, and is written back out unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    id: CommentId,
    parent_id: Option<CommentId>,
    fields: Map<String, Value>,
}

impl CommentRecord {
    /// Parse one element of the input collection
    pub fn from_value(index: usize, value: Value, config: &InputConfig) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(TreeError::NotAnObject { index });
        };

        let id = match fields.get(&config.id_field) {
            None | Some(Value::Null) => {
                return Err(TreeError::MissingId {
                    index,
                    field: config.id_field.clone(),
                })
            }
            Some(raw) => CommentId::from_json(raw).ok_or_else(|| TreeError::InvalidId {
                index,
                field: config.id_field.clone(),
                value: raw.to_string(),
            })?,
        };

        let parent_id = parse_parent(index, fields.get(&config.parent_field), config)?;

        Ok(Self {
            id,
            parent_id,
            fields,
        })
    }

    /// All original fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Get a payload field by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl ThreadedComment for CommentRecord {
    fn comment_id(&self) -> &CommentId {
        &self.id
    }

    fn parent_id(&self) -> Option<&CommentId> {
        self.parent_id.as_ref()
    }
}

impl Serialize for CommentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

fn parse_parent(
    index: usize,
    raw: Option<&Value>,
    config: &InputConfig,
) -> Result<Option<CommentId>> {
    let raw = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    if config.root_sentinel == RootSentinel::Falsy && *raw == Value::Bool(false) {
        return Ok(None);
    }

    let parent = CommentId::from_json(raw).ok_or_else(|| TreeError::InvalidId {
        index,
        field: config.parent_field.clone(),
        value: raw.to_string(),
    })?;

    if config.root_sentinel == RootSentinel::Falsy && parent.is_falsy() {
        return Ok(None);
    }

    Ok(Some(parent))
}

/// Read the comment collection out of a JSON document
///
/// Accepts a bare array, or an object holding the array under the
/// configured collection key (the `{"data": [...]}` resource envelope).
/// Anything else is rejected before a single record is parsed.
pub fn records_from_document(document: Value, config: &InputConfig) -> Result<Vec<CommentRecord>> {
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove(&config.collection_key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(TreeError::NotASequence(format!(
                    "'{}' holding {}",
                    config.collection_key,
                    describe(&other)
                )))
            }
            None => {
                return Err(TreeError::NotASequence(format!(
                    "an object without a '{}' key",
                    config.collection_key
                )))
            }
        },
        other => return Err(TreeError::NotASequence(describe(&other).to_string())),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, value)| CommentRecord::from_value(index, value, config))
        .collect()
}

/// Parse a JSON string into comment records
pub fn records_from_str(input: &str, config: &InputConfig) -> Result<Vec<CommentRecord>> {
    records_from_document(parse_document(input)?, config)
}

/// Parse a JSON document of any nesting depth
///
/// Nested threads add two levels of JSON per reply level, far past
/// serde_json's default recursion limit, so the limit is lifted and the
/// parser runs on a stack that grows on demand.
pub fn parse_document(input: &str) -> Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;

    if let Err(err) = deserializer.end() {
        release(value);
        return Err(err.into());
    }
    Ok(value)
}

/// Drop a JSON value of any depth without recursing
pub fn release(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(fields) => pending.extend(fields.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: Value) -> Result<CommentRecord> {
        CommentRecord::from_value(0, value, &InputConfig::default())
    }

    #[test]
    fn test_parse_root_and_reply() {
        let root = parse(json!({"id": 1, "parent_id": null, "body": "hi"})).unwrap();
        assert_eq!(root.comment_id(), &CommentId::Int(1));
        assert_eq!(root.parent_id(), None);
        assert_eq!(root.get("body"), Some(&json!("hi")));

        let reply = parse(json!({"id": "b", "parent_id": "a"})).unwrap();
        assert_eq!(reply.parent_id(), Some(&CommentId::from("a")));
    }

    #[test]
    fn test_missing_parent_field_is_root() {
        let record = parse(json!({"id": 1})).unwrap();
        assert_eq!(record.parent_id(), None);
    }

    #[test]
    fn test_zero_parent_depends_on_sentinel() {
        let strict = parse(json!({"id": 1, "parent_id": 0})).unwrap();
        assert_eq!(strict.parent_id(), Some(&CommentId::Int(0)));

        let config = InputConfig {
            root_sentinel: RootSentinel::Falsy,
            ..InputConfig::default()
        };
        for parent in [json!(0), json!(""), json!(false)] {
            let record =
                CommentRecord::from_value(0, json!({"id": 1, "parent_id": parent}), &config)
                    .unwrap();
            assert_eq!(record.parent_id(), None);
        }
    }

    #[test]
    fn test_invalid_records() {
        assert!(matches!(
            parse(json!([1, 2])),
            Err(TreeError::NotAnObject { index: 0 })
        ));
        assert!(matches!(
            parse(json!({"body": "no id"})),
            Err(TreeError::MissingId { .. })
        ));
        assert!(matches!(
            parse(json!({"id": 1.5})),
            Err(TreeError::InvalidId { .. })
        ));
        assert!(matches!(
            parse(json!({"id": 1, "parent_id": false})),
            Err(TreeError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_custom_field_names() {
        let config = InputConfig {
            id_field: "uuid".to_string(),
            parent_field: "reply_to".to_string(),
            ..InputConfig::default()
        };
        let record =
            CommentRecord::from_value(0, json!({"uuid": "x", "reply_to": "y"}), &config).unwrap();
        assert_eq!(record.comment_id(), &CommentId::from("x"));
        assert_eq!(record.parent_id(), Some(&CommentId::from("y")));
    }

    #[test]
    fn test_document_shapes() {
        let config = InputConfig::default();

        let bare = records_from_document(json!([{"id": 1}, {"id": 2, "parent_id": 1}]), &config);
        assert_eq!(bare.unwrap().len(), 2);

        let envelope = records_from_document(json!({"data": [{"id": 1}], "meta": {}}), &config);
        assert_eq!(envelope.unwrap().len(), 1);

        assert!(matches!(
            records_from_document(json!({"items": []}), &config),
            Err(TreeError::NotASequence(_))
        ));
        assert!(matches!(
            records_from_document(json!({"data": "nope"}), &config),
            Err(TreeError::NotASequence(_))
        ));
        assert!(matches!(
            records_from_document(json!(null), &config),
            Err(TreeError::NotASequence(_))
        ));
    }

    #[test]
    fn test_error_reports_position() {
        let err = records_from_str(r#"[{"id": 1}, {"body": "x"}]"#, &InputConfig::default())
            .unwrap_err();
        assert!(matches!(err, TreeError::MissingId { index: 1, .. }));
    }

    #[test]
    fn test_parse_document_has_no_depth_limit() {
        let depth = 100_000;
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let value = parse_document(&input).unwrap();
        assert!(value.is_array());
        release(value);
    }

    #[test]
    fn test_parse_document_rejects_trailing_input() {
        assert!(matches!(
            parse_document("[{\"id\": 1}] x"),
            Err(TreeError::Serde(_))
        ));
    }

    #[test]
    fn test_serialization_is_verbatim() {
        let value = json!({"id": 3, "parent_id": 1, "author": {"name": "ana"}});
        let record = parse(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }
}
