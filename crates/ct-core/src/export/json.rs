//! JSON exporters for comment forests

use super::exporter::Exporter;
use crate::comment::record::{describe, release};
use crate::comment::{CommentForest, CommentRecord};
use crate::config::InputConfig;
use crate::error::{Result, TreeError};
use serde_json::Value;
use std::io::{self, Write};

/// Nested JSON exporter
///
/// Writes every comment's original object with its replies under the
/// configured key. A payload field with the same name is replaced.
pub struct JsonTreeExporter {
    /// Whether to use pretty-print formatting
    pretty: bool,
    /// Key holding each node's replies
    replies_field: String,
    /// Format name
    name: String,
}

impl JsonTreeExporter {
    /// Create a new nested JSON exporter
    pub fn new(compact: bool) -> Self {
        Self {
            pretty: !compact,
            replies_field: "replies".to_string(),
            name: if compact {
                "json-compact".to_string()
            } else {
                "json".to_string()
            },
        }
    }

    /// Create a compact exporter
    pub fn compact() -> Self {
        Self::new(true)
    }

    /// Create a pretty-printed exporter
    pub fn pretty() -> Self {
        Self::new(false)
    }

    /// Set the replies key
    pub fn with_replies_field(mut self, field: impl Into<String>) -> Self {
        self.replies_field = field.into();
        self
    }
}

impl Exporter for JsonTreeExporter {
    fn export(&self, forest: &CommentForest<CommentRecord>) -> Result<String> {
        let mut buf = Vec::new();
        write_nested(forest, &self.replies_field, self.pretty, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    fn format_name(&self) -> &str {
        &self.name
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

/// Flat JSON exporter
///
/// Writes the original objects as one array in depth-first pre-order, the
/// order a rebuild reproduces the same forest from.
pub struct FlatJsonExporter {
    pretty: bool,
    name: String,
}

impl FlatJsonExporter {
    /// Create a new flat exporter
    pub fn new(compact: bool) -> Self {
        Self {
            pretty: !compact,
            name: if compact {
                "flat-compact".to_string()
            } else {
                "flat".to_string()
            },
        }
    }
}

impl Exporter for FlatJsonExporter {
    fn export(&self, forest: &CommentForest<CommentRecord>) -> Result<String> {
        let items: Vec<Value> = forest
            .flatten()
            .into_iter()
            .map(|record| Value::Object(record.fields().clone()))
            .collect();
        to_json_string(&Value::Array(items), self.pretty)
    }

    fn format_name(&self) -> &str {
        &self.name
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn to_json_string(value: &Value, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Stream a forest as nested JSON
///
/// Every comment is written as its original object followed by its replies
/// under `replies_field`, replacing a payload field of that name. Nesting
/// is tracked with an explicit stack, so output depth is unbounded.
/// Pretty output matches `serde_json::to_writer_pretty`.
pub fn write_nested<W: Write>(
    forest: &CommentForest<CommentRecord>,
    replies_field: &str,
    pretty: bool,
    mut writer: W,
) -> Result<()> {
    // Items written so far in each open array; index 0 is the top level
    let mut written: Vec<usize> = vec![0];

    writer.write_all(b"[")?;
    for visit in forest.iter() {
        while written.len() > visit.depth + 1 {
            close_node(&mut writer, &mut written, pretty)?;
        }

        let depth = visit.depth;
        if written[depth] > 0 {
            writer.write_all(b",")?;
        }
        written[depth] += 1;
        newline(&mut writer, pretty, 1 + 2 * depth)?;
        writer.write_all(b"{")?;

        let indent = 2 + 2 * depth;
        let mut first = true;
        for (key, value) in visit.node.comment.fields() {
            if key == replies_field {
                continue;
            }
            write_key(&mut writer, key, first, pretty, indent)?;
            first = false;
            if pretty {
                let text = serde_json::to_string_pretty(value)?;
                let pad = format!("\n{}", INDENT.repeat(indent));
                writer.write_all(text.replace('\n', &pad).as_bytes())?;
            } else {
                serde_json::to_writer(&mut writer, value)?;
            }
        }
        write_key(&mut writer, replies_field, first, pretty, indent)?;
        writer.write_all(b"[")?;
        written.push(0);
    }

    while written.len() > 1 {
        close_node(&mut writer, &mut written, pretty)?;
    }
    if written[0] > 0 {
        newline(&mut writer, pretty, 0)?;
    }
    writer.write_all(b"]")?;
    Ok(())
}

const INDENT: &str = "  ";

fn newline<W: Write>(writer: &mut W, pretty: bool, level: usize) -> io::Result<()> {
    if pretty {
        writer.write_all(b"\n")?;
        writer.write_all(INDENT.repeat(level).as_bytes())?;
    }
    Ok(())
}

fn write_key<W: Write>(
    writer: &mut W,
    key: &str,
    first: bool,
    pretty: bool,
    indent: usize,
) -> Result<()> {
    if !first {
        writer.write_all(b",")?;
    }
    newline(writer, pretty, indent)?;
    serde_json::to_writer(&mut *writer, key)?;
    let colon: &[u8] = if pretty { b": " } else { b":" };
    writer.write_all(colon)?;
    Ok(())
}

/// Close the innermost open node: its replies array, then the object
fn close_node<W: Write>(writer: &mut W, written: &mut Vec<usize>, pretty: bool) -> io::Result<()> {
    let replies = written.pop().unwrap_or(0);
    // The node itself sits in the array one level up
    let depth = written.len() - 1;
    if replies > 0 {
        newline(writer, pretty, 2 + 2 * depth)?;
    }
    writer.write_all(b"]")?;
    newline(writer, pretty, 1 + 2 * depth)?;
    writer.write_all(b"}")
}

/// Read comment records back out of a nested JSON document
///
/// Walks the nested arrays in depth-first pre-order, stripping the replies
/// key from every object. With `link_parents`, objects lacking the parent
/// field get their enclosing comment's identifier, so the result rebuilds
/// into the same forest even when the nested form carried no parent ids.
pub fn records_from_nested(
    document: Value,
    input: &InputConfig,
    replies_field: &str,
    link_parents: bool,
) -> Result<Vec<CommentRecord>> {
    let roots = match document {
        Value::Array(items) => items,
        Value::Object(mut envelope) => {
            let items = envelope.remove(&input.collection_key);
            release(Value::Object(envelope));
            match items {
                Some(Value::Array(items)) => items,
                other => {
                    if let Some(other) = other {
                        release(other);
                    }
                    return Err(TreeError::NotASequence(format!(
                        "an object without a '{}' array",
                        input.collection_key
                    )));
                }
            }
        }
        other => return Err(TreeError::NotASequence(describe(&other).to_string())),
    };

    // (value, enclosing comment's id)
    let mut stack: Vec<(Value, Option<Value>)> =
        roots.into_iter().rev().map(|value| (value, None)).collect();

    let result = unnest(&mut stack, input, replies_field, link_parents);
    for (value, _) in stack {
        release(value);
    }
    result
}

fn unnest(
    stack: &mut Vec<(Value, Option<Value>)>,
    input: &InputConfig,
    replies_field: &str,
    link_parents: bool,
) -> Result<Vec<CommentRecord>> {
    let mut records = Vec::new();

    while let Some((value, enclosing)) = stack.pop() {
        let index = records.len();
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                release(other);
                return Err(TreeError::NotAnObject { index });
            }
        };

        let replies = match fields.remove(replies_field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(replies)) => replies,
            Some(other) => {
                let found = describe(&other);
                release(other);
                return Err(TreeError::NotASequence(format!(
                    "'{}' holding {} at position {}",
                    replies_field, found, index
                )));
            }
        };

        if link_parents && !fields.contains_key(&input.parent_field) {
            fields.insert(
                input.parent_field.clone(),
                enclosing.unwrap_or(Value::Null),
            );
        }

        let own_id = fields.get(&input.id_field).cloned();
        match CommentRecord::from_value(index, Value::Object(fields), input) {
            Ok(record) => records.push(record),
            Err(err) => {
                replies.into_iter().for_each(release);
                return Err(err);
            }
        }

        stack.extend(
            replies
                .into_iter()
                .rev()
                .map(|reply| (reply, own_id.clone())),
        );
    }

    Ok(records)
}
