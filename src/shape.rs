//! Response shape introspection.
//!
//! Summarizes a GraphQL `data` payload as a two-level key listing: every
//! top-level field, and the keys found in its value. List values are
//! summarized from their first element.
//!
//! ```text
//! Type:  contracts
//! Keys:
//!        name
//!        deploy
//! ```

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ProbeError, Result};

const KEY_INDENT: &str = "       ";

/// A top-level value of the response document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A single object, e.g. `data.contract`
    SingleRecord(Map<String, Value>),
    /// A list whose first element is an object, e.g. `data.contracts`.
    ///
    /// Later elements are kept as-is; nullable list items (`[Contract]`)
    /// may come back as `null`.
    RecordList(Vec<Value>),
}

impl FieldValue {
    /// Classify a JSON value found under `key`.
    pub fn from_json(key: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::SingleRecord(map)),
            Value::Array(items) => {
                if let Some(first) = items.first().filter(|v| !v.is_object()) {
                    return Err(unsupported(key, first));
                }
                Ok(Self::RecordList(items))
            }
            other => Err(unsupported(key, &other)),
        }
    }

    /// The record whose keys describe this value.
    fn probe(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::SingleRecord(map) => Some(map),
            Self::RecordList(items) => items.first().and_then(Value::as_object),
        }
    }

    fn kind(&self) -> ShapeKind {
        match self {
            Self::SingleRecord(_) => ShapeKind::Record,
            Self::RecordList(_) => ShapeKind::List,
        }
    }
}

fn unsupported(key: &str, value: &Value) -> ProbeError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    ProbeError::UnsupportedShape {
        key: key.to_string(),
        found,
    }
}

/// The `data` member of a response, with entries in response order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseDocument {
    entries: Vec<(String, FieldValue)>,
}

impl ResponseDocument {
    /// Build a document from the decoded `data` object.
    pub fn from_json(data: Value) -> Result<Self> {
        let map = match data {
            Value::Object(map) => map,
            other => return Err(unsupported("data", &other)),
        };
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let field = FieldValue::from_json(&key, value)?;
                Ok((key, field))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<Value> for ResponseDocument {
    type Error = ProbeError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Record,
    List,
}

/// Keys of one top-level field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeShape {
    pub name: String,
    pub kind: ShapeKind,
    pub keys: Vec<String>,
}

/// Two-level key summary of a [`ResponseDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub types: Vec<TypeShape>,
}

impl Shape {
    /// Compute the shape of `document`.
    ///
    /// Fails with [`ProbeError::EmptyRecordList`] on the first list value that
    /// has no elements.
    pub fn of(document: &ResponseDocument) -> Result<Self> {
        let types = document
            .entries()
            .map(|(name, value)| {
                let probe = value.probe().ok_or_else(|| ProbeError::EmptyRecordList {
                    key: name.to_string(),
                })?;
                Ok(TypeShape {
                    name: name.to_string(),
                    kind: value.kind(),
                    keys: probe.keys().cloned().collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { types })
    }

    /// Write the text listing.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        for ty in &self.types {
            writeln!(out, "Type:  {}", ty.name)?;
            writeln!(out, "Keys:")?;
            for key in &ty.keys {
                writeln!(out, "{KEY_INDENT}{key}")?;
            }
        }
        Ok(())
    }
}

/// Print the shape of `document` to `out`.
///
/// The shape is computed in full before anything is written, so a document
/// that fails produces no output.
pub fn print_shape<W: Write>(document: &ResponseDocument, out: &mut W) -> Result<()> {
    Shape::of(document)?.render(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_to_string(data: Value) -> Result<String> {
        let document = ResponseDocument::from_json(data)?;
        let mut out = Vec::new();
        print_shape(&document, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn list_value_uses_first_element() {
        let out = render_to_string(json!({
            "contracts": [
                {"name": "x", "deploy": {"to": "0x1"}},
                {"other": 1}
            ]
        }))
        .unwrap();
        assert_eq!(out, "Type:  contracts\nKeys:\n       name\n       deploy\n");
    }

    #[test]
    fn object_value_lists_its_keys() {
        let out = render_to_string(json!({"meta": {"a": 1, "b": 2}})).unwrap();
        assert_eq!(out, "Type:  meta\nKeys:\n       a\n       b\n");
    }

    #[test]
    fn empty_list_fails_without_output() {
        let document = ResponseDocument::from_json(json!({
            "meta": {"a": 1},
            "contracts": []
        }))
        .unwrap();
        let mut out = Vec::new();
        let err = print_shape(&document, &mut out).unwrap_err();
        assert!(matches!(err, ProbeError::EmptyRecordList { ref key } if key == "contracts"));
        assert!(out.is_empty());
    }

    #[test]
    fn key_order_follows_document() {
        let data: Value =
            serde_json::from_str(r#"{"zeta": {"y": 1, "x": 2, "a": 3}, "alpha": {"k": 0}}"#)
                .unwrap();
        let shape = Shape::of(&ResponseDocument::from_json(data).unwrap()).unwrap();
        let names: Vec<_> = shape.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(shape.types[0].keys, ["y", "x", "a"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let document = ResponseDocument::from_json(json!({
            "contract": {"network": "ETH", "address": "0x1", "name": "T"}
        }))
        .unwrap();
        let mut first = Vec::new();
        let mut second = Vec::new();
        print_shape(&document, &mut first).unwrap();
        print_shape(&document, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn scalar_value_is_unsupported() {
        let err = ResponseDocument::from_json(json!({"count": 3})).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::UnsupportedShape { ref key, found: "a number" } if key == "count"
        ));
    }

    #[test]
    fn scalar_first_element_is_unsupported() {
        let err = ResponseDocument::from_json(json!({"standards": ["ERC20", {"a": 1}]})).unwrap_err();
        assert!(matches!(err, ProbeError::UnsupportedShape { found: "a string", .. }));
    }

    #[test]
    fn null_first_element_is_unsupported() {
        let err = ResponseDocument::from_json(json!({"contracts": [null, {"a": 1}]})).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::UnsupportedShape { ref key, found: "null" } if key == "contracts"
        ));
    }

    #[test]
    fn null_items_after_the_first_are_accepted() {
        let out = render_to_string(json!({
            "contracts": [{"name": "x", "deploy": {}}, null]
        }))
        .unwrap();
        assert_eq!(out, "Type:  contracts\nKeys:\n       name\n       deploy\n");
    }

    #[test]
    fn non_object_data_is_unsupported() {
        let err = ResponseDocument::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ProbeError::UnsupportedShape { ref key, .. } if key == "data"));
    }

    #[test]
    fn empty_document_prints_nothing() {
        assert_eq!(render_to_string(json!({})).unwrap(), "");
    }

    #[test]
    fn shape_serializes_for_machine_output() {
        let document = ResponseDocument::from_json(json!({
            "contracts": [{"name": "x"}]
        }))
        .unwrap();
        let value = serde_json::to_value(Shape::of(&document).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"types": [{"name": "contracts", "kind": "list", "keys": ["name"]}]})
        );
    }
}
