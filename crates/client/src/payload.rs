//! Request payloads for create and update
//!
//! A form is sent as JSON unless it carries a file waiting for upload, in
//! which case it goes out as multipart. Both encodings send the whole
//! object (full replace), except for file fields the form did not fill:
//! inline blobs the server already holds and empty file fields are left
//! out so the server keeps what it has. Multipart has no way to say
//! `null`, so empty values are left out there too.

use crate::request::{Part, RequestBody};
use estate_core::{AdminResult, BinaryValue, FieldValue, FieldValues, ItemId};
use estate_schema::ResourceDef;
use serde_json::{Map, Value};

/// Encoded body of a create or update request
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Multipart(Vec<Part>),
}

impl Payload {
    /// Build the payload for a form's values
    ///
    /// Values are emitted in schema order; names outside the schema are
    /// rejected. For query-scoped resources the parent id is added under
    /// the scope's parameter name.
    pub fn build(
        def: &ResourceDef,
        values: &FieldValues,
        parent: Option<&ItemId>,
    ) -> AdminResult<Self> {
        for name in values.keys() {
            def.require_field(name)?;
        }

        let parent_entry = def
            .parent_field()
            .zip(parent)
            .map(|(param, id)| (param.to_string(), id.to_string()));

        let ordered = def
            .fields
            .iter()
            .filter_map(|field| values.get(&field.name).map(|v| (field, v)))
            .filter(|(field, value)| !(field.is_binary() && matches!(value, FieldValue::Null)))
            .map(|(field, value)| (field.name.as_str(), value));

        let has_pending = values
            .values()
            .any(|v| matches!(v, FieldValue::Binary(BinaryValue::Pending(_))));

        if has_pending {
            let mut parts: Vec<Part> = ordered
                .filter_map(|(name, value)| multipart_part(name, value))
                .collect();
            if let Some((param, id)) = parent_entry {
                parts.push(Part::text(param, id));
            }
            Ok(Payload::Multipart(parts))
        } else {
            let mut object: Map<String, Value> = ordered
                .filter_map(|(name, value)| json_value(value).map(|v| (name.to_string(), v)))
                .collect();
            if let Some((param, id)) = parent_entry {
                object.insert(param, Value::String(id));
            }
            Ok(Payload::Json(Value::Object(object)))
        }
    }

    /// Whether the payload goes out as multipart
    pub fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }

    /// Convert into a request body
    pub fn into_body(self) -> RequestBody {
        match self {
            Payload::Json(value) => RequestBody::Json(value),
            Payload::Multipart(parts) => RequestBody::Multipart(parts),
        }
    }
}

fn json_value(value: &FieldValue) -> Option<Value> {
    match value {
        FieldValue::Null => Some(Value::Null),
        FieldValue::Text(s) => Some(Value::String(s.clone())),
        FieldValue::Number(n) => Some(Value::Number(n.clone())),
        FieldValue::Bool(b) => Some(Value::Bool(*b)),
        FieldValue::Binary(BinaryValue::Remote { url }) => Some(Value::String(url.clone())),
        FieldValue::Binary(BinaryValue::Inline { .. } | BinaryValue::Pending(_)) => None,
    }
}

fn multipart_part(name: &str, value: &FieldValue) -> Option<Part> {
    match value {
        FieldValue::Null => None,
        FieldValue::Text(s) => Some(Part::text(name, s.clone())),
        FieldValue::Number(n) => Some(Part::text(name, n.to_string())),
        FieldValue::Bool(b) => Some(Part::text(name, b.to_string())),
        FieldValue::Binary(BinaryValue::Remote { url }) => Some(Part::text(name, url.clone())),
        FieldValue::Binary(BinaryValue::Inline { .. }) => None,
        FieldValue::Binary(BinaryValue::Pending(file)) => Some(Part::file(name, file.clone())),
    }
}
