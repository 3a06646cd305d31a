//! Response envelopes
//!
//! Resources on the site do not agree on how a list response is wrapped:
//! some return a bare array, some `{"data": [...]}`, singletons return one
//! object. Each resource declares its envelope once and every list response
//! goes through [`Envelope::normalize`].

use estate_core::{AdminError, AdminResult, Item};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outer shape of a list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "snake_case")]
pub enum Envelope {
    /// `[ {...}, {...} ]`
    #[default]
    Bare,
    /// `{ "data": [ {...} ] }`
    Data,
    /// `{ "<key>": [ {...} ] }`
    Key(String),
    /// A single object (or `{ "data": {...} }`), for one-of-a-kind content
    Single,
}

impl Envelope {
    /// Unwrap a response body into a list of items
    ///
    /// The declared shape is tried first. Bare arrays and `{"data": [...]}`
    /// are accepted regardless of the declaration, so a resource declared
    /// with the wrong list envelope still loads.
    pub fn normalize(&self, resource: &str, body: Value) -> AdminResult<Vec<Item>> {
        match self {
            Envelope::Single => normalize_single(resource, body),
            Envelope::Key(key) => match body {
                Value::Object(mut obj) if obj.get(key).is_some_and(Value::is_array) => {
                    parse_items(resource, obj.remove(key).unwrap_or_default())
                }
                other => normalize_list(resource, other),
            },
            Envelope::Bare | Envelope::Data => normalize_list(resource, body),
        }
    }
}

fn normalize_list(resource: &str, body: Value) -> AdminResult<Vec<Item>> {
    match body {
        Value::Array(_) => parse_items(resource, body),
        Value::Object(mut obj) if obj.get("data").is_some_and(Value::is_array) => {
            parse_items(resource, obj.remove("data").unwrap_or_default())
        }
        other => Err(AdminError::decode(
            resource,
            format!("expected a list, got {}", describe(&other)),
        )),
    }
}

fn normalize_single(resource: &str, body: Value) -> AdminResult<Vec<Item>> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => parse_items(resource, body),
        Value::Object(obj) if obj.is_empty() => Ok(Vec::new()),
        Value::Object(mut obj) if is_data_wrapper(&obj) => {
            normalize_single(resource, obj.remove("data").unwrap_or_default())
        }
        Value::Object(obj) => parse_items(resource, Value::Array(vec![Value::Object(obj)])),
        other => Err(AdminError::decode(
            resource,
            format!("expected an object, got {}", describe(&other)),
        )),
    }
}

/// `{"data": ...}` with no identifier of its own
fn is_data_wrapper(obj: &Map<String, Value>) -> bool {
    obj.contains_key("data") && !obj.contains_key("id") && !obj.contains_key("_id")
}

fn parse_items(resource: &str, list: Value) -> AdminResult<Vec<Item>> {
    let Value::Array(entries) = list else {
        return Err(AdminError::decode(resource, "expected a list"));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Item>(entry).map_err(|e| {
                AdminError::decode(resource, format!("item {index} is malformed: {e}"))
            })
        })
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================
