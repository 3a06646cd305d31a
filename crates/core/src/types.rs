//! Core types used throughout Estate Admin
//!
//! This module contains the value types that flow between the schema, the
//! HTTP client, and the controllers: server-assigned identifiers, resource
//! items as fetched, and the typed field values held by an edit session.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Item Identifier
// ============================================================================

/// Server-assigned identifier of a resource item
///
/// Backends hand these out as integers or strings depending on the
/// resource; both are kept in their textual form so they can be used as a
/// path segment without caring which one it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    /// Create an identifier from its textual form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(Number),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(Self(s)),
            Raw::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

// ============================================================================
// Item
// ============================================================================

/// A resource item as last fetched from the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Server-assigned identifier (`id`, or `_id` on document stores)
    pub id: ItemId,

    /// Remaining fields, verbatim
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Create an item with no fields
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Set a raw field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a raw field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field as text, if it is a JSON string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

impl<'de> Deserialize<'de> for Item {
    /// `id` wins over `_id`; document stores that emit virtuals send both
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let legacy = fields.remove("_id");
        let raw = fields
            .remove("id")
            .or(legacy)
            .ok_or_else(|| serde::de::Error::missing_field("id"))?;
        let id = ItemId::deserialize(raw).map_err(serde::de::Error::custom)?;
        Ok(Self { id, fields })
    }
}

// ============================================================================
// Pending File
// ============================================================================

/// A file chosen locally that has not been uploaded yet
#[derive(Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// Original file name, sent as the multipart file name
    pub file_name: String,
    /// MIME type (e.g. `image/jpeg`, `application/pdf`)
    pub mime: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl PendingFile {
    /// Create a new pending file
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no contents
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for PendingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ============================================================================
// Binary Value
// ============================================================================

/// Value of an image/document field
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryValue {
    /// Stored on the server and fetched separately by URL
    Remote { url: String },
    /// Embedded in the JSON response
    Inline { mime: Option<String>, bytes: Vec<u8> },
    /// Selected locally, uploaded on submit
    Pending(PendingFile),
}

impl BinaryValue {
    /// Interpret a JSON value read from a binary field
    ///
    /// Accepts absolute or site-relative URLs, `data:` URLs, bare base64
    /// strings, `{"data": "<base64>", "contentType": ..}` objects and
    /// Node-style `{"type": "Buffer", "data": [..]}` objects. Returns `None`
    /// for `null`, empty strings, and anything unrecognised.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_text(s),
            Value::Object(obj) => Self::from_object(obj),
            _ => None,
        }
    }

    fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if s.starts_with("http://") || s.starts_with("https://") || s.starts_with('/') {
            return Some(BinaryValue::Remote { url: s.to_string() });
        }
        if let Some(rest) = s.strip_prefix("data:") {
            let (meta, payload) = rest.split_once(',')?;
            let mime = meta.strip_suffix(";base64").unwrap_or(meta);
            let bytes = STANDARD.decode(payload).ok()?;
            return Some(BinaryValue::Inline {
                mime: (!mime.is_empty()).then(|| mime.to_string()),
                bytes,
            });
        }
        match STANDARD.decode(s) {
            Ok(bytes) => Some(BinaryValue::Inline { mime: None, bytes }),
            // Anything else is treated as a path the server resolves itself
            Err(_) => Some(BinaryValue::Remote { url: s.to_string() }),
        }
    }

    fn from_object(obj: &Map<String, Value>) -> Option<Self> {
        let mime = ["contentType", "content_type", "mimeType", "mime"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::to_string);

        if let Some(url) = obj.get("url").and_then(Value::as_str) {
            return Some(BinaryValue::Remote {
                url: url.to_string(),
            });
        }

        match obj.get("data")? {
            Value::String(encoded) => {
                let encoded = encoded
                    .split_once(";base64,")
                    .map_or(encoded.as_str(), |(_, payload)| payload);
                let bytes = STANDARD.decode(encoded).ok()?;
                Some(BinaryValue::Inline { mime, bytes })
            }
            Value::Array(raw) => {
                let bytes = raw
                    .iter()
                    .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                    .collect::<Option<Vec<u8>>>()?;
                Some(BinaryValue::Inline { mime, bytes })
            }
            Value::Object(nested) => match Self::from_object(nested)? {
                BinaryValue::Inline { mime: None, bytes } => {
                    Some(BinaryValue::Inline { mime, bytes })
                }
                other => Some(other),
            },
            _ => None,
        }
    }

    /// Whether the value is a local file waiting for upload
    pub fn is_pending(&self) -> bool {
        matches!(self, BinaryValue::Pending(_))
    }

    /// Remote URL, if the value is stored remotely
    pub fn url(&self) -> Option<&str> {
        match self {
            BinaryValue::Remote { url } => Some(url),
            _ => None,
        }
    }
}

// ============================================================================
// Field Value
// ============================================================================

/// A typed value in an edit session's working copy
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value
    Null,
    /// Text value
    Text(String),
    /// Numeric value
    Number(Number),
    /// Boolean value
    Bool(bool),
    /// Image or document
    Binary(BinaryValue),
}

impl FieldValue {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Create a pending file value
    pub fn file(file: PendingFile) -> Self {
        FieldValue::Binary(BinaryValue::Pending(file))
    }

    /// Convert a plain JSON value (no binary interpretation)
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    /// Whether the value counts as "not filled in"
    ///
    /// Null, blank text, and zero-length pending files are empty; numbers
    /// and booleans never are.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
            FieldValue::Binary(BinaryValue::Pending(file)) => file.is_empty(),
            FieldValue::Binary(BinaryValue::Remote { url }) => url.trim().is_empty(),
            FieldValue::Binary(BinaryValue::Inline { bytes, .. }) => bytes.is_empty(),
        }
    }

    /// Borrow the text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the binary value, if any
    pub fn as_binary(&self) -> Option<&BinaryValue> {
        match self {
            FieldValue::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// Working copy of a form: field name to value
pub type FieldValues = BTreeMap<String, FieldValue>;

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<PendingFile> for FieldValue {
    fn from(file: PendingFile) -> Self {
        FieldValue::file(file)
    }
}

// ============================================================================
// Tests
// ============================================================================
