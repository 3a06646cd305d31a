//! Resource definitions
//!
//! A `ResourceDef` is everything a controller needs to know about one REST
//! collection: where it lives, which fields its items carry, how list
//! responses are wrapped, and whether it is scoped to a parent item.

use crate::envelope::Envelope;
use crate::field::{FieldDef, FormMode};
use estate_core::{AdminError, AdminResult, ItemId, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholder for the parent id in segment-scoped paths
pub const PARENT_PLACEHOLDER: &str = "{parent}";

// ============================================================================
// ParentScope
// ============================================================================

/// How a resource is narrowed down to the children of one parent item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParentScope {
    /// `GET /path?<param>=<parent>`; the parent id is also sent as `<param>`
    /// in create and update payloads
    Query { param: String },
    /// The path contains `{parent}`, e.g. `/hpr-projects/{parent}/gallery`
    Segment,
}

// ============================================================================
// ResourceDef
// ============================================================================

/// A REST collection managed by one controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDef {
    /// Short name used on the command line and in messages
    pub name: String,

    /// Collection path relative to the API base URL
    pub path: String,

    /// Item fields, in form order
    pub fields: Vec<FieldDef>,

    /// Shape of list responses
    pub envelope: Envelope,

    /// Parent scoping, for per-project sub-resources
    pub parent: Option<ParentScope>,

    /// Human-readable description
    pub description: Option<String>,

    /// What one item is called in messages ("slide", "partner")
    #[serde(default)]
    pub item_label: Option<String>,
}

impl ResourceDef {
    /// Create a new resource with no fields
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            fields: Vec::new(),
            envelope: Envelope::default(),
            parent: None,
            description: None,
            item_label: None,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Add a field
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the response envelope
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Scope by a query parameter
    pub fn scoped_by_query(mut self, param: impl Into<String>) -> Self {
        self.parent = Some(ParentScope::Query {
            param: param.into(),
        });
        self
    }

    /// Scope by the `{parent}` path segment
    pub fn scoped_by_segment(mut self) -> Self {
        self.parent = Some(ParentScope::Segment);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set what one item is called
    pub fn with_item_label(mut self, label: impl Into<String>) -> Self {
        self.item_label = Some(label.into());
        self
    }

    /// What one item is called, "item" if unset
    pub fn singular_label(&self) -> &str {
        self.item_label.as_deref().unwrap_or("item")
    }

    // ========================================================================
    // Field access
    // ========================================================================

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field, failing with `UnknownField`
    pub fn require_field(&self, name: &str) -> AdminResult<&FieldDef> {
        self.field(name).ok_or_else(|| AdminError::UnknownField {
            resource: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Whether any field holds uploads
    pub fn has_binary_fields(&self) -> bool {
        self.fields.iter().any(FieldDef::is_binary)
    }

    /// Fields a form in the given mode must fill
    pub fn required_fields(&self, mode: FormMode) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(move |f| f.required_on(mode))
    }

    /// Name of the payload field carrying the parent id, if any
    pub fn parent_field(&self) -> Option<&str> {
        match &self.parent {
            Some(ParentScope::Query { param }) => Some(param.as_str()),
            _ => None,
        }
    }

    // ========================================================================
    // Paths
    // ========================================================================

    /// Collection path (`{endpoint}`) for the given parent
    pub fn collection_path(&self, parent: Option<&ItemId>) -> AdminResult<String> {
        match (&self.parent, parent) {
            (Some(ParentScope::Segment), Some(parent)) => Ok(self
                .path
                .replace(PARENT_PLACEHOLDER, &encode_segment(parent.as_str()))),
            (Some(ParentScope::Segment), None) => Err(AdminError::validation(format!(
                "'{}' needs a parent id",
                self.name
            ))),
            _ => Ok(self.path.clone()),
        }
    }

    /// Item path (`{endpoint}/{id}`)
    pub fn item_path(&self, parent: Option<&ItemId>, id: &ItemId) -> AdminResult<String> {
        let base = self.collection_path(parent)?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            encode_segment(id.as_str())
        ))
    }

    /// Query parameters for listing the collection
    pub fn list_query(&self, parent: Option<&ItemId>) -> Vec<(String, String)> {
        match (&self.parent, parent) {
            (Some(ParentScope::Query { param }), Some(parent)) => {
                vec![(param.clone(), parent.to_string())]
            }
            _ => Vec::new(),
        }
    }
}

impl Validatable for ResourceDef {
    fn validate(&self) -> AdminResult<()> {
        if self.name.trim().is_empty() {
            return Err(AdminError::validation("Resource name cannot be empty"));
        }

        if !self.path.starts_with('/') {
            return Err(AdminError::validation(format!(
                "Path '{}' of '{}' must start with '/'",
                self.path, self.name
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            field.validate()?;
            if field.name == "id" || field.name == "_id" {
                return Err(AdminError::validation(format!(
                    "'{}' declares the server-assigned '{}' as a field",
                    self.name, field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(AdminError::validation(format!(
                    "Duplicate field '{}' in '{}'",
                    field.name, self.name
                )));
            }
        }

        let has_placeholder = self.path.contains(PARENT_PLACEHOLDER);
        match &self.parent {
            Some(ParentScope::Segment) if !has_placeholder => {
                Err(AdminError::validation(format!(
                    "'{}' is scoped by path segment but '{}' has no {}",
                    self.name, self.path, PARENT_PLACEHOLDER
                )))
            }
            Some(ParentScope::Query { param }) if self.field(param).is_some() => {
                Err(AdminError::validation(format!(
                    "'{}' sends '{}' as parent id and also declares it as a field",
                    self.name, param
                )))
            }
            None | Some(ParentScope::Query { .. }) if has_placeholder => {
                Err(AdminError::validation(format!(
                    "'{}' has {} in its path but is not scoped by segment",
                    self.name, PARENT_PLACEHOLDER
                )))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Percent-encode a path segment (RFC 3986 unreserved characters pass)
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slides() -> ResourceDef {
        ResourceDef::new("hero-carousel", "/hero-carousel")
            .with_field(FieldDef::text("heading").required())
            .with_field(FieldDef::text("subheading").required())
            .with_field(FieldDef::image("image").required())
    }

    #[test]
    fn test_paths() {
        let def = slides();
        assert_eq!(def.collection_path(None).unwrap(), "/hero-carousel");
        assert_eq!(
            def.item_path(None, &ItemId::new("3")).unwrap(),
            "/hero-carousel/3"
        );
        assert!(def.list_query(None).is_empty());
    }

    #[test]
    fn test_segment_scope() {
        let def = ResourceDef::new("gallery", "/hpr-projects/{parent}/gallery")
            .scoped_by_segment()
            .with_field(FieldDef::image("image").required());
        assert!(def.validate().is_ok());

        let parent = ItemId::new("12");
        assert_eq!(
            def.collection_path(Some(&parent)).unwrap(),
            "/hpr-projects/12/gallery"
        );
        assert_eq!(
            def.item_path(Some(&parent), &ItemId::new("4")).unwrap(),
            "/hpr-projects/12/gallery/4"
        );
        assert!(def.collection_path(None).unwrap_err().is_validation());
    }

    #[test]
    fn test_query_scope() {
        let def = ResourceDef::new("amenities", "/hpr-projects/amenities")
            .scoped_by_query("projectId")
            .with_field(FieldDef::text("name").required());
        let parent = ItemId::new("12");
        assert_eq!(
            def.list_query(Some(&parent)),
            vec![("projectId".to_string(), "12".to_string())]
        );
        assert_eq!(def.parent_field(), Some("projectId"));
        assert_eq!(
            def.collection_path(Some(&parent)).unwrap(),
            "/hpr-projects/amenities"
        );
    }

    #[test]
    fn test_ids_are_encoded() {
        let def = slides();
        assert_eq!(
            def.item_path(None, &ItemId::new("a b/c")).unwrap(),
            "/hero-carousel/a%20b%2Fc"
        );
    }

    #[test]
    fn test_required_fields_by_mode() {
        let def = slides();
        let create: Vec<_> = def
            .required_fields(FormMode::Create)
            .map(|f| f.name.as_str())
            .collect();
        let edit: Vec<_> = def
            .required_fields(FormMode::Edit)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(create, vec!["heading", "subheading", "image"]);
        assert_eq!(edit, vec!["heading", "subheading"]);
        assert!(def.has_binary_fields());
    }

    #[test]
    fn test_resource_validation() {
        assert!(slides().validate().is_ok());

        let bad_path = ResourceDef::new("partners", "partners");
        assert!(bad_path.validate().is_err());

        let duplicate = slides().with_field(FieldDef::text("heading"));
        assert!(duplicate.validate().is_err());

        let id_field = ResourceDef::new("news", "/news").with_field(FieldDef::text("id"));
        assert!(id_field.validate().is_err());

        let unscoped = ResourceDef::new("gallery", "/hpr-projects/{parent}/gallery");
        assert!(unscoped.validate().is_err());

        let missing_placeholder = ResourceDef::new("gallery", "/gallery").scoped_by_segment();
        assert!(missing_placeholder.validate().is_err());
    }

    #[test]
    fn test_unknown_field() {
        let err = slides().require_field("caption").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'caption' is not defined for 'hero-carousel'"
        );
    }
}
