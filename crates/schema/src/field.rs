//! Field definitions for resource properties
//!
//! This module contains the `FieldDef` struct and related types that
//! describe one property of a resource item: its kind, whether a form may
//! be submitted without it, and which uploads it accepts.

use chrono::{DateTime, NaiveDate};
use estate_core::{AdminError, AdminResult, BinaryValue, FieldValue, Item, Validatable};
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};
use serde_json::Number;

// ============================================================================
// FormMode
// ============================================================================

/// Which kind of form is being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    /// New item, sent with POST
    Create,
    /// Existing item, sent with PUT
    Edit,
}

// ============================================================================
// FieldKind
// ============================================================================

/// Kinds of values a field can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text
    Text,
    /// Multi-line text
    LongText,
    /// Integer or decimal number
    Number,
    /// True/false
    Boolean,
    /// Calendar date (`YYYY-MM-DD` or RFC 3339)
    Date,
    /// Image upload
    Image,
    /// Document upload (PDF)
    Document,
}

impl FieldKind {
    /// Whether values of this kind are uploaded as files
    pub fn is_binary(&self) -> bool {
        matches!(self, FieldKind::Image | FieldKind::Document)
    }

    /// MIME prefixes accepted by default for uploads of this kind
    pub fn default_accept(&self) -> &'static [&'static str] {
        match self {
            FieldKind::Image => &["image/"],
            FieldKind::Document => &["application/pdf"],
            _ => &[],
        }
    }

    /// Short name for listings
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::LongText => "long text",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Image => "image",
            FieldKind::Document => "document",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// FieldDef
// ============================================================================

/// One property of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as sent to and received from the server
    pub name: String,

    /// Kind of value
    pub kind: FieldKind,

    /// Whether the form may not be submitted without it
    ///
    /// For binary fields this only applies when creating; an edit keeps
    /// the stored file when no new one is chosen.
    pub required: bool,

    /// Display label (falls back to the title-cased name)
    pub label: Option<String>,

    /// Accepted MIME prefixes for uploads (binary fields only)
    pub accept: Vec<String>,

    /// Help text shown next to the input
    pub help: Option<String>,
}

impl FieldDef {
    /// Create a new optional field
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            label: None,
            accept: kind.default_accept().iter().map(|s| s.to_string()).collect(),
            help: None,
        }
    }

    /// Single-line text field
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Multi-line text field
    pub fn long_text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::LongText)
    }

    /// Number field
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Date field
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Image upload field
    pub fn image(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Image)
    }

    /// PDF upload field
    pub fn document(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Document)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Replace the accepted MIME prefixes
    pub fn with_accept(mut self, accept: &[&str]) -> Self {
        self.accept = accept.iter().map(|s| s.to_string()).collect();
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Whether the field holds uploads
    pub fn is_binary(&self) -> bool {
        self.kind.is_binary()
    }

    /// Whether a form in the given mode must fill this field
    pub fn required_on(&self, mode: FormMode) -> bool {
        match mode {
            FormMode::Create => self.required,
            FormMode::Edit => self.required && !self.is_binary(),
        }
    }

    /// Get the display label
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.name.to_title_case())
    }

    /// Whether an upload with this MIME type is accepted
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let mime = mime.to_ascii_lowercase();
        self.accept
            .iter()
            .any(|prefix| mime.starts_with(&prefix.to_ascii_lowercase()))
    }

    /// Read this field out of a fetched item
    ///
    /// Binary fields keep whatever reference the server returned (URL or
    /// inline payload); missing or unreadable values become `Null`.
    pub fn read(&self, item: &Item) -> FieldValue {
        match item.get(&self.name) {
            None => FieldValue::Null,
            Some(raw) if self.is_binary() => BinaryValue::from_json(raw)
                .map(FieldValue::Binary)
                .unwrap_or(FieldValue::Null),
            Some(raw) => FieldValue::from_json(raw),
        }
    }

    /// Check that a value fits this field
    pub fn check(&self, value: &FieldValue) -> AdminResult<()> {
        let mismatch = || {
            AdminError::invalid_value(
                &self.name,
                format!("expected a {} value", self.kind.display_name()),
            )
        };

        match (self.kind, value) {
            (_, FieldValue::Null) => Ok(()),
            (FieldKind::Text | FieldKind::LongText, FieldValue::Text(_)) => Ok(()),
            (FieldKind::Number, FieldValue::Number(_)) => Ok(()),
            (FieldKind::Boolean, FieldValue::Bool(_)) => Ok(()),
            (FieldKind::Date, FieldValue::Text(s)) => {
                if s.trim().is_empty() || is_date(s) {
                    Ok(())
                } else {
                    Err(AdminError::invalid_value(
                        &self.name,
                        format!("'{s}' is not a date (expected YYYY-MM-DD)"),
                    ))
                }
            }
            (FieldKind::Image | FieldKind::Document, FieldValue::Binary(binary)) => match binary {
                BinaryValue::Pending(file) if !self.accepts_mime(&file.mime) => {
                    Err(AdminError::invalid_value(
                        &self.name,
                        format!(
                            "'{}' has type {}, expected {}",
                            file.file_name,
                            file.mime,
                            self.accept.join(" or ")
                        ),
                    ))
                }
                _ => Ok(()),
            },
            _ => Err(mismatch()),
        }
    }

    /// Parse a value typed as plain text (command line, query strings)
    ///
    /// Binary fields take the text as a remote reference; choose a local
    /// file with a `PendingFile` instead.
    pub fn parse(&self, raw: &str) -> AdminResult<FieldValue> {
        let value = match self.kind {
            FieldKind::Text | FieldKind::LongText => FieldValue::text(raw),
            FieldKind::Date => FieldValue::text(raw.trim()),
            FieldKind::Number => {
                let raw = raw.trim();
                let number = raw
                    .parse::<i64>()
                    .ok()
                    .map(Number::from)
                    .or_else(|| raw.parse::<f64>().ok().and_then(Number::from_f64))
                    .ok_or_else(|| {
                        AdminError::invalid_value(&self.name, format!("'{raw}' is not a number"))
                    })?;
                FieldValue::Number(number)
            }
            FieldKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => FieldValue::Bool(true),
                "false" | "no" | "0" | "off" => FieldValue::Bool(false),
                other => {
                    return Err(AdminError::invalid_value(
                        &self.name,
                        format!("'{other}' is not true/false"),
                    ));
                }
            },
            FieldKind::Image | FieldKind::Document => FieldValue::Binary(BinaryValue::Remote {
                url: raw.trim().to_string(),
            }),
        };
        self.check(&value)?;
        Ok(value)
    }
}

impl Validatable for FieldDef {
    fn validate(&self) -> AdminResult<()> {
        if self.name.is_empty() {
            return Err(AdminError::validation("Field name cannot be empty"));
        }

        if !is_valid_field_name(&self.name) {
            return Err(AdminError::validation(format!(
                "Field name '{}' may only contain letters, digits and '_'",
                self.name
            )));
        }

        if self.is_binary() && self.accept.is_empty() {
            return Err(AdminError::validation(format!(
                "Upload field '{}' accepts no file types",
                self.name
            )));
        }

        if !self.is_binary() && !self.accept.is_empty() {
            return Err(AdminError::validation(format!(
                "Field '{}' is not an upload field but declares accepted file types",
                self.name
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_date(s: &str) -> bool {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(s).is_ok()
}

fn is_valid_field_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::PendingFile;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_field_builder() {
        let field = FieldDef::text("subheading")
            .required()
            .with_help("Shown under the heading");

        assert_eq!(field.kind, FieldKind::Text);
        assert!(field.required);
        assert!(field.accept.is_empty());
        assert_eq!(field.display_label(), "Subheading");
        assert_eq!(field.help.as_deref(), Some("Shown under the heading"));
    }

    #[test]
    fn test_display_label_from_camel_case() {
        assert_eq!(FieldDef::text("projectName").display_label(), "Project Name");
        assert_eq!(
            FieldDef::text("short_title").with_label("Title").display_label(),
            "Title"
        );
    }

    #[test]
    fn test_binary_required_only_on_create() {
        let image = FieldDef::image("image").required();
        assert!(image.required_on(FormMode::Create));
        assert!(!image.required_on(FormMode::Edit));

        let heading = FieldDef::text("heading").required();
        assert!(heading.required_on(FormMode::Create));
        assert!(heading.required_on(FormMode::Edit));

        let optional = FieldDef::image("logo");
        assert!(!optional.required_on(FormMode::Create));
    }

    #[test]
    fn test_check_kind_mismatch() {
        let field = FieldDef::number("floors");
        assert!(field.check(&FieldValue::from(12)).is_ok());
        assert!(field.check(&FieldValue::Null).is_ok());
        assert!(field.check(&FieldValue::text("twelve")).is_err());

        let field = FieldDef::text("name");
        let file = PendingFile::new("a.png", "image/png", vec![1]);
        assert!(field.check(&FieldValue::file(file)).is_err());
    }

    #[test]
    fn test_check_upload_mime() {
        let image = FieldDef::image("image");
        let png = PendingFile::new("slide.png", "image/png", vec![1]);
        let pdf = PendingFile::new("brochure.pdf", "application/pdf", vec![1]);
        assert!(image.check(&FieldValue::file(png)).is_ok());

        let err = image.check(&FieldValue::file(pdf.clone())).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("brochure.pdf"));

        assert!(FieldDef::document("brochure").check(&FieldValue::file(pdf)).is_ok());
    }

    #[test]
    fn test_check_dates() {
        let date = FieldDef::date("date");
        assert!(date.check(&FieldValue::text("2024-03-01")).is_ok());
        assert!(date.check(&FieldValue::text("2024-03-01T09:30:00.000Z")).is_ok());
        assert!(date.check(&FieldValue::text("")).is_ok());
        assert!(date.check(&FieldValue::text("March 1st")).is_err());
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(
            FieldDef::number("price").parse("1200").unwrap(),
            FieldValue::from(1200)
        );
        assert_eq!(
            FieldDef::number("area").parse("99.5").unwrap(),
            FieldValue::Number(Number::from_f64(99.5).unwrap())
        );
        assert!(FieldDef::number("price").parse("lots").is_err());
        assert_eq!(
            FieldDef::boolean("featured").parse("yes").unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            FieldDef::image("image").parse("/uploads/a.jpg").unwrap(),
            FieldValue::Binary(BinaryValue::Remote {
                url: "/uploads/a.jpg".to_string()
            })
        );
    }

    #[test]
    fn test_read_from_item() {
        let item = Item::new("3")
            .with_field("heading", "Welcome home")
            .with_field("image", "https://cdn.example.com/slide.jpg")
            .with_field("logo", json!(null));

        assert_eq!(
            FieldDef::text("heading").read(&item),
            FieldValue::text("Welcome home")
        );
        assert_eq!(
            FieldDef::image("image").read(&item),
            FieldValue::Binary(BinaryValue::Remote {
                url: "https://cdn.example.com/slide.jpg".to_string()
            })
        );
        assert_eq!(FieldDef::image("logo").read(&item), FieldValue::Null);
        assert_eq!(FieldDef::text("missing").read(&item), FieldValue::Null);
    }

    #[test]
    fn test_field_validation() {
        assert!(FieldDef::text("heading").validate().is_ok());
        assert!(FieldDef::text("").validate().is_err());
        assert!(FieldDef::text("with-dash").validate().is_err());
        assert!(FieldDef::image("image").with_accept(&[]).validate().is_err());
        assert!(
            FieldDef::text("name")
                .with_accept(&["image/"])
                .validate()
                .is_err()
        );
    }
}
