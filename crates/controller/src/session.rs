//! Edit session state
//!
//! An edit session is the client-local record of which item, if any, is
//! being created or modified, together with its working copy.

use crate::preview::PreviewHandle;
use estate_core::{FieldValue, FieldValues, ItemId};
use estate_schema::FormMode;
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Edit Mode
// ============================================================================

/// What the session is doing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    /// No form open
    #[default]
    Idle,
    /// Filling in a new item
    Creating,
    /// Modifying an existing item
    Editing(ItemId),
}

impl EditMode {
    /// Whether a form is open
    pub fn is_active(&self) -> bool {
        !matches!(self, EditMode::Idle)
    }

    /// Id of the item being edited
    pub fn editing_id(&self) -> Option<&ItemId> {
        match self {
            EditMode::Editing(id) => Some(id),
            _ => None,
        }
    }

    /// Form mode used for required-field checks
    pub fn form_mode(&self) -> Option<FormMode> {
        match self {
            EditMode::Idle => None,
            EditMode::Creating => Some(FormMode::Create),
            EditMode::Editing(_) => Some(FormMode::Edit),
        }
    }
}

// ============================================================================
// Edit Session
// ============================================================================

/// Working copy plus the previews it owns
#[derive(Debug, Default)]
pub struct EditSession {
    mode: EditMode,
    values: FieldValues,
    dirty: BTreeSet<String>,
    previews: HashMap<String, PreviewHandle>,
}

impl EditSession {
    /// An idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an empty working copy
    pub fn creating() -> Self {
        Self {
            mode: EditMode::Creating,
            ..Self::default()
        }
    }

    /// Start from an item's current values
    pub fn editing(id: ItemId, values: FieldValues) -> Self {
        Self {
            mode: EditMode::Editing(id),
            values,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Get a single working-copy value
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Store a value, replacing any preview held for that field
    ///
    /// The old preview handle is dropped here, which releases it.
    pub fn set(&mut self, name: &str, value: FieldValue, preview: Option<PreviewHandle>) {
        match preview {
            Some(handle) => {
                self.previews.insert(name.to_string(), handle);
            }
            None => {
                self.previews.remove(name);
            }
        }
        self.values.insert(name.to_string(), value);
        self.dirty.insert(name.to_string());
    }

    /// Preview of a pending file
    pub fn preview(&self, name: &str) -> Option<&PreviewHandle> {
        self.previews.get(name)
    }

    /// Whether the working copy has unsaved changes
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Names of the fields changed since the session began
    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }
}
