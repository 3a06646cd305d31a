//! Generic CRUD controller for one resource
//!
//! A [`ResourceController`] sits between a list view and a REST collection.
//! It holds the last loaded list and at most one edit session, and turns
//! form submissions into exactly one create or update request followed by
//! a reload. Every outcome the user should see is also sent to the
//! injected [`Notifier`].

use crate::confirm::Confirm;
use crate::notify::{Notification, Notifier};
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::session::{EditMode, EditSession};
use estate_client::{ApiClient, Payload, Transport};
use estate_core::{AdminError, AdminResult, BinaryValue, FieldValue, FieldValues, Item, ItemId};
use estate_schema::{FormMode, ResourceDef};
use std::sync::Arc;

/// Result of a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated(ItemId),
}

/// Result of a remove request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(ItemId),
    /// The user declined; nothing was sent
    Cancelled,
}

/// List plus edit session for one resource type
pub struct ResourceController<T, N> {
    client: Arc<ApiClient<T>>,
    def: ResourceDef,
    parent: Option<ItemId>,
    items: Vec<Item>,
    session: EditSession,
    notifier: N,
    previews: PreviewRegistry,
}

impl<T: Transport, N: Notifier> ResourceController<T, N> {
    /// Create a controller with an empty list and no session
    pub fn new(client: Arc<ApiClient<T>>, def: ResourceDef, notifier: N) -> Self {
        Self {
            client,
            def,
            parent: None,
            items: Vec::new(),
            session: EditSession::new(),
            notifier,
            previews: PreviewRegistry::new(),
        }
    }

    /// Scope the controller to a parent item
    pub fn with_parent(mut self, parent: impl Into<ItemId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The shared API client
    pub fn client(&self) -> &Arc<ApiClient<T>> {
        &self.client
    }

    pub fn resource(&self) -> &ResourceDef {
        &self.def
    }

    pub fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }

    /// Items from the last successful load
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Find a loaded item by id
    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn mode(&self) -> &EditMode {
        self.session.mode()
    }

    pub fn working_copy(&self) -> &FieldValues {
        self.session.values()
    }

    /// Local preview for a field holding a pending file
    pub fn preview(&self, field: &str) -> Option<&PreviewHandle> {
        self.session.preview(field)
    }

    /// Whether the open session has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Replace the local list with the server's collection
    ///
    /// On failure the previous list is kept.
    pub async fn load(&mut self) -> AdminResult<()> {
        match self.client.list(&self.def, self.parent.as_ref()).await {
            Ok(items) => {
                tracing::debug!(resource = %self.def.name, count = items.len(), "loaded");
                self.items = items;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(resource = %self.def.name, error = %e, "load failed");
                self.notifier.notify(Notification::error(format!(
                    "Could not load {}: {}",
                    self.def.name,
                    e.user_message()
                )));
                Err(e)
            }
        }
    }

    /// Open an empty form
    ///
    /// Returns `true` if unsaved changes were discarded.
    pub fn begin_create(&mut self) -> bool {
        self.replace_session(EditSession::creating())
    }

    /// Open a form on a loaded item
    ///
    /// Returns `true` if unsaved changes were discarded.
    pub fn begin_edit(&mut self, id: &ItemId) -> AdminResult<bool> {
        let item = self.find(id).ok_or_else(|| AdminError::ItemNotFound {
            resource: self.def.name.clone(),
            id: id.to_string(),
        })?;

        let values: FieldValues = self
            .def
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.read(item)))
            .collect();

        Ok(self.replace_session(EditSession::editing(id.clone(), values)))
    }

    /// Change one value in the working copy
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> AdminResult<()> {
        if !self.session.mode().is_active() {
            return Err(AdminError::NoEditSession);
        }

        let field = self.def.require_field(name)?;
        field.check(&value)?;

        let preview = match &value {
            FieldValue::Binary(BinaryValue::Pending(file)) => match self.previews.create(file) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::debug!(field = name, error = %e, "no preview");
                    None
                }
            },
            _ => None,
        };

        self.session.set(name, value, preview);
        Ok(())
    }

    /// Send the working copy
    ///
    /// Creating issues one `POST`, editing one `PUT` for the item. On
    /// success the session closes and the list reloads once; on failure
    /// the session stays open for another attempt.
    pub async fn submit(&mut self) -> AdminResult<SubmitOutcome> {
        let mode = self.session.mode().clone();
        let Some(form_mode) = mode.form_mode() else {
            return Err(AdminError::NoEditSession);
        };

        let payload = match self
            .check_required(form_mode)
            .and_then(|()| Payload::build(&self.def, self.session.values(), self.parent.as_ref()))
        {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(resource = %self.def.name, error = %e, "form rejected");
                self.notifier.notify(Notification::warning(e.user_message()));
                return Err(e);
            }
        };

        let parent = self.parent.as_ref();
        let result = match &mode {
            EditMode::Editing(id) => self
                .client
                .update(&self.def, parent, id, payload)
                .await
                .map(|()| SubmitOutcome::Updated(id.clone())),
            _ => self
                .client
                .create(&self.def, parent, payload)
                .await
                .map(|()| SubmitOutcome::Created),
        };

        match result {
            Ok(outcome) => {
                self.session = EditSession::new();
                let message = match &outcome {
                    SubmitOutcome::Created => format!("Created {}", self.def.singular_label()),
                    SubmitOutcome::Updated(_) => format!("Updated {}", self.def.singular_label()),
                };
                tracing::info!(resource = %self.def.name, ?outcome, "saved");
                self.notifier.notify(Notification::success(message));
                self.reload().await;
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(resource = %self.def.name, error = %e, "save failed");
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Delete an item once the user confirms
    pub async fn remove<C: Confirm + ?Sized>(
        &mut self,
        id: &ItemId,
        confirm: &C,
    ) -> AdminResult<RemoveOutcome> {
        let prompt = format!(
            "Delete {} {}? This cannot be undone.",
            self.def.singular_label(),
            id
        );
        if !confirm.confirm(&prompt) {
            tracing::debug!(resource = %self.def.name, %id, "delete declined");
            return Ok(RemoveOutcome::Cancelled);
        }

        match self.client.delete(&self.def, self.parent.as_ref(), id).await {
            Ok(()) => {
                tracing::info!(resource = %self.def.name, %id, "deleted");
                self.notifier.notify(Notification::success(format!(
                    "Deleted {}",
                    self.def.singular_label()
                )));
                self.reload().await;
                Ok(RemoveOutcome::Removed(id.clone()))
            }
            Err(e) => {
                tracing::warn!(resource = %self.def.name, %id, error = %e, "delete failed");
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Close the form without sending anything
    pub fn cancel(&mut self) {
        self.session = EditSession::new();
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn replace_session(&mut self, session: EditSession) -> bool {
        let discarded = self.session.is_dirty();
        if discarded {
            tracing::warn!(
                resource = %self.def.name,
                fields = ?self.session.dirty_fields().collect::<Vec<_>>(),
                "discarding unsaved changes"
            );
        }
        self.session = session;
        discarded
    }

    fn check_required(&self, mode: FormMode) -> AdminResult<()> {
        for field in self.def.required_fields(mode) {
            let filled = self
                .session
                .value(&field.name)
                .is_some_and(|value| !value.is_empty());
            if !filled {
                return Err(AdminError::missing_field(
                    &self.def.name,
                    field.display_label(),
                ));
            }
        }
        Ok(())
    }

    async fn reload(&mut self) {
        // Failures are already reported by load
        let _ = self.load().await;
    }
}

impl<T, N> std::fmt::Debug for ResourceController<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceController")
            .field("resource", &self.def.name)
            .field("parent", &self.parent)
            .field("items", &self.items.len())
            .field("session", &self.session)
            .finish()
    }
}
