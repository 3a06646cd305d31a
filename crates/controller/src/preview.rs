//! Local previews of files pending upload
//!
//! A preview is a `data:` URL the view can render before the file is sent.
//! Each one is owned by a [`PreviewHandle`] registered with a
//! [`PreviewRegistry`]; dropping the handle releases the registration, so
//! a preview lives exactly as long as the edit session slot holding it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use estate_core::{AdminError, AdminResult, PendingFile};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// MIME prefixes that get a preview
const PREVIEWABLE: &[&str] = &["image/", "application/pdf"];

/// Tracks outstanding previews
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<Uuid>>>,
}

impl PreviewRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview for a pending file
    pub fn create(&self, file: &PendingFile) -> AdminResult<PreviewHandle> {
        let mime = file.mime.to_ascii_lowercase();
        if !PREVIEWABLE.iter().any(|prefix| mime.starts_with(prefix)) {
            return Err(AdminError::invalid_value(
                &file.file_name,
                format!("no preview available for {}", file.mime),
            ));
        }

        let id = Uuid::new_v4();
        let url = format!("data:{};base64,{}", mime, STANDARD.encode(&file.bytes));
        self.lock().insert(id);
        tracing::trace!(%id, file = %file.file_name, "preview created");

        Ok(PreviewHandle {
            id,
            url,
            file_name: file.file_name.clone(),
            registry: self.clone(),
        })
    }

    /// Number of previews not yet released
    pub fn live(&self) -> usize {
        self.lock().len()
    }

    /// Whether a given preview is still held
    pub fn is_live(&self, id: Uuid) -> bool {
        self.lock().contains(&id)
    }

    fn release(&self, id: Uuid) {
        if self.lock().remove(&id) {
            tracing::trace!(%id, "preview released");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<Uuid>> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owner of one preview; releases it on drop
pub struct PreviewHandle {
    id: Uuid,
    url: String,
    file_name: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// Registration id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Renderable `data:` URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Name of the previewed file
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("url_len", &self.url.len())
            .finish()
    }
}
