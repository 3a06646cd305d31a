//! Authentication context
//!
//! The bearer credential is injected into the transport at construction
//! instead of being looked up from ambient storage on every request. The
//! context caches the token and keeps it in sync with a [`TokenStore`]
//! through an explicit lifecycle: [`AuthContext::refresh`],
//! [`AuthContext::set_token`] and [`AuthContext::clear`].

use crate::config::ClientConfig;
use estate_core::{AdminError, AdminResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

// ============================================================================
// TokenStore
// ============================================================================

/// Persistent home of the bearer token
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Read the stored token, if any
    fn load(&self) -> AdminResult<Option<String>>;

    /// Store a token, replacing any previous one
    fn save(&self, token: &str) -> AdminResult<()>;

    /// Forget the stored token
    fn clear(&self) -> AdminResult<()>;
}

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AdminResult<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> AdminResult<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AdminResult<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Token store backed by a file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> AdminResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let token = text.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AdminError::FileRead {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn save(&self, token: &str) -> AdminResult<()> {
        let write_error = |e: std::io::Error| AdminError::FileWrite {
            path: self.path.clone(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(&self.path, token).map_err(write_error)
    }

    fn clear(&self) -> AdminResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AdminError::FileWrite {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

// ============================================================================
// AuthContext
// ============================================================================

/// Shared bearer credential
///
/// Clones share the same cached token, so a `clear()` through one handle is
/// seen by every transport holding another.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn TokenStore>,
    token: Arc<RwLock<Option<String>>>,
}

impl AuthContext {
    /// Create a context over a store, loading its current token
    pub fn new(store: Arc<dyn TokenStore>) -> AdminResult<Self> {
        let token = store.load()?;
        Ok(Self {
            store,
            token: Arc::new(RwLock::new(token)),
        })
    }

    /// Context with no credential and an in-memory store
    pub fn anonymous() -> Self {
        Self {
            store: Arc::new(MemoryTokenStore::new()),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Context using the configured token file, or memory when none is set
    pub fn from_config(config: &ClientConfig) -> AdminResult<Self> {
        match &config.token_file {
            Some(path) => Self::new(Arc::new(FileTokenStore::new(path))),
            None => Ok(Self::anonymous()),
        }
    }

    /// Current token, if any
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether a non-blank token is present
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.trim().is_empty())
    }

    /// `Authorization` header value, when a token is present
    pub fn authorization(&self) -> Option<String> {
        self.token()
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("Bearer {}", t.trim()))
    }

    /// Re-read the token from the store
    pub fn refresh(&self) -> AdminResult<()> {
        let token = self.store.load()?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
        tracing::debug!("credential refreshed from store");
        Ok(())
    }

    /// Store and use a new token
    pub fn set_token(&self, token: impl Into<String>) -> AdminResult<()> {
        let token = token.into();
        self.store.save(&token)?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
        tracing::debug!("credential updated");
        Ok(())
    }

    /// Forget the token, in memory and in the store
    pub fn clear(&self) -> AdminResult<()> {
        self.store.clear()?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        tracing::debug!("credential cleared");
        Ok(())
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("store", &self.store)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anonymous_has_no_header() {
        let auth = AuthContext::anonymous();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.authorization(), None);
    }

    #[test]
    fn test_bearer_header() {
        let auth = AuthContext::new(Arc::new(MemoryTokenStore::with_token("abc123"))).unwrap();
        assert_eq!(auth.authorization(), Some("Bearer abc123".to_string()));

        let blank = AuthContext::new(Arc::new(MemoryTokenStore::with_token("  "))).unwrap();
        assert_eq!(blank.authorization(), None);
    }

    #[test]
    fn test_clones_share_credential() {
        let auth = AuthContext::anonymous();
        let other = auth.clone();
        auth.set_token("t1").unwrap();
        assert_eq!(other.token(), Some("t1".to_string()));

        other.clear().unwrap();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_refresh_picks_up_external_change() {
        let store = Arc::new(MemoryTokenStore::new());
        let auth = AuthContext::new(store.clone()).unwrap();
        assert_eq!(auth.token(), None);

        store.save("from-login").unwrap();
        assert_eq!(auth.token(), None);
        auth.refresh().unwrap();
        assert_eq!(auth.token(), Some("from-login".to_string()));
    }

    #[test]
    fn test_file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));
        assert_eq!(store.load().unwrap(), None);

        store.save("secret\n").unwrap();
        assert_eq!(store.load().unwrap(), Some("secret".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_from_config_uses_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "persisted").unwrap();

        let config = ClientConfig::new("http://localhost").with_token_file(&path);
        let auth = AuthContext::from_config(&config).unwrap();
        assert_eq!(auth.authorization(), Some("Bearer persisted".to_string()));
    }
}
