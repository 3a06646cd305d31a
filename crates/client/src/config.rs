//! Client configuration
//!
//! Values come from an optional TOML file, then from environment variables,
//! which take precedence:
//!
//! - `ESTATE_API_BASE_URL` (required)
//! - `ESTATE_API_TIMEOUT_SECS` (default: `30`)
//! - `ESTATE_TOKEN_FILE` (default: none, the credential lives in memory)

use estate_core::{AdminError, AdminResult, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API base URL
pub const ENV_BASE_URL: &str = "ESTATE_API_BASE_URL";

/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "ESTATE_API_TIMEOUT_SECS";

/// Environment variable holding the token file path
pub const ENV_TOKEN_FILE: &str = "ESTATE_TOKEN_FILE";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API (e.g. `https://api.example.com/api`)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// File holding the bearer token between runs
    pub token_file: Option<PathBuf>,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_file: None,
            user_agent: format!("estate-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the token file
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Load configuration: file (if given), then environment, then validate
    pub fn load(path: Option<&Path>) -> AdminResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file
    pub fn from_file(path: &Path) -> AdminResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AdminError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Parse TOML text
    pub fn from_toml(text: &str) -> AdminResult<Self> {
        toml::from_str(text).map_err(|e| AdminError::InvalidConfig(e.to_string()))
    }

    /// Override values from an environment lookup
    pub fn apply_env<F>(mut self, lookup: F) -> AdminResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                AdminError::InvalidConfig(format!("{ENV_TIMEOUT_SECS} must be a number, got '{raw}'"))
            })?;
        }

        if let Some(path) = lookup(ENV_TOKEN_FILE).filter(|v| !v.trim().is_empty()) {
            self.token_file = Some(PathBuf::from(path));
        }

        Ok(self)
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validatable for ClientConfig {
    fn validate(&self) -> AdminResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AdminError::MissingConfig(ENV_BASE_URL.to_string()));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AdminError::InvalidConfig(format!(
                "base URL '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(AdminError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
