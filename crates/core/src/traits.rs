//! Shared traits
//!
//! Resource definitions and client configuration are built by hand, so
//! each one can check itself before a controller or transport relies on it.

use crate::error::AdminResult;

/// Self-check for hand-built definitions
///
/// ```rust,ignore
/// impl Validatable for ClientConfig {
///     fn validate(&self) -> AdminResult<()> {
///         if self.base_url.is_empty() {
///             return Err(AdminError::MissingConfig("ESTATE_API_BASE_URL".into()));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Return the first problem found, if any
    fn validate(&self) -> AdminResult<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Problems as display strings; empty when valid
    fn validation_errors(&self) -> Vec<String> {
        self.validate()
            .err()
            .map(|e| e.to_string())
            .into_iter()
            .collect()
    }
}
