//! # Estate Core
//!
//! Core types, traits, and error handling for Estate Admin.
//!
//! This crate provides the building blocks shared by the schema, client,
//! and controller crates:
//!
//! - **Types**: Item identifiers, resource items, and field values
//!   (including binary references and pending uploads)
//! - **Traits**: `Validatable` for self-checking definitions
//! - **Errors**: Unified error handling with `AdminError` and `AdminResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{AdminError, AdminResult};
pub use traits::Validatable;
pub use types::{BinaryValue, FieldValue, FieldValues, Item, ItemId, PendingFile};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
