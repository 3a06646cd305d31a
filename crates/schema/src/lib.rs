//! # Estate Schema
//!
//! Declarative definitions of the resources the admin screens manage.
//!
//! ## Core Concepts
//!
//! - **Field**: A named property of a resource with a kind (text, number,
//!   image, ...) and a required flag
//! - **Envelope**: The outer shape of a list response (`[...]`,
//!   `{"data": [...]}`, a single object, ...) and how to unwrap it
//! - **Resource**: A REST collection path plus its fields, envelope, and
//!   optional parent scoping
//! - **Catalog**: The set of resources the site exposes
//!

// Module declarations
pub mod catalog;
pub mod envelope;
pub mod field;
pub mod resource;

// Re-export commonly used types at crate root
pub use catalog::Catalog;
pub use envelope::Envelope;
pub use field::{FieldDef, FieldKind, FormMode};
pub use resource::{ParentScope, ResourceDef};

// Re-export core types that are commonly used with schemas
pub use estate_core::{AdminError, AdminResult, FieldValue, Item, ItemId, Validatable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
