//! # Estate Client
//!
//! HTTP access to the site's REST backend.
//!
//! ## Architecture
//!
//! - [`ClientConfig`]: base URL, timeout, and credential location, loaded
//!   from the environment or a TOML file
//! - [`AuthContext`]: the bearer credential, injected into the transport
//!   and shared by every request, with explicit refresh/clear
//! - [`Transport`]: the seam between the REST contract and the wire;
//!   [`HttpTransport`] implements it with `reqwest`
//! - [`ApiClient`]: list/create/update/delete against a [`ResourceDef`],
//!   with status checking and envelope normalization
//! - [`Payload`]: JSON or multipart body built from a form's values
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ClientConfig::load(None)?;
//! let auth = AuthContext::from_config(&config)?;
//! let client = ApiClient::new(HttpTransport::new(&config, auth)?);
//! let partners = client.list(catalog.get("partners")?, None).await?;
//! ```
//!
//! [`ResourceDef`]: estate_schema::ResourceDef

pub mod api;
pub mod auth;
pub mod config;
pub mod payload;
pub mod request;
pub mod transport;

pub use api::ApiClient;
pub use auth::{AuthContext, FileTokenStore, MemoryTokenStore, TokenStore};
pub use config::ClientConfig;
pub use payload::Payload;
pub use request::{ApiRequest, ApiResponse, Method, Part, PartContent, RequestBody};
pub use transport::{HttpTransport, Transport};
