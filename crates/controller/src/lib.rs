//! # Estate Controller
//!
//! One generic CRUD controller, parametrized by a [`ResourceDef`], drives
//! every admin screen of the site.
//!
//! ## Architecture
//!
//! - [`ResourceController`]: list state, edit session, submit and remove
//! - [`EditSession`]: working copy and the previews it owns
//! - [`PreviewRegistry`]: `data:` URL previews for files pending upload
//! - [`Notifier`] / [`Confirm`]: how the controller talks to the user
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut partners = ResourceController::new(client, catalog.get("partners")?.clone(), TracingNotifier);
//! partners.load().await?;
//! partners.begin_create();
//! partners.set_field("name", "Acme".into())?;
//! partners.set_field("description", "Builder".into())?;
//! partners.submit().await?;
//! ```
//!
//! [`ResourceDef`]: estate_schema::ResourceDef

pub mod confirm;
pub mod controller;
pub mod notify;
pub mod preview;
pub mod session;

pub use confirm::{AssumeYes, Confirm};
pub use controller::{RemoveOutcome, ResourceController, SubmitOutcome};
pub use notify::{Level, Notification, Notifier, TracingNotifier};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use session::{EditMode, EditSession};
