//! # Estate CLI
//!
//! Command-line front end for the site's admin screens. Each command drives
//! a [`ResourceController`](estate_controller::ResourceController) the way
//! an admin screen would.
//!
//! ## Commands
//!
//! - `resources` - List the managed resources and their fields
//! - `list` - Show the items of a resource
//! - `create` / `update` - Fill in a form from `--set` and `--file` and submit it
//! - `delete` - Remove an item after a `y/N` confirmation
//! - `login` / `logout` - Store or forget the access token

pub mod args;
mod commands;
pub mod input;
pub mod terminal;

pub use args::{Cli, Command};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!(command = ?cli.command, "running");
    commands::execute(cli.command, cli.config.as_deref()).await
}
