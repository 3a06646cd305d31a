//! Command implementations

use crate::args::Command;
use crate::input::collect_values;
use crate::terminal::{StdinConfirm, TerminalNotifier, render_item, render_resource};
use anyhow::{Context, Result};
use estate_client::{ApiClient, AuthContext, ClientConfig, HttpTransport};
use estate_controller::{AssumeYes, Confirm, RemoveOutcome, ResourceController};
use estate_core::{ItemId, Validatable};
use estate_schema::{Catalog, ResourceDef};
use std::path::Path;
use std::sync::Arc;

type Controller = ResourceController<HttpTransport, TerminalNotifier>;

/// Run one command
pub async fn execute(command: Command, config_path: Option<&Path>) -> Result<()> {
    let catalog = Catalog::site();

    match command {
        Command::Resources => {
            for def in catalog.iter() {
                print!("{}", render_resource(def));
            }
        }

        Command::List { resource, parent } => {
            let mut controller = controller(&catalog, &resource, parent, config_path)?;
            controller.load().await?;
            let def = controller.resource();
            if controller.items().is_empty() {
                println!("No {} found.", def.name);
            }
            for item in controller.items() {
                print!("{}", render_item(def, item));
            }
        }

        Command::Create {
            resource,
            parent,
            set,
            file,
        } => {
            let mut controller = controller(&catalog, &resource, parent, config_path)?;
            let values = collect_values(controller.resource(), &set, &file).await?;

            controller.begin_create();
            for (name, value) in values {
                controller.set_field(&name, value)?;
            }
            controller.submit().await?;
        }

        Command::Update {
            resource,
            id,
            parent,
            set,
            file,
        } => {
            let mut controller = controller(&catalog, &resource, parent, config_path)?;
            let values = collect_values(controller.resource(), &set, &file).await?;
            let id = ItemId::new(id);

            controller.load().await?;
            controller.begin_edit(&id)?;
            for (name, value) in values {
                controller.set_field(&name, value)?;
            }
            controller.submit().await?;
        }

        Command::Delete {
            resource,
            id,
            parent,
            yes,
        } => {
            let mut controller = controller(&catalog, &resource, parent, config_path)?;
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { &StdinConfirm };

            match controller.remove(&ItemId::new(id), confirm).await? {
                RemoveOutcome::Removed(_) => {}
                RemoveOutcome::Cancelled => println!("Cancelled."),
            }
        }

        Command::Login { token } => {
            if token.trim().is_empty() {
                anyhow::bail!("Token cannot be empty.");
            }
            let auth = token_auth(config_path)?;
            auth.set_token(token.trim())?;
            println!("Token saved.");
        }

        Command::Logout => {
            let auth = token_auth(config_path)?;
            auth.clear()?;
            println!("Token removed.");
        }
    }

    Ok(())
}

/// Configuration from the file (if any) and the environment, unvalidated
fn read_config(config_path: Option<&Path>) -> Result<ClientConfig> {
    let base = match config_path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    Ok(base.apply_env(|key| std::env::var(key).ok())?)
}

fn token_auth(config_path: Option<&Path>) -> Result<AuthContext> {
    let config = read_config(config_path)?;
    if config.token_file.is_none() {
        anyhow::bail!(
            "No token file configured. Set ESTATE_TOKEN_FILE or token_file in the config file."
        );
    }
    Ok(AuthContext::from_config(&config)?)
}

fn resource(catalog: &Catalog, name: &str, parent: Option<&str>) -> Result<ResourceDef> {
    let def = catalog
        .get(name)
        .with_context(|| format!("try one of: {}", catalog.names().join(", ")))?;
    if def.parent.is_some() && parent.is_none() {
        anyhow::bail!("'{}' belongs to a project; pass --parent <id>", def.name);
    }
    Ok(def.clone())
}

fn controller(
    catalog: &Catalog,
    name: &str,
    parent: Option<String>,
    config_path: Option<&Path>,
) -> Result<Controller> {
    let def = resource(catalog, name, parent.as_deref())?;

    let config = read_config(config_path)?;
    config.validate()?;
    let auth = AuthContext::from_config(&config)?;
    tracing::debug!(base_url = %config.base_url, authenticated = auth.is_authenticated(), "client ready");

    let client = Arc::new(ApiClient::new(HttpTransport::new(&config, auth)?));
    let controller = ResourceController::new(client, def, TerminalNotifier);
    Ok(match parent {
        Some(parent) => controller.with_parent(parent),
        None => controller,
    })
}
