//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage the content of the real-estate marketing site
#[derive(Parser, Debug)]
#[command(name = "estate-admin", version)]
pub struct Cli {
    /// TOML configuration file (base_url, timeout_secs, token_file)
    #[arg(long, global = true, env = "ESTATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the resources this tool manages
    Resources,

    /// Show every item of a resource
    List {
        /// Resource name (see `resources`)
        resource: String,
        /// Parent project id, for per-project resources
        #[arg(long)]
        parent: Option<String>,
    },

    /// Create an item
    Create {
        resource: String,
        #[arg(long)]
        parent: Option<String>,
        /// Field value, as name=value
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// File to upload, as name=path
        #[arg(long = "file", value_name = "FIELD=PATH", value_parser = parse_assignment)]
        file: Vec<(String, String)>,
    },

    /// Replace an item with its current values plus the given changes
    Update {
        resource: String,
        id: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        #[arg(long = "file", value_name = "FIELD=PATH", value_parser = parse_assignment)]
        file: Vec<(String, String)>,
    },

    /// Delete an item
    Delete {
        resource: String,
        id: String,
        #[arg(long)]
        parent: Option<String>,
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Store an access token
    Login {
        #[arg(long)]
        token: String,
    },

    /// Forget the stored access token
    Logout,
}

/// Parse `name=value`
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("title=A = B").unwrap(),
            ("title".to_string(), "A = B".to_string())
        );
        assert_eq!(
            parse_assignment("summary=").unwrap(),
            ("summary".to_string(), String::new())
        );
        assert!(parse_assignment("title").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_parse_update() {
        let cli = Cli::try_parse_from([
            "estate-admin",
            "update",
            "hero-carousel",
            "3",
            "--set",
            "subheading=Homes",
            "--file",
            "image=hero.png",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Update { resource, id, set, file, .. } => {
                assert_eq!(resource, "hero-carousel");
                assert_eq!(id, "3");
                assert_eq!(set, vec![("subheading".to_string(), "Homes".to_string())]);
                assert_eq!(file, vec![("image".to_string(), "hero.png".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
