//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use ward_client::EntityKind;
use ward_store::AccessGuard;

#[derive(Debug, Parser)]
#[command(name = "ward", version, about = "Hospital-management API client")]
pub struct Cli {
    /// Configuration file (defaults to ./ward.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override `api.base_url`
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and persist the session
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new account and persist the session
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the persisted session
    Signout,
    /// Show the signed-in identity
    Whoami,
    /// Signed-in user's profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Operate on one entity container
    Entity(EntityArgs),
    /// Evaluate an access guard against the current session
    Guard {
        #[arg(value_enum)]
        kind: GuardKind,
        /// Location reported back on redirect
        #[arg(long, default_value = "/")]
        location: String,
    },
    /// Admin dashboard summary
    Dashboard,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },
}

#[derive(Debug, Args)]
pub struct EntityArgs {
    /// Entity kind, e.g. `doctor` or `vaccine-appointment`
    pub kind: EntityKind,

    #[command(subcommand)]
    pub action: EntityAction,
}

#[derive(Debug, Subcommand)]
pub enum EntityAction {
    List,
    Detail {
        id: String,
    },
    DetailUser {
        id: String,
    },
    Create {
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },
    Update {
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },
    Delete {
        id: String,
    },
    Enum {
        field: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GuardKind {
    Admin,
    Doctor,
    Patient,
    Authenticated,
}

impl GuardKind {
    pub fn guard(self) -> AccessGuard {
        match self {
            GuardKind::Admin => AccessGuard::admin(),
            GuardKind::Doctor => AccessGuard::doctor(),
            GuardKind::Patient => AccessGuard::patient(),
            GuardKind::Authenticated => AccessGuard::authenticated(),
        }
    }
}

fn parse_json(raw: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err("expected a JSON object".to_string())
    }
}
