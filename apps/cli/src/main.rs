//! `ward` - command-line client for the hospital-management API
//!
//! Every command prints JSON on stdout; logs go to stderr.

mod cli;
mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use ward_client::{ApiClient, EntityKind, FileSessionStore, HttpTransport, RouteCatalog};
use ward_store::{AccessGuard, AdminSummary, Store};

use crate::cli::{Cli, Command, EntityAction, EntityArgs, ProfileCommand};
use crate::config::Config;

const DASHBOARD_PATH: &str = "/dashboard";

/// Containers the admin dashboard aggregates over.
const DASHBOARD_KINDS: [EntityKind; 5] = [
    EntityKind::User,
    EntityKind::Expense,
    EntityKind::Prescription,
    EntityKind::Test,
    EntityKind::VaccineAppointment,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to read .env file");
        }
    }

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let store = build_store(&config)?;
    tracing::debug!(
        base_url = %config.api.base_url,
        signed_in = store.session().is_some(),
        "Store ready"
    );

    run(&store, cli.command).await
}

fn build_store(config: &Config) -> anyhow::Result<Store> {
    let transport = HttpTransport::new(&config.api).context("Failed to build HTTP transport")?;
    let routes = RouteCatalog::with_overrides(config.routes.clone());
    let client = ApiClient::new(Arc::new(transport), routes);
    let sessions = FileSessionStore::new(config.session.dir.clone());
    tracing::debug!(path = %sessions.path().display(), "Session file");
    Ok(Store::new(client, Arc::new(sessions)))
}

async fn run(store: &Store, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Signin { email, password } => {
            let session = store
                .sign_in(&email, &password)
                .await
                .context("Sign-in failed")?;
            print_json(&identity(&session))
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let session = store
                .sign_up(&name, &email, &password)
                .await
                .context("Sign-up failed")?;
            print_json(&identity(&session))
        }
        Command::Signout => print_json(&json!({ "signed_out": store.sign_out() })),
        Command::Whoami => match store.session() {
            Some(session) => print_json(&identity(&session)),
            None => anyhow::bail!("Not signed in"),
        },
        Command::Profile(ProfileCommand::Show) => {
            store
                .load_current_user()
                .await
                .context("Failed to load profile")?;
            print_json(&store.sessions().account())
        }
        Command::Profile(ProfileCommand::Update { data }) => {
            let session = store
                .update_profile(data)
                .await
                .context("Failed to update profile")?;
            print_json(&identity(&session))
        }
        Command::Entity(args) => run_entity(store, args).await,
        Command::Guard { kind, location } => print_json(&store.guard(kind.guard(), &location)),
        Command::Dashboard => dashboard(store).await,
    }
}

async fn run_entity(store: &Store, args: EntityArgs) -> anyhow::Result<()> {
    let kind = args.kind;
    let result = match args.action {
        EntityAction::List => store.list(kind).await,
        EntityAction::Detail { id } => store.detail(kind, &id).await,
        EntityAction::DetailUser { id } => store.detail_user(kind, &id).await,
        EntityAction::Create { data } => store.create(kind, data).await,
        EntityAction::Update { data } => store.update(kind, data).await,
        EntityAction::Delete { id } => store.remove(kind, &id).await,
        EntityAction::Enum { field } => store.list_enum(kind, &field).await,
    };

    print_json(&store.container(kind))?;
    result.with_context(|| format!("{kind} request failed"))
}

async fn dashboard(store: &Store) -> anyhow::Result<()> {
    let decision = store.guard(AccessGuard::admin(), DASHBOARD_PATH);
    if !decision.is_render() {
        print_json(&decision)?;
        anyhow::bail!("The dashboard requires an admin session");
    }

    for kind in DASHBOARD_KINDS {
        store
            .list(kind)
            .await
            .with_context(|| format!("Failed to load {kind}"))?;
    }
    print_json(&AdminSummary::from_store(store))
}

fn identity(session: &ward_client::Session) -> serde_json::Value {
    json!({
        "_id": session.id,
        "name": session.name,
        "email": session.email,
        "role": session.role,
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}
