//! Command-line entry point for the family task backend.

use clap::{Parser, Subcommand};
use family_task_backend::{
    config::{self, Settings},
    http,
    store::{REQUIRED_TABLES, StoreContext, inspect},
    telemetry,
};
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{debug, info};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "family-task-backend", version, about = "Family task backend")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// Apply pending migrations before accepting traffic.
        #[arg(long)]
        migrate: bool,
    },
    /// Manage the database schema.
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum MigrateAction {
    /// Apply every pending migration.
    Up,
    /// Revert every applied migration.
    Down,
    /// Report applied and pending migrations.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let env_file_loaded = config::load_env_file(Path::new(".env"))?;
    telemetry::init();
    debug!(env_file_loaded, "environment prepared");
    let Cli { settings, command } = Cli::parse();
    let store = StoreContext::connect(&settings.database_url, settings.database_max_connections)?;

    match command.unwrap_or(Command::Serve { migrate: false }) {
        Command::Serve { migrate } => serve(&settings, &store, migrate).await,
        Command::Migrate { action } => run_migration(&store, action).await,
    }
}

async fn serve(settings: &Settings, store: &StoreContext, migrate: bool) -> Result<(), BoxError> {
    if migrate {
        store.upgrade().await?;
    }
    let router = http::build_router(&settings.http_settings()?);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    http::serve(listener, router).await?;
    Ok(())
}

async fn run_migration(store: &StoreContext, action: MigrateAction) -> Result<(), BoxError> {
    match action {
        MigrateAction::Up => {
            let applied = store.upgrade().await?;
            info!(count = applied.len(), "schema upgraded");
        }
        MigrateAction::Down => {
            let reverted = store.downgrade().await?;
            info!(count = reverted.len(), "schema downgraded");
        }
        MigrateAction::Status => {
            let status = store.migration_status().await?;
            let context = store.clone();
            let tables = tokio::task::spawn_blocking(move || {
                let mut conn = context.connection()?;
                inspect::table_names(&mut conn)
            })
            .await??;
            let missing: Vec<&str> = REQUIRED_TABLES
                .iter()
                .copied()
                .filter(|table| !tables.iter().any(|name| name == table))
                .collect();
            info!(
                applied = ?status.applied,
                pending = ?status.pending,
                missing_tables = ?missing,
                "schema status"
            );
        }
    }
    Ok(())
}
