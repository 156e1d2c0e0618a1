//! Forward and reverse schema procedures for the household store.
//!
//! The schema ships as a Diesel migration directory embedded at compile
//! time. Each migration runs inside its own transaction, so a failing step
//! leaves the store exactly as it was before the step began.

use super::{StoreError, StoreResult};
use diesel::connection::SimpleConnection;
use diesel::migration::Migration;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::sync::Arc;
use tracing::info;

/// Migrations embedded from the crate's `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Forward script of the initial schema migration.
pub const INITIAL_SCHEMA_UP: &str =
    include_str!("../../migrations/2026-02-13-000001_initial_schema/up.sql");

/// Reverse script of the initial schema migration.
pub const INITIAL_SCHEMA_DOWN: &str =
    include_str!("../../migrations/2026-02-13-000001_initial_schema/down.sql");

/// Tables created by the forward procedure, in creation order.
///
/// Every table appears after all tables it references.
pub const REQUIRED_TABLES: [&str; 8] = [
    "users",
    "tasks",
    "task_dependencies",
    "tags",
    "task_tags",
    "calendar_sync",
    "notifications",
    "notification_settings",
];

/// Applied and pending migration versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Versions recorded as applied, oldest first.
    pub applied: Vec<String>,
    /// Embedded versions not yet applied, oldest first.
    pub pending: Vec<String>,
}

impl MigrationStatus {
    /// Returns `true` when no embedded migration is pending.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Runs the embedded migrations against a SQLite connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMigrator;

impl SchemaMigrator {
    /// Applies every pending migration and returns the applied versions.
    ///
    /// Versions already recorded in the bookkeeping table are skipped, so a
    /// second call on a current store applies nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] when a step fails. Steps applied
    /// before the failing one stay committed.
    pub fn upgrade(conn: &mut SqliteConnection) -> StoreResult<Vec<String>> {
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(StoreError::migration)?;
        let versions: Vec<String> = applied.iter().map(ToString::to_string).collect();
        for version in &versions {
            info!(version = %version, "migration applied");
        }
        Ok(versions)
    }

    /// Reverts every applied migration, newest first, and returns the
    /// reverted versions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] when a revert step fails.
    pub fn downgrade(conn: &mut SqliteConnection) -> StoreResult<Vec<String>> {
        let reverted = conn
            .revert_all_migrations(MIGRATIONS)
            .map_err(StoreError::migration)?;
        let versions: Vec<String> = reverted.iter().map(ToString::to_string).collect();
        for version in &versions {
            info!(version = %version, "migration reverted");
        }
        Ok(versions)
    }

    /// Reports which embedded migrations are applied and which are pending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] when the bookkeeping table cannot be
    /// read or created.
    pub fn status(conn: &mut SqliteConnection) -> StoreResult<MigrationStatus> {
        let mut applied: Vec<String> = conn
            .applied_migrations()
            .map_err(StoreError::migration)?
            .iter()
            .map(ToString::to_string)
            .collect();
        applied.sort();
        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(StoreError::migration)?
            .iter()
            .map(|migration| migration.name().version().to_string())
            .collect();
        Ok(MigrationStatus { applied, pending })
    }

    /// Executes the initial forward script without version bookkeeping.
    ///
    /// The script is linear rather than reentrant: running it against a
    /// store that already holds the schema fails with a duplicate-object
    /// error and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] when any statement fails.
    pub fn apply_initial_script(conn: &mut SqliteConnection) -> StoreResult<()> {
        run_script(conn, INITIAL_SCHEMA_UP)
    }

    /// Executes the initial reverse script without version bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Migration`] when any statement fails.
    pub fn revert_initial_script(conn: &mut SqliteConnection) -> StoreResult<()> {
        run_script(conn, INITIAL_SCHEMA_DOWN)
    }
}

fn run_script(conn: &mut SqliteConnection, script: &str) -> StoreResult<()> {
    conn.transaction::<(), diesel::result::Error, _>(|tx| tx.batch_execute(script))
        .map_err(|err| StoreError::Migration(Arc::new(err)))
}
