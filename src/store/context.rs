//! Explicit store handle wrapping the SQLite connection pool.

use super::{MigrationStatus, SchemaMigrator, StoreError, StoreResult};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;
use tracing::info;

/// SQLite connection pool type shared by all repositories.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Connection checked out of a [`SqlitePool`].
pub type PooledSqlite = PooledConnection<ConnectionManager<SqliteConnection>>;

const MEMORY_TARGET: &str = ":memory:";
const BUSY_TIMEOUT_MS: u32 = 5_000;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Applies per-connection pragmas every time the pool hands out a connection.
///
/// SQLite only honours `ON DELETE` actions when `foreign_keys` is enabled on
/// the connection that performs the delete.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Handle to the relational store.
///
/// Constructed once at startup and cloned into every repository. Cloning is
/// cheap: the pool is reference counted.
#[derive(Debug, Clone)]
pub struct StoreContext {
    pool: SqlitePool,
    target: String,
}

impl StoreContext {
    /// Connects to the store addressed by `database_url`.
    ///
    /// In-memory targets are pinned to a single long-lived connection so that
    /// every checkout observes the same database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDatabaseUrl`] when the URL cannot be
    /// mapped to a SQLite target, or [`StoreError::Connection`] when the pool
    /// cannot open its initial connections.
    pub fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let target = sqlite_target(database_url)?;
        let manager = ConnectionManager::<SqliteConnection>::new(target.clone());
        let base = Pool::builder()
            .connection_timeout(CHECKOUT_TIMEOUT)
            .connection_customizer(Box::new(SqlitePragmas));
        let builder = if target == MEMORY_TARGET {
            base.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            base.max_size(max_connections.max(1))
        };
        let pool = builder.build(manager).map_err(StoreError::connection)?;

        info!(database = %target, max_connections, "store connected");
        Ok(Self { pool, target })
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the SQLite target the pool opens.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Checks out a pooled connection with foreign keys enforced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] when no connection becomes
    /// available within the checkout timeout.
    pub fn connection(&self) -> StoreResult<PooledSqlite> {
        self.pool.get().map_err(StoreError::connection)
    }

    /// Applies all pending migrations on a blocking worker.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a connection cannot be obtained or a
    /// migration step fails.
    pub async fn upgrade(&self) -> StoreResult<Vec<String>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.connection()?;
            SchemaMigrator::upgrade(&mut conn)
        })
        .await?
    }

    /// Reverts every applied migration on a blocking worker.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a connection cannot be obtained or a
    /// revert step fails.
    pub async fn downgrade(&self) -> StoreResult<Vec<String>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.connection()?;
            SchemaMigrator::downgrade(&mut conn)
        })
        .await?
    }

    /// Reports applied and pending migration versions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the bookkeeping table cannot be read.
    pub async fn migration_status(&self) -> StoreResult<MigrationStatus> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.connection()?;
            SchemaMigrator::status(&mut conn)
        })
        .await?
    }
}

/// Maps a configured database URL onto a Diesel SQLite target.
///
/// Accepts SQLAlchemy-style URLs (`sqlite:///relative.db`,
/// `sqlite:////absolute.db`, `sqlite://` and `sqlite:///:memory:`), SQLite
/// `file:` URIs, and plain filesystem paths.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDatabaseUrl`] for empty input, URLs naming a
/// network host, or any non-SQLite scheme.
pub fn sqlite_target(database_url: &str) -> StoreResult<String> {
    let trimmed = database_url.trim();
    let invalid = || StoreError::InvalidDatabaseUrl(database_url.to_owned());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Some(rest) = trimmed.strip_prefix("sqlite://") {
        if rest.is_empty() {
            return Ok(MEMORY_TARGET.to_owned());
        }
        let path = rest.strip_prefix('/').ok_or_else(invalid)?;
        if path.is_empty() {
            return Err(invalid());
        }
        return Ok(path.to_owned());
    }

    if trimmed.starts_with("file:") {
        return Ok(trimmed.to_owned());
    }

    if trimmed.contains("://") {
        return Err(invalid());
    }

    Ok(trimmed.to_owned())
}
