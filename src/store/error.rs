//! Error types for store connection, migration, and catalog queries.

use std::sync::Arc;
use thiserror::Error;

/// Boxed error produced by Diesel's migration harness.
type HarnessError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while connecting to, migrating, or inspecting the store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The configured connection string cannot address a SQLite database.
    #[error("invalid database url '{0}'")]
    InvalidDatabaseUrl(String),

    /// The store could not be reached or a pooled connection could not be
    /// checked out.
    #[error("store connection failed: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// A migration step failed; the enclosing transaction was rolled back.
    #[error("schema migration failed: {0}")]
    Migration(Arc<dyn std::error::Error + Send + Sync>),

    /// A catalog or bookkeeping query failed.
    #[error("store query failed: {0}")]
    Query(Arc<diesel::result::Error>),

    /// The blocking task running store work did not complete.
    #[error("blocking store task failed: {0}")]
    Blocking(Arc<tokio::task::JoinError>),
}

impl StoreError {
    /// Wraps a connection or pool error.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps an error reported by the migration harness.
    #[must_use]
    pub fn migration(err: HarnessError) -> Self {
        Self::Migration(Arc::from(err))
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Query(Arc::new(err))
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Blocking(Arc::new(err))
    }
}
