//! Relational store plumbing for the household schema.
//!
//! The store is a SQLite database reached through a pooled Diesel
//! connection. A [`StoreContext`] is constructed once at startup and passed
//! explicitly to every repository; there is no process-wide connection
//! state.
//!
//! - `schema`: Diesel table definitions mirroring the migrated layout
//! - [`migrations`]: forward and reverse schema procedures
//! - [`inspect`]: catalog queries used to verify the migrated shape

mod context;
mod error;
pub mod inspect;
pub mod migrations;
pub(crate) mod schema;

pub use context::{PooledSqlite, SqlitePool, StoreContext, sqlite_target};
pub use error::{StoreError, StoreResult};
pub use migrations::{MigrationStatus, REQUIRED_TABLES, SchemaMigrator};
