//! Family task backend: persistence and HTTP plumbing for a household task
//! manager.
//!
//! The crate owns the relational schema for users, tasks, tags, blocking
//! dependencies, calendar synchronisation records, notifications and
//! per-family notification settings, together with the reversible
//! migration that creates it.
//!
//! # Architecture
//!
//! The household feature follows hexagonal architecture principles:
//!
//! - **Domain**: validated entities with injected clocks and identifier
//!   factories
//! - **Ports**: async repository traits
//! - **Adapters**: Diesel repositories over SQLite
//!
//! # Modules
//!
//! - [`store`]: connection context, schema, migrations and catalog queries
//! - [`household`]: domain model, repositories and graph invariants
//! - [`http`]: health check and API root
//! - [`config`]: runtime settings
//! - [`telemetry`]: tracing bootstrap

pub mod config;
pub mod household;
pub mod http;
pub mod store;
pub mod telemetry;
