//! Household task management.
//!
//! Users own tasks, tags, calendar synchronisation records and scheduled
//! notifications; families share reminder settings. The module follows the
//! hexagonal layout used across the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - SQLite implementations in [`adapters`]
//! - Graph invariants the schema leaves to the application in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
