//! Step definitions for schema migration scenarios.

pub mod when;
pub mod world;
