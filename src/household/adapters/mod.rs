//! Adapter implementations for household ports.

pub mod sqlite;
