//! Application services for household invariants the schema does not enforce.

mod task_graph;

pub use task_graph::{TaskGraphError, TaskGraphResult, TaskGraphService};
