//! Acyclicity guard for task parent chains and blocking graphs.
//!
//! The store accepts any parent reference and any blocking edge between
//! existing tasks. Callers that need acyclic graphs route changes through
//! [`TaskGraphService`], which walks the persisted graph before writing.
//!
//! Clones of a service share one write lock, held from the graph walk until
//! the write lands, so concurrent changes through the same service cannot
//! both pass the check. Writers that bypass the service are not covered.

use crate::household::{
    domain::{HouseholdDomainError, Task, TaskDependency, TaskId},
    ports::{HouseholdRepositoryError, TaskRepository},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Service-level errors for task graph changes.
#[derive(Debug, Error)]
pub enum TaskGraphError {
    /// Domain validation failed, including cycle detection.
    #[error(transparent)]
    Domain(#[from] HouseholdDomainError),
    /// A task named in the change does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] HouseholdRepositoryError),
}

/// Result type for task graph operations.
pub type TaskGraphResult<T> = Result<T, TaskGraphError>;

/// Applies parent and blocking changes while keeping both graphs acyclic.
pub struct TaskGraphService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    writes: Arc<Mutex<()>>,
}

impl<R, C> Clone for TaskGraphService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            writes: Arc::clone(&self.writes),
        }
    }
}

impl<R, C> TaskGraphService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task graph service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Moves `task_id` under `parent`, or detaches it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphError::Domain`] with
    /// [`HouseholdDomainError::SelfParent`] or
    /// [`HouseholdDomainError::CycleDetected`] when `task_id` would become
    /// its own ancestor, [`TaskGraphError::TaskNotFound`] when either task
    /// is missing, and [`TaskGraphError::Repository`] when persistence
    /// fails.
    pub async fn set_parent(
        &self,
        task_id: TaskId,
        parent: Option<TaskId>,
    ) -> TaskGraphResult<Task> {
        let _guard = self.writes.lock().await;
        let mut task = self.load(task_id).await?;
        task.set_parent(parent, &*self.clock)?;
        if let Some(parent_id) = parent {
            self.ensure_not_ancestor(task_id, parent_id).await?;
        }
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Records that `task_id` is blocked by `blocked_by`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphError::Domain`] with
    /// [`HouseholdDomainError::SelfDependency`] or
    /// [`HouseholdDomainError::CycleDetected`] when the edge would make a
    /// task transitively block itself, and [`TaskGraphError::Repository`]
    /// when persistence fails.
    pub async fn add_dependency(
        &self,
        task_id: TaskId,
        blocked_by: TaskId,
    ) -> TaskGraphResult<TaskDependency> {
        let dependency = TaskDependency::new(task_id, blocked_by)?;
        let _guard = self.writes.lock().await;
        self.ensure_not_blocker(task_id, blocked_by).await?;
        self.repository.add_dependency(dependency).await?;
        Ok(dependency)
    }

    async fn load(&self, id: TaskId) -> TaskGraphResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskGraphError::TaskNotFound(id))
    }

    /// Walks the parent chain upward from `parent_id` looking for `task_id`.
    async fn ensure_not_ancestor(&self, task_id: TaskId, parent_id: TaskId) -> TaskGraphResult<()> {
        let mut visited = HashSet::new();
        let mut cursor = Some(parent_id);
        while let Some(current) = cursor {
            if current == task_id {
                debug!(task = %task_id, parent = %parent_id, "parent change rejected");
                return Err(cycle(task_id, parent_id));
            }
            if !visited.insert(current) {
                break;
            }
            cursor = self.load(current).await?.parent_task_id();
        }
        Ok(())
    }

    /// Searches everything transitively blocking `blocked_by` for `task_id`.
    async fn ensure_not_blocker(&self, task_id: TaskId, blocked_by: TaskId) -> TaskGraphResult<()> {
        let mut visited = HashSet::from([blocked_by]);
        let mut frontier = vec![blocked_by];
        while let Some(current) = frontier.pop() {
            for blocker in self.repository.list_blockers(current).await? {
                if blocker == task_id {
                    debug!(task = %task_id, blocked_by = %blocked_by, "dependency rejected");
                    return Err(cycle(task_id, blocked_by));
                }
                if visited.insert(blocker) {
                    frontier.push(blocker);
                }
            }
        }
        Ok(())
    }
}

const fn cycle(task: TaskId, related: TaskId) -> TaskGraphError {
    TaskGraphError::Domain(HouseholdDomainError::CycleDetected { task, related })
}
