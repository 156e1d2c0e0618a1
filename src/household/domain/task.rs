//! Task aggregate, its enumerated codes, and blocking edges.

use super::{
    HouseholdDomainError, IdFactory, ParseCodeError, TaskId, Timestamped, Timestamps, UserId,
    error::bounded_text,
};
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const TASK_NAME_MAX: usize = 255;

/// Task priority, stored as a two-character code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Drop everything.
    P0,
    /// High.
    P1,
    /// Normal.
    #[default]
    P2,
    /// Low.
    P3,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "P0" => Ok(Self::P0),
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            "P3" => Ok(Self::P3),
            _ => Err(ParseCodeError::new("task priority", value)),
        }
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseCodeError::new("task status", value)),
        }
    }
}

/// Parameters for creating a task.
///
/// Priority and status fall back to [`TaskPriority::P2`] and
/// [`TaskStatus::Todo`] when left unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    name: String,
    created_by: UserId,
    description: Option<String>,
    deadline_date: Option<NaiveDate>,
    priority: Option<TaskPriority>,
    status: Option<TaskStatus>,
    assignee_id: Option<UserId>,
    parent_task_id: Option<TaskId>,
}

impl NewTask {
    /// Starts a task draft with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            name: name.into(),
            created_by,
            description: None,
            deadline_date: None,
            priority: None,
            status: None,
            assignee_id: None,
            parent_task_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_deadline(mut self, deadline_date: NaiveDate) -> Self {
        self.deadline_date = Some(deadline_date);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Makes the task a subtask of `parent_task_id`.
    #[must_use]
    pub const fn with_parent(mut self, parent_task_id: TaskId) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted due date.
    pub deadline_date: Option<NaiveDate>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted assignee.
    pub assignee_id: Option<UserId>,
    /// Persisted parent task.
    pub parent_task_id: Option<TaskId>,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted timestamps.
    pub timestamps: Timestamps,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    description: Option<String>,
    deadline_date: Option<NaiveDate>,
    priority: TaskPriority,
    status: TaskStatus,
    assignee_id: Option<UserId>,
    parent_task_id: Option<TaskId>,
    created_by: UserId,
    timestamps: Timestamps,
}

impl Task {
    /// Creates a task from a draft.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError`] when the name is blank or longer than
    /// 255 characters.
    pub fn create(
        draft: NewTask,
        ids: &impl IdFactory,
        clock: &impl Clock,
    ) -> Result<Self, HouseholdDomainError> {
        let NewTask {
            name,
            created_by,
            description,
            deadline_date,
            priority,
            status,
            assignee_id,
            parent_task_id,
        } = draft;

        Ok(Self {
            id: TaskId::generate(ids),
            name: bounded_text("task name", name, TASK_NAME_MAX)?,
            description,
            deadline_date,
            priority: priority.unwrap_or_default(),
            status: status.unwrap_or_default(),
            assignee_id,
            parent_task_id,
            created_by,
            timestamps: Timestamps::new(clock),
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            deadline_date: data.deadline_date,
            priority: data.priority,
            status: data.status,
            assignee_id: data.assignee_id,
            parent_task_id: data.parent_task_id,
            created_by: data.created_by,
            timestamps: data.timestamps,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn deadline_date(&self) -> Option<NaiveDate> {
        self.deadline_date
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent_task_id(&self) -> Option<TaskId> {
        self.parent_task_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Renames the task.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError`] when the name fails validation.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), HouseholdDomainError> {
        self.name = bounded_text("task name", name, TASK_NAME_MAX)?;
        self.timestamps.touch(clock);
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.timestamps.touch(clock);
    }

    /// Replaces the due date.
    pub fn set_deadline(&mut self, deadline_date: Option<NaiveDate>, clock: &impl Clock) {
        self.deadline_date = deadline_date;
        self.timestamps.touch(clock);
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: TaskPriority, clock: &impl Clock) {
        self.priority = priority;
        self.timestamps.touch(clock);
    }

    /// Replaces the status.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.timestamps.touch(clock);
    }

    /// Assigns the task, or clears the assignee with `None`.
    pub fn assign(&mut self, assignee_id: Option<UserId>, clock: &impl Clock) {
        self.assignee_id = assignee_id;
        self.timestamps.touch(clock);
    }

    /// Moves the task under `parent_task_id`, or detaches it with `None`.
    ///
    /// Only the direct self-reference is rejected here; longer parent cycles
    /// are checked by the task graph service.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError::SelfParent`] when the task would
    /// become its own parent.
    pub fn set_parent(
        &mut self,
        parent_task_id: Option<TaskId>,
        clock: &impl Clock,
    ) -> Result<(), HouseholdDomainError> {
        if parent_task_id == Some(self.id) {
            return Err(HouseholdDomainError::SelfParent(self.id));
        }
        self.parent_task_id = parent_task_id;
        self.timestamps.touch(clock);
        Ok(())
    }
}

impl Timestamped for Task {
    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

/// Edge recording that `task_id` is blocked by `blocked_by_task_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDependency {
    task_id: TaskId,
    blocked_by_task_id: TaskId,
}

impl TaskDependency {
    /// Creates a blocking edge.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError::SelfDependency`] when both ends are
    /// the same task.
    pub fn new(task_id: TaskId, blocked_by_task_id: TaskId) -> Result<Self, HouseholdDomainError> {
        if task_id == blocked_by_task_id {
            return Err(HouseholdDomainError::SelfDependency(task_id));
        }
        Ok(Self {
            task_id,
            blocked_by_task_id,
        })
    }

    /// Returns the blocked task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the blocking task.
    #[must_use]
    pub const fn blocked_by_task_id(&self) -> TaskId {
        self.blocked_by_task_id
    }
}
