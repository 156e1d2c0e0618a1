//! Repository ports for users, tasks, tags, calendar sync, and notifications.
//!
//! Implementations surface store constraint violations as typed errors and
//! rely on the store's own cascade and set-null rules when deleting rows.
//! None of them check parent-chain or blocking-graph acyclicity; callers that
//! need that guarantee go through
//! [`TaskGraphService`](crate::household::services::TaskGraphService).

use crate::household::domain::{
    CalendarSync, FamilyId, Notification, NotificationId, NotificationSetting, Tag, TagId,
    TagName, Task, TaskDependency, TaskId, User, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for household repository operations.
pub type HouseholdRepositoryResult<T> = Result<T, HouseholdRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a newly registered user.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::Duplicate`] when the identifier,
    /// identity provider subject, or email is already taken.
    async fn store(&self, user: &User) -> HouseholdRepositoryResult<()>;

    /// Persists profile changes.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::NotFound`] when the user does not
    /// exist, or [`HouseholdRepositoryError::Duplicate`] when the new email
    /// belongs to another user.
    async fn update(&self, user: &User) -> HouseholdRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> HouseholdRepositoryResult<Option<User>>;

    /// Finds a user by identity provider subject.
    async fn find_by_google_sub(&self, google_sub: &str)
    -> HouseholdRepositoryResult<Option<User>>;
}

/// Task and blocking-edge persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::MissingReference`] when the
    /// creator, assignee, or parent does not exist.
    async fn store(&self, task: &Task) -> HouseholdRepositoryResult<()>;

    /// Persists task changes.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> HouseholdRepositoryResult<()>;

    /// Deletes a task. Blocking edges, tag links, and calendar sync rows go
    /// with it; notifications about it lose their task reference.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::NotFound`] when the task does not
    /// exist, or [`HouseholdRepositoryError::InUse`] while subtasks still
    /// point at it.
    async fn delete(&self, id: TaskId) -> HouseholdRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> HouseholdRepositoryResult<Option<Task>>;

    /// Lists the direct subtasks of `parent`.
    async fn list_subtasks(&self, parent: TaskId) -> HouseholdRepositoryResult<Vec<Task>>;

    /// Lists tasks assigned to `assignee`.
    async fn list_by_assignee(&self, assignee: UserId) -> HouseholdRepositoryResult<Vec<Task>>;

    /// Records a blocking edge.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::Duplicate`] when the edge already
    /// exists, or [`HouseholdRepositoryError::MissingReference`] when either
    /// task does not exist.
    async fn add_dependency(&self, dependency: TaskDependency) -> HouseholdRepositoryResult<()>;

    /// Removes a blocking edge. Returns whether an edge was removed.
    async fn remove_dependency(&self, dependency: TaskDependency)
    -> HouseholdRepositoryResult<bool>;

    /// Lists the tasks directly blocking `task`.
    async fn list_blockers(&self, task: TaskId) -> HouseholdRepositoryResult<Vec<TaskId>>;
}

/// Tag persistence contract.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Stores a new tag.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::DuplicateTag`] when the creator
    /// already owns a tag with the same name.
    async fn store(&self, tag: &Tag) -> HouseholdRepositoryResult<()>;

    /// Persists a renamed tag.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::NotFound`] when the tag does not
    /// exist, or [`HouseholdRepositoryError::DuplicateTag`] when the creator
    /// already owns another tag with the new name.
    async fn update(&self, tag: &Tag) -> HouseholdRepositoryResult<()>;

    /// Finds a tag by identifier.
    async fn find_by_id(&self, id: TagId) -> HouseholdRepositoryResult<Option<Tag>>;

    /// Finds a tag by name inside `created_by`'s namespace.
    async fn find_by_name(
        &self,
        created_by: UserId,
        name: &TagName,
    ) -> HouseholdRepositoryResult<Option<Tag>>;

    /// Deletes a tag and every task link using it.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::NotFound`] when the tag does not
    /// exist.
    async fn delete(&self, id: TagId) -> HouseholdRepositoryResult<()>;

    /// Links a tag to a task.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::Duplicate`] when the link exists,
    /// or [`HouseholdRepositoryError::MissingReference`] when either side
    /// does not exist.
    async fn attach(&self, task: TaskId, tag: TagId) -> HouseholdRepositoryResult<()>;

    /// Unlinks a tag from a task. Returns whether a link was removed.
    async fn detach(&self, task: TaskId, tag: TagId) -> HouseholdRepositoryResult<bool>;

    /// Lists tags linked to `task`, ordered by name.
    async fn tags_for_task(&self, task: TaskId) -> HouseholdRepositoryResult<Vec<Tag>>;
}

/// Calendar synchronisation persistence contract.
#[async_trait]
pub trait CalendarSyncRepository: Send + Sync {
    /// Inserts or replaces the record for its `(task, user)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::MissingReference`] when the task
    /// or user does not exist.
    async fn upsert(&self, record: &CalendarSync) -> HouseholdRepositoryResult<()>;

    /// Finds the record for a `(task, user)` pair.
    async fn find(
        &self,
        task: TaskId,
        user: UserId,
    ) -> HouseholdRepositoryResult<Option<CalendarSync>>;
}

/// Notification persistence contract.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores a scheduled notification.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::MissingReference`] when the user
    /// or task does not exist.
    async fn store(&self, notification: &Notification) -> HouseholdRepositoryResult<()>;

    /// Persists delivery state changes.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdRepositoryError::NotFound`] when the notification
    /// does not exist.
    async fn update(&self, notification: &Notification) -> HouseholdRepositoryResult<()>;

    /// Finds a notification by identifier.
    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> HouseholdRepositoryResult<Option<Notification>>;

    /// Lists pending notifications scheduled at or before `before`, earliest
    /// first.
    async fn list_due(&self, before: DateTime<Utc>)
    -> HouseholdRepositoryResult<Vec<Notification>>;
}

/// Notification settings persistence contract.
#[async_trait]
pub trait NotificationSettingRepository: Send + Sync {
    /// Inserts or replaces the settings for their family.
    async fn upsert(&self, setting: &NotificationSetting) -> HouseholdRepositoryResult<()>;

    /// Finds the settings for `family`.
    async fn find(&self, family: &FamilyId)
    -> HouseholdRepositoryResult<Option<NotificationSetting>>;
}

/// Errors returned by household repository implementations.
#[derive(Debug, Clone, Error)]
pub enum HouseholdRepositoryError {
    /// A unique or primary key already holds the value.
    #[error("duplicate {entity}: {detail}")]
    Duplicate {
        /// Entity whose key collided.
        entity: &'static str,
        /// Store-reported detail naming the colliding columns.
        detail: String,
    },

    /// The creator already owns a tag with this name.
    #[error("tag '{name}' already exists for user {created_by}")]
    DuplicateTag {
        /// Colliding tag name.
        name: TagName,
        /// Owner of the existing tag.
        created_by: UserId,
    },

    /// The addressed row does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity that was looked up.
        entity: &'static str,
        /// Key that was looked up.
        key: String,
    },

    /// A referenced row does not exist.
    #[error("{entity} references a missing row: {detail}")]
    MissingReference {
        /// Entity holding the dangling reference.
        entity: &'static str,
        /// Store-reported detail.
        detail: String,
    },

    /// Other rows still reference the row without a cascading rule.
    #[error("{entity} {key} is still referenced")]
    InUse {
        /// Entity that could not be removed.
        entity: &'static str,
        /// Key of the referenced row.
        key: String,
    },

    /// Any other constraint (not-null, check) rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl HouseholdRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a [`Self::NotFound`] for `entity` keyed by `key`.
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}
