//! Domain model for household task management.
//!
//! Entities validate their own fields, draw identifiers from an injected
//! [`IdFactory`], and stamp creation and update times from an injected
//! clock. Persistence and graph-wide invariants live outside this module.

mod calendar_sync;
mod error;
mod ids;
mod notification;
mod settings;
mod tag;
mod task;
mod timestamps;
mod user;

pub use calendar_sync::{CalendarSync, SyncStatus};
pub use error::{HouseholdDomainError, ParseCodeError};
pub use ids::{FamilyId, IdFactory, NotificationId, RandomIds, TagId, TaskId, UserId};
pub use notification::{Classifier, DeliveryStatus, Notification, PersistedNotificationData};
pub use settings::{DigestTime, NotificationSetting};
pub use tag::{Tag, TagName};
pub use task::{NewTask, PersistedTaskData, Task, TaskDependency, TaskPriority, TaskStatus};
pub use timestamps::{Timestamped, Timestamps};
pub use user::{User, UserProfile};
