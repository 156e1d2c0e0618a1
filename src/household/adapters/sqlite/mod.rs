//! SQLite adapters for household persistence.
//!
//! Every repository holds a [`StoreContext`](crate::store::StoreContext) and
//! runs its Diesel work on the blocking thread pool.

mod blocking;
mod calendar_sync;
mod errors;
mod models;
mod notification;
mod settings;
mod tag;
mod task;
mod user;

pub use calendar_sync::SqliteCalendarSyncRepository;
pub use notification::SqliteNotificationRepository;
pub use settings::SqliteNotificationSettingRepository;
pub use tag::SqliteTagRepository;
pub use task::SqliteTaskRepository;
pub use user::SqliteUserRepository;
