//! Port contracts for household persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by household
//! services and by the HTTP layer's future handlers.

pub mod repository;

pub use repository::{
    CalendarSyncRepository, HouseholdRepositoryError, HouseholdRepositoryResult,
    NotificationRepository, NotificationSettingRepository, TagRepository, TaskRepository,
    UserRepository,
};
