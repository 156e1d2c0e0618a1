//! Per-user external calendar synchronisation state for a task.

use super::{ParseCodeError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Synchronisation outcome for a task/user pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Not yet pushed to the external calendar.
    #[default]
    Pending,
    /// The external event matches the task.
    Synced,
    /// The last push failed.
    Failed,
}

impl SyncStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SyncStatus {
    type Error = ParseCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseCodeError::new("sync status", value)),
        }
    }
}

/// Calendar synchronisation record keyed by `(task_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSync {
    task_id: TaskId,
    user_id: UserId,
    google_event_id: Option<String>,
    last_synced_at: Option<DateTime<Utc>>,
    sync_status: SyncStatus,
    sync_error: Option<String>,
}

impl CalendarSync {
    /// Creates a pending record that has never been synchronised.
    #[must_use]
    pub const fn pending(task_id: TaskId, user_id: UserId) -> Self {
        Self {
            task_id,
            user_id,
            google_event_id: None,
            last_synced_at: None,
            sync_status: SyncStatus::Pending,
            sync_error: None,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        task_id: TaskId,
        user_id: UserId,
        google_event_id: Option<String>,
        last_synced_at: Option<DateTime<Utc>>,
        sync_status: SyncStatus,
        sync_error: Option<String>,
    ) -> Self {
        Self {
            task_id,
            user_id,
            google_event_id,
            last_synced_at,
            sync_status,
            sync_error,
        }
    }

    /// Returns the synchronised task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the calendar owner.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the external event identifier, if one was issued.
    #[must_use]
    pub fn google_event_id(&self) -> Option<&str> {
        self.google_event_id.as_deref()
    }

    /// Returns when the record last synchronised successfully.
    #[must_use]
    pub const fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// Returns the synchronisation status.
    #[must_use]
    pub const fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    /// Returns the last failure message, if any.
    #[must_use]
    pub fn sync_error(&self) -> Option<&str> {
        self.sync_error.as_deref()
    }

    /// Records a successful push and clears any previous failure.
    pub fn mark_synced(&mut self, google_event_id: impl Into<String>, clock: &impl Clock) {
        self.google_event_id = Some(google_event_id.into());
        self.last_synced_at = Some(clock.utc());
        self.sync_status = SyncStatus::Synced;
        self.sync_error = None;
    }

    /// Records a failed push. The last successful sync time is kept.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.sync_status = SyncStatus::Failed;
        self.sync_error = Some(error.into());
    }
}
