//! Scheduled user notifications and their delivery state.

use super::{
    HouseholdDomainError, IdFactory, NotificationId, ParseCodeError, TaskId, Timestamped,
    Timestamps, UserId, error::bounded_text,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form, lower-cased classifier used for notification type and channel.
///
/// Known values include `reminder` and `overdue_digest` for the type, and
/// `email` and `push` for the channel; other values are stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classifier(String);

impl Classifier {
    /// Maximum persisted length in characters.
    pub const MAX_LEN: usize = 32;

    /// Creates a validated classifier.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError`] when the value is blank or longer
    /// than 32 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, HouseholdDomainError> {
        bounded_text("classifier", value, Self::MAX_LEN).map(|text| Self(text.to_lowercase()))
    }

    /// Wraps a stored classifier as-is, keeping its case.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the classifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery state of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Awaiting dispatch.
    #[default]
    Pending,
    /// Handed to the channel.
    Sent,
    /// Dispatch failed.
    Failed,
}

impl DeliveryStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DeliveryStatus {
    type Error = ParseCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseCodeError::new("delivery status", value)),
        }
    }
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted identifier.
    pub id: NotificationId,
    /// Persisted recipient.
    pub user_id: UserId,
    /// Persisted subject task; `None` once the task has been deleted.
    pub task_id: Option<TaskId>,
    /// Persisted type classifier.
    pub kind: Classifier,
    /// Persisted channel classifier.
    pub channel: Classifier,
    /// Persisted dispatch time.
    pub scheduled_for: DateTime<Utc>,
    /// Persisted delivery time.
    pub sent_at: Option<DateTime<Utc>>,
    /// Persisted delivery status.
    pub delivery_status: DeliveryStatus,
    /// Persisted failure message.
    pub error: Option<String>,
    /// Persisted timestamps.
    pub timestamps: Timestamps,
}

/// A message scheduled for a user, optionally about a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    user_id: UserId,
    task_id: Option<TaskId>,
    kind: Classifier,
    channel: Classifier,
    scheduled_for: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
    delivery_status: DeliveryStatus,
    error: Option<String>,
    timestamps: Timestamps,
}

impl Notification {
    /// Schedules a pending notification.
    #[must_use]
    pub fn schedule(
        user_id: UserId,
        task_id: Option<TaskId>,
        kind: Classifier,
        channel: Classifier,
        scheduled_for: DateTime<Utc>,
        ids: &impl IdFactory,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: NotificationId::generate(ids),
            user_id,
            task_id,
            kind,
            channel,
            scheduled_for,
            sent_at: None,
            delivery_status: DeliveryStatus::Pending,
            error: None,
            timestamps: Timestamps::new(clock),
        }
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            task_id: data.task_id,
            kind: data.kind,
            channel: data.channel,
            scheduled_for: data.scheduled_for,
            sent_at: data.sent_at,
            delivery_status: data.delivery_status,
            error: data.error,
            timestamps: data.timestamps,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the subject task, if it still exists.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the type classifier.
    #[must_use]
    pub const fn kind(&self) -> &Classifier {
        &self.kind
    }

    /// Returns the channel classifier.
    #[must_use]
    pub const fn channel(&self) -> &Classifier {
        &self.channel
    }

    /// Returns the dispatch time.
    #[must_use]
    pub const fn scheduled_for(&self) -> DateTime<Utc> {
        self.scheduled_for
    }

    /// Returns the delivery time, if delivered.
    #[must_use]
    pub const fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    /// Returns the delivery status.
    #[must_use]
    pub const fn delivery_status(&self) -> DeliveryStatus {
        self.delivery_status
    }

    /// Returns the last failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Records a successful delivery.
    pub fn mark_sent(&mut self, clock: &impl Clock) {
        let now = clock.utc();
        self.sent_at = Some(now);
        self.delivery_status = DeliveryStatus::Sent;
        self.error = None;
        self.timestamps.touch(clock);
    }

    /// Records a failed delivery.
    pub fn mark_failed(&mut self, error: impl Into<String>, clock: &impl Clock) {
        self.delivery_status = DeliveryStatus::Failed;
        self.error = Some(error.into());
        self.timestamps.touch(clock);
    }
}

impl Timestamped for Notification {
    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
