//! Per-family reminder preferences.

use super::{FamilyId, HouseholdDomainError, Timestamped, Timestamps};
use chrono::NaiveTime;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time of day, `HH:MM` in 24-hour form, at which the overdue digest is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestTime(String);

impl DigestTime {
    /// Creates a validated digest time.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError::InvalidDigestTime`] unless the value
    /// is exactly five characters of the form `HH:MM`.
    pub fn new(value: impl Into<String>) -> Result<Self, HouseholdDomainError> {
        let raw = value.into();
        let candidate = raw.trim();
        if candidate.len() != 5 || NaiveTime::parse_from_str(candidate, "%H:%M").is_err() {
            return Err(HouseholdDomainError::InvalidDigestTime(raw));
        }
        Ok(Self(candidate.to_owned()))
    }

    /// Wraps a stored digest time as-is.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the time as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DigestTime {
    fn default() -> Self {
        Self("09:00".to_owned())
    }
}

impl fmt::Display for DigestTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reminder preferences shared by every member of a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSetting {
    family_id: FamilyId,
    remind_days_before: u32,
    remind_on_due_day: bool,
    overdue_digest_time: DigestTime,
    timestamps: Timestamps,
}

impl NotificationSetting {
    /// Default reminder lead time in days.
    pub const DEFAULT_REMIND_DAYS_BEFORE: u32 = 1;

    /// Creates settings with the stock defaults: one day of lead time, a
    /// reminder on the due day, and a 09:00 digest.
    #[must_use]
    pub fn with_defaults(family_id: FamilyId, clock: &impl Clock) -> Self {
        Self {
            family_id,
            remind_days_before: Self::DEFAULT_REMIND_DAYS_BEFORE,
            remind_on_due_day: true,
            overdue_digest_time: DigestTime::default(),
            timestamps: Timestamps::new(clock),
        }
    }

    /// Reconstructs settings from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        family_id: FamilyId,
        remind_days_before: u32,
        remind_on_due_day: bool,
        overdue_digest_time: DigestTime,
        timestamps: Timestamps,
    ) -> Self {
        Self {
            family_id,
            remind_days_before,
            remind_on_due_day,
            overdue_digest_time,
            timestamps,
        }
    }

    /// Returns the family key.
    #[must_use]
    pub const fn family_id(&self) -> &FamilyId {
        &self.family_id
    }

    /// Returns the reminder lead time in days.
    #[must_use]
    pub const fn remind_days_before(&self) -> u32 {
        self.remind_days_before
    }

    /// Returns whether a reminder is sent on the due date itself.
    #[must_use]
    pub const fn remind_on_due_day(&self) -> bool {
        self.remind_on_due_day
    }

    /// Returns the digest time.
    #[must_use]
    pub const fn overdue_digest_time(&self) -> &DigestTime {
        &self.overdue_digest_time
    }

    /// Changes the reminder lead time.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError::ReminderLeadOutOfRange`] when `days`
    /// does not fit the persisted signed 32-bit column.
    pub fn set_remind_days_before(
        &mut self,
        days: u32,
        clock: &impl Clock,
    ) -> Result<(), HouseholdDomainError> {
        if i32::try_from(days).is_err() {
            return Err(HouseholdDomainError::ReminderLeadOutOfRange(days));
        }
        self.remind_days_before = days;
        self.timestamps.touch(clock);
        Ok(())
    }

    /// Toggles the due-day reminder.
    pub fn set_remind_on_due_day(&mut self, enabled: bool, clock: &impl Clock) {
        self.remind_on_due_day = enabled;
        self.timestamps.touch(clock);
    }

    /// Changes the digest time.
    pub fn set_overdue_digest_time(&mut self, time: DigestTime, clock: &impl Clock) {
        self.overdue_digest_time = time;
        self.timestamps.touch(clock);
    }
}

impl Timestamped for NotificationSetting {
    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
