//! Creation and update timestamps shared by timestamped entities.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Creation and last-update instants embedded in every timestamped entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Stamps a new row with the current clock time.
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        let now = clock.utc();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Restores timestamps read back from storage.
    #[must_use]
    pub const fn from_persisted(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves `updated_at` to the current clock time.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Entities carrying [`Timestamps`].
pub trait Timestamped {
    /// Returns the embedded timestamps.
    fn timestamps(&self) -> &Timestamps;

    /// Returns the creation timestamp.
    fn created_at(&self) -> DateTime<Utc> {
        self.timestamps().created_at()
    }

    /// Returns the last update timestamp.
    fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps().updated_at()
    }
}
