//! Tags scoped to the user who created them.

use super::{
    HouseholdDomainError, IdFactory, TagId, Timestamped, Timestamps, UserId, error::bounded_text,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag label, unique within its creator's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    /// Maximum persisted length in characters.
    pub const MAX_LEN: usize = 64;

    /// Creates a validated tag name.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError`] when the name is blank or longer than
    /// 64 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, HouseholdDomainError> {
        bounded_text("tag name", value, Self::MAX_LEN).map(Self)
    }

    /// Wraps a stored name as-is, without trimming or width checks.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-owned tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: TagName,
    created_by: UserId,
    timestamps: Timestamps,
}

impl Tag {
    /// Creates a tag in `created_by`'s namespace.
    #[must_use]
    pub fn new(
        name: TagName,
        created_by: UserId,
        ids: &impl IdFactory,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: TagId::generate(ids),
            name,
            created_by,
            timestamps: Timestamps::new(clock),
        }
    }

    /// Reconstructs a tag from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: TagId,
        name: TagName,
        created_by: UserId,
        timestamps: Timestamps,
    ) -> Self {
        Self {
            id,
            name,
            created_by,
            timestamps,
        }
    }

    /// Returns the tag identifier.
    #[must_use]
    pub const fn id(&self) -> TagId {
        self.id
    }

    /// Returns the tag name.
    #[must_use]
    pub const fn name(&self) -> &TagName {
        &self.name
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Renames the tag within its owner's namespace.
    pub fn rename(&mut self, name: TagName, clock: &impl Clock) {
        self.name = name;
        self.timestamps.touch(clock);
    }
}

impl Timestamped for Tag {
    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
