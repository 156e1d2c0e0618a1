//! Identifier types and the identifier factory used by entity constructors.

use super::{HouseholdDomainError, error::bounded_text};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Source of identifiers for new rows.
///
/// Entity constructors call the factory exactly once per new row; values are
/// never cached or shared between rows.
pub trait IdFactory: Send + Sync {
    /// Produces a fresh identifier.
    fn next_uuid(&self) -> Uuid;
}

/// Production identifier factory producing random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdFactory for RandomIds {
    fn next_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Draws a new identifier from `ids`.
            #[must_use]
            pub fn generate(ids: &impl IdFactory) -> Self {
                Self(ids.next_uuid())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }

            /// Returns the 36-character storage form.
            #[must_use]
            pub fn to_storage(self) -> String {
                self.0.hyphenated().to_string()
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self)
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier! {
    /// Unique identifier for a user.
    UserId
}

uuid_identifier! {
    /// Unique identifier for a task.
    TaskId
}

uuid_identifier! {
    /// Unique identifier for a tag.
    TagId
}

uuid_identifier! {
    /// Unique identifier for a notification.
    NotificationId
}

/// Opaque key grouping notification preferences by household.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(String);

impl FamilyId {
    /// Maximum persisted length in characters.
    pub const MAX_LEN: usize = 64;

    /// Creates a validated family identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError::EmptyField`] when the value is blank or
    /// [`HouseholdDomainError::FieldTooLong`] when it exceeds 64 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, HouseholdDomainError> {
        bounded_text("family_id", value, Self::MAX_LEN).map(Self)
    }

    /// Wraps a stored key as-is.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FamilyId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
