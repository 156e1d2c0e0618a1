//! Users signed in through the external identity provider.

use super::{
    HouseholdDomainError, IdFactory, Timestamped, Timestamps, UserId, error::bounded_text,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const PROFILE_FIELD_MAX: usize = 255;

/// Validated identity and contact details for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    google_sub: String,
    email: String,
    name: String,
}

impl UserProfile {
    /// Validates profile fields against their column widths.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError::EmptyField`] or
    /// [`HouseholdDomainError::FieldTooLong`] for blank or oversized fields,
    /// and [`HouseholdDomainError::InvalidEmail`] when the email lacks a
    /// local part or a domain.
    pub fn new(
        google_sub: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, HouseholdDomainError> {
        Ok(Self {
            google_sub: bounded_text("google_sub", google_sub, PROFILE_FIELD_MAX)?,
            email: validate_email(email)?,
            name: bounded_text("name", name, PROFILE_FIELD_MAX)?,
        })
    }

    /// Reconstructs a profile from persisted storage without validation.
    #[must_use]
    pub const fn from_persisted(google_sub: String, email: String, name: String) -> Self {
        Self {
            google_sub,
            email,
            name,
        }
    }

    /// Returns the identity provider subject.
    #[must_use]
    pub fn google_sub(&self) -> &str {
        &self.google_sub
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_email(email: impl Into<String>) -> Result<String, HouseholdDomainError> {
    let value = bounded_text("email", email, PROFILE_FIELD_MAX)?;
    let plausible = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
        && !value.chars().any(char::is_whitespace);
    if !plausible {
        return Err(HouseholdDomainError::InvalidEmail(value));
    }
    Ok(value)
}

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    profile: UserProfile,
    timestamps: Timestamps,
}

impl User {
    /// Creates the user record for a first sign-in.
    #[must_use]
    pub fn register(profile: UserProfile, ids: &impl IdFactory, clock: &impl Clock) -> Self {
        Self {
            id: UserId::generate(ids),
            profile,
            timestamps: Timestamps::new(clock),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: UserId, profile: UserProfile, timestamps: Timestamps) -> Self {
        Self {
            id,
            profile,
            timestamps,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the validated profile.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Replaces the email address and display name.
    ///
    /// The identity provider subject never changes after registration.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdDomainError`] when the new values fail validation.
    pub fn update_profile(
        &mut self,
        email: impl Into<String>,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), HouseholdDomainError> {
        let validated_email = validate_email(email)?;
        let validated_name = bounded_text("name", name, PROFILE_FIELD_MAX)?;
        self.profile.email = validated_email;
        self.profile.name = validated_name;
        self.timestamps.touch(clock);
        Ok(())
    }
}

impl Timestamped for User {
    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
