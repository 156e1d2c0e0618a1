//! Mapping of SQLite constraint failures onto repository errors.

use crate::household::ports::HouseholdRepositoryError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Classifies a Diesel error raised while writing `entity`.
pub(super) fn classify(entity: &'static str, err: DieselError) -> HouseholdRepositoryError {
    match err {
        DieselError::DatabaseError(kind, info) => {
            let detail = info.message().to_owned();
            match kind {
                DatabaseErrorKind::UniqueViolation => {
                    HouseholdRepositoryError::Duplicate { entity, detail }
                }
                DatabaseErrorKind::ForeignKeyViolation => {
                    HouseholdRepositoryError::MissingReference { entity, detail }
                }
                DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation => {
                    HouseholdRepositoryError::Constraint(detail)
                }
                _ => HouseholdRepositoryError::persistence(DieselError::DatabaseError(kind, info)),
            }
        }
        other => HouseholdRepositoryError::persistence(other),
    }
}

/// Classifies a Diesel error raised while deleting `entity` keyed by `key`.
///
/// A foreign-key failure on delete means a row without a cascading rule
/// still points at the target.
pub(super) fn classify_delete(
    entity: &'static str,
    key: &str,
    err: DieselError,
) -> HouseholdRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            HouseholdRepositoryError::InUse {
                entity,
                key: key.to_owned(),
            }
        }
        other => classify(entity, other),
    }
}

/// Returns whether a unique violation came from the per-creator tag
/// namespace constraint.
///
/// SQLite reports the colliding columns rather than the constraint name,
/// e.g. `UNIQUE constraint failed: tags.name, tags.created_by`.
pub(super) fn is_tag_namespace_violation(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> bool {
    let message = info.message();
    info.constraint_name() == Some("uq_tags_name_created_by")
        || (message.contains("tags.name") && message.contains("tags.created_by"))
}
