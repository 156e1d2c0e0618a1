//! Blocking operation helpers for the SQLite repositories.
//!
//! Diesel connections are synchronous, so repository work is moved onto
//! [`tokio::task::spawn_blocking`] to keep async worker threads free.

use crate::household::ports::{HouseholdRepositoryError, HouseholdRepositoryResult};
use crate::store::StoreContext;
use diesel::sqlite::SqliteConnection;

/// Checks out a connection and runs `f` on a blocking worker.
pub(super) async fn run_blocking<F, T>(store: &StoreContext, f: F) -> HouseholdRepositoryResult<T>
where
    F: FnOnce(&mut SqliteConnection) -> HouseholdRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let context = store.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = context
            .connection()
            .map_err(HouseholdRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(HouseholdRepositoryError::persistence)?
}
