//! SQLite repository for users.

use super::{
    blocking::run_blocking,
    errors::classify,
    models::{NewUserRow, UserRow},
};
use crate::household::{
    domain::{Timestamped, Timestamps, User, UserId, UserProfile},
    ports::{HouseholdRepositoryError, HouseholdRepositoryResult, UserRepository},
};
use crate::store::{StoreContext, schema::users};
use async_trait::async_trait;
use diesel::prelude::*;
use std::str::FromStr;

const ENTITY: &str = "user";

/// SQLite-backed user repository.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    store: StoreContext,
}

impl SqliteUserRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: StoreContext) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn store(&self, user: &User) -> HouseholdRepositoryResult<()> {
        let new_row = to_new_row(user);
        run_blocking(&self.store, move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> HouseholdRepositoryResult<()> {
        let user_id = user.id();
        let email = user.profile().email().to_owned();
        let name = user.profile().name().to_owned();
        let updated_at = user.updated_at();

        run_blocking(&self.store, move |connection| {
            let updated_count = diesel::update(users::table.find(user_id.to_storage()))
                .set((
                    users::email.eq(&email),
                    users::name.eq(&name),
                    users::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            if updated_count == 0 {
                return Err(HouseholdRepositoryError::not_found(ENTITY, user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> HouseholdRepositoryResult<Option<User>> {
        run_blocking(&self.store, move |connection| {
            let row = users::table
                .find(id.to_storage())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_google_sub(
        &self,
        google_sub: &str,
    ) -> HouseholdRepositoryResult<Option<User>> {
        let subject = google_sub.to_owned();
        run_blocking(&self.store, move |connection| {
            let row = users::table
                .filter(users::google_sub.eq(&subject))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }
}

fn to_new_row(user: &User) -> NewUserRow {
    let profile = user.profile();
    NewUserRow {
        id: user.id().to_storage(),
        google_sub: profile.google_sub().to_owned(),
        email: profile.email().to_owned(),
        name: profile.name().to_owned(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> HouseholdRepositoryResult<User> {
    let UserRow {
        id,
        google_sub,
        email,
        name,
        created_at,
        updated_at,
    } = row;

    let user_id = UserId::from_str(&id).map_err(HouseholdRepositoryError::persistence)?;
    Ok(User::from_persisted(
        user_id,
        UserProfile::from_persisted(google_sub, email, name),
        Timestamps::from_persisted(created_at, updated_at),
    ))
}
