//! SQLite repository for tags and task/tag links.

use super::{
    blocking::run_blocking,
    errors::{classify, is_tag_namespace_violation},
    models::{NewTagRow, NewTaskTagRow, TagRow},
};
use crate::household::{
    domain::{Tag, TagId, TagName, TaskId, Timestamped, Timestamps, UserId},
    ports::{HouseholdRepositoryError, HouseholdRepositoryResult, TagRepository},
};
use crate::store::{
    StoreContext,
    schema::{tags, task_tags},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::str::FromStr;

const ENTITY: &str = "tag";
const LINK_ENTITY: &str = "task tag";

/// SQLite-backed tag repository.
#[derive(Debug, Clone)]
pub struct SqliteTagRepository {
    store: StoreContext,
}

impl SqliteTagRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: StoreContext) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TagRepository for SqliteTagRepository {
    async fn store(&self, tag: &Tag) -> HouseholdRepositoryResult<()> {
        let tag_name = tag.name().clone();
        let created_by = tag.created_by();
        let new_row = to_new_row(tag);

        run_blocking(&self.store, move |connection| {
            diesel::insert_into(tags::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| classify_tag_write(err, tag_name, created_by))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, tag: &Tag) -> HouseholdRepositoryResult<()> {
        let tag_id = tag.id();
        let tag_name = tag.name().clone();
        let created_by = tag.created_by();
        let updated_at = tag.updated_at();

        run_blocking(&self.store, move |connection| {
            let updated_count = diesel::update(tags::table.find(tag_id.to_storage()))
                .set((
                    tags::name.eq(tag_name.as_str()),
                    tags::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| classify_tag_write(err, tag_name, created_by))?;
            if updated_count == 0 {
                return Err(HouseholdRepositoryError::not_found(ENTITY, tag_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TagId) -> HouseholdRepositoryResult<Option<Tag>> {
        run_blocking(&self.store, move |connection| {
            let row = tags::table
                .find(id.to_storage())
                .select(TagRow::as_select())
                .first::<TagRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_tag).transpose()
        })
        .await
    }

    async fn find_by_name(
        &self,
        created_by: UserId,
        name: &TagName,
    ) -> HouseholdRepositoryResult<Option<Tag>> {
        let name_str = name.as_str().to_owned();
        run_blocking(&self.store, move |connection| {
            let row = tags::table
                .filter(tags::created_by.eq(created_by.to_storage()))
                .filter(tags::name.eq(&name_str))
                .select(TagRow::as_select())
                .first::<TagRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_tag).transpose()
        })
        .await
    }

    async fn delete(&self, id: TagId) -> HouseholdRepositoryResult<()> {
        run_blocking(&self.store, move |connection| {
            let deleted_count = diesel::delete(tags::table.find(id.to_storage()))
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            if deleted_count == 0 {
                return Err(HouseholdRepositoryError::not_found(ENTITY, id));
            }
            Ok(())
        })
        .await
    }

    async fn attach(&self, task: TaskId, tag: TagId) -> HouseholdRepositoryResult<()> {
        let new_row = NewTaskTagRow {
            task_id: task.to_storage(),
            tag_id: tag.to_storage(),
        };
        run_blocking(&self.store, move |connection| {
            diesel::insert_into(task_tags::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| classify(LINK_ENTITY, err))?;
            Ok(())
        })
        .await
    }

    async fn detach(&self, task: TaskId, tag: TagId) -> HouseholdRepositoryResult<bool> {
        run_blocking(&self.store, move |connection| {
            let deleted_count = diesel::delete(
                task_tags::table
                    .filter(task_tags::task_id.eq(task.to_storage()))
                    .filter(task_tags::tag_id.eq(tag.to_storage())),
            )
            .execute(connection)
            .map_err(HouseholdRepositoryError::persistence)?;
            Ok(deleted_count > 0)
        })
        .await
    }

    async fn tags_for_task(&self, task: TaskId) -> HouseholdRepositoryResult<Vec<Tag>> {
        run_blocking(&self.store, move |connection| {
            let rows = task_tags::table
                .inner_join(tags::table)
                .filter(task_tags::task_id.eq(task.to_storage()))
                .order(tags::name.asc())
                .select(TagRow::as_select())
                .load::<TagRow>(connection)
                .map_err(HouseholdRepositoryError::persistence)?;
            rows.into_iter().map(row_to_tag).collect()
        })
        .await
    }
}

/// Maps a write failure, singling out collisions in the creator's namespace.
fn classify_tag_write(
    err: DieselError,
    name: TagName,
    created_by: UserId,
) -> HouseholdRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_tag_namespace_violation(info.as_ref()) =>
        {
            HouseholdRepositoryError::DuplicateTag { name, created_by }
        }
        _ => classify(ENTITY, err),
    }
}

fn to_new_row(tag: &Tag) -> NewTagRow {
    NewTagRow {
        id: tag.id().to_storage(),
        name: tag.name().as_str().to_owned(),
        created_by: tag.created_by().to_storage(),
        created_at: tag.created_at(),
        updated_at: tag.updated_at(),
    }
}

fn row_to_tag(row: TagRow) -> HouseholdRepositoryResult<Tag> {
    let TagRow {
        id,
        name,
        created_by,
        created_at,
        updated_at,
    } = row;

    Ok(Tag::from_persisted(
        TagId::from_str(&id).map_err(HouseholdRepositoryError::persistence)?,
        TagName::from_persisted(name),
        UserId::from_str(&created_by).map_err(HouseholdRepositoryError::persistence)?,
        Timestamps::from_persisted(created_at, updated_at),
    ))
}
