//! SQLite repository for calendar synchronisation records.

use super::{blocking::run_blocking, errors::classify, models::CalendarSyncRow};
use crate::household::{
    domain::{CalendarSync, SyncStatus, TaskId, UserId},
    ports::{CalendarSyncRepository, HouseholdRepositoryError, HouseholdRepositoryResult},
};
use crate::store::{StoreContext, schema::calendar_sync};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::str::FromStr;

const ENTITY: &str = "calendar sync";

/// SQLite-backed calendar synchronisation repository.
#[derive(Debug, Clone)]
pub struct SqliteCalendarSyncRepository {
    store: StoreContext,
}

impl SqliteCalendarSyncRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: StoreContext) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CalendarSyncRepository for SqliteCalendarSyncRepository {
    async fn upsert(&self, record: &CalendarSync) -> HouseholdRepositoryResult<()> {
        let row = CalendarSyncRow {
            task_id: record.task_id().to_storage(),
            user_id: record.user_id().to_storage(),
            google_event_id: record.google_event_id().map(str::to_owned),
            last_synced_at: record.last_synced_at(),
            sync_status: record.sync_status().as_str().to_owned(),
            sync_error: record.sync_error().map(str::to_owned),
        };

        run_blocking(&self.store, move |connection| {
            diesel::insert_into(calendar_sync::table)
                .values(&row)
                .on_conflict((calendar_sync::task_id, calendar_sync::user_id))
                .do_update()
                .set((
                    calendar_sync::google_event_id.eq(excluded(calendar_sync::google_event_id)),
                    calendar_sync::last_synced_at.eq(excluded(calendar_sync::last_synced_at)),
                    calendar_sync::sync_status.eq(excluded(calendar_sync::sync_status)),
                    calendar_sync::sync_error.eq(excluded(calendar_sync::sync_error)),
                ))
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            Ok(())
        })
        .await
    }

    async fn find(
        &self,
        task: TaskId,
        user: UserId,
    ) -> HouseholdRepositoryResult<Option<CalendarSync>> {
        run_blocking(&self.store, move |connection| {
            let row = calendar_sync::table
                .find((task.to_storage(), user.to_storage()))
                .select(CalendarSyncRow::as_select())
                .first::<CalendarSyncRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }
}

fn row_to_record(row: CalendarSyncRow) -> HouseholdRepositoryResult<CalendarSync> {
    let CalendarSyncRow {
        task_id,
        user_id,
        google_event_id,
        last_synced_at,
        sync_status,
        sync_error,
    } = row;

    Ok(CalendarSync::from_persisted(
        TaskId::from_str(&task_id).map_err(HouseholdRepositoryError::persistence)?,
        UserId::from_str(&user_id).map_err(HouseholdRepositoryError::persistence)?,
        google_event_id,
        last_synced_at,
        SyncStatus::try_from(sync_status.as_str())
            .map_err(HouseholdRepositoryError::persistence)?,
        sync_error,
    ))
}
