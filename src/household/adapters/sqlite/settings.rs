//! SQLite repository for per-family notification settings.

use super::{blocking::run_blocking, errors::classify, models::NotificationSettingRow};
use crate::household::{
    domain::{DigestTime, FamilyId, NotificationSetting, Timestamped, Timestamps},
    ports::{HouseholdRepositoryError, HouseholdRepositoryResult, NotificationSettingRepository},
};
use crate::store::{StoreContext, schema::notification_settings};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;

const ENTITY: &str = "notification setting";

/// SQLite-backed notification settings repository.
#[derive(Debug, Clone)]
pub struct SqliteNotificationSettingRepository {
    store: StoreContext,
}

impl SqliteNotificationSettingRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: StoreContext) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationSettingRepository for SqliteNotificationSettingRepository {
    async fn upsert(&self, setting: &NotificationSetting) -> HouseholdRepositoryResult<()> {
        let row = to_row(setting)?;
        run_blocking(&self.store, move |connection| {
            diesel::insert_into(notification_settings::table)
                .values(&row)
                .on_conflict(notification_settings::family_id)
                .do_update()
                .set((
                    notification_settings::remind_days_before
                        .eq(excluded(notification_settings::remind_days_before)),
                    notification_settings::remind_on_due_day
                        .eq(excluded(notification_settings::remind_on_due_day)),
                    notification_settings::overdue_digest_time
                        .eq(excluded(notification_settings::overdue_digest_time)),
                    notification_settings::updated_at
                        .eq(excluded(notification_settings::updated_at)),
                ))
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            Ok(())
        })
        .await
    }

    async fn find(
        &self,
        family: &FamilyId,
    ) -> HouseholdRepositoryResult<Option<NotificationSetting>> {
        let key = family.as_str().to_owned();
        run_blocking(&self.store, move |connection| {
            let row = notification_settings::table
                .find(&key)
                .select(NotificationSettingRow::as_select())
                .first::<NotificationSettingRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_setting).transpose()
        })
        .await
    }
}

fn to_row(setting: &NotificationSetting) -> HouseholdRepositoryResult<NotificationSettingRow> {
    Ok(NotificationSettingRow {
        family_id: setting.family_id().as_str().to_owned(),
        remind_days_before: i32::try_from(setting.remind_days_before())
            .map_err(HouseholdRepositoryError::persistence)?,
        remind_on_due_day: setting.remind_on_due_day(),
        overdue_digest_time: setting.overdue_digest_time().as_str().to_owned(),
        created_at: setting.created_at(),
        updated_at: setting.updated_at(),
    })
}

fn row_to_setting(row: NotificationSettingRow) -> HouseholdRepositoryResult<NotificationSetting> {
    let NotificationSettingRow {
        family_id,
        remind_days_before,
        remind_on_due_day,
        overdue_digest_time,
        created_at,
        updated_at,
    } = row;

    Ok(NotificationSetting::from_persisted(
        FamilyId::from_persisted(family_id),
        u32::try_from(remind_days_before).map_err(HouseholdRepositoryError::persistence)?,
        remind_on_due_day,
        DigestTime::from_persisted(overdue_digest_time),
        Timestamps::from_persisted(created_at, updated_at),
    ))
}
