//! SQLite repository for scheduled notifications.

use super::{
    blocking::run_blocking,
    errors::classify,
    models::{NewNotificationRow, NotificationRow},
};
use crate::household::{
    domain::{
        Classifier, DeliveryStatus, Notification, NotificationId, PersistedNotificationData,
        TaskId, Timestamped, Timestamps, UserId,
    },
    ports::{HouseholdRepositoryError, HouseholdRepositoryResult, NotificationRepository},
};
use crate::store::{StoreContext, schema::notifications};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::str::FromStr;

const ENTITY: &str = "notification";

/// SQLite-backed notification repository.
#[derive(Debug, Clone)]
pub struct SqliteNotificationRepository {
    store: StoreContext,
}

impl SqliteNotificationRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: StoreContext) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn store(&self, notification: &Notification) -> HouseholdRepositoryResult<()> {
        let new_row = to_new_row(notification);
        run_blocking(&self.store, move |connection| {
            diesel::insert_into(notifications::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, notification: &Notification) -> HouseholdRepositoryResult<()> {
        let notification_id = notification.id();
        let row = to_new_row(notification);

        run_blocking(&self.store, move |connection| {
            let updated_count = diesel::update(notifications::table.find(&row.id))
                .set((
                    notifications::scheduled_for.eq(row.scheduled_for),
                    notifications::sent_at.eq(row.sent_at),
                    notifications::delivery_status.eq(&row.delivery_status),
                    notifications::error.eq(&row.error),
                    notifications::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            if updated_count == 0 {
                return Err(HouseholdRepositoryError::not_found(ENTITY, notification_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> HouseholdRepositoryResult<Option<Notification>> {
        run_blocking(&self.store, move |connection| {
            let row = notifications::table
                .find(id.to_storage())
                .select(NotificationRow::as_select())
                .first::<NotificationRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_notification).transpose()
        })
        .await
    }

    async fn list_due(
        &self,
        before: DateTime<Utc>,
    ) -> HouseholdRepositoryResult<Vec<Notification>> {
        run_blocking(&self.store, move |connection| {
            let rows = notifications::table
                .filter(notifications::delivery_status.eq(DeliveryStatus::Pending.as_str()))
                .filter(notifications::scheduled_for.le(before))
                .order((notifications::scheduled_for.asc(), notifications::id.asc()))
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(HouseholdRepositoryError::persistence)?;
            rows.into_iter().map(row_to_notification).collect()
        })
        .await
    }
}

fn to_new_row(notification: &Notification) -> NewNotificationRow {
    NewNotificationRow {
        id: notification.id().to_storage(),
        user_id: notification.user_id().to_storage(),
        task_id: notification.task_id().map(TaskId::to_storage),
        kind: notification.kind().as_str().to_owned(),
        channel: notification.channel().as_str().to_owned(),
        scheduled_for: notification.scheduled_for(),
        sent_at: notification.sent_at(),
        delivery_status: notification.delivery_status().as_str().to_owned(),
        error: notification.error().map(str::to_owned),
        created_at: notification.created_at(),
        updated_at: notification.updated_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> HouseholdRepositoryResult<Notification> {
    let NotificationRow {
        id,
        user_id,
        task_id,
        kind,
        channel,
        scheduled_for,
        sent_at,
        delivery_status,
        error,
        created_at,
        updated_at,
    } = row;

    let parsed_task = task_id
        .as_deref()
        .map(TaskId::from_str)
        .transpose()
        .map_err(HouseholdRepositoryError::persistence)?;

    Ok(Notification::from_persisted(PersistedNotificationData {
        id: NotificationId::from_str(&id).map_err(HouseholdRepositoryError::persistence)?,
        user_id: UserId::from_str(&user_id).map_err(HouseholdRepositoryError::persistence)?,
        task_id: parsed_task,
        kind: Classifier::from_persisted(kind),
        channel: Classifier::from_persisted(channel),
        scheduled_for,
        sent_at,
        delivery_status: DeliveryStatus::try_from(delivery_status.as_str())
            .map_err(HouseholdRepositoryError::persistence)?,
        error,
        timestamps: Timestamps::from_persisted(created_at, updated_at),
    }))
}
