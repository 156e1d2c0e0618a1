//! Diesel row models for household persistence.

use crate::store::schema::{
    calendar_sync, notification_settings, notifications, tags, task_dependencies, task_tags,
    tasks, users,
};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct UserRow {
    pub id: String,
    pub google_sub: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(super) struct NewUserRow {
    pub id: String,
    pub google_sub: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct TaskRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deadline_date: Option<NaiveDate>,
    pub priority: String,
    pub status: String,
    pub assignee_id: Option<String>,
    pub parent_task_id: Option<String>,
    pub created_by: String,
}

/// Insert model for tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub(super) struct NewTaskRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deadline_date: Option<NaiveDate>,
    pub priority: String,
    pub status: String,
    pub assignee_id: Option<String>,
    pub parent_task_id: Option<String>,
    pub created_by: String,
}

/// Insert model for blocking edges.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_dependencies)]
pub(super) struct NewTaskDependencyRow {
    pub task_id: String,
    pub blocked_by_task_id: String,
}

/// Query result row for tags.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct TagRow {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(super) struct NewTagRow {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task/tag links.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_tags)]
pub(super) struct NewTaskTagRow {
    pub task_id: String,
    pub tag_id: String,
}

/// Calendar synchronisation row, used for both reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = calendar_sync)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct CalendarSyncRow {
    pub task_id: String,
    pub user_id: String,
    pub google_event_id: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub sync_status: String,
    pub sync_error: Option<String>,
}

/// Query result row for notifications.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub task_id: Option<String>,
    pub kind: String,
    pub channel: String,
    pub scheduled_for: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivery_status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for notifications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(super) struct NewNotificationRow {
    pub id: String,
    pub user_id: String,
    pub task_id: Option<String>,
    pub kind: String,
    pub channel: String,
    pub scheduled_for: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivery_status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notification settings row, used for both reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notification_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(super) struct NotificationSettingRow {
    pub family_id: String,
    pub remind_days_before: i32,
    pub remind_on_due_day: bool,
    pub overdue_digest_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
