//! Column defaults applied by the store when writers omit values.

use super::helpers::{TempStore, count_rows, temp_store};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Integer, Text};
use family_task_backend::store::{PooledSqlite, SchemaMigrator};
use rstest::rstest;

const USER_ID: &str = "00000000-0000-0000-0000-0000000000aa";
const TASK_ID: &str = "00000000-0000-0000-0000-0000000000bb";

#[derive(QueryableByName)]
struct TaskDefaults {
    #[diesel(sql_type = Text)]
    priority: String,
    #[diesel(sql_type = Text)]
    status: String,
}

#[derive(QueryableByName)]
struct SettingDefaults {
    #[diesel(sql_type = Integer)]
    remind_days_before: i32,
    #[diesel(sql_type = Bool)]
    remind_on_due_day: bool,
    #[diesel(sql_type = Text)]
    overdue_digest_time: String,
}

#[derive(QueryableByName)]
struct StatusRow {
    #[diesel(sql_type = Text)]
    status: String,
}

fn seeded(temp: &TempStore) -> PooledSqlite {
    let mut conn = temp.store.connection().expect("connection");
    SchemaMigrator::upgrade(&mut conn).expect("upgrade");
    conn.batch_execute(&format!(
        "INSERT INTO users (id, google_sub, email, name) \
         VALUES ('{USER_ID}', 'sub-a', 'a@example.com', 'A');\
         INSERT INTO tasks (id, name, created_by) VALUES ('{TASK_ID}', 'Sweep', '{USER_ID}');"
    ))
    .expect("seed rows");
    conn
}

#[rstest]
fn task_priority_and_status_default(temp_store: TempStore) {
    let mut conn = seeded(&temp_store);
    let row = diesel::sql_query("SELECT priority, status FROM tasks WHERE id = ?")
        .bind::<Text, _>(TASK_ID)
        .get_result::<TaskDefaults>(&mut conn)
        .expect("task row");
    assert_eq!(row.priority, "P2");
    assert_eq!(row.status, "todo");
}

#[rstest]
fn timestamps_default_on_insert(temp_store: TempStore) {
    let _conn = seeded(&temp_store);
    assert_eq!(
        count_rows(
            &temp_store.store,
            "tasks",
            "created_at IS NOT NULL AND updated_at IS NOT NULL"
        ),
        1
    );
    assert_eq!(
        count_rows(&temp_store.store, "users", "created_at IS NOT NULL"),
        1
    );
}

#[rstest]
fn notification_settings_default(temp_store: TempStore) {
    let mut conn = seeded(&temp_store);
    conn.batch_execute("INSERT INTO notification_settings (family_id) VALUES ('default');")
        .expect("settings row");
    let row = diesel::sql_query(concat!(
        "SELECT remind_days_before, remind_on_due_day, overdue_digest_time ",
        "FROM notification_settings WHERE family_id = 'default'",
    ))
    .get_result::<SettingDefaults>(&mut conn)
    .expect("settings row");
    assert_eq!(row.remind_days_before, 1);
    assert!(row.remind_on_due_day);
    assert_eq!(row.overdue_digest_time, "09:00");
}

#[rstest]
#[case(
    "calendar_sync",
    "sync_status",
    "INSERT INTO calendar_sync (task_id, user_id) VALUES ('{task}', '{user}');"
)]
#[case(
    "notifications",
    "delivery_status",
    "INSERT INTO notifications (id, user_id, type, channel, scheduled_for) \
     VALUES ('00000000-0000-0000-0000-0000000000cc', '{user}', 'reminder', 'email', \
     '2026-02-14 09:00:00+00:00');"
)]
fn lifecycle_status_defaults_to_pending(
    temp_store: TempStore,
    #[case] table: &str,
    #[case] column: &str,
    #[case] insert: &str,
) {
    let mut conn = seeded(&temp_store);
    conn.batch_execute(&insert.replace("{task}", TASK_ID).replace("{user}", USER_ID))
        .expect("row inserted");
    let row = diesel::sql_query(format!("SELECT {column} AS status FROM {table}"))
        .get_result::<StatusRow>(&mut conn)
        .expect("status row");
    assert_eq!(row.status, "pending");
}

#[rstest]
fn required_columns_reject_null(temp_store: TempStore) {
    let mut conn = seeded(&temp_store);
    let result = conn.batch_execute(&format!(
        "INSERT INTO tags (id, name, created_by) \
         VALUES ('00000000-0000-0000-0000-0000000000dd', NULL, '{USER_ID}');"
    ));
    assert!(result.is_err(), "tags.name is required");
}
