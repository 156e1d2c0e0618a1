//! Forward and reverse schema procedure tests.

use super::helpers::{TempStore, temp_store};
use diesel::connection::SimpleConnection;
use family_task_backend::store::{REQUIRED_TABLES, SchemaMigrator, StoreError, inspect};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upgrade_creates_every_required_table(temp_store: TempStore) {
    let applied = temp_store.store.upgrade().await.expect("upgrade succeeds");
    assert_eq!(applied.len(), 1, "one migration ships with the schema");

    let mut conn = temp_store.store.connection().expect("connection");
    let tables = inspect::table_names(&mut conn).expect("catalog readable");
    let mut expected: Vec<String> = REQUIRED_TABLES.iter().map(ToString::to_string).collect();
    expected.sort();
    assert_eq!(tables, expected);
}

#[rstest]
#[case("tasks", &["ix_tasks_assignee_id", "ix_tasks_deadline_date", "ix_tasks_priority", "ix_tasks_status"])]
#[case("notifications", &["ix_notifications_scheduled_for", "ix_notifications_user_id"])]
#[case("users", &[])]
#[tokio::test(flavor = "multi_thread")]
async fn upgrade_creates_named_indexes(
    temp_store: TempStore,
    #[case] table: &str,
    #[case] expected: &[&str],
) {
    temp_store.store.upgrade().await.expect("upgrade succeeds");
    let mut conn = temp_store.store.connection().expect("connection");
    let indexes = inspect::index_names(&mut conn, table).expect("catalog readable");
    assert_eq!(indexes, expected);
}

#[rstest]
#[case("task_dependencies", "task_id", "tasks", "CASCADE")]
#[case("task_dependencies", "blocked_by_task_id", "tasks", "CASCADE")]
#[case("task_tags", "task_id", "tasks", "CASCADE")]
#[case("task_tags", "tag_id", "tags", "CASCADE")]
#[case("calendar_sync", "task_id", "tasks", "CASCADE")]
#[case("calendar_sync", "user_id", "users", "CASCADE")]
#[case("notifications", "user_id", "users", "CASCADE")]
#[case("notifications", "task_id", "tasks", "SET NULL")]
#[case("tasks", "parent_task_id", "tasks", "NO ACTION")]
#[case("tasks", "assignee_id", "users", "NO ACTION")]
#[case("tasks", "created_by", "users", "NO ACTION")]
#[case("tags", "created_by", "users", "NO ACTION")]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_keys_carry_expected_delete_rules(
    temp_store: TempStore,
    #[case] table: &str,
    #[case] column: &str,
    #[case] target: &str,
    #[case] on_delete: &str,
) {
    temp_store.store.upgrade().await.expect("upgrade succeeds");
    let mut conn = temp_store.store.connection().expect("connection");
    let keys = inspect::foreign_keys(&mut conn, table).expect("catalog readable");
    let key = keys
        .iter()
        .find(|key| key.column == column)
        .unwrap_or_else(|| panic!("{table}.{column} should declare a foreign key"));
    assert_eq!(key.target_table, target);
    assert_eq!(key.on_delete, on_delete);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upgrade_is_skipped_when_current(temp_store: TempStore) {
    temp_store.store.upgrade().await.expect("first upgrade");
    let second = temp_store.store.upgrade().await.expect("second upgrade");
    assert!(second.is_empty(), "no migration should run twice");

    let status = temp_store.store.migration_status().await.expect("status");
    assert!(status.is_current());
    assert_eq!(status.applied.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn downgrade_removes_every_schema_object(temp_store: TempStore) {
    temp_store.store.upgrade().await.expect("upgrade succeeds");
    let reverted = temp_store.store.downgrade().await.expect("downgrade succeeds");
    assert_eq!(reverted.len(), 1);

    let mut conn = temp_store.store.connection().expect("connection");
    let leftovers = inspect::schema_objects(&mut conn).expect("catalog readable");
    assert!(leftovers.is_empty(), "schema objects survived: {leftovers:?}");

    let status = temp_store.store.migration_status().await.expect("status");
    assert!(status.applied.is_empty());
    assert_eq!(status.pending.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schema_can_be_reapplied_after_downgrade(temp_store: TempStore) {
    temp_store.store.upgrade().await.expect("upgrade succeeds");
    temp_store.store.downgrade().await.expect("downgrade succeeds");
    let reapplied = temp_store.store.upgrade().await.expect("re-upgrade succeeds");
    assert_eq!(reapplied.len(), 1);

    let mut conn = temp_store.store.connection().expect("connection");
    let tables = inspect::table_names(&mut conn).expect("catalog readable");
    assert_eq!(tables.len(), REQUIRED_TABLES.len());
}

#[rstest]
fn initial_script_is_not_reentrant(temp_store: TempStore) {
    let mut conn = temp_store.store.connection().expect("connection");
    SchemaMigrator::apply_initial_script(&mut conn).expect("first run succeeds");

    let second = SchemaMigrator::apply_initial_script(&mut conn);
    assert!(
        matches!(second, Err(StoreError::Migration(_))),
        "expected duplicate-object failure, got {second:?}"
    );

    let tables = inspect::table_names(&mut conn).expect("catalog readable");
    assert_eq!(tables.len(), REQUIRED_TABLES.len());
}

#[rstest]
fn reverse_script_undoes_forward_script(temp_store: TempStore) {
    let mut conn = temp_store.store.connection().expect("connection");
    SchemaMigrator::apply_initial_script(&mut conn).expect("forward script");
    SchemaMigrator::revert_initial_script(&mut conn).expect("reverse script");

    let leftovers = inspect::schema_objects(&mut conn).expect("catalog readable");
    assert!(leftovers.is_empty(), "schema objects survived: {leftovers:?}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_upgrade_leaves_store_untouched(temp_store: TempStore) {
    {
        let mut conn = temp_store.store.connection().expect("connection");
        conn.batch_execute("CREATE TABLE tags (id INTEGER PRIMARY KEY);")
            .expect("conflicting table created");
    }

    let result = temp_store.store.upgrade().await;
    assert!(
        matches!(result, Err(StoreError::Migration(_))),
        "expected migration failure, got {result:?}"
    );

    let mut conn = temp_store.store.connection().expect("connection");
    let tables = inspect::table_names(&mut conn).expect("catalog readable");
    assert_eq!(tables, vec!["tags".to_owned()]);
}
