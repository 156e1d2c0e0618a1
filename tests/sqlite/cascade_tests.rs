//! Cascade and set-null behaviour when referenced rows are deleted.

use super::helpers::{
    StepClock, TempStore, clock, count_rows, migrated, seed_task, seed_user, temp_store,
};
use chrono::Duration;
use diesel::connection::SimpleConnection;
use family_task_backend::household::{
    adapters::sqlite::{
        SqliteCalendarSyncRepository, SqliteNotificationRepository, SqliteTagRepository,
        SqliteTaskRepository,
    },
    domain::{
        CalendarSync, Classifier, NewTask, Notification, RandomIds, Tag, TagName, TaskDependency,
    },
    ports::{
        CalendarSyncRepository, HouseholdRepositoryError, NotificationRepository, TagRepository,
        TaskRepository,
    },
};
use mockable::Clock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_task_cascades_links_and_clears_notifications(
    temp_store: TempStore,
    clock: StepClock,
) {
    let temp = migrated(temp_store).await;
    let store = &temp.store;
    let owner = seed_user(store, &clock, "owner").await;
    let doomed = seed_task(store, &clock, NewTask::new("Clean gutters", owner.id())).await;
    let other = seed_task(store, &clock, NewTask::new("Buy ladder", owner.id())).await;

    let tasks = SqliteTaskRepository::new(store.clone());
    tasks
        .add_dependency(TaskDependency::new(doomed.id(), other.id()).expect("edge"))
        .await
        .expect("outgoing edge");
    tasks
        .add_dependency(TaskDependency::new(other.id(), doomed.id()).expect("edge"))
        .await
        .expect("incoming edge");

    let tags = SqliteTagRepository::new(store.clone());
    let tag = Tag::new(
        TagName::new("outdoors").expect("tag name"),
        owner.id(),
        &RandomIds,
        &clock,
    );
    tags.store(&tag).await.expect("tag persists");
    tags.attach(doomed.id(), tag.id()).await.expect("tag attached");

    SqliteCalendarSyncRepository::new(store.clone())
        .upsert(&CalendarSync::pending(doomed.id(), owner.id()))
        .await
        .expect("sync record persists");

    let notifications = SqliteNotificationRepository::new(store.clone());
    let reminder = Notification::schedule(
        owner.id(),
        Some(doomed.id()),
        Classifier::new("reminder").expect("kind"),
        Classifier::new("email").expect("channel"),
        clock.utc() + Duration::hours(1),
        &RandomIds,
        &clock,
    );
    notifications
        .store(&reminder)
        .await
        .expect("notification persists");

    tasks.delete(doomed.id()).await.expect("task deleted");

    let key = doomed.id().to_storage();
    assert_eq!(
        count_rows(
            store,
            "task_dependencies",
            &format!("task_id = '{key}' OR blocked_by_task_id = '{key}'")
        ),
        0
    );
    assert_eq!(count_rows(store, "task_tags", &format!("task_id = '{key}'")), 0);
    assert_eq!(count_rows(store, "calendar_sync", &format!("task_id = '{key}'")), 0);
    assert_eq!(count_rows(store, "tags", "1 = 1"), 1, "tags outlive tasks");

    let kept = notifications
        .find_by_id(reminder.id())
        .await
        .expect("lookup succeeds")
        .expect("notification survives task deletion");
    assert_eq!(kept.task_id(), None);
    assert!(tasks.find_by_id(other.id()).await.expect("lookup").is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_tag_removes_its_task_links(temp_store: TempStore, clock: StepClock) {
    let temp = migrated(temp_store).await;
    let store = &temp.store;
    let owner = seed_user(store, &clock, "owner").await;
    let task = seed_task(store, &clock, NewTask::new("Water plants", owner.id())).await;

    let tags = SqliteTagRepository::new(store.clone());
    let tag = Tag::new(
        TagName::new("garden").expect("tag name"),
        owner.id(),
        &RandomIds,
        &clock,
    );
    tags.store(&tag).await.expect("tag persists");
    tags.attach(task.id(), tag.id()).await.expect("tag attached");

    tags.delete(tag.id()).await.expect("tag deleted");

    assert!(tags.tags_for_task(task.id()).await.expect("query").is_empty());
    let tasks = SqliteTaskRepository::new(store.clone());
    assert!(tasks.find_by_id(task.id()).await.expect("lookup").is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_parent_with_subtasks_is_refused(temp_store: TempStore, clock: StepClock) {
    let temp = migrated(temp_store).await;
    let store = &temp.store;
    let owner = seed_user(store, &clock, "owner").await;
    let parent = seed_task(store, &clock, NewTask::new("Plan party", owner.id())).await;
    let child = seed_task(
        store,
        &clock,
        NewTask::new("Send invitations", owner.id()).with_parent(parent.id()),
    )
    .await;

    let tasks = SqliteTaskRepository::new(store.clone());
    let result = tasks.delete(parent.id()).await;
    assert!(
        matches!(result, Err(HouseholdRepositoryError::InUse { .. })),
        "expected InUse, got {result:?}"
    );

    tasks.delete(child.id()).await.expect("subtask deleted");
    tasks.delete(parent.id()).await.expect("parent deleted once childless");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_missing_task_reports_not_found(temp_store: TempStore, clock: StepClock) {
    let temp = migrated(temp_store).await;
    let owner = seed_user(&temp.store, &clock, "owner").await;
    let task = family_task_backend::household::domain::Task::create(
        NewTask::new("Never stored", owner.id()),
        &RandomIds,
        &clock,
    )
    .expect("valid task");

    let result = SqliteTaskRepository::new(temp.store.clone())
        .delete(task.id())
        .await;
    assert!(
        matches!(result, Err(HouseholdRepositoryError::NotFound { .. })),
        "expected NotFound, got {result:?}"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_user_cascades_personal_rows(temp_store: TempStore, clock: StepClock) {
    let temp = migrated(temp_store).await;
    let store = &temp.store;
    let owner = seed_user(store, &clock, "owner").await;
    let watcher = seed_user(store, &clock, "watcher").await;
    let task = seed_task(store, &clock, NewTask::new("Book dentist", owner.id())).await;

    SqliteCalendarSyncRepository::new(store.clone())
        .upsert(&CalendarSync::pending(task.id(), watcher.id()))
        .await
        .expect("sync record persists");
    SqliteNotificationRepository::new(store.clone())
        .store(&Notification::schedule(
            watcher.id(),
            Some(task.id()),
            Classifier::new("reminder").expect("kind"),
            Classifier::new("push").expect("channel"),
            clock.utc(),
            &RandomIds,
            &clock,
        ))
        .await
        .expect("notification persists");

    let key = watcher.id().to_storage();
    {
        let mut conn = store.connection().expect("connection");
        conn.batch_execute(&format!("DELETE FROM users WHERE id = '{key}'"))
            .expect("user deleted");
    }

    assert_eq!(count_rows(store, "calendar_sync", &format!("user_id = '{key}'")), 0);
    assert_eq!(count_rows(store, "notifications", &format!("user_id = '{key}'")), 0);
}

#[rstest]
fn deleting_task_creator_is_refused(temp_store: TempStore) {
    let mut conn = temp_store.store.connection().expect("connection");
    family_task_backend::store::SchemaMigrator::upgrade(&mut conn).expect("upgrade");
    conn.batch_execute(concat!(
        "INSERT INTO users (id, google_sub, email, name) ",
        "VALUES ('00000000-0000-0000-0000-000000000001', 'sub-1', 'a@example.com', 'A');",
        "INSERT INTO tasks (id, name, created_by) ",
        "VALUES ('00000000-0000-0000-0000-000000000002', 'Mow lawn', ",
        "'00000000-0000-0000-0000-000000000001');",
    ))
    .expect("seed rows");

    let result =
        conn.batch_execute("DELETE FROM users WHERE id = '00000000-0000-0000-0000-000000000001'");
    assert!(result.is_err(), "creator of a live task must not be deletable");
}
