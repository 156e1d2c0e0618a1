//! Rows written by other tools read back exactly as stored.

use super::helpers::{TempStore, migrated, temp_store};
use diesel::connection::SimpleConnection;
use family_task_backend::household::{
    adapters::sqlite::{
        SqliteNotificationRepository, SqliteNotificationSettingRepository, SqliteTagRepository,
        SqliteUserRepository,
    },
    domain::{FamilyId, NotificationId, TagId, TagName},
    ports::{
        NotificationRepository, NotificationSettingRepository, TagRepository, UserRepository,
    },
};
use rstest::rstest;

const USER_ID: &str = "00000000-0000-0000-0000-0000000000c1";
const TAG_ID: &str = "00000000-0000-0000-0000-0000000000c2";
const NOTIFICATION_ID: &str = "00000000-0000-0000-0000-0000000000c3";

async fn with_legacy_rows(temp: TempStore) -> TempStore {
    let temp = migrated(temp).await;
    let mut conn = temp.store.connection().expect("connection");
    conn.batch_execute(&format!(
        "INSERT INTO users (id, google_sub, email, name) \
         VALUES ('{USER_ID}', 'legacy-sub', 'legacy-account', '');\
         INSERT INTO tags (id, name, created_by) VALUES ('{TAG_ID}', ' chores', '{USER_ID}');\
         INSERT INTO notifications (id, user_id, type, channel, scheduled_for) \
         VALUES ('{NOTIFICATION_ID}', '{USER_ID}', 'Reminder', 'EMAIL', '2026-02-14 08:00:00');\
         INSERT INTO notification_settings (family_id, overdue_digest_time) \
         VALUES (' household ', '7:30');"
    ))
    .expect("legacy rows");
    temp
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_user_profile_reads_back(temp_store: TempStore) {
    let temp = with_legacy_rows(temp_store).await;
    let user = SqliteUserRepository::new(temp.store.clone())
        .find_by_google_sub("legacy-sub")
        .await
        .expect("lookup succeeds")
        .expect("user exists");

    assert_eq!(user.id().to_string(), USER_ID);
    assert_eq!(user.profile().email(), "legacy-account");
    assert_eq!(user.profile().name(), "");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn untrimmed_tag_name_reads_back(temp_store: TempStore) {
    let temp = with_legacy_rows(temp_store).await;
    let repo = SqliteTagRepository::new(temp.store.clone());
    let tag_id: TagId = TAG_ID.parse().expect("tag id");

    let tag = repo
        .find_by_id(tag_id)
        .await
        .expect("lookup succeeds")
        .expect("tag exists");
    assert_eq!(tag.name().as_str(), " chores");

    let owner = tag.created_by();
    let exact = repo
        .find_by_name(owner, &TagName::from_persisted(" chores".to_owned()))
        .await
        .expect("lookup succeeds");
    assert_eq!(exact.map(|found| found.id()), Some(tag_id));

    let trimmed = repo
        .find_by_name(owner, &TagName::new("chores").expect("name"))
        .await
        .expect("lookup succeeds");
    assert!(trimmed.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notification_classifiers_keep_their_case(temp_store: TempStore) {
    let temp = with_legacy_rows(temp_store).await;
    let id: NotificationId = NOTIFICATION_ID.parse().expect("notification id");
    let notification = SqliteNotificationRepository::new(temp.store.clone())
        .find_by_id(id)
        .await
        .expect("lookup succeeds")
        .expect("notification exists");

    assert_eq!(notification.kind().as_str(), "Reminder");
    assert_eq!(notification.channel().as_str(), "EMAIL");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn setting_keys_and_digest_times_read_back(temp_store: TempStore) {
    let temp = with_legacy_rows(temp_store).await;
    let setting = SqliteNotificationSettingRepository::new(temp.store.clone())
        .find(&FamilyId::from_persisted(" household ".to_owned()))
        .await
        .expect("lookup succeeds")
        .expect("setting exists");

    assert_eq!(setting.family_id().as_str(), " household ");
    assert_eq!(setting.overdue_digest_time().as_str(), "7:30");
}
