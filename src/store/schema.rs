//! Diesel schema for the household store.
//!
//! Mirrors the layout created by the initial migration.

diesel::table! {
    /// Users signed in through the external identity provider.
    users (id) {
        /// Internal user identifier.
        id -> Text,
        /// Subject claim issued by the identity provider.
        google_sub -> Text,
        /// Unique email address.
        email -> Text,
        /// Display name.
        name -> Text,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
        /// Last update timestamp.
        updated_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    /// Household tasks and subtasks.
    tasks (id) {
        /// Internal task identifier.
        id -> Text,
        /// Task name.
        name -> Text,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
        /// Last update timestamp.
        updated_at -> TimestamptzSqlite,
        /// Optional due date.
        deadline_date -> Nullable<Date>,
        /// Priority code.
        priority -> Text,
        /// Lifecycle status code.
        status -> Text,
        /// Optional assignee.
        assignee_id -> Nullable<Text>,
        /// Optional parent task.
        parent_task_id -> Nullable<Text>,
        /// Creating user.
        created_by -> Text,
    }
}

diesel::table! {
    /// Blocking edges between tasks.
    task_dependencies (task_id, blocked_by_task_id) {
        /// Blocked task.
        task_id -> Text,
        /// Task that must finish first.
        blocked_by_task_id -> Text,
    }
}

diesel::table! {
    /// Labels scoped to the user who created them.
    tags (id) {
        /// Internal tag identifier.
        id -> Text,
        /// Label text, unique per creator.
        name -> Text,
        /// Owning user.
        created_by -> Text,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
        /// Last update timestamp.
        updated_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    /// Join rows between tasks and tags.
    task_tags (task_id, tag_id) {
        /// Tagged task.
        task_id -> Text,
        /// Applied tag.
        tag_id -> Text,
    }
}

diesel::table! {
    /// External calendar synchronisation state per task and user.
    calendar_sync (task_id, user_id) {
        /// Synchronised task.
        task_id -> Text,
        /// User whose calendar holds the event.
        user_id -> Text,
        /// External calendar event identifier.
        google_event_id -> Nullable<Text>,
        /// Time of the last successful synchronisation.
        last_synced_at -> Nullable<TimestamptzSqlite>,
        /// Synchronisation status code.
        sync_status -> Text,
        /// Error text from the last failed attempt.
        sync_error -> Nullable<Text>,
    }
}

diesel::table! {
    /// Scheduled messages to users.
    notifications (id) {
        /// Internal notification identifier.
        id -> Text,
        /// Recipient.
        user_id -> Text,
        /// Related task, cleared when the task is deleted.
        task_id -> Nullable<Text>,
        /// Notification type classifier.
        #[sql_name = "type"]
        kind -> Text,
        /// Delivery channel classifier.
        channel -> Text,
        /// Time the notification is due.
        scheduled_for -> TimestamptzSqlite,
        /// Time the notification was delivered.
        sent_at -> Nullable<TimestamptzSqlite>,
        /// Delivery status code.
        delivery_status -> Text,
        /// Error text from the last failed delivery.
        error -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
        /// Last update timestamp.
        updated_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    /// Reminder preferences per family unit.
    notification_settings (family_id) {
        /// Opaque family grouping key.
        family_id -> Text,
        /// Days before the deadline to send a reminder.
        remind_days_before -> Integer,
        /// Whether to remind on the due day itself.
        remind_on_due_day -> Bool,
        /// Time of day (`HH:MM`) for the overdue digest.
        overdue_digest_time -> Text,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
        /// Last update timestamp.
        updated_at -> TimestamptzSqlite,
    }
}

diesel::joinable!(task_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tasks,
    task_dependencies,
    tags,
    task_tags,
    calendar_sync,
    notifications,
    notification_settings,
);
