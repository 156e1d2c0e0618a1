//! SQLite repository for tasks and blocking edges.

use super::{
    blocking::run_blocking,
    errors::{classify, classify_delete},
    models::{NewTaskDependencyRow, NewTaskRow, TaskRow},
};
use crate::household::{
    domain::{
        PersistedTaskData, Task, TaskDependency, TaskId, TaskPriority, TaskStatus, Timestamped,
        Timestamps, UserId,
    },
    ports::{HouseholdRepositoryError, HouseholdRepositoryResult, TaskRepository},
};
use crate::store::{
    StoreContext,
    schema::{task_dependencies, tasks},
};
use async_trait::async_trait;
use diesel::prelude::*;
use std::str::FromStr;

const ENTITY: &str = "task";
const DEPENDENCY_ENTITY: &str = "task dependency";

/// SQLite-backed task repository.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    store: StoreContext,
}

impl SqliteTaskRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: StoreContext) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn store(&self, task: &Task) -> HouseholdRepositoryResult<()> {
        let new_row = to_new_row(task);
        run_blocking(&self.store, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> HouseholdRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task);

        run_blocking(&self.store, move |connection| {
            let updated_count = diesel::update(tasks::table.find(&row.id))
                .set((
                    tasks::name.eq(&row.name),
                    tasks::description.eq(&row.description),
                    tasks::deadline_date.eq(row.deadline_date),
                    tasks::priority.eq(&row.priority),
                    tasks::status.eq(&row.status),
                    tasks::assignee_id.eq(&row.assignee_id),
                    tasks::parent_task_id.eq(&row.parent_task_id),
                    tasks::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(|err| classify(ENTITY, err))?;
            if updated_count == 0 {
                return Err(HouseholdRepositoryError::not_found(ENTITY, task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> HouseholdRepositoryResult<()> {
        let key = id.to_storage();
        run_blocking(&self.store, move |connection| {
            let deleted_count = diesel::delete(tasks::table.find(&key))
                .execute(connection)
                .map_err(|err| classify_delete(ENTITY, &key, err))?;
            if deleted_count == 0 {
                return Err(HouseholdRepositoryError::not_found(ENTITY, key));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> HouseholdRepositoryResult<Option<Task>> {
        run_blocking(&self.store, move |connection| {
            let row = tasks::table
                .find(id.to_storage())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(HouseholdRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_subtasks(&self, parent: TaskId) -> HouseholdRepositoryResult<Vec<Task>> {
        run_blocking(&self.store, move |connection| {
            let rows = tasks::table
                .filter(tasks::parent_task_id.eq(parent.to_storage()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(HouseholdRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_assignee(&self, assignee: UserId) -> HouseholdRepositoryResult<Vec<Task>> {
        run_blocking(&self.store, move |connection| {
            let rows = tasks::table
                .filter(tasks::assignee_id.eq(assignee.to_storage()))
                .order((tasks::deadline_date.asc(), tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(HouseholdRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn add_dependency(&self, dependency: TaskDependency) -> HouseholdRepositoryResult<()> {
        let new_row = NewTaskDependencyRow {
            task_id: dependency.task_id().to_storage(),
            blocked_by_task_id: dependency.blocked_by_task_id().to_storage(),
        };
        run_blocking(&self.store, move |connection| {
            diesel::insert_into(task_dependencies::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| classify(DEPENDENCY_ENTITY, err))?;
            Ok(())
        })
        .await
    }

    async fn remove_dependency(
        &self,
        dependency: TaskDependency,
    ) -> HouseholdRepositoryResult<bool> {
        run_blocking(&self.store, move |connection| {
            let deleted_count = diesel::delete(
                task_dependencies::table
                    .filter(task_dependencies::task_id.eq(dependency.task_id().to_storage()))
                    .filter(
                        task_dependencies::blocked_by_task_id
                            .eq(dependency.blocked_by_task_id().to_storage()),
                    ),
            )
            .execute(connection)
            .map_err(HouseholdRepositoryError::persistence)?;
            Ok(deleted_count > 0)
        })
        .await
    }

    async fn list_blockers(&self, task: TaskId) -> HouseholdRepositoryResult<Vec<TaskId>> {
        run_blocking(&self.store, move |connection| {
            let keys = task_dependencies::table
                .filter(task_dependencies::task_id.eq(task.to_storage()))
                .order(task_dependencies::blocked_by_task_id.asc())
                .select(task_dependencies::blocked_by_task_id)
                .load::<String>(connection)
                .map_err(HouseholdRepositoryError::persistence)?;
            keys.iter().map(String::as_str).map(parse_task_id).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().to_storage(),
        name: task.name().to_owned(),
        description: task.description().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        deadline_date: task.deadline_date(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        assignee_id: task.assignee_id().map(UserId::to_storage),
        parent_task_id: task.parent_task_id().map(TaskId::to_storage),
        created_by: task.created_by().to_storage(),
    }
}

fn parse_task_id(key: &str) -> HouseholdRepositoryResult<TaskId> {
    TaskId::from_str(key).map_err(HouseholdRepositoryError::persistence)
}

fn parse_user_id(key: &str) -> HouseholdRepositoryResult<UserId> {
    UserId::from_str(key).map_err(HouseholdRepositoryError::persistence)
}

fn row_to_task(row: TaskRow) -> HouseholdRepositoryResult<Task> {
    let TaskRow {
        id,
        name,
        description,
        created_at,
        updated_at,
        deadline_date,
        priority,
        status,
        assignee_id,
        parent_task_id,
        created_by,
    } = row;

    Ok(Task::from_persisted(PersistedTaskData {
        id: parse_task_id(&id)?,
        name,
        description,
        deadline_date,
        priority: TaskPriority::try_from(priority.as_str())
            .map_err(HouseholdRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str())
            .map_err(HouseholdRepositoryError::persistence)?,
        assignee_id: assignee_id.as_deref().map(parse_user_id).transpose()?,
        parent_task_id: parent_task_id.as_deref().map(parse_task_id).transpose()?,
        created_by: parse_user_id(&created_by)?,
        timestamps: Timestamps::from_persisted(created_at, updated_at),
    }))
}
