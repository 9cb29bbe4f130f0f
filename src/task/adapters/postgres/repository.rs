//! `PostgreSQL` repository implementation for task and time log storage.

use super::{
    models::{TaskLogRow, TaskRow, log_to_row, row_to_log, row_to_task, task_to_row},
    schema::{task_logs, tasks},
};
use crate::task::{
    domain::{OwnerId, Task, TaskId, TaskLog},
    ports::{
        TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        expected_previous_revision,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = task_to_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let row = task_to_row(task)?;
        let expected = expected_previous_revision(task);

        self.run_blocking(move |connection| {
            connection.transaction(|tx| write_task(tx, &row, expected))
        })
        .await
    }

    async fn update_with_log(&self, task: &Task, log: &TaskLog) -> TaskRepositoryResult<()> {
        let row = task_to_row(task)?;
        let log_row = log_to_row(log)?;
        let expected = expected_previous_revision(task);

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                write_task(tx, &row, expected)?;
                diesel::insert_into(task_logs::table)
                    .values(&log_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, owner: OwnerId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        filter: TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .select(TaskRow::as_select())
                .into_boxed();
            query = match filter {
                TaskFilter::Active => query.filter(tasks::completed_at.is_null()),
                TaskFilter::Completed => query.filter(tasks::completed_at.is_not_null()),
                TaskFilter::All => query,
            };
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, owner: OwnerId, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                let owned = tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner.into_inner()))
                    .select(tasks::id)
                    .first::<uuid::Uuid>(tx)
                    .optional()?;
                if owned.is_none() {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                diesel::delete(task_logs::table.filter(task_logs::task_id.eq(id.into_inner())))
                    .execute(tx)?;
                diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner()))).execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn append_log(&self, log: &TaskLog) -> TaskRepositoryResult<()> {
        let task_id = log.task_id();
        let log_row = log_to_row(log)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(task_logs::table)
                .values(&log_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::NotFound(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_with_logs(
        &self,
        owner: OwnerId,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<(Task, Vec<TaskLog>)>> {
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .repeatable_read()
                .read_only()
                .run(|tx| {
                    let row = tasks::table
                        .filter(tasks::id.eq(id.into_inner()))
                        .filter(tasks::owner_id.eq(owner.into_inner()))
                        .select(TaskRow::as_select())
                        .first::<TaskRow>(tx)
                        .optional()?;
                    let Some(task_row) = row else {
                        return Ok(None);
                    };
                    let task = row_to_task(task_row)?;
                    let logs = load_logs(tx, id)?;
                    Ok(Some((task, logs)))
                })
        })
        .await
    }

    async fn list_logs(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskLog>> {
        self.run_blocking(move |connection| load_logs(connection, task_id)).await
    }

    async fn delete_logs(&self, task_id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(task_logs::table.filter(task_logs::task_id.eq(task_id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

/// Loads a task's logs, oldest first.
fn load_logs(
    connection: &mut PgConnection,
    task_id: TaskId,
) -> TaskRepositoryResult<Vec<TaskLog>> {
    let rows = task_logs::table
        .filter(task_logs::task_id.eq(task_id.into_inner()))
        .order((task_logs::logged_at.asc(), task_logs::id.asc()))
        .select(TaskLogRow::as_select())
        .load::<TaskLogRow>(connection)?;
    rows.into_iter().map(row_to_log).collect()
}

/// Replaces a task row if its stored revision is `expected`.
fn write_task(
    connection: &mut PgConnection,
    row: &TaskRow,
    expected: u64,
) -> TaskRepositoryResult<()> {
    let id = TaskId::from_uuid(row.id);
    let expected_revision = i64::try_from(expected).map_err(TaskRepositoryError::persistence)?;

    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(row.id))
            .filter(tasks::owner_id.eq(row.owner_id))
            .filter(tasks::revision.eq(expected_revision)),
    )
    .set(row)
    .execute(connection)?;
    if updated == 1 {
        return Ok(());
    }

    let stored_revision = tasks::table
        .filter(tasks::id.eq(row.id))
        .filter(tasks::owner_id.eq(row.owner_id))
        .select(tasks::revision)
        .first::<i64>(connection)
        .optional()?;
    let Some(found) = stored_revision else {
        return Err(TaskRepositoryError::NotFound(id));
    };
    Err(TaskRepositoryError::Conflict {
        id,
        expected,
        found: u64::try_from(found).map_err(TaskRepositoryError::persistence)?,
    })
}
