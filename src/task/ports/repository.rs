//! Repository port for task and time log persistence.

use crate::task::domain::{OwnerId, Task, TaskId, TaskLog};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Selects which of an owner's tasks to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    /// Endless tasks and ending tasks without a completion timestamp.
    Active,
    /// Ending tasks with a completion timestamp.
    Completed,
    /// Every task.
    All,
}

impl TaskFilter {
    /// Returns `true` when `task` passes the filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::Active => task.is_active(),
            Self::Completed => !task.is_active(),
            Self::All => true,
        }
    }
}

/// Task persistence contract.
///
/// Task lookups are scoped to an owner: a task owned by someone else is
/// reported exactly like a missing one.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// The write is accepted only when the stored revision is exactly one
    /// below `task.revision()`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Conflict`] when another write got there
    /// first.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task and appends a log atomically.
    ///
    /// # Errors
    ///
    /// Same as [`TaskRepository::update`]; on error neither the task nor the
    /// log is written.
    async fn update_with_log(&self, task: &Task, log: &TaskLog) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier within the owner's tasks.
    ///
    /// Returns `None` when the task does not exist or belongs to another
    /// owner.
    async fn find_by_id(&self, owner: OwnerId, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds a task and its logs, oldest first, as one consistent read.
    ///
    /// Returns `None` when the task does not exist or belongs to another
    /// owner; a concurrent delete never yields a task without its logs.
    async fn find_with_logs(
        &self,
        owner: OwnerId,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<(Task, Vec<TaskLog>)>>;

    /// Returns the owner's tasks that pass `filter`, in no particular order.
    async fn list_by_owner(
        &self,
        owner: OwnerId,
        filter: TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task together with all of its logs.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or belongs to another owner.
    async fn delete(&self, owner: OwnerId, id: TaskId) -> TaskRepositoryResult<()>;

    /// Appends a log entry to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the owning task does not
    /// exist.
    async fn append_log(&self, log: &TaskLog) -> TaskRepositoryResult<()>;

    /// Returns the task's logs ordered by `logged_at` ascending.
    async fn list_logs(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskLog>>;

    /// Deletes every log of a task.
    async fn delete_logs(&self, task_id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored revision does not precede the incoming one.
    #[error("concurrent modification of task {id}: expected revision {expected}, found {found}")]
    Conflict {
        /// Task being written.
        id: TaskId,
        /// Revision the writer based its change on.
        expected: u64,
        /// Revision currently stored.
        found: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Returns the revision a stored task must have for `task` to replace it.
#[must_use]
pub const fn expected_previous_revision(task: &Task) -> u64 {
    task.revision().saturating_sub(1)
}
