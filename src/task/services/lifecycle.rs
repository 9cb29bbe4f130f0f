//! Lifecycle manager: the only writer of task and time log records.

use super::{CreateTaskRequest, LogTimeRequest, TaskWithHistory, UpdateTaskRequest};
use crate::task::{
    domain::{
        DurationMinutes, Effort, HourlyRate, Impact, OwnerId, PriorityModel, ScoredTask, Task,
        TaskDomainError, TaskId, TaskLog,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Caller input was malformed or out of range.
    #[error(transparent)]
    Validation(TaskDomainError),
    /// The requested transition is illegal in the task's current state.
    #[error(transparent)]
    InvalidState(TaskDomainError),
    /// The task does not exist or belongs to another owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The record store failed.
    #[error(transparent)]
    Storage(TaskRepositoryError),
}

impl From<TaskDomainError> for TaskLifecycleError {
    fn from(err: TaskDomainError) -> Self {
        if err.is_invalid_state() {
            Self::InvalidState(err)
        } else {
            Self::Validation(err)
        }
    }
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Values applied to fields omitted at task creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreationDefaults {
    /// Initial impact.
    pub impact: Impact,
    /// Effort in hours.
    pub effort: Effort,
    /// Impact growth per outstanding hour.
    pub not_doing_hourly_rate: HourlyRate,
    /// Rate-mode decay for endless tasks created without a completion mode.
    pub doing_hourly_rate: HourlyRate,
}

impl Default for CreationDefaults {
    fn default() -> Self {
        Self {
            impact: Impact::DEFAULT,
            effort: Effort::DEFAULT,
            not_doing_hourly_rate: HourlyRate::DEFAULT,
            doing_hourly_rate: HourlyRate::DEFAULT,
        }
    }
}

/// Tunables of the lifecycle service.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LifecyclePolicy {
    /// Creation defaults.
    pub defaults: CreationDefaults,
    /// Priority engine parameters.
    pub priority: PriorityModel,
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    policy: LifecyclePolicy,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service with default tunables.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            policy: LifecyclePolicy::default(),
        }
    }

    /// Replaces the service tunables.
    #[must_use]
    pub fn with_policy(mut self, policy: LifecyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the priority model used to score tasks.
    #[must_use]
    pub const fn priority_model(&self) -> &PriorityModel {
        &self.policy.priority
    }

    /// Creates a task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when a field is rejected and
    /// [`TaskLifecycleError::Storage`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner_id = %owner))]
    pub async fn create_task(
        &self,
        owner: OwnerId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<ScoredTask> {
        let data = request.into_new_task(owner, &self.policy.defaults)?;
        let task = Task::create(data, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(
            task_id = %task.id(),
            task_type = task.task_type().as_str(),
            "task created"
        );
        Ok(self.annotate(task))
    }

    /// Applies a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task,
    /// [`TaskLifecycleError::Validation`] for rejected fields or a changed
    /// task type, [`TaskLifecycleError::InvalidState`] for a completed ending
    /// task, and [`TaskLifecycleError::Storage`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner_id = %owner, task_id = %id))]
    pub async fn update_task(
        &self,
        owner: OwnerId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<ScoredTask> {
        let patch = request.into_patch()?;
        let mut task = self.load(owner, id).await?;
        task.apply_patch(patch, &*self.clock)?;
        self.repository.update(&task).await?;
        tracing::info!(revision = task.revision(), "task updated");
        Ok(self.annotate(task))
    }

    /// Completes an ending task or logs time against an endless task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task,
    /// [`TaskLifecycleError::Validation`] for a non-positive duration or an
    /// endless task without one, [`TaskLifecycleError::InvalidState`] for an
    /// already completed ending task, and [`TaskLifecycleError::Storage`]
    /// when persistence fails. Nothing is written on error.
    #[tracing::instrument(skip_all, fields(owner_id = %owner, task_id = %id))]
    pub async fn complete_task(
        &self,
        owner: OwnerId,
        id: TaskId,
        log: Option<LogTimeRequest>,
    ) -> TaskLifecycleResult<ScoredTask> {
        let duration = log
            .map(|request| DurationMinutes::new(request.duration_minutes()))
            .transpose()?;
        let mut task = self.load(owner, id).await?;
        let entry = task.complete(duration, &*self.clock)?;
        match entry {
            Some(ref entry) => self.repository.update_with_log(&task, entry).await?,
            None => self.repository.update(&task).await?,
        }
        tracing::info!(
            task_type = task.task_type().as_str(),
            impact = task.impact().value(),
            logged_minutes = entry.map(|logged| logged.duration_minutes().minutes()),
            "task completed"
        );
        Ok(self.annotate(task))
    }

    /// Deletes a task and all of its logs.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task and
    /// [`TaskLifecycleError::Storage`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner_id = %owner, task_id = %id))]
    pub async fn delete_task(&self, owner: OwnerId, id: TaskId) -> TaskLifecycleResult<()> {
        self.repository.delete(owner, id).await?;
        tracing::info!("task deleted");
        Ok(())
    }

    /// Lists active tasks by descending priority, oldest first on ties.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Storage`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner_id = %owner))]
    pub async fn list_active_tasks(
        &self,
        owner: OwnerId,
    ) -> TaskLifecycleResult<Vec<ScoredTask>> {
        let tasks = self
            .repository
            .list_by_owner(owner, TaskFilter::Active)
            .await?;
        let ranked = self.policy.priority.rank(tasks, self.clock.utc());
        tracing::debug!(count = ranked.len(), "listed active tasks");
        Ok(ranked)
    }

    /// Lists completed ending tasks, most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Storage`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner_id = %owner))]
    pub async fn list_completed_tasks(
        &self,
        owner: OwnerId,
    ) -> TaskLifecycleResult<Vec<ScoredTask>> {
        let mut tasks = self
            .repository
            .list_by_owner(owner, TaskFilter::Completed)
            .await?;
        tasks.sort_by(|left, right| {
            right
                .completed_at()
                .cmp(&left.completed_at())
                .then_with(|| left.id().cmp(&right.id()))
        });
        tracing::debug!(count = tasks.len(), "listed completed tasks");
        Ok(tasks.into_iter().map(|task| self.annotate(task)).collect())
    }

    /// Returns a task with its logs ordered by `logged_at` ascending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task and
    /// [`TaskLifecycleError::Storage`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner_id = %owner, task_id = %id))]
    pub async fn get_task_with_history(
        &self,
        owner: OwnerId,
        id: TaskId,
    ) -> TaskLifecycleResult<TaskWithHistory> {
        let (task, logs) = self.load_with_logs(owner, id).await?;
        Ok(TaskWithHistory::new(self.annotate(task), logs))
    }

    /// Returns a task's logs, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task and
    /// [`TaskLifecycleError::Storage`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner_id = %owner, task_id = %id))]
    pub async fn list_task_logs(
        &self,
        owner: OwnerId,
        id: TaskId,
    ) -> TaskLifecycleResult<Vec<TaskLog>> {
        let (_, mut logs) = self.load_with_logs(owner, id).await?;
        logs.reverse();
        Ok(logs)
    }

    async fn load(&self, owner: OwnerId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(owner, id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    async fn load_with_logs(
        &self,
        owner: OwnerId,
        id: TaskId,
    ) -> TaskLifecycleResult<(Task, Vec<TaskLog>)> {
        self.repository
            .find_with_logs(owner, id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    fn annotate(&self, task: Task) -> ScoredTask {
        self.policy.priority.annotate(task, self.clock.utc())
    }
}
