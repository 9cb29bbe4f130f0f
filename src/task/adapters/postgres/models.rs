//! Diesel row models for task persistence and their domain conversions.

use super::schema::{task_logs, tasks};
use crate::task::{
    domain::{
        CompletionPolicy, DurationMinutes, Effort, HourlyRate, Impact, OwnerId, PersistedTaskData,
        Task, TaskDomainError, TaskId, TaskKind, TaskLog, TaskLogId, TaskType, Title,
    },
    ports::{TaskRepositoryError, TaskRepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for task records, used for reads, inserts, and updates.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// `ending` or `endless`.
    pub task_type: String,
    /// Impact as of `last_updated`.
    pub impact: f64,
    /// Effort in hours.
    pub effort: f64,
    /// Impact growth per outstanding hour.
    pub not_doing_hourly_rate: f64,
    /// Rate-mode decay per logged hour.
    pub doing_hourly_rate: Option<f64>,
    /// Set-to-mode reset value.
    pub impact_set_to: Option<f64>,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last impact materialization timestamp.
    pub last_updated: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency revision.
    pub revision: i64,
}

/// Row model for time log records.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskLogRow {
    /// Log identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Logging timestamp.
    pub logged_at: DateTime<Utc>,
    /// Logged duration in minutes.
    pub duration_minutes: i32,
}

/// Maps a domain task to its row representation.
pub fn task_to_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    let (doing_hourly_rate, impact_set_to) = match task.completion_policy() {
        None => (None, None),
        Some(CompletionPolicy::Rate(rate)) => (Some(rate.per_hour()), None),
        Some(CompletionPolicy::SetTo(value)) => (None, Some(value.value())),
    };
    let revision = i64::try_from(task.revision()).map_err(TaskRepositoryError::persistence)?;

    Ok(TaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        task_type: task.task_type().as_str().to_owned(),
        impact: task.impact().value(),
        effort: task.effort().hours(),
        not_doing_hourly_rate: task.not_doing_hourly_rate().per_hour(),
        doing_hourly_rate,
        impact_set_to,
        deadline: task.deadline(),
        created_at: task.created_at(),
        last_updated: task.last_updated(),
        completed_at: task.completed_at(),
        revision,
    })
}

/// Rebuilds a domain task from a row, re-validating every field.
pub fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let id = TaskId::from_uuid(row.id);
    let task_type =
        TaskType::try_from(row.task_type.as_str()).map_err(TaskRepositoryError::persistence)?;
    let kind = match task_type {
        TaskType::Ending => TaskKind::Ending,
        TaskType::Endless => TaskKind::Endless {
            completion_policy: policy_from_columns(id, row.doing_hourly_rate, row.impact_set_to)
                .map_err(TaskRepositoryError::persistence)?,
        },
    };

    let data = PersistedTaskData {
        id,
        owner_id: OwnerId::from_uuid(row.owner_id),
        title: Title::new(row.title).map_err(TaskRepositoryError::persistence)?,
        description: row.description,
        kind,
        impact: Impact::new(row.impact).map_err(TaskRepositoryError::persistence)?,
        effort: Effort::new(row.effort).map_err(TaskRepositoryError::persistence)?,
        not_doing_hourly_rate: HourlyRate::new(row.not_doing_hourly_rate)
            .map_err(TaskRepositoryError::persistence)?,
        deadline: row.deadline,
        created_at: row.created_at,
        last_updated: row.last_updated,
        completed_at: row.completed_at,
        revision: u64::try_from(row.revision).map_err(TaskRepositoryError::persistence)?,
    };
    Task::from_persisted(data).map_err(TaskRepositoryError::persistence)
}

/// Resolves the endless completion mode; `impact_set_to` wins when both
/// columns are populated.
fn policy_from_columns(
    id: TaskId,
    doing_hourly_rate: Option<f64>,
    impact_set_to: Option<f64>,
) -> Result<CompletionPolicy, TaskDomainError> {
    match (impact_set_to, doing_hourly_rate) {
        (Some(value), _) => Ok(CompletionPolicy::SetTo(Impact::new(value)?)),
        (None, Some(rate)) => Ok(CompletionPolicy::Rate(HourlyRate::new(rate)?)),
        (None, None) => Err(TaskDomainError::CorruptRecord {
            id,
            reason: "endless task has no completion mode",
        }),
    }
}

/// Maps a domain log to its row representation.
pub fn log_to_row(log: &TaskLog) -> TaskRepositoryResult<TaskLogRow> {
    let duration_minutes = i32::try_from(log.duration_minutes().minutes())
        .map_err(TaskRepositoryError::persistence)?;
    Ok(TaskLogRow {
        id: log.id().into_inner(),
        task_id: log.task_id().into_inner(),
        logged_at: log.logged_at(),
        duration_minutes,
    })
}

/// Rebuilds a domain log from a row.
pub fn row_to_log(row: TaskLogRow) -> TaskRepositoryResult<TaskLog> {
    let duration = DurationMinutes::new(i64::from(row.duration_minutes))
        .map_err(TaskRepositoryError::persistence)?;
    Ok(TaskLog::from_persisted(
        TaskLogId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        row.logged_at,
        duration,
    ))
}
