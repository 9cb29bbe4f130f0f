//! Time log entries recorded by completion events.

use super::{DurationMinutes, TaskId, TaskLogId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Immutable record of time spent on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskLog {
    id: TaskLogId,
    task_id: TaskId,
    logged_at: DateTime<Utc>,
    duration_minutes: DurationMinutes,
}

impl TaskLog {
    /// Creates a log entry for `task_id`.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        duration_minutes: DurationMinutes,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskLogId::new(),
            task_id,
            logged_at,
            duration_minutes,
        }
    }

    /// Reconstructs a log entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: TaskLogId,
        task_id: TaskId,
        logged_at: DateTime<Utc>,
        duration_minutes: DurationMinutes,
    ) -> Self {
        Self {
            id,
            task_id,
            logged_at,
            duration_minutes,
        }
    }

    /// Returns the log identifier.
    #[must_use]
    pub const fn id(&self) -> TaskLogId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns when the activity was logged.
    #[must_use]
    pub const fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }

    /// Returns the logged duration.
    #[must_use]
    pub const fn duration_minutes(&self) -> DurationMinutes {
        self.duration_minutes
    }
}
