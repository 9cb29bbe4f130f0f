//! Request and response shapes exchanged with callers of the lifecycle
//! service.
//!
//! Requests carry raw caller input; conversion into domain values is where
//! field validation happens.

use super::CreationDefaults;
use crate::task::domain::{
    CompletionPolicy, Effort, HourlyRate, Impact, NewTaskData, OwnerId, ScoredTask,
    TaskDomainError, TaskKind, TaskLog, TaskPatch, TaskType, Title,
};
use chrono::{DateTime, Utc};

/// Request payload for creating a task.
///
/// `doing_hourly_rate` and `impact_set_to` select mutually exclusive
/// completion modes. Supplying both is rejected for every task type; an
/// ending task range-checks whichever one it gets and then ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    title: String,
    task_type: TaskType,
    description: Option<String>,
    impact: Option<f64>,
    effort: Option<f64>,
    not_doing_hourly_rate: Option<f64>,
    doing_hourly_rate: Option<f64>,
    impact_set_to: Option<f64>,
    deadline: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            title: title.into(),
            task_type,
            description: None,
            impact: None,
            effort: None,
            not_doing_hourly_rate: None,
            doing_hourly_rate: None,
            impact_set_to: None,
            deadline: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial impact.
    #[must_use]
    pub const fn with_impact(mut self, impact: f64) -> Self {
        self.impact = Some(impact);
        self
    }

    /// Sets the effort in hours.
    #[must_use]
    pub const fn with_effort(mut self, hours: f64) -> Self {
        self.effort = Some(hours);
        self
    }

    /// Sets the impact growth per outstanding hour.
    #[must_use]
    pub const fn with_not_doing_hourly_rate(mut self, rate: f64) -> Self {
        self.not_doing_hourly_rate = Some(rate);
        self
    }

    /// Selects rate mode with the given decay per logged hour.
    #[must_use]
    pub const fn with_doing_hourly_rate(mut self, rate: f64) -> Self {
        self.doing_hourly_rate = Some(rate);
        self
    }

    /// Selects set-to mode with the given reset value.
    #[must_use]
    pub const fn with_impact_set_to(mut self, impact: f64) -> Self {
        self.impact_set_to = Some(impact);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Validates the request and fills omitted fields from `defaults`.
    pub(crate) fn into_new_task(
        self,
        owner_id: OwnerId,
        defaults: &CreationDefaults,
    ) -> Result<NewTaskData, TaskDomainError> {
        let title = Title::new(self.title)?;
        let impact = self.impact.map_or(Ok(defaults.impact), Impact::new)?;
        let effort = self.effort.map_or(Ok(defaults.effort), Effort::new)?;
        let not_doing_hourly_rate = self
            .not_doing_hourly_rate
            .map_or(Ok(defaults.not_doing_hourly_rate), HourlyRate::new)?;
        let policy = completion_policy(self.doing_hourly_rate, self.impact_set_to)?;

        let kind = match self.task_type {
            TaskType::Ending => TaskKind::Ending,
            TaskType::Endless => TaskKind::Endless {
                completion_policy: policy
                    .unwrap_or(CompletionPolicy::Rate(defaults.doing_hourly_rate)),
            },
        };

        Ok(NewTaskData {
            owner_id,
            title,
            description: self.description,
            kind,
            impact,
            effort,
            not_doing_hourly_rate,
            deadline: self.deadline,
        })
    }
}

/// Request payload for a partial task update.
///
/// As on creation, supplying both completion-mode fields is rejected
/// regardless of the stored task's type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<Option<String>>,
    task_type: Option<TaskType>,
    impact: Option<f64>,
    effort: Option<f64>,
    not_doing_hourly_rate: Option<f64>,
    doing_hourly_rate: Option<f64>,
    impact_set_to: Option<f64>,
    deadline: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Removes the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Echoes the task type; an update naming a different type is rejected.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    /// Replaces the impact.
    #[must_use]
    pub const fn with_impact(mut self, impact: f64) -> Self {
        self.impact = Some(impact);
        self
    }

    /// Replaces the effort in hours.
    #[must_use]
    pub const fn with_effort(mut self, hours: f64) -> Self {
        self.effort = Some(hours);
        self
    }

    /// Replaces the impact growth per outstanding hour.
    #[must_use]
    pub const fn with_not_doing_hourly_rate(mut self, rate: f64) -> Self {
        self.not_doing_hourly_rate = Some(rate);
        self
    }

    /// Switches an endless task to rate mode.
    #[must_use]
    pub const fn with_doing_hourly_rate(mut self, rate: f64) -> Self {
        self.doing_hourly_rate = Some(rate);
        self
    }

    /// Switches an endless task to set-to mode.
    #[must_use]
    pub const fn with_impact_set_to(mut self, impact: f64) -> Self {
        self.impact_set_to = Some(impact);
        self
    }

    /// Replaces the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(Some(deadline));
        self
    }

    /// Removes the deadline.
    #[must_use]
    pub const fn clear_deadline(mut self) -> Self {
        self.deadline = Some(None);
        self
    }

    /// Validates every supplied field.
    pub(crate) fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        Ok(TaskPatch {
            title: self.title.map(Title::new).transpose()?,
            description: self.description,
            task_type: self.task_type,
            impact: self.impact.map(Impact::new).transpose()?,
            effort: self.effort.map(Effort::new).transpose()?,
            not_doing_hourly_rate: self
                .not_doing_hourly_rate
                .map(HourlyRate::new)
                .transpose()?,
            completion_policy: completion_policy(self.doing_hourly_rate, self.impact_set_to)?,
            deadline: self.deadline,
        })
    }
}

/// Optional time log attached to a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTimeRequest {
    duration_minutes: i64,
}

impl LogTimeRequest {
    /// Creates a log request for `duration_minutes` of activity.
    #[must_use]
    pub const fn new(duration_minutes: i64) -> Self {
        Self { duration_minutes }
    }

    /// Returns the raw duration in minutes.
    #[must_use]
    pub const fn duration_minutes(self) -> i64 {
        self.duration_minutes
    }
}

/// A scored task together with its time logs.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskWithHistory {
    task: ScoredTask,
    logs: Vec<TaskLog>,
}

impl TaskWithHistory {
    pub(crate) const fn new(task: ScoredTask, logs: Vec<TaskLog>) -> Self {
        Self { task, logs }
    }

    /// Returns the scored task.
    #[must_use]
    pub const fn task(&self) -> &ScoredTask {
        &self.task
    }

    /// Returns the logs ordered by `logged_at` ascending.
    #[must_use]
    pub fn logs(&self) -> &[TaskLog] {
        &self.logs
    }
}

/// Maps the two optional completion-mode fields onto a policy.
fn completion_policy(
    doing_hourly_rate: Option<f64>,
    impact_set_to: Option<f64>,
) -> Result<Option<CompletionPolicy>, TaskDomainError> {
    match (doing_hourly_rate, impact_set_to) {
        (Some(_), Some(_)) => Err(TaskDomainError::ConflictingCompletionPolicy),
        (Some(rate), None) => Ok(Some(CompletionPolicy::Rate(HourlyRate::new(rate)?))),
        (None, Some(value)) => Ok(Some(CompletionPolicy::SetTo(Impact::new(value)?))),
        (None, None) => Ok(None),
    }
}
