//! Task aggregate root and related lifecycle types.

use super::{
    DurationMinutes, Effort, HourlyRate, Impact, OwnerId, ParseTaskTypeError, TaskDomainError,
    TaskId, TaskLog, Title,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Whether a task reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// One-shot task that is completed once.
    Ending,
    /// Recurring task that only accumulates logged activity.
    Endless,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ending => "ending",
            Self::Endless => "endless",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ending" => Ok(Self::Ending),
            "endless" => Ok(Self::Endless),
            _ => Err(ParseTaskTypeError(value.to_owned())),
        }
    }
}

/// How an endless task's impact reacts to logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Impact decreases by the rate for each logged hour.
    Rate(HourlyRate),
    /// Impact is reset to a fixed value on every log.
    SetTo(Impact),
}

/// Type-specific task state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task_type", rename_all = "snake_case")]
pub enum TaskKind {
    /// One-shot task.
    Ending,
    /// Recurring task with its completion policy.
    Endless {
        /// Impact mutation applied on each log.
        completion_policy: CompletionPolicy,
    },
}

impl TaskKind {
    /// Returns the task type discriminant.
    #[must_use]
    pub const fn task_type(self) -> TaskType {
        match self {
            Self::Ending => TaskType::Ending,
            Self::Endless { .. } => TaskType::Endless,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: TaskId,
    owner_id: OwnerId,
    title: Title,
    description: Option<String>,
    #[serde(flatten)]
    kind: TaskKind,
    impact: Impact,
    effort: Effort,
    not_doing_hourly_rate: HourlyRate,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    revision: u64,
}

/// Validated fields for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskData {
    /// Owner of the new task.
    pub owner_id: OwnerId,
    /// Task title.
    pub title: Title,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Type and completion policy, fixed from now on.
    pub kind: TaskKind,
    /// Initial impact.
    pub impact: Impact,
    /// Effort in hours.
    pub effort: Effort,
    /// Impact growth per outstanding hour.
    pub not_doing_hourly_rate: HourlyRate,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner_id: OwnerId,
    /// Persisted title.
    pub title: Title,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted type and completion policy.
    pub kind: TaskKind,
    /// Impact as of `last_updated`.
    pub impact: Impact,
    /// Persisted effort.
    pub effort: Effort,
    /// Persisted growth rate.
    pub not_doing_hourly_rate: HourlyRate,
    /// Persisted deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp at which `impact` was last materialized.
    pub last_updated: DateTime<Utc>,
    /// Completion timestamp for ending tasks.
    pub completed_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency revision.
    pub revision: u64,
}

/// Validated partial update of a task's mutable fields.
///
/// `None` leaves a field untouched. The nested options on `description` and
/// `deadline` distinguish clearing (`Some(None)`) from leaving as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<Title>,
    /// New or cleared description.
    pub description: Option<Option<String>>,
    /// Task type echoed by the caller; must match the stored type.
    pub task_type: Option<TaskType>,
    /// New impact, replacing any accrued growth.
    pub impact: Option<Impact>,
    /// New effort.
    pub effort: Option<Effort>,
    /// New growth rate.
    pub not_doing_hourly_rate: Option<HourlyRate>,
    /// New completion policy; ignored for ending tasks.
    pub completion_policy: Option<CompletionPolicy>,
    /// New or cleared deadline.
    pub deadline: Option<Option<DateTime<Utc>>>,
}

impl Task {
    /// Creates a new task stamped with the current clock time.
    #[must_use]
    pub fn create(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner_id: data.owner_id,
            title: data.title,
            description: data.description,
            kind: data.kind,
            impact: data.impact,
            effort: data.effort,
            not_doing_hourly_rate: data.not_doing_hourly_rate,
            deadline: data.deadline,
            created_at: timestamp,
            last_updated: timestamp,
            completed_at: None,
            revision: 0,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CorruptRecord`] when an endless task carries
    /// a completion timestamp.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        if matches!(data.kind, TaskKind::Endless { .. }) && data.completed_at.is_some() {
            return Err(TaskDomainError::CorruptRecord {
                id: data.id,
                reason: "endless task has a completion timestamp",
            });
        }

        Ok(Self {
            id: data.id,
            owner_id: data.owner_id,
            title: data.title,
            description: data.description,
            kind: data.kind,
            impact: data.impact,
            effort: data.effort,
            not_doing_hourly_rate: data.not_doing_hourly_rate,
            deadline: data.deadline,
            created_at: data.created_at,
            last_updated: data.last_updated,
            completed_at: data.completed_at,
            revision: data.revision,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the type-specific state.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.kind.task_type()
    }

    /// Returns the completion policy of an endless task.
    #[must_use]
    pub const fn completion_policy(&self) -> Option<CompletionPolicy> {
        match self.kind {
            TaskKind::Ending => None,
            TaskKind::Endless { completion_policy } => Some(completion_policy),
        }
    }

    /// Returns the impact as of [`Task::last_updated`].
    ///
    /// Use [`Task::effective_impact`] for the value including growth since.
    #[must_use]
    pub const fn impact(&self) -> Impact {
        self.impact
    }

    /// Returns the effort.
    #[must_use]
    pub const fn effort(&self) -> Effort {
        self.effort
    }

    /// Returns the impact growth per outstanding hour.
    #[must_use]
    pub const fn not_doing_hourly_rate(&self) -> HourlyRate {
        self.not_doing_hourly_rate
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp at which impact was last materialized.
    #[must_use]
    pub const fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Returns the completion timestamp of an ending task.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the optimistic concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` unless the task is a completed ending task.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Returns the impact including growth accrued up to `at`.
    ///
    /// Growth stops at completion for ending tasks.
    #[must_use]
    pub fn effective_impact(&self, at: DateTime<Utc>) -> Impact {
        let until = self.completed_at.map_or(at, |completed_at| completed_at.min(at));
        let hours = hours_between(self.last_updated, until);
        Impact::clamped(self.impact.value() + self.not_doing_hourly_rate.per_hour() * hours)
    }

    /// Applies a validated partial update.
    ///
    /// Accrued growth is folded into `impact` before the patch is applied so
    /// resetting `last_updated` loses nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for a completed ending
    /// task and [`TaskDomainError::TaskTypeImmutable`] when the patch names a
    /// different task type. The task is unchanged on error.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_active()?;
        if let Some(requested) = patch.task_type {
            let current = self.task_type();
            if requested != current {
                return Err(TaskDomainError::TaskTypeImmutable {
                    from: current.as_str(),
                    to: requested.as_str(),
                });
            }
        }

        let now = clock.utc();
        self.impact = self.effective_impact(now);

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(impact) = patch.impact {
            self.impact = impact;
        }
        if let Some(effort) = patch.effort {
            self.effort = effort;
        }
        if let Some(rate) = patch.not_doing_hourly_rate {
            self.not_doing_hourly_rate = rate;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        if let (Some(policy), TaskKind::Endless { completion_policy }) =
            (patch.completion_policy, &mut self.kind)
        {
            *completion_policy = policy;
        }

        self.last_updated = now;
        self.bump_revision();
        Ok(())
    }

    /// Records a completion event.
    ///
    /// Ending tasks become terminal and keep their impact; a duration, when
    /// given, yields a historical log. Endless tasks require a duration,
    /// always yield a log, and have their impact mutated by the completion
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for a completed ending
    /// task and [`TaskDomainError::DurationRequired`] for an endless task
    /// without a duration. The task is unchanged on error.
    pub fn complete(
        &mut self,
        duration: Option<DurationMinutes>,
        clock: &impl Clock,
    ) -> Result<Option<TaskLog>, TaskDomainError> {
        match self.kind {
            TaskKind::Ending => {
                self.ensure_active()?;
                let now = clock.utc();
                self.completed_at = Some(now);
                self.bump_revision();
                Ok(duration.map(|minutes| TaskLog::new(self.id, minutes, now)))
            }
            TaskKind::Endless { completion_policy } => {
                let minutes = duration.ok_or(TaskDomainError::DurationRequired)?;
                let now = clock.utc();
                let accrued = self.effective_impact(now);
                self.impact = match completion_policy {
                    CompletionPolicy::Rate(rate) => {
                        Impact::clamped(accrued.value() - rate.per_hour() * minutes.hours())
                    }
                    CompletionPolicy::SetTo(value) => value,
                };
                self.last_updated = now;
                self.bump_revision();
                Ok(Some(TaskLog::new(self.id, minutes, now)))
            }
        }
    }

    fn ensure_active(&self) -> Result<(), TaskDomainError> {
        if self.completed_at.is_some() {
            return Err(TaskDomainError::AlreadyCompleted(self.id));
        }
        Ok(())
    }

    const fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}

/// Returns the non-negative number of hours from `from` to `to`.
pub(super) fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    const MILLIS_PER_HOUR: f64 = 3_600_000.0;
    let millis = (to - from).num_milliseconds().max(0);
    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond spans of realistic task lifetimes stay well below 2^53"
    )]
    let elapsed = millis as f64;
    elapsed / MILLIS_PER_HOUR
}
