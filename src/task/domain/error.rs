//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the maximum length.
    #[error("task title must be at most {max} characters, got {actual}")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
        /// Length of the rejected title.
        actual: usize,
    },

    /// Impact values must be finite and within `[0, 10]`.
    #[error("impact must be between 0 and 10, got {0}")]
    ImpactOutOfRange(f64),

    /// Effort must be finite, positive, and bounded.
    #[error("effort must be greater than 0 and at most 1000 hours, got {0}")]
    InvalidEffort(f64),

    /// Hourly rates must be finite and non-negative.
    #[error("hourly rate must be a non-negative number, got {0}")]
    InvalidHourlyRate(f64),

    /// Logged durations must be a positive number of minutes no larger than
    /// `i32::MAX`.
    #[error("duration_minutes must be a positive integer up to 2147483647, got {0}")]
    InvalidDuration(i64),

    /// Completing an endless task requires a logged duration.
    #[error("duration_minutes is required for endless tasks")]
    DurationRequired,

    /// Both completion modes were supplied at once.
    #[error("doing_hourly_rate and impact_set_to are mutually exclusive")]
    ConflictingCompletionPolicy,

    /// An update attempted to change the task type.
    #[error("task type is fixed at creation and cannot change from {from} to {to}")]
    TaskTypeImmutable {
        /// Stored task type.
        from: &'static str,
        /// Requested task type.
        to: &'static str,
    },

    /// The ending task has already reached its terminal state.
    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),

    /// A persisted record violates the task invariants.
    #[error("corrupt task record {id}: {reason}")]
    CorruptRecord {
        /// Identifier of the offending task.
        id: TaskId,
        /// Violated invariant.
        reason: &'static str,
    },
}

impl TaskDomainError {
    /// Returns `true` when the error reports an illegal lifecycle transition
    /// rather than malformed input.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::AlreadyCompleted(_))
    }
}

/// Error returned while parsing task types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);
