//! Domain model for prioritized task tracking.
//!
//! Tasks, their time logs, the validated scalars they are built from, and the
//! priority engine that ranks them. Infrastructure concerns stay outside of
//! the domain boundary.

mod error;
mod ids;
mod log;
mod priority;
mod task;
mod values;

pub use error::{ParseTaskTypeError, TaskDomainError};
pub use ids::{OwnerId, TaskId, TaskLogId};
pub use log::TaskLog;
pub use priority::{PriorityModel, PriorityScore, ScoredTask};
pub use task::{
    CompletionPolicy, NewTaskData, PersistedTaskData, Task, TaskKind, TaskPatch, TaskType,
};
pub use values::{DurationMinutes, Effort, HourlyRate, Impact, Title};
