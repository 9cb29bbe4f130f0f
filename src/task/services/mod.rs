//! Application services for task lifecycle orchestration.

mod lifecycle;
mod requests;

pub use lifecycle::{
    CreationDefaults, LifecyclePolicy, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
pub use requests::{CreateTaskRequest, LogTimeRequest, TaskWithHistory, UpdateTaskRequest};
