//! Shared world state for task completion BDD scenarios.

use std::sync::Arc;

use busyness::task::{
    adapters::memory::{InMemoryTaskRepository, ManualClock},
    domain::{OwnerId, ScoredTask, TaskId},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use chrono::{TimeZone, Utc};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, ManualClock>;

/// Scenario world for task completion behaviour tests.
pub struct TaskCompletionWorld {
    pub service: TestTaskService,
    pub owner: OwnerId,
    pub current_task: Option<ScoredTask>,
    pub last_completion_result: Option<Result<ScoredTask, TaskLifecycleError>>,
}

impl TaskCompletionWorld {
    /// Creates a world with a frozen clock and no tasks.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 5, 4, 7, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(ManualClock::new(start)),
        );

        Self {
            service,
            owner: OwnerId::new(),
            current_task: None,
            last_completion_result: None,
        }
    }

    /// Returns the identifier of the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.current_task
            .as_ref()
            .map(|scored| scored.task().id())
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the latest known state of the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&ScoredTask, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskCompletionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskCompletionWorld {
    TaskCompletionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
