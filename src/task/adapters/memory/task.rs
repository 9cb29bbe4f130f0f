//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{OwnerId, Task, TaskId, TaskLog},
    ports::{
        TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        expected_previous_revision,
    },
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    logs: HashMap<TaskId, Vec<TaskLog>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Verifies that `task` may replace the stored record.
fn check_revision(state: &InMemoryTaskState, task: &Task) -> TaskRepositoryResult<()> {
    let stored = state
        .tasks
        .get(&task.id())
        .filter(|stored| stored.owner_id() == task.owner_id())
        .ok_or(TaskRepositoryError::NotFound(task.id()))?;
    let expected = expected_previous_revision(task);
    if stored.revision() != expected {
        return Err(TaskRepositoryError::Conflict {
            id: task.id(),
            expected,
            found: stored.revision(),
        });
    }
    Ok(())
}

/// Inserts a log keeping the per-task list ordered by `logged_at`.
fn insert_log(state: &mut InMemoryTaskState, log: TaskLog) {
    let logs = state.logs.entry(log.task_id()).or_default();
    let position = logs.partition_point(|existing| existing.logged_at() <= log.logged_at());
    logs.insert(position, log);
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        check_revision(&state, task)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_with_log(&self, task: &Task, log: &TaskLog) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        check_revision(&state, task)?;
        state.tasks.insert(task.id(), task.clone());
        insert_log(&mut state, *log);
        Ok(())
    }

    async fn find_by_id(&self, owner: OwnerId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| task.owner_id() == owner)
            .cloned())
    }

    async fn find_with_logs(
        &self,
        owner: OwnerId,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<(Task, Vec<TaskLog>)>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| task.owner_id() == owner)
            .map(|task| {
                let logs = state.logs.get(&id).cloned().unwrap_or_default();
                (task.clone(), logs)
            }))
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        filter: TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.owner_id() == owner && filter.matches(task))
            .cloned()
            .collect())
    }

    async fn delete(&self, owner: OwnerId, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let owned = state
            .tasks
            .get(&id)
            .is_some_and(|task| task.owner_id() == owner);
        if !owned {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.tasks.remove(&id);
        state.logs.remove(&id);
        Ok(())
    }

    async fn append_log(&self, log: &TaskLog) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&log.task_id()) {
            return Err(TaskRepositoryError::NotFound(log.task_id()));
        }
        insert_log(&mut state, *log);
        Ok(())
    }

    async fn list_logs(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskLog>> {
        let state = self.read()?;
        Ok(state.logs.get(&task_id).cloned().unwrap_or_default())
    }

    async fn delete_logs(&self, task_id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.logs.remove(&task_id);
        Ok(())
    }
}
