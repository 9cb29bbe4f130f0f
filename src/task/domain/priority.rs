//! Priority engine: ranks tasks by a time-dependent score.
//!
//! The score is never stored. It is a pure function of a task record and an
//! evaluation instant:
//!
//! 1. Effective impact adds growth accrued since `last_updated`.
//! 2. The base value is impact per hour of effort.
//! 3. A future deadline multiplies the base by `1 + 1 / days_remaining`.
//! 4. A reached or passed deadline lifts the score above every score a
//!    non-overdue task can reach and keeps growing with time overdue.

use super::{Impact, Task, task::hours_between};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

const HOURS_PER_DAY: f64 = 24.0;

/// Sortable priority value; higher is more urgent.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct PriorityScore(f64);

impl PriorityScore {
    /// Returns the unrounded score used for ordering.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns the score rounded to one decimal place for display.
    #[must_use]
    pub fn display_value(self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }
}

impl PartialEq for PriorityScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriorityScore {}

impl PartialOrd for PriorityScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Task annotated with its priority score at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    task: Task,
    priority_score: PriorityScore,
}

impl ScoredTask {
    /// Returns the scored task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the priority score.
    #[must_use]
    pub const fn priority_score(&self) -> PriorityScore {
        self.priority_score
    }

    /// Consumes the wrapper and returns the task.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }
}

/// Tunable parameters of the priority formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityModel {
    effort_floor: f64,
    deadline_floor_days: f64,
}

impl Default for PriorityModel {
    fn default() -> Self {
        Self {
            effort_floor: 0.1,
            deadline_floor_days: 0.1,
        }
    }
}

impl PriorityModel {
    /// Creates a model from already validated settings.
    ///
    /// Both values must be finite and positive.
    pub(crate) const fn new(effort_floor: f64, deadline_floor_days: f64) -> Self {
        Self {
            effort_floor,
            deadline_floor_days,
        }
    }

    /// Returns the minimum effort used as divisor.
    #[must_use]
    pub const fn effort_floor(&self) -> f64 {
        self.effort_floor
    }

    /// Returns the minimum days-to-deadline used as divisor.
    #[must_use]
    pub const fn deadline_floor_days(&self) -> f64 {
        self.deadline_floor_days
    }

    /// Scores `task` as of `now`.
    ///
    /// Completed ending tasks are evaluated at their completion instant.
    #[must_use]
    pub fn score(&self, task: &Task, now: DateTime<Utc>) -> PriorityScore {
        let at = task
            .completed_at()
            .map_or(now, |completed_at| completed_at.min(now));
        let effort = task.effort().hours().max(self.effort_floor);
        let base = task.effective_impact(at).value() / effort;

        let Some(deadline) = task.deadline() else {
            return PriorityScore(base);
        };

        if deadline > at {
            let days_remaining =
                (hours_between(at, deadline) / HOURS_PER_DAY).max(self.deadline_floor_days);
            return PriorityScore(base * (1.0 + 1.0 / days_remaining));
        }

        let days_overdue = hours_between(deadline, at) / HOURS_PER_DAY;
        PriorityScore(self.overdue_floor() + base * (1.0 + days_overdue) + days_overdue)
    }

    /// Scores every task and sorts by descending score, oldest first on ties.
    #[must_use]
    pub fn rank(&self, tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<ScoredTask> {
        let mut scored: Vec<ScoredTask> = tasks
            .into_iter()
            .map(|task| self.annotate(task, now))
            .collect();
        scored.sort_by(|left, right| {
            right
                .priority_score
                .cmp(&left.priority_score)
                .then_with(|| left.task.created_at().cmp(&right.task.created_at()))
                .then_with(|| left.task.id().cmp(&right.task.id()))
        });
        scored
    }

    /// Attaches the score of `task` as of `now`.
    #[must_use]
    pub fn annotate(&self, task: Task, now: DateTime<Utc>) -> ScoredTask {
        let priority_score = self.score(&task, now);
        ScoredTask {
            task,
            priority_score,
        }
    }

    /// Strict upper bound on the score of any task whose deadline has not
    /// been reached.
    fn overdue_floor(&self) -> f64 {
        let max_base = Impact::MAX.value() / self.effort_floor;
        max_base * (1.0 + 1.0 / self.deadline_floor_days) + 1.0
    }
}
