//! Unit tests for the task module.


use crate::task::{
    adapters::memory::ManualClock,
    domain::{
        CompletionPolicy, Effort, HourlyRate, Impact, NewTaskData, OwnerId, Task, TaskKind, Title,
    },
};
use chrono::{DateTime, TimeZone, Utc};

/// Fixed instant every test clock starts from.
pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 18, 9, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

pub(super) fn clock_at_epoch() -> ManualClock {
    ManualClock::new(epoch())
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Builder for domain tasks with explicit numeric fields.
pub(super) struct TaskSpec {
    pub kind: TaskKind,
    pub impact: f64,
    pub effort: f64,
    pub not_doing_hourly_rate: f64,
    pub deadline: Option<DateTime<Utc>>,
    pub owner_id: OwnerId,
}

impl TaskSpec {
    pub fn ending(impact: f64, effort: f64) -> Self {
        Self {
            kind: TaskKind::Ending,
            impact,
            effort,
            not_doing_hourly_rate: 0.0,
            deadline: None,
            owner_id: OwnerId::new(),
        }
    }

    pub fn endless(impact: f64, policy: CompletionPolicy) -> Self {
        Self {
            kind: TaskKind::Endless {
                completion_policy: policy,
            },
            impact,
            effort: 1.0,
            not_doing_hourly_rate: 0.0,
            deadline: None,
            owner_id: OwnerId::new(),
        }
    }

    pub const fn growing(mut self, rate: f64) -> Self {
        self.not_doing_hourly_rate = rate;
        self
    }

    pub const fn due(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub const fn owned_by(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn build(self, clock: &ManualClock) -> Task {
        Task::create(
            NewTaskData {
                owner_id: self.owner_id,
                title: Title::new("Test task").expect("valid title"),
                description: None,
                kind: self.kind,
                impact: Impact::new(self.impact).expect("valid impact"),
                effort: Effort::new(self.effort).expect("valid effort"),
                not_doing_hourly_rate: HourlyRate::new(self.not_doing_hourly_rate)
                    .expect("valid rate"),
                deadline: self.deadline,
            },
            clock,
        )
    }
}

pub(super) fn rate(per_hour: f64) -> CompletionPolicy {
    CompletionPolicy::Rate(HourlyRate::new(per_hour).expect("valid rate"))
}

pub(super) fn set_to(value: f64) -> CompletionPolicy {
    CompletionPolicy::SetTo(Impact::new(value).expect("valid impact"))
}
