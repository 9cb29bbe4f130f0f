//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use busyness::task::{
    adapters::memory::{InMemoryTaskRepository, ManualClock},
    domain::OwnerId,
    services::TaskLifecycleService,
};
use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;

/// Service type wired to in-memory adapters.
pub type TestService = TaskLifecycleService<InMemoryTaskRepository, ManualClock>;

/// Service, controllable clock and owner used by a single test.
pub struct TestContext {
    pub service: TestService,
    pub clock: ManualClock,
    pub owner: OwnerId,
}

/// Instant every test clock starts at.
///
/// # Panics
///
/// Panics if the fixed timestamp is not representable.
#[must_use]
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Provides a fresh service backed by an empty repository.
#[fixture]
pub fn context() -> TestContext {
    let clock = ManualClock::new(start_instant());
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(clock.clone()),
    );
    TestContext {
        service,
        clock,
        owner: OwnerId::new(),
    }
}

/// Asserts two floats agree to within rounding noise.
///
/// # Errors
///
/// Returns an error describing both values when they differ.
pub fn ensure_close(actual: f64, expected: f64) -> Result<(), eyre::Report> {
    eyre::ensure!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
    Ok(())
}
