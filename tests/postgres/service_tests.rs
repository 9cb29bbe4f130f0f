//! Lifecycle service flows against the `PostgreSQL` record store.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests use assertions for verification while returning Result for error propagation"
)]

use super::helpers::{BoxError, PgContext, pg_context, start_instant};
use busyness::task::{
    domain::{OwnerId, TaskType},
    services::{CreateTaskRequest, LogTimeRequest, TaskLifecycleError},
};
use chrono::TimeDelta;
use rstest::rstest;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[rstest]
fn ending_task_completes_and_leaves_active_list(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let created = ctx.block_on(
        ctx.service.create_task(
            ctx.owner,
            CreateTaskRequest::new("Submit form", TaskType::Ending)
                .with_impact(8.0)
                .with_effort(2.0),
        ),
    )?;
    assert_close(created.priority_score().value(), 4.0);
    let id = created.task().id();

    ctx.clock.advance(TimeDelta::minutes(30));
    ctx.block_on(ctx.service.complete_task(ctx.owner, id, None))?;
    let active = ctx.block_on(ctx.service.list_active_tasks(ctx.owner))?;
    let completed = ctx.block_on(ctx.service.list_completed_tasks(ctx.owner))?;
    let again = ctx.block_on(ctx.service.complete_task(ctx.owner, id, None));

    assert!(active.is_empty());
    assert_eq!(completed.len(), 1);
    assert_eq!(
        completed.first().and_then(|scored| scored.task().completed_at()),
        Some(start_instant() + TimeDelta::minutes(30))
    );
    assert!(matches!(again, Err(TaskLifecycleError::InvalidState(_))));
    Ok(())
}

#[rstest]
fn endless_logging_persists_history(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let created = ctx.block_on(
        ctx.service.create_task(
            ctx.owner,
            CreateTaskRequest::new("Practice scales", TaskType::Endless)
                .with_impact(10.0)
                .with_doing_hourly_rate(2.0),
        ),
    )?;
    let id = created.task().id();

    let logged = ctx.block_on(ctx.service.complete_task(
        ctx.owner,
        id,
        Some(LogTimeRequest::new(60)),
    ))?;
    ctx.clock.advance(TimeDelta::hours(1));
    ctx.block_on(
        ctx.service
            .complete_task(ctx.owner, id, Some(LogTimeRequest::new(30))),
    )?;
    let history = ctx.block_on(ctx.service.get_task_with_history(ctx.owner, id))?;
    let newest_first = ctx.block_on(ctx.service.list_task_logs(ctx.owner, id))?;

    assert_close(logged.task().impact().value(), 8.0);
    let oldest_first: Vec<u32> = history
        .logs()
        .iter()
        .map(|log| log.duration_minutes().minutes())
        .collect();
    let reversed: Vec<u32> = newest_first
        .iter()
        .map(|log| log.duration_minutes().minutes())
        .collect();
    assert_eq!(oldest_first, vec![60, 30]);
    assert_eq!(reversed, vec![30, 60]);
    assert_eq!(history.task().task().revision(), 2);
    Ok(())
}

#[rstest]
#[case::largest_storable(i64::from(i32::MAX), true)]
#[case::beyond_storable_range(i64::from(i32::MAX) + 1, false)]
fn log_duration_limit_matches_storage(
    pg_context: Result<PgContext, BoxError>,
    #[case] minutes: i64,
    #[case] accepted: bool,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let created = ctx.block_on(
        ctx.service.create_task(
            ctx.owner,
            CreateTaskRequest::new("Read", TaskType::Endless).with_impact(6.0),
        ),
    )?;
    let id = created.task().id();

    let result = ctx.block_on(ctx.service.complete_task(
        ctx.owner,
        id,
        Some(LogTimeRequest::new(minutes)),
    ));
    let logs = ctx.block_on(ctx.service.list_task_logs(ctx.owner, id))?;

    if accepted {
        assert!(result.is_ok(), "expected success, got {result:?}");
        assert_eq!(logs.len(), 1);
    } else {
        assert!(matches!(result, Err(TaskLifecycleError::Validation(_))));
        assert!(logs.is_empty());
    }
    Ok(())
}

#[rstest]
fn foreign_owner_cannot_read_or_delete(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let created = ctx.block_on(
        ctx.service
            .create_task(ctx.owner, CreateTaskRequest::new("Private", TaskType::Ending)),
    )?;
    let id = created.task().id();
    let stranger = OwnerId::new();

    let read = ctx.block_on(ctx.service.get_task_with_history(stranger, id));
    let deleted = ctx.block_on(ctx.service.delete_task(stranger, id));
    let listed = ctx.block_on(ctx.service.list_active_tasks(stranger))?;

    assert!(matches!(read, Err(TaskLifecycleError::NotFound(missing)) if missing == id));
    assert!(matches!(deleted, Err(TaskLifecycleError::NotFound(_))));
    assert!(listed.is_empty());
    assert!(
        ctx.block_on(ctx.service.get_task_with_history(ctx.owner, id))
            .is_ok()
    );
    Ok(())
}
