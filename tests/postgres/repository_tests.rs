//! `PostgreSQL` repository tests: revisions, atomic writes, cascades and
//! schema constraints.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests use assertions for verification while returning Result for error propagation"
)]

use super::helpers::{BoxError, PgContext, pg_context};
use busyness::task::{
    domain::{DurationMinutes, Task, TaskId, TaskLog, TaskType},
    ports::{TaskRepository, TaskRepositoryError},
    services::CreateTaskRequest,
};
use chrono::TimeDelta;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use mockable::Clock;
use rstest::rstest;

fn create(ctx: &PgContext, request: CreateTaskRequest) -> Result<Task, BoxError> {
    Ok(ctx
        .block_on(ctx.service.create_task(ctx.owner, request))?
        .into_task())
}

fn endless(ctx: &PgContext) -> Result<Task, BoxError> {
    create(
        ctx,
        CreateTaskRequest::new("Practice", TaskType::Endless)
            .with_impact(8.0)
            .with_doing_hourly_rate(1.0),
    )
}

fn log_now(ctx: &PgContext, task_id: TaskId, minutes: i64) -> Result<TaskLog, BoxError> {
    Ok(TaskLog::new(
        task_id,
        DurationMinutes::new(minutes)?,
        ctx.clock.utc(),
    ))
}

fn logged(task: &mut Task, ctx: &PgContext, minutes: i64) -> Result<TaskLog, BoxError> {
    task.complete(Some(DurationMinutes::new(minutes)?), &ctx.clock)?
        .ok_or_else(|| "endless completion must yield a log".into())
}

#[rstest]
fn stored_task_reads_back_unchanged(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = create(
        &ctx,
        CreateTaskRequest::new("Renew lease", TaskType::Ending)
            .with_description("Call the agent")
            .with_impact(7.5)
            .with_effort(3.0)
            .with_deadline(ctx.clock.utc() + TimeDelta::days(4)),
    )?;

    let found = ctx.block_on(ctx.repository.find_by_id(ctx.owner, task.id()))?;
    let snapshot = ctx.block_on(ctx.repository.find_with_logs(ctx.owner, task.id()))?;

    assert_eq!(found, Some(task.clone()));
    assert_eq!(snapshot, Some((task, Vec::new())));
    Ok(())
}

#[rstest]
fn stale_revision_is_rejected_with_conflict(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = create(&ctx, CreateTaskRequest::new("Pay rent", TaskType::Ending))?;
    let mut first = task.clone();
    first.complete(None, &ctx.clock)?;
    let mut second = task.clone();
    second.complete(None, &ctx.clock)?;

    ctx.block_on(ctx.repository.update(&first))?;
    let result = ctx.block_on(ctx.repository.update(&second));

    assert!(matches!(
        result,
        Err(TaskRepositoryError::Conflict {
            expected: 0,
            found: 1,
            ..
        })
    ));
    let stored = ctx.block_on(ctx.repository.find_by_id(ctx.owner, task.id()))?;
    assert_eq!(stored, Some(first));
    Ok(())
}

#[rstest]
fn conflicting_update_with_log_writes_nothing(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = endless(&ctx)?;
    let mut winner = task.clone();
    let winner_log = logged(&mut winner, &ctx, 60)?;
    let mut loser = task.clone();
    let loser_log = logged(&mut loser, &ctx, 30)?;

    ctx.block_on(ctx.repository.update_with_log(&winner, &winner_log))?;
    let result = ctx.block_on(ctx.repository.update_with_log(&loser, &loser_log));

    assert!(matches!(result, Err(TaskRepositoryError::Conflict { .. })));
    assert_eq!(
        ctx.block_on(ctx.repository.find_with_logs(ctx.owner, task.id()))?,
        Some((winner, vec![winner_log]))
    );
    Ok(())
}

#[rstest]
fn failed_log_insert_rolls_back_task_write(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = endless(&ctx)?;
    let mut first = task.clone();
    let first_log = logged(&mut first, &ctx, 20)?;
    ctx.block_on(ctx.repository.update_with_log(&first, &first_log))?;

    ctx.clock.advance(TimeDelta::hours(1));
    let mut second = first.clone();
    logged(&mut second, &ctx, 40)?;
    let result = ctx.block_on(ctx.repository.update_with_log(&second, &first_log));

    assert!(matches!(result, Err(TaskRepositoryError::Persistence(_))));
    assert_eq!(
        ctx.block_on(ctx.repository.find_with_logs(ctx.owner, task.id()))?,
        Some((first, vec![first_log]))
    );
    Ok(())
}

#[rstest]
fn logs_are_listed_oldest_first(pg_context: Result<PgContext, BoxError>) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = endless(&ctx)?;
    ctx.clock.advance(TimeDelta::hours(2));
    let later = log_now(&ctx, task.id(), 15)?;
    ctx.clock.advance(TimeDelta::hours(-1));
    let earlier = log_now(&ctx, task.id(), 25)?;

    ctx.block_on(ctx.repository.append_log(&later))?;
    ctx.block_on(ctx.repository.append_log(&earlier))?;

    assert_eq!(
        ctx.block_on(ctx.repository.list_logs(task.id()))?,
        vec![earlier, later]
    );
    Ok(())
}

#[rstest]
fn append_log_for_missing_task_is_not_found(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let missing = TaskId::new();

    let result = ctx.block_on(ctx.repository.append_log(&log_now(&ctx, missing, 10)?));

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == missing));
    Ok(())
}

#[rstest]
fn delete_cascades_to_logs(pg_context: Result<PgContext, BoxError>) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = endless(&ctx)?;
    for minutes in [10, 20, 30] {
        ctx.block_on(ctx.repository.append_log(&log_now(&ctx, task.id(), minutes)?))?;
    }

    ctx.block_on(ctx.repository.delete(ctx.owner, task.id()))?;

    assert_eq!(
        ctx.block_on(ctx.repository.find_with_logs(ctx.owner, task.id()))?,
        None
    );
    assert!(ctx.block_on(ctx.repository.list_logs(task.id()))?.is_empty());
    Ok(())
}

#[rstest]
fn negative_stored_revision_is_a_persistence_error(
    pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = create(&ctx, CreateTaskRequest::new("Corrupted", TaskType::Ending))?;
    let mut conn = ctx.connect()?;
    diesel::sql_query("UPDATE tasks SET revision = -5 WHERE id = $1")
        .bind::<diesel::sql_types::Uuid, _>(task.id().into_inner())
        .execute(&mut conn)?;

    let mut completed = task.clone();
    completed.complete(None, &ctx.clock)?;
    let result = ctx.block_on(ctx.repository.update(&completed));

    assert!(matches!(result, Err(TaskRepositoryError::Persistence(_))));
    Ok(())
}

#[rstest]
#[case::impact_above_range("UPDATE tasks SET impact = 11 WHERE id = $1")]
#[case::zero_effort("UPDATE tasks SET effort = 0 WHERE id = $1")]
#[case::negative_growth("UPDATE tasks SET not_doing_hourly_rate = -1 WHERE id = $1")]
#[case::completed_endless_task("UPDATE tasks SET completed_at = NOW() WHERE id = $1")]
#[case::non_positive_log(concat!(
    "INSERT INTO task_logs (id, task_id, logged_at, duration_minutes) ",
    "VALUES (gen_random_uuid(), $1, NOW(), 0)",
))]
fn schema_rejects_out_of_range_values(
    pg_context: Result<PgContext, BoxError>,
    #[case] statement: &str,
) -> Result<(), BoxError> {
    let ctx = pg_context?;
    let task = endless(&ctx)?;
    let mut conn = ctx.connect()?;

    let result = diesel::sql_query(statement)
        .bind::<diesel::sql_types::Uuid, _>(task.id().into_inner())
        .execute(&mut conn);

    assert!(matches!(
        result,
        Err(DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            _
        ))
    ));
    Ok(())
}
