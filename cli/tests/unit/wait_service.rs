//! Unit tests for the wait loop.
//!
//! The tokio clock is paused so the poll interval elapses instantly.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use drode::application::services::wait::{CancelFlag, WaitOptions, wait};
use drode::domain::{BuildError, ErrorKind, WaitError};
use drode_common::{Build, BuildStatus};

use crate::fakes::{FakeDrone, Level, PIPELINE, RecordingReporter, push};

fn options(bell: bool) -> WaitOptions {
    WaitOptions {
        interval: Duration::from_secs(1),
        bell,
        cancel: CancelFlag::new(),
    }
}

fn states(number: u64, statuses: &[BuildStatus]) -> Vec<Build> {
    statuses.iter().map(|s| push(number, *s)).collect()
}

#[tokio::test(start_paused = true)]
async fn test_wait_polls_until_terminal_status() {
    use BuildStatus::{Failure, Pending, Running};
    let drone = FakeDrone::with_builds(vec![])
        .with_states(states(42, &[Pending, Pending, Running, Running, Failure]));
    let reporter = RecordingReporter::default();

    let started = tokio::time::Instant::now();
    let status = wait(&drone, &reporter, PIPELINE, Some(42), &options(true))
        .await
        .expect("wait completes");

    assert_eq!(status, Failure);
    assert_eq!(drone.polls.get(), 5);
    assert_eq!(started.elapsed(), Duration::from_secs(4));
    assert_eq!(reporter.count("has not started yet"), 1);
    assert_eq!(
        reporter.count("Waiting for job #42 started by a push event by lyz."),
        1
    );
    assert!(reporter.contains(Level::Warn, "Job #42 has finished with status failure"));
    assert_eq!(reporter.bells.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_never_returns_on_blocked() {
    use BuildStatus::{Blocked, Success};
    let drone = FakeDrone::with_builds(vec![])
        .with_states(states(3, &[Blocked, Blocked, Blocked, Success]));
    let status = wait(
        &drone,
        &RecordingReporter::default(),
        PIPELINE,
        Some(3),
        &options(false),
    )
    .await
    .unwrap();
    assert_eq!(status, Success);
    assert_eq!(drone.polls.get(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_wait_latest_already_finished_returns_immediately() {
    let drone = FakeDrone::with_builds(vec![
        push(8, BuildStatus::Success),
        push(7, BuildStatus::Failure),
    ]);
    let reporter = RecordingReporter::default();

    let status = wait(&drone, &reporter, PIPELINE, None, &options(true))
        .await
        .unwrap();

    assert_eq!(status, BuildStatus::Success);
    assert_eq!(drone.polls.get(), 0);
    assert!(reporter.contains(Level::Info, "There are no active jobs"));
    assert!(reporter.contains(Level::Success, "Job #8 has finished with status success"));
    assert_eq!(reporter.bells.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_latest_running_build_is_followed() {
    use BuildStatus::{Running, Success};
    let drone = FakeDrone::with_builds(vec![push(9, Running), push(8, Success)])
        .with_states(states(9, &[Running, Success]));
    let status = wait(
        &drone,
        &RecordingReporter::default(),
        PIPELINE,
        None,
        &options(false),
    )
    .await
    .unwrap();
    assert_eq!(status, Success);
    assert_eq!(drone.polls.get(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_wait_without_bell_does_not_ring() {
    let drone = FakeDrone::with_builds(vec![push(1, BuildStatus::Killed)]);
    let reporter = RecordingReporter::default();
    wait(&drone, &reporter, PIPELINE, Some(1), &options(false))
        .await
        .unwrap();
    assert_eq!(reporter.bells.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_wait_empty_pipeline() {
    let drone = FakeDrone::with_builds(vec![]);
    let err = wait(
        &drone,
        &RecordingReporter::default(),
        PIPELINE,
        None,
        &options(true),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::NoBuilds { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_wait_unknown_build_is_fatal() {
    let drone = FakeDrone::with_builds(vec![]);
    let err = wait(
        &drone,
        &RecordingReporter::default(),
        PIPELINE,
        Some(404),
        &options(true),
    )
    .await
    .unwrap_err();
    assert_eq!(ErrorKind::of(&err), ErrorKind::NotFound);
    assert_eq!(drone.polls.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_stops_when_cancelled() {
    let drone = FakeDrone::with_builds(vec![push(5, BuildStatus::Running)]);
    let opts = options(true);
    opts.cancel.cancel();
    let reporter = RecordingReporter::default();

    let err = wait(&drone, &reporter, PIPELINE, Some(5), &opts)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<WaitError>(),
        Some(WaitError::Interrupted { number: 5 })
    ));
    assert_eq!(ErrorKind::of(&err), ErrorKind::Interrupted);
    assert_eq!(drone.polls.get(), 1);
    assert_eq!(reporter.bells.get(), 0);
}
