//! Application service: wait for a build to finish.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use drode_common::{Build, BuildStatus};

use crate::application::ports::{CiServer, ProgressReporter};
use crate::domain::{BuildError, WaitConfig, WaitError, latest};

/// Cancellation flag shared between the wait loop and a signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the wait loop to stop before its next sleep.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How the wait loop polls and notifies.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Constant delay between two polls.
    pub interval: Duration,
    /// Ring the terminal bell once the build is finished.
    pub bell: bool,
    pub cancel: CancelFlag,
}

impl WaitOptions {
    #[must_use]
    pub fn from_config(config: &WaitConfig, cancel: CancelFlag) -> Self {
        Self {
            interval: config.interval(),
            bell: config.bell,
            cancel,
        }
    }
}

/// What has already been reported about the build being watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Announced {
    Nothing,
    Pending,
    Running,
}

/// Wait until build `number` (or the latest build) reaches a terminal status.
///
/// Without a build number the most recent build is watched; if it already
/// finished the function returns its status straight away.
///
/// # Errors
///
/// Propagates every CI error without retrying, returns
/// `BuildError::NoBuilds` for an empty pipeline and `WaitError::Interrupted`
/// when `options.cancel` is set between two polls.
pub async fn wait(
    ci: &impl CiServer,
    reporter: &impl ProgressReporter,
    pipeline: &str,
    number: Option<u64>,
    options: &WaitOptions,
) -> Result<BuildStatus> {
    let number = match number {
        Some(number) => number,
        None => {
            let builds = ci.builds(pipeline).await?;
            let last = latest(&builds).ok_or_else(|| BuildError::NoBuilds {
                pipeline: pipeline.to_string(),
            })?;
            if last.status.is_terminal() {
                reporter.info("There are no active jobs");
                return Ok(finish(reporter, last, options));
            }
            last.number
        }
    };

    let mut announced = Announced::Nothing;
    loop {
        let build = ci.build_info(pipeline, number).await?;
        tracing::debug!(number, status = %build.status, "polled build");

        if build.status.is_terminal() {
            return Ok(finish(reporter, &build, options));
        }

        if build.status == BuildStatus::Running {
            if announced != Announced::Running {
                reporter.step(&format!(
                    "Waiting for job #{number} started by a {} event by {}.",
                    build.event,
                    started_by(&build),
                ));
                announced = Announced::Running;
            }
        } else if announced == Announced::Nothing {
            reporter.step(&format!("Job #{number} has not started yet"));
            announced = Announced::Pending;
        }

        if options.cancel.is_cancelled() {
            return Err(WaitError::Interrupted { number }.into());
        }
        tokio::time::sleep(options.interval).await;
    }
}

fn started_by(build: &Build) -> &str {
    if !build.trigger.is_empty() {
        return &build.trigger;
    }
    build.author_login.as_deref().unwrap_or("unknown")
}

fn finish(reporter: &impl ProgressReporter, build: &Build, options: &WaitOptions) -> BuildStatus {
    let message = format!(
        "Job #{} has finished with status {}",
        build.number, build.status
    );
    if build.status == BuildStatus::Success {
        reporter.success(&message);
    } else {
        reporter.warn(&message);
    }
    if options.bell {
        reporter.bell();
    }
    build.status
}
