//! The seams between drode's services and the outside world: Drone, AWS,
//! the config file, the terminal.
//!
//! This file imports only from `crate::domain` and `drode_common`: never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use drode_common::{AutoscalerInfo, Build, Environment};

use crate::domain::DrodeConfig;

// ── CI Port ───────────────────────────────────────────────────────────────────

/// Drone CI server operations for one pipeline owner/repository pair.
#[allow(async_fn_in_trait)]
pub trait CiServer {
    /// Make an authenticated call that proves the server is reachable.
    async fn check_configuration(&self) -> Result<()>;
    /// Fetch a single build.
    ///
    /// Fails with `BuildError::NotFound` when the build does not exist.
    async fn build_info(&self, pipeline: &str, number: u64) -> Result<Build>;
    /// Most recent builds of the pipeline, newest first.
    async fn builds(&self, pipeline: &str) -> Result<Vec<Build>>;
    /// Start a promote build of `number` targeting `environment`.
    ///
    /// Returns the new build. Never retried.
    async fn promote(&self, pipeline: &str, number: u64, environment: Environment)
    -> Result<Build>;
}

// ── Cloud Port ────────────────────────────────────────────────────────────────

/// Autoscaling fleet queries.
#[allow(async_fn_in_trait)]
pub trait CloudFleet {
    /// Make an authenticated call that proves the credentials work.
    async fn check_configuration(&self) -> Result<()>;
    /// Active launch configuration and instances of an autoscaling group.
    ///
    /// Fails with `FleetError::GroupNotFound` when the group does not exist.
    async fn autoscaling_group(&self, name: &str) -> Result<AutoscalerInfo>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Spawns external programs (the `aws` CLI) and collects their output.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// `run_with_timeout` with the runner's default deadline.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// A non-zero exit is still `Ok`; callers inspect `Output::status`.
    ///
    /// # Errors
    ///
    /// Spawn failures, and deadlines passed. A child that overruns is killed.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        (**self).run(program, args).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        (**self).run_with_timeout(program, args, timeout).await
    }
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence (load/save).
pub trait ConfigStore {
    /// Load the configuration; a missing file is an empty configuration.
    fn load(&self) -> Result<DrodeConfig>;
    /// Persist the configuration atomically.
    fn save(&self, config: &DrodeConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Asks the user a question and returns the raw answer.
pub trait UserPrompt {
    /// Show `question` and read one line of input.
    fn ask(&self, question: &str) -> Result<String>;
}

/// Status lines emitted by services while they work.
pub trait ProgressReporter {
    fn info(&self, message: &str);
    /// Something is about to happen, e.g. "Waiting for build #12".
    fn step(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn bell(&self);
}
