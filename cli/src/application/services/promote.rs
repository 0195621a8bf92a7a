//! Application service: promote a build to an environment.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::{Context, Result};
use drode_common::{Build, Environment, TriggeredBuild};

use crate::application::ports::{CiServer, ProgressReporter, UserPrompt};
use crate::domain::{
    BuildError, CONFIRM_PROMPT, PromoteError, ensure_promotable, is_affirmative,
    latest_promotable, promotion_summary,
};

/// What to promote and where.
#[derive(Debug, Clone)]
pub struct PromoteRequest<'a> {
    /// Drone pipeline in `owner/repository` form.
    pub pipeline: &'a str,
    /// Branch whose pushes deploy to staging.
    pub branch: &'a str,
    /// Build to promote; the latest successful staging build when `None`.
    pub build_number: Option<u64>,
    pub environment: Environment,
}

/// Promote a build after the user confirms.
///
/// Exactly one promote call is made, and only after an affirmative answer.
/// Following the new build is left to the caller, which runs
/// [`wait`](crate::application::services::wait::wait) on the returned number
/// once it is ready to handle interrupts.
///
/// # Errors
///
/// - `BuildError::NotFound` / `BuildError::NoPromotableBuild` when there is
///   nothing to promote.
/// - `BuildError::Ineligible` when the build did not succeed.
/// - `PromoteError::Aborted` when the user does not confirm.
/// - Any CI error.
pub async fn promote(
    ci: &impl CiServer,
    prompt: &impl UserPrompt,
    reporter: &impl ProgressReporter,
    request: &PromoteRequest<'_>,
) -> Result<TriggeredBuild> {
    let PromoteRequest {
        pipeline,
        branch,
        build_number,
        environment,
    } = *request;

    let build = resolve_build(ci, pipeline, branch, build_number).await?;
    ensure_promotable(&build, environment)?;

    reporter.info(&promotion_summary(&build, pipeline, environment));
    let answer = prompt.ask(CONFIRM_PROMPT)?;
    if !is_affirmative(&answer) {
        return Err(PromoteError::Aborted {
            number: build.number,
        }
        .into());
    }

    let started = ci
        .promote(pipeline, build.number, environment)
        .await
        .with_context(|| format!("promoting job #{} to {environment}", build.number))?;
    reporter.success(&format!("Job #{} has started.", started.number));

    Ok(TriggeredBuild {
        number: started.number,
        source: build.number,
        environment,
        commit: build.after,
    })
}

async fn resolve_build(
    ci: &impl CiServer,
    pipeline: &str,
    branch: &str,
    build_number: Option<u64>,
) -> Result<Build> {
    if let Some(number) = build_number {
        return ci.build_info(pipeline, number).await;
    }
    let builds = ci.builds(pipeline).await?;
    let build = latest_promotable(&builds, branch)
        .cloned()
        .ok_or_else(|| BuildError::NoPromotableBuild {
            branch: branch.to_string(),
        })?;
    tracing::debug!(number = build.number, "resolved latest promotable build");
    Ok(build)
}
