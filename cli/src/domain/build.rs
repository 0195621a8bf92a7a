//! Build selection and promotion rules.

use drode_common::{Build, BuildStatus, Environment, TriggerEvent};

use crate::domain::error::BuildError;

/// Question asked before triggering a promotion.
pub const CONFIRM_PROMPT: &str = "Are you sure? [y/N]: ";

/// Most recent build that can be promoted without naming it.
///
/// A candidate is a successful push to `branch`, i.e. a build that deployed
/// to staging. The highest build number wins.
#[must_use]
pub fn latest_promotable<'a>(builds: &'a [Build], branch: &str) -> Option<&'a Build> {
    builds
        .iter()
        .filter(|b| {
            b.status == BuildStatus::Success
                && b.event == TriggerEvent::Push
                && b.target_environment(branch) == Some(Environment::Staging)
        })
        .max_by_key(|b| b.number)
}

/// Most recent build of the pipeline.
#[must_use]
pub fn latest(builds: &[Build]) -> Option<&Build> {
    builds.iter().max_by_key(|b| b.number)
}

/// Checks that `build` may be promoted to `environment`.
///
/// # Errors
///
/// Returns `BuildError::Ineligible` if the build did not succeed.
pub fn ensure_promotable(build: &Build, environment: Environment) -> Result<(), BuildError> {
    if build.status == BuildStatus::Success {
        return Ok(());
    }
    Err(BuildError::Ineligible {
        number: build.number,
        environment,
        status: build.status,
    })
}

/// Whether a confirmation answer means yes.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Summary shown before asking for confirmation.
#[must_use]
pub fn promotion_summary(build: &Build, pipeline: &str, environment: Environment) -> String {
    format!(
        "You're about to promote job #{} of the pipeline {pipeline} to {environment}\n\n      \
         With commit {}: {}",
        build.number,
        build.short_commit(),
        build.title(),
    )
}
