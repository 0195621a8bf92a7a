//! Application service: check both integrations are usable.

use anyhow::Result;

use crate::application::ports::{CiServer, CloudFleet, ProgressReporter};

/// Check the Drone server and AWS, reporting `OK` / `KO` for each.
///
/// Both checks always run. `ci` is an error when the Drone client could not
/// even be configured; that counts as a failed check.
///
/// # Errors
///
/// Returns the first failure, with its original kind, when any check fails.
pub async fn verify(
    ci: Result<impl CiServer>,
    fleet: &impl CloudFleet,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let drone = match ci {
        Ok(ci) => ci.check_configuration().await,
        Err(e) => Err(e),
    };
    let aws = fleet.check_configuration().await;

    let mut failures = Vec::new();
    for (name, result) in [("Drone", drone), ("AWS", aws)] {
        match result {
            Ok(()) => reporter.success(&format!("{name}: OK")),
            Err(e) => {
                reporter.warn(&format!("{name}: KO ({e:#})"));
                failures.push(e);
            }
        }
    }

    let count = failures.len();
    match failures.into_iter().next() {
        None => Ok(()),
        Some(first) => Err(first.context(format!("{count} integration check(s) failed"))),
    }
}
