//! `drode wait`: block until a build finishes.

use anyhow::Result;

use super::InterruptGuard;
use crate::app::AppContext;
use crate::application::services::wait::{CancelFlag, WaitOptions, wait};
use crate::output::{JsonRenderer, TerminalReporter};

/// Run the wait command for `build_number`, or the latest build.
///
/// # Errors
///
/// Returns an error if the project cannot be resolved, a poll fails, or the
/// wait is interrupted.
pub async fn run(app: &AppContext, build_number: Option<u64>) -> Result<()> {
    let project = app.active_project()?;
    let client = super::drone_client(app, &project)?;
    let reporter = TerminalReporter::new(&app.output);

    let cancel = CancelFlag::new();
    let _guard = InterruptGuard::install(cancel.clone());
    let options = WaitOptions::from_config(&app.config.wait, cancel);

    let status = wait(
        &client,
        &reporter,
        &project.profile.pipeline,
        build_number,
        &options,
    )
    .await?;

    if app.is_json() {
        JsonRenderer::render_finished(status)?;
    }
    Ok(())
}
