//! `drode status`: autoscaling groups of the active project.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::status::project_status;
use crate::output::JsonRenderer;
use crate::output::progress::with_spinner;

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the project cannot be resolved or an autoscaling
/// group cannot be described.
pub async fn run(app: &AppContext) -> Result<()> {
    let project = app.active_project()?;
    let fleet = super::fleet(Some(&project));

    let status = with_spinner(
        &app.output,
        "Describing autoscaling groups...",
        project_status(project.profile, &fleet),
    )
    .await?;

    if app.is_json() {
        return JsonRenderer::render_status(&status);
    }
    if status.is_empty() {
        app.output
            .info(&format!("The project {} has no autoscaling groups configured", project.name));
    }
    app.human().render_status(&status);
    Ok(())
}
