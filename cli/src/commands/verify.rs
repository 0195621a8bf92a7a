//! `drode verify`: check that Drone and AWS are usable.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::verify::verify;
use crate::domain::DroneSettings;
use crate::infra::drone::DroneClient;
use crate::output::{JsonRenderer, TerminalReporter};

/// Run the verify command.
///
/// Without a selectable project the Drone check falls back to the
/// `DRONE_SERVER` / `DRONE_TOKEN` variables and AWS to ambient credentials.
///
/// # Errors
///
/// Returns the first failed integration check.
pub async fn run(app: &AppContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    app.human().render_version(version);

    let (ci, fleet) = match app.active_project() {
        Ok(project) => (
            super::drone_client(app, &project),
            super::fleet(Some(&project)),
        ),
        Err(e) => {
            let ci = DroneSettings::from_lookup(|key| std::env::var(key).ok())
                .map_or(Err(e), |settings| DroneClient::new(&settings));
            (ci, super::fleet(None))
        }
    };
    let reporter = TerminalReporter::new(&app.output);
    verify(ci, &fleet, &reporter).await?;

    if app.is_json() {
        JsonRenderer::render_verified(version)?;
    }
    Ok(())
}
