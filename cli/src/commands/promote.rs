//! `drode promote`: promote a build to an environment.

use anyhow::Result;
use clap::Args;
use drode_common::Environment;

use super::InterruptGuard;
use crate::app::AppContext;
use crate::application::services::promote::{PromoteRequest, promote};
use crate::application::services::wait::{CancelFlag, WaitOptions, wait};
use crate::infra::prompt::TerminalPrompt;
use crate::output::{JsonRenderer, TerminalReporter};

/// Arguments for the promote command.
#[derive(Args, Debug)]
pub struct PromoteArgs {
    /// Build to promote (default: latest successful build of the project branch)
    pub build_number: Option<u64>,

    /// Environment to promote to
    #[arg(value_enum, default_value_t = Environment::Production)]
    pub environment: Environment,

    /// Wait for the promote build to finish
    #[arg(short, long)]
    pub wait: bool,
}

/// Run the promote command.
///
/// # Errors
///
/// Returns an error if the build cannot be promoted, the user declines, or
/// the Drone call fails.
pub async fn run(app: &AppContext, args: &PromoteArgs) -> Result<()> {
    let project = app.active_project()?;
    let client = super::drone_client(app, &project)?;
    let reporter = TerminalReporter::new(&app.output);
    let pipeline = project.profile.pipeline.as_str();

    let request = PromoteRequest {
        pipeline,
        branch: &project.profile.branch,
        build_number: args.build_number,
        environment: args.environment,
    };
    // Ctrl-C keeps its default meaning until the promotion exists.
    let triggered = promote(&client, &TerminalPrompt, &reporter, &request).await?;

    if args.wait {
        let cancel = CancelFlag::new();
        let _guard = InterruptGuard::install(cancel.clone());
        let options = WaitOptions::from_config(&app.config.wait, cancel);
        wait(&client, &reporter, pipeline, Some(triggered.number), &options).await?;
    }

    if app.is_json() {
        JsonRenderer::render_promoted(&triggered)?;
    }
    Ok(())
}
