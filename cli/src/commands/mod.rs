//! Command implementations

pub mod project;
pub mod promote;
pub mod status;
pub mod verify;
pub mod wait;

use anyhow::Result;

use crate::app::{ActiveProject, AppContext};
use crate::application::services::wait::CancelFlag;
use crate::infra::aws::AwsCliFleet;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::drone::DroneClient;

/// Drone client for the active project.
fn drone_client(app: &AppContext, project: &ActiveProject<'_>) -> Result<DroneClient> {
    DroneClient::new(&app.drone_settings(project)?)
}

/// `aws` CLI fleet using the project's profile and region when it has any.
fn fleet(project: Option<&ActiveProject<'_>>) -> AwsCliFleet<TokioCommandRunner> {
    let runner = TokioCommandRunner::default();
    match project.and_then(|p| p.profile.aws.as_ref()) {
        Some(aws) => AwsCliFleet::with_settings(runner, aws),
        None => AwsCliFleet::new(runner),
    }
}

/// Cancels a wait loop on Ctrl-C while alive.
///
/// A second Ctrl-C exits immediately with status 130.
struct InterruptGuard(tokio::task::JoinHandle<()>);

impl InterruptGuard {
    fn install(flag: CancelFlag) -> Self {
        Self(tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if flag.is_cancelled() {
                    std::process::exit(130);
                }
                tracing::debug!("interrupt received, stopping after the current poll");
                flag.cancel();
            }
        }))
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
