//! Application service: autoscaling status of a project.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use drode_common::{AutoscalerInfo, ProjectStatus};

use crate::application::ports::CloudFleet;
use crate::domain::ProjectProfile;

/// Gather the autoscaling groups of every environment of `profile`.
///
/// Environments without a configured group, and projects without an `aws`
/// section, are left empty rather than reported as errors. Both lookups are
/// independent reads and run concurrently.
///
/// # Errors
///
/// Propagates fleet errors, including unknown group names.
pub async fn project_status(
    profile: &ProjectProfile,
    fleet: &impl CloudFleet,
) -> Result<ProjectStatus> {
    let Some(aws) = &profile.aws else {
        return Ok(ProjectStatus::default());
    };
    let groups = &aws.autoscaling_groups;
    let (production, staging) = tokio::try_join!(
        group(fleet, groups.production.as_deref()),
        group(fleet, groups.staging.as_deref()),
    )?;
    Ok(ProjectStatus {
        production,
        staging,
    })
}

async fn group(fleet: &impl CloudFleet, name: Option<&str>) -> Result<Option<AutoscalerInfo>> {
    let Some(name) = name else {
        return Ok(None);
    };
    fleet
        .autoscaling_group(name)
        .await
        .with_context(|| format!("describing autoscaling group {name}"))
        .map(Some)
}
