//! Infrastructure implementation of the `CloudFleet` port over the `aws` CLI.
//!
//! Every call shells out through a `CommandRunner` with `--output json` and
//! decodes the PascalCase documents the CLI prints.

use std::collections::HashMap;

use anyhow::Result;
use chrono::DateTime;
use drode_common::{AutoscalerInfo, Instance};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{CloudFleet, CommandRunner};
use crate::domain::{ApiError, AwsSettings, FleetError};

/// Launch configuration and template names are cut to this many characters.
const TEMPLATE_NAME_WIDTH: usize = 35;

/// `aws` stderr fragments that mean the credentials or region are unusable.
const CREDENTIAL_ERRORS: &[&str] = &[
    "Unable to locate credentials",
    "You must specify a region",
    "InvalidClientTokenId",
    "ExpiredToken",
    "AuthFailure",
    "UnrecognizedClientException",
    "SignatureDoesNotMatch",
    "The config profile",
];

// ── Response documents ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AutoScalingGroups {
    auto_scaling_groups: Vec<AutoScalingGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AutoScalingGroup {
    launch_configuration_name: Option<String>,
    launch_template: Option<LaunchTemplate>,
    #[serde(default)]
    instances: Vec<GroupInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LaunchTemplate {
    launch_template_name: String,
    #[serde(default)]
    version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GroupInstance {
    instance_id: String,
    #[serde(default)]
    health_status: String,
    #[serde(default)]
    lifecycle_state: String,
    launch_configuration_name: Option<String>,
    launch_template: Option<LaunchTemplate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservations {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<Ec2Instance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Ec2Instance {
    instance_id: String,
    private_ip_address: Option<String>,
    launch_time: Option<String>,
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// Queries autoscaling groups with the `aws` CLI.
pub struct AwsCliFleet<R: CommandRunner> {
    runner: R,
    profile: Option<String>,
    region: Option<String>,
}

impl<R: CommandRunner> AwsCliFleet<R> {
    /// Fleet using ambient AWS credentials.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            profile: None,
            region: None,
        }
    }

    /// Fleet using the profile and region of a project.
    #[must_use]
    pub fn with_settings(runner: R, settings: &AwsSettings) -> Self {
        Self {
            runner,
            profile: settings.profile.clone(),
            region: settings.region.clone(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        service: &str,
        operation: &str,
        extra: &[&str],
    ) -> Result<T> {
        let command = format!("{service} {operation}");
        let mut args: Vec<&str> = vec![service, operation];
        args.extend_from_slice(extra);
        if let Some(profile) = &self.profile {
            args.extend(["--profile", profile.as_str()]);
        }
        if let Some(region) = &self.region {
            args.extend(["--region", region.as_str()]);
        }
        args.extend(["--output", "json"]);

        let output = self
            .runner
            .run("aws", &args)
            .await
            .map_err(|e| FleetError::CommandFailed {
                command: command.clone(),
                detail: format!("{e:#}"),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(%command, %stderr, "aws call failed");
            if CREDENTIAL_ERRORS.iter().any(|needle| stderr.contains(needle)) {
                return Err(ApiError::Authentication {
                    service: "AWS",
                    detail: stderr,
                }
                .into());
            }
            return Err(FleetError::CommandFailed {
                command,
                detail: stderr,
            }
            .into());
        }
        serde_json::from_slice(&output.stdout).map_err(|e| {
            FleetError::UnexpectedOutput {
                command,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl<R: CommandRunner> CloudFleet for AwsCliFleet<R> {
    async fn check_configuration(&self) -> Result<()> {
        let _: serde_json::Value = self.call("ec2", "describe-regions", &[]).await?;
        Ok(())
    }

    async fn autoscaling_group(&self, name: &str) -> Result<AutoscalerInfo> {
        let groups: AutoScalingGroups = self
            .call(
                "autoscaling",
                "describe-auto-scaling-groups",
                &["--auto-scaling-group-names", name],
            )
            .await?;
        let group = groups
            .auto_scaling_groups
            .into_iter()
            .next()
            .ok_or_else(|| FleetError::GroupNotFound(name.to_string()))?;

        let template = template_name(
            group.launch_configuration_name.as_deref(),
            group.launch_template.as_ref(),
            false,
        );

        let details = if group.instances.is_empty() {
            HashMap::new()
        } else {
            let mut args = vec!["--instance-ids"];
            args.extend(group.instances.iter().map(|i| i.instance_id.as_str()));
            let reservations: Reservations =
                self.call("ec2", "describe-instances", &args).await?;
            reservations
                .reservations
                .into_iter()
                .flat_map(|r| r.instances)
                .map(|i| (i.instance_id.clone(), i))
                .collect()
        };

        let instances = group
            .instances
            .iter()
            .map(|member| {
                let ec2 = details.get(&member.instance_id);
                Instance {
                    id: member.instance_id.clone(),
                    ip: ec2
                        .and_then(|i| i.private_ip_address.clone())
                        .unwrap_or_default(),
                    status: format!("{}/{}", member.health_status, member.lifecycle_state),
                    created: ec2
                        .and_then(|i| i.launch_time.as_deref())
                        .map(format_launch_time)
                        .unwrap_or_default(),
                    template: template_name(
                        member.launch_configuration_name.as_deref(),
                        member.launch_template.as_ref(),
                        true,
                    ),
                }
            })
            .collect();

        Ok(AutoscalerInfo {
            template,
            instances,
        })
    }
}

fn truncate(name: &str) -> String {
    name.chars().take(TEMPLATE_NAME_WIDTH).collect()
}

/// Launch configuration name, or `template:version` for launch templates.
fn template_name(
    launch_configuration: Option<&str>,
    launch_template: Option<&LaunchTemplate>,
    truncate_configuration: bool,
) -> String {
    match (launch_configuration, launch_template) {
        (Some(name), _) if truncate_configuration => truncate(name),
        (Some(name), _) => name.to_string(),
        (None, Some(t)) => format!("{}:{}", truncate(&t.launch_template_name), t.version),
        (None, None) => String::new(),
    }
}

/// Format an ISO 8601 launch time as `%Y-%m-%dT%H:%M`.
fn format_launch_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(time) => time.format("%Y-%m-%dT%H:%M").to_string(),
        Err(_) => raw.chars().take(16).collect(),
    }
}
