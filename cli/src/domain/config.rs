//! Domain types and validators for drode configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use drode_common::Environment;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Branch whose pushes deploy to staging when a project does not set one.
pub const DEFAULT_BRANCH: &str = "master";

/// Environment variables read when a project has no `drone` section.
pub const DRONE_SERVER_ENV: &str = "DRONE_SERVER";
pub const DRONE_TOKEN_ENV: &str = "DRONE_TOKEN";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.local/share/drode/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DrodeConfig {
    /// Project used when none is named on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_project: Option<String>,
    /// Wait loop settings.
    pub wait: WaitConfig,
    /// Project profiles by name.
    pub projects: BTreeMap<String, ProjectProfile>,
}

/// Wait loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WaitConfig {
    /// Seconds between two polls of the build status.
    pub interval_secs: u64,
    /// Ring the terminal bell when the build finishes.
    pub bell: bool,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            bell: true,
        }
    }
}

impl WaitConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// A named project: one Drone pipeline and, optionally, its AWS fleet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectProfile {
    /// Drone pipeline in `owner/repository` form.
    pub pipeline: String,
    /// Branch whose pushes deploy to staging.
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drone: Option<DroneSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsSettings>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

/// Drone server connection details.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DroneSettings {
    pub url: String,
    pub token: String,
}

impl fmt::Debug for DroneSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DroneSettings")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl DroneSettings {
    /// Build settings from `DRONE_SERVER` / `DRONE_TOKEN` looked up through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let url = lookup(DRONE_SERVER_ENV).filter(|v| !v.trim().is_empty())?;
        let token = lookup(DRONE_TOKEN_ENV).filter(|v| !v.trim().is_empty())?;
        Some(Self {
            url: url.trim().trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
        })
    }
}

/// AWS account details of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AwsSettings {
    /// Named AWS CLI profile; ambient credentials when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub autoscaling_groups: AutoscalingGroups,
}

/// Autoscaling group name of each environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AutoscalingGroups {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging: Option<String>,
}

impl AutoscalingGroups {
    #[must_use]
    pub fn get(&self, environment: Environment) -> Option<&str> {
        match environment {
            Environment::Production => self.production.as_deref(),
            Environment::Staging => self.staging.as_deref(),
        }
    }
}

// ── Project selection ────────────────────────────────────────────────────────

impl DrodeConfig {
    /// Name of the project commands act on.
    ///
    /// The configured active project wins if it exists. Otherwise a lone
    /// configured project is used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoProjects` when nothing is configured and
    /// `ConfigError::NoActiveProject` when several projects exist and none
    /// is (validly) active.
    pub fn active_project_name(&self) -> Result<&str, ConfigError> {
        if let Some(active) = self.active_project.as_deref() {
            if let Some((name, _)) = self.projects.get_key_value(active) {
                return Ok(name);
            }
        }
        let mut names = self.projects.keys();
        match (names.next(), names.next()) {
            (None, _) => Err(ConfigError::NoProjects),
            (Some(only), None) => Ok(only),
            (Some(_), Some(_)) => Err(ConfigError::NoActiveProject),
        }
    }

    /// Profile of the project named `name`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownProject` if no such project exists.
    pub fn project(&self, name: &str) -> Result<&ProjectProfile, ConfigError> {
        self.projects
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProject(name.to_string()))
    }

    /// Mark `name` as the active project.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownProject` and leaves the configuration
    /// untouched if no such project exists.
    pub fn set_active_project(&mut self, name: &str) -> Result<(), ConfigError> {
        self.project(name)?;
        self.active_project = Some(name.to_string());
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates that a pipeline looks like `owner/repository`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPipeline` otherwise.
pub fn validate_pipeline(project: &str, pipeline: &str) -> Result<(), ConfigError> {
    let mut parts = pipeline.split('/');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty()
    );
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidPipeline {
            project: project.to_string(),
            pipeline: pipeline.to_string(),
        })
    }
}

impl ProjectProfile {
    /// Drone settings of the project, falling back to `fallback`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` if neither is available.
    pub fn drone_settings(
        &self,
        project: &str,
        fallback: Option<DroneSettings>,
    ) -> Result<DroneSettings, ConfigError> {
        self.drone
            .clone()
            .or(fallback)
            .ok_or_else(|| ConfigError::MissingCredentials {
                project: project.to_string(),
            })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
