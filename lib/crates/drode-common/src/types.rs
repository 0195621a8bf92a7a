use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deployment environment a build can be promoted to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

impl Environment {
    /// Every environment, in display order.
    pub const ALL: [Environment; 2] = [Environment::Production, Environment::Staging];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
        }
    }

    /// Capitalised name used for section headers.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Staging => "Staging",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown environment '{0}': expected production or staging")]
pub struct ParseEnvironmentError(pub String);

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Status of a Drone build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    #[default]
    Pending,
    Running,
    Blocked,
    WaitingOnDependencies,
    Success,
    Failure,
    Killed,
    Error,
    Skipped,
    Declined,
    /// Any status this client does not know about. Never terminal.
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    /// Whether the build will not change status anymore.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Success | Self::Failure | Self::Killed | Self::Error | Self::Skipped | Self::Declined
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::WaitingOnDependencies => "waiting_on_dependencies",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Killed => "killed",
            Self::Error => "error",
            Self::Skipped => "skipped",
            Self::Declined => "declined",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event that caused a build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    Push,
    Promote,
    Rollback,
    PullRequest,
    Tag,
    Cron,
    Custom,
    #[default]
    #[serde(other)]
    Other,
}

impl TriggerEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Promote => "promote",
            Self::Rollback => "rollback",
            Self::PullRequest => "pull_request",
            Self::Tag => "tag",
            Self::Cron => "cron",
            Self::Custom => "custom",
            Self::Other => "unknown",
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Drone build as returned by the builds API.
///
/// Builds that have not started yet only carry a few fields, so everything
/// except the number falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Build {
    pub number: u64,
    #[serde(default)]
    pub status: BuildStatus,
    #[serde(default)]
    pub event: TriggerEvent,
    /// Target branch of the build.
    #[serde(default)]
    pub target: String,
    /// Environment of promote and rollback builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_to: Option<String>,
    /// Login of whoever triggered the build.
    #[serde(default)]
    pub trigger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_login: Option<String>,
    /// Commit hash the build ran on.
    #[serde(default)]
    pub after: String,
    /// Commit message.
    #[serde(default)]
    pub message: String,
    /// Unix timestamp, 0 when not started.
    #[serde(default)]
    pub started: i64,
    /// Unix timestamp, 0 when not finished.
    #[serde(default)]
    pub finished: i64,
}

impl Build {
    /// First eight characters of the commit hash.
    #[must_use]
    pub fn short_commit(&self) -> &str {
        self.after.get(..8).unwrap_or(&self.after)
    }

    /// First line of the commit message.
    #[must_use]
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Environment the build deploys to.
    ///
    /// Pushes to `branch` deploy to staging; promote and rollback builds
    /// deploy to their `deploy_to` target.
    #[must_use]
    pub fn target_environment(&self, branch: &str) -> Option<Environment> {
        match self.event {
            TriggerEvent::Push if self.target == branch => Some(Environment::Staging),
            TriggerEvent::Promote | TriggerEvent::Rollback => {
                self.deploy_to.as_deref().and_then(|env| env.parse().ok())
            }
            _ => None,
        }
    }
}

/// The promote build created for a source build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggeredBuild {
    /// Number of the new promote build.
    pub number: u64,
    /// Build that was promoted.
    pub source: u64,
    pub environment: Environment,
    /// Commit hash of the promoted build.
    pub commit: String,
}

/// One instance of an autoscaling group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    /// Private IP address.
    pub ip: String,
    /// `HealthStatus/LifecycleState`, e.g. `Healthy/InService`.
    pub status: String,
    /// Launch time formatted as `%Y-%m-%dT%H:%M`.
    pub created: String,
    /// Launch configuration or `template:version` that created the instance.
    pub template: String,
}

/// Live state of an autoscaling group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AutoscalerInfo {
    /// Active launch configuration or `template:version`.
    pub template: String,
    pub instances: Vec<Instance>,
}

/// Autoscaling state of every environment of a project.
///
/// An environment without a configured autoscaling group is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectStatus {
    pub production: Option<AutoscalerInfo>,
    pub staging: Option<AutoscalerInfo>,
}

impl ProjectStatus {
    #[must_use]
    pub fn get(&self, environment: Environment) -> Option<&AutoscalerInfo> {
        match environment {
            Environment::Production => self.production.as_ref(),
            Environment::Staging => self.staging.as_ref(),
        }
    }

    /// True when no environment reported anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.production.is_none() && self.staging.is_none()
    }
}
