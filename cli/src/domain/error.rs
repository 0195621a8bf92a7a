//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use drode_common::{BuildStatus, Environment};
use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to the configuration file and project selection.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("There are no projects configured.")]
    NoProjects,

    #[error(
        "There are more than one project configured but none is marked as active. \
         Please use drode set command to define one."
    )]
    NoActiveProject,

    #[error("The project {0} does not exist")]
    UnknownProject(String),

    #[error("The pipeline '{pipeline}' of project {project} must look like owner/repository")]
    InvalidPipeline { project: String, pipeline: String },

    #[error(
        "Drone credentials for project {project} are not configured. Add a drone section \
         to the project or set the DRONE_SERVER and DRONE_TOKEN environment variables."
    )]
    MissingCredentials { project: String },

    #[error("Invalid configuration file {path}: {reason}")]
    Malformed { path: String, reason: String },
}

// ── Build errors ──────────────────────────────────────────────────────────────

/// Errors related to locating and validating builds.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("The build {number} was not found at the pipeline {pipeline}")]
    NotFound { number: u64, pipeline: String },

    #[error("There are no builds at the pipeline {pipeline}")]
    NoBuilds { pipeline: String },

    #[error("There are no successful jobs with target branch {branch}")]
    NoPromotableBuild { branch: String },

    #[error("You can't promote job #{number} to {environment} as it's status is {status}")]
    Ineligible {
        number: u64,
        environment: Environment,
        status: BuildStatus,
    },
}

// ── Remote API errors ─────────────────────────────────────────────────────────

/// Errors returned while talking to Drone or AWS.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{service} rejected the credentials: {detail}")]
    Authentication { service: &'static str, detail: String },

    #[error("{url} was not found")]
    NotFound { url: String },

    #[error("{status} error while trying to access {url}")]
    UnexpectedResponse { url: String, status: u16 },

    #[error("There was an error contacting {url}: {reason}")]
    Network { url: String, reason: String },
}

/// Errors specific to the autoscaling fleet.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("There are no autoscaling groups named {0}")]
    GroupNotFound(String),

    #[error("`aws {command}` failed: {detail}")]
    CommandFailed { command: String, detail: String },

    #[error("Unexpected output from `aws {command}`: {reason}")]
    UnexpectedOutput { command: String, reason: String },
}

// ── Workflow short-circuits ───────────────────────────────────────────────────

/// Promotion did not go ahead.
#[derive(Debug, Error)]
pub enum PromoteError {
    #[error("Promotion of job #{number} aborted")]
    Aborted { number: u64 },
}

/// The wait loop stopped before the build finished.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("Stopped waiting for job #{number} before it finished")]
    Interrupted { number: u64 },
}

// ── Classification ────────────────────────────────────────────────────────────

/// Coarse error category used for exit handling and `--json` error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    IneligibleBuild,
    NotFound,
    Network,
    Aborted,
    Interrupted,
    Other,
}

impl ErrorKind {
    /// Classify an error by the first typed domain error in its chain.
    #[must_use]
    pub fn of(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| {
                if cause.is::<ConfigError>() {
                    return Some(Self::Configuration);
                }
                if let Some(e) = cause.downcast_ref::<BuildError>() {
                    return Some(match e {
                        BuildError::Ineligible { .. } => Self::IneligibleBuild,
                        _ => Self::NotFound,
                    });
                }
                if let Some(e) = cause.downcast_ref::<ApiError>() {
                    return Some(match e {
                        ApiError::Authentication { .. } => Self::Authentication,
                        ApiError::NotFound { .. } => Self::NotFound,
                        ApiError::UnexpectedResponse { .. } | ApiError::Network { .. } => {
                            Self::Network
                        }
                    });
                }
                if let Some(e) = cause.downcast_ref::<FleetError>() {
                    return Some(match e {
                        FleetError::GroupNotFound(_) => Self::NotFound,
                        _ => Self::Network,
                    });
                }
                if cause.is::<PromoteError>() {
                    return Some(Self::Aborted);
                }
                if cause.is::<WaitError>() {
                    return Some(Self::Interrupted);
                }
                None
            })
            .unwrap_or(Self::Other)
    }

    /// Machine-readable code for JSON error output.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::IneligibleBuild => "ineligible_build",
            Self::NotFound => "not_found",
            Self::Network => "network",
            Self::Aborted => "aborted",
            Self::Interrupted => "interrupted",
            Self::Other => "error",
        }
    }

    /// Whether the command should still exit with status zero.
    #[must_use]
    pub fn is_benign(self) -> bool {
        self == Self::Aborted
    }
}
