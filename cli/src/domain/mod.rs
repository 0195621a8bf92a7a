//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod build;
pub mod config;
pub mod error;

pub use build::{
    CONFIRM_PROMPT, ensure_promotable, is_affirmative, latest, latest_promotable,
    promotion_summary,
};
pub use config::{
    AutoscalingGroups, AwsSettings, DrodeConfig, DroneSettings, ProjectProfile, WaitConfig,
    validate_pipeline,
};
pub use error::{ApiError, BuildError, ConfigError, ErrorKind, FleetError, PromoteError, WaitError};
