//! `--json` documents.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout: the command result, an `aborted` object for a declined
//! confirmation, or an error object. All functions here
//! fail only when serialization does.

#![allow(clippy::missing_errors_doc)]

use anyhow::{Context, Result};
use drode_common::{BuildStatus, ProjectStatus, TriggeredBuild};
use serde::Serialize;
use serde_json::json;

pub struct JsonRenderer;

impl JsonRenderer {
    /// Autoscaling groups keyed by environment.
    pub fn render_status(status: &ProjectStatus) -> Result<()> {
        emit(status)
    }

    pub fn render_active(name: &str) -> Result<()> {
        emit(&json!({ "project": name }))
    }

    /// The build Drone created for the promotion.
    pub fn render_promoted(build: &TriggeredBuild) -> Result<()> {
        emit(build)
    }

    pub fn render_finished(status: BuildStatus) -> Result<()> {
        emit(&json!({ "status": status }))
    }

    /// A declined confirmation: nothing was changed.
    pub fn render_aborted(message: &str) -> Result<()> {
        emit(&json!({ "aborted": true, "message": message }))
    }

    /// Only reached once both integrations answered.
    pub fn render_verified(version: &str) -> Result<()> {
        emit(&json!({ "version": version, "drone": "ok", "aws": "ok" }))
    }
}

fn emit(value: &impl Serialize) -> Result<()> {
    let doc = serde_json::to_string_pretty(value).context("serializing JSON output")?;
    println!("{doc}");
    Ok(())
}

/// `{"error": true, "message": .., "code": ..}`, where `code` is the
/// `ErrorKind` code of the failure.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let doc = json!({ "error": true, "message": message, "code": code });
    serde_json::to_string_pretty(&doc).context("serializing JSON error")
}
