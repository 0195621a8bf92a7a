//! State shared by every subcommand: where output goes, which config file is
//! in use, and what it contained at startup.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::services::project::load_config;
use crate::domain::{DrodeConfig, DroneSettings, ProjectProfile};
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, OutputContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    /// `--json`: one document on stdout, status lines on stderr.
    Json,
}

/// Global flags of `drode`, already parsed by clap.
pub struct AppFlags {
    /// `-c` / `DRODE_CONFIG_PATH`.
    pub config: Option<PathBuf>,
    pub no_color: bool,
    pub json: bool,
}

pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    pub store: YamlConfigStore,
    /// Snapshot read before the subcommand runs; `set` writes through `store`.
    pub config: DrodeConfig,
}

/// A resolved project: its name and profile.
pub struct ActiveProject<'a> {
    pub name: &'a str,
    pub profile: &'a ProjectProfile,
}

impl AppContext {
    /// Load the configuration named by `flags` and set up terminal output.
    ///
    /// # Errors
    ///
    /// Fails when the configuration file is present but unreadable or malformed.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let store = YamlConfigStore::new(flags.config);
        let config = load_config(&store)?;
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.json),
            mode,
            store,
            config,
        })
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }

    #[must_use]
    pub fn human(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// The project commands act on.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when no project can be selected.
    pub fn active_project(&self) -> Result<ActiveProject<'_>> {
        let name = self.config.active_project_name()?;
        let profile = self.config.project(name)?;
        Ok(ActiveProject { name, profile })
    }

    /// Drone settings of `project`, falling back to `DRONE_SERVER` / `DRONE_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` when neither is available.
    pub fn drone_settings(&self, project: &ActiveProject<'_>) -> Result<DroneSettings> {
        let fallback = DroneSettings::from_lookup(|key| std::env::var(key).ok());
        Ok(project.profile.drone_settings(project.name, fallback)?)
    }
}
