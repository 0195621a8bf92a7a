//! Application service: project selection use-cases.

use anyhow::Result;

use crate::application::ports::{ConfigStore, ProgressReporter};
use crate::domain::DrodeConfig;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<DrodeConfig> {
    store.load()
}

/// Name of the project commands act on.
///
/// # Errors
///
/// Returns a `ConfigError` when no project can be selected.
pub fn active_project(store: &impl ConfigStore) -> Result<String> {
    let config = store.load()?;
    Ok(config.active_project_name()?.to_string())
}

/// Persist `name` as the active project.
///
/// The configuration file is only written when the project exists.
///
/// # Errors
///
/// Returns `ConfigError::UnknownProject` for an unknown name, or the store's
/// error if the file cannot be written.
pub fn set_active_project(
    store: &impl ConfigStore,
    reporter: &impl ProgressReporter,
    name: &str,
) -> Result<()> {
    let mut config = store.load()?;
    config.set_active_project(name)?;
    store.save(&config)?;
    reporter.success(&format!("The project {name} is now active"));
    Ok(())
}
