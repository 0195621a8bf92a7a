//! Infrastructure implementation of the `ConfigStore` port.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::{ConfigError, DrodeConfig, validate_pipeline};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "DRODE_CONFIG_PATH";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store backed by `path`, or by the default location when `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.map(|p| expand_home(&p)),
        }
    }
}

/// Default location: `~/.local/share/drode/config.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".local/share/drode/config.yaml"))
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Parse and validate a configuration document read from `path`.
///
/// # Errors
///
/// Returns `ConfigError::Malformed` for invalid YAML or a zero poll interval, and
/// `ConfigError::InvalidPipeline` for a badly formed pipeline.
pub fn parse_config(content: &str, path: &Path) -> Result<DrodeConfig, ConfigError> {
    // An empty file deserializes to `null`, which is an empty configuration.
    if content.trim().is_empty() {
        return Ok(DrodeConfig::default());
    }
    let config: DrodeConfig =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    if config.wait.interval_secs == 0 {
        return Err(ConfigError::Malformed {
            path: path.display().to_string(),
            reason: "wait.interval_secs must be at least 1".to_string(),
        });
    }
    for (name, profile) in &config.projects {
        validate_pipeline(name, &profile.pipeline)?;
    }
    Ok(config)
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DrodeConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::warn!(path = %path.display(), "configuration file not found");
            return Ok(DrodeConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config = parse_config(&content, &path)?;
        tracing::debug!(
            path = %path.display(),
            projects = config.projects.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    fn save(&self, config: &DrodeConfig) -> Result<()> {
        let path = self.path()?;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        // Write to a sibling temp file and rename so a crash never truncates the config.
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)
            .with_context(|| format!("cannot create temp file in {}", parent.display()))?;
        tmp.write_all(content.as_bytes())
            .context("cannot write config")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", tmp.path().display()))?;
        }

        tmp.persist(&path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }
}
