//! Locating and loading `archrules.toml`.
//!
//! Lookup order, first hit wins:
//!
//! 1. `--config <FILE>`
//! 2. `<project>/archrules.toml`, then `<project>/.archrules.toml`
//! 3. `$ARCHRULES_CONFIG_DIR/config.toml`, else `~/.archrules/config.toml`
//! 4. built-in defaults

use anyhow::{Context, Result};
use archrules_core::config::RuleSettings;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PROJECT_FILES: [&str; 2] = ["archrules.toml", ".archrules.toml"];
const GLOBAL_FILE: &str = "config.toml";
const GLOBAL_DIR_ENV: &str = "ARCHRULES_CONFIG_DIR";

/// Where the settings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the user-wide config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and validates the settings. [`ConfigSource::Default`] yields
    /// default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(&self) -> Result<RuleSettings> {
        let Some(path) = self.path() else {
            debug!("No archrules.toml found, using defaults");
            return Ok(RuleSettings::default());
        };
        if matches!(self, Self::Global(_)) {
            info!("Using global config: {}", path.display());
        }
        RuleSettings::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the config file for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with_global_dir(project_dir, explicit, global_config_dir().as_deref())
}

/// Takes the global directory as a parameter so tests need no env vars.
fn resolve_with_global_dir(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_FILE))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |found| {
            debug!("Found global config: {}", found.display());
            ConfigSource::Global(found)
        })
}

/// `$ARCHRULES_CONFIG_DIR`, else `~/.archrules`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os(GLOBAL_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".archrules")),
    }
}
