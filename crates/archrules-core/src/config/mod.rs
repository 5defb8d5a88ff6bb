//! Configuration loaded from `archrules.toml`.
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! RuleSettings
//! ```

use std::path::{Path, PathBuf};

pub mod config_dto;
pub mod loader;
pub mod model;

pub use model::{IgnoreSpec, RuleSettings, ScopeSetting};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// The configuration is structurally invalid.
    #[error("Invalid config: {0}")]
    Load(#[from] loader::LoadError),
}

impl RuleSettings {
    /// Loads settings from a TOML file. Relative `diagram` and `universe`
    /// paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut settings = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            settings.diagram = settings.diagram.map(|p| base.join(p));
            settings.universe = settings.universe.map(|p| base.join(p));
        }
        Ok(settings)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let dto: config_dto::ConfigDto = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Ok(loader::load(dto)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = RuleSettings::parse("").unwrap();
        assert_eq!(settings.scope, ScopeSetting::All);
        assert_eq!(settings.priority, crate::Priority::Medium);
        assert!(settings.diagram.is_none());
    }

    #[test]
    fn parse_reports_toml_errors() {
        let err = RuleSettings::parse("[rule\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn parse_reports_validation_errors() {
        let err = RuleSettings::parse("[rule]\nscope = \"nope\"\n").unwrap_err();
        assert!(err.to_string().starts_with("Invalid config: rule.scope"));
    }
}
