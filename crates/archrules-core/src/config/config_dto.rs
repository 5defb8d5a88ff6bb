//! Serde DTOs mirroring the TOML structure of `archrules.toml`.
//!
//! No validation happens here; see [`super::loader`].

use serde::Deserialize;
use std::path::PathBuf;

/// Top-level TOML document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigDto {
    /// The `[rule]` table.
    #[serde(default)]
    pub rule: RuleDto,

    /// The `[[ignore]]` array.
    #[serde(default)]
    pub ignore: Vec<IgnoreDto>,
}

/// `[rule]` table.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleDto {
    /// Diagram file, relative to the config file's directory.
    #[serde(default)]
    pub diagram: Option<PathBuf>,

    /// Code universe JSON file, relative to the config file's directory.
    #[serde(default)]
    pub universe: Option<PathBuf>,

    /// `"low"`, `"medium"` or `"high"`.
    #[serde(default = "default_priority")]
    pub priority: String,

    /// `"all"`, `"diagram"` or `"packages"`.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Package patterns for `scope = "packages"`.
    #[serde(default)]
    pub packages: Vec<String>,

    /// Whether an empty code universe passes.
    #[serde(default)]
    pub allow_empty: bool,

    /// Reason appended to the rule description.
    #[serde(default)]
    pub because: Option<String>,
}

/// One `[[ignore]]` entry. All present fields must match.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IgnoreDto {
    /// Fully-qualified origin class name.
    #[serde(default)]
    pub origin: Option<String>,

    /// Fully-qualified target class name.
    #[serde(default)]
    pub target: Option<String>,

    /// Package pattern the origin must live in.
    #[serde(default)]
    pub origin_package: Option<String>,

    /// Package pattern the target must live in.
    #[serde(default)]
    pub target_package: Option<String>,
}

impl Default for RuleDto {
    fn default() -> Self {
        Self {
            diagram: None,
            universe: None,
            priority: default_priority(),
            scope: default_scope(),
            packages: Vec::new(),
            allow_empty: false,
            because: None,
        }
    }
}

fn default_priority() -> String {
    "medium".to_string()
}

fn default_scope() -> String {
    "all".to_string()
}
