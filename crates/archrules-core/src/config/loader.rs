//! DTO → validated settings conversion.

use crate::package_matcher::{PackageMatcher, PackageMatchers, PatternError};
use crate::result::{Priority, PriorityError};

use super::config_dto::{ConfigDto, IgnoreDto};
use super::model::{IgnoreSpec, RuleSettings, ScopeSetting};

/// Errors during DTO → settings conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A package pattern is invalid.
    #[error("{context}: {source}")]
    Pattern {
        /// Where the pattern was found (e.g., "rule.packages[0]").
        context: String,
        /// The underlying pattern error.
        source: PatternError,
    },

    /// Unknown scope string.
    #[error("rule.scope: unknown scope `{value}`, expected: all, diagram, packages")]
    UnknownScope {
        /// The invalid value.
        value: String,
    },

    /// Unknown priority string.
    #[error("rule.priority: {0}")]
    UnknownPriority(#[from] PriorityError),

    /// `scope = "packages"` without patterns.
    #[error("rule.packages: at least one package is required when scope = \"packages\"")]
    MissingPackages,

    /// Patterns given for a scope that does not use them.
    #[error("rule.packages: only valid with scope = \"packages\", found scope = \"{scope}\"")]
    UnexpectedPackages {
        /// The configured scope.
        scope: String,
    },

    /// An `[[ignore]]` entry without any criterion.
    #[error("ignore[{index}]: at least one of origin, target, origin_package, target_package must be set")]
    EmptyIgnore {
        /// Index of the entry.
        index: usize,
    },
}

/// Converts a [`ConfigDto`] to validated [`RuleSettings`].
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: ConfigDto) -> Result<RuleSettings, LoadError> {
    let rule = dto.rule;
    let priority = rule
        .priority
        .parse::<Priority>()
        .map_err(LoadError::UnknownPriority)?;
    let scope = convert_scope(&rule.scope, &rule.packages)?;

    let ignores = dto
        .ignore
        .into_iter()
        .enumerate()
        .map(|(i, d)| convert_ignore(d, i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RuleSettings {
        diagram: rule.diagram,
        universe: rule.universe,
        priority,
        scope,
        allow_empty: rule.allow_empty,
        because: rule.because,
        ignores,
    })
}

fn convert_scope(scope: &str, packages: &[String]) -> Result<ScopeSetting, LoadError> {
    match scope {
        "all" | "diagram" if !packages.is_empty() => Err(LoadError::UnexpectedPackages {
            scope: scope.to_string(),
        }),
        "all" => Ok(ScopeSetting::All),
        "diagram" => Ok(ScopeSetting::InDiagram),
        "packages" if packages.is_empty() => Err(LoadError::MissingPackages),
        "packages" => {
            let matchers = packages
                .iter()
                .enumerate()
                .map(|(i, p)| pattern(p, format!("rule.packages[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ScopeSetting::InPackages(PackageMatchers::from_matchers(
                matchers,
            )))
        }
        other => Err(LoadError::UnknownScope {
            value: other.to_string(),
        }),
    }
}

fn convert_ignore(dto: IgnoreDto, index: usize) -> Result<IgnoreSpec, LoadError> {
    let ctx = format!("ignore[{index}]");
    let mut spec = match (dto.origin, dto.target) {
        (Some(origin), Some(target)) => IgnoreSpec::pair(origin, target),
        (Some(origin), None) => IgnoreSpec::origin(origin),
        (None, Some(target)) => IgnoreSpec::target(target),
        (None, None) => IgnoreSpec::default(),
    };
    if let Some(p) = &dto.origin_package {
        spec = spec.with_origin_package(pattern(p, format!("{ctx}.origin_package"))?);
    }
    if let Some(p) = &dto.target_package {
        spec = spec.with_target_package(pattern(p, format!("{ctx}.target_package"))?);
    }
    if spec.is_empty() {
        return Err(LoadError::EmptyIgnore { index });
    }
    Ok(spec)
}

fn pattern(raw: &str, context: String) -> Result<PackageMatcher, LoadError> {
    PackageMatcher::new(raw).map_err(|source| LoadError::Pattern { context, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_and_load(toml_str: &str) -> Result<RuleSettings, LoadError> {
        let dto: ConfigDto = toml::from_str(toml_str).unwrap();
        load(dto)
    }

    #[test]
    fn load_empty_config() {
        let settings = parse_and_load("").unwrap();
        assert_eq!(settings.scope, ScopeSetting::All);
        assert_eq!(settings.priority, Priority::Medium);
        assert!(settings.ignores.is_empty());
    }

    #[test]
    fn load_packages_scope() {
        let settings = parse_and_load(
            r#"
[rule]
scope = "packages"
packages = ["com.example.."]
priority = "low"
"#,
        )
        .unwrap();
        assert!(matches!(settings.scope, ScopeSetting::InPackages(ref m) if m.matches_any("com.example.x")));
        assert_eq!(settings.priority, Priority::Low);
    }

    #[test]
    fn load_ignores() {
        let settings = parse_and_load(
            r#"
[[ignore]]
origin = "a.A"
target = "b.B"

[[ignore]]
origin_package = "..legacy.."
"#,
        )
        .unwrap();
        assert_eq!(settings.ignores.len(), 2);
        assert_eq!(settings.ignores[0], IgnoreSpec::pair("a.A", "b.B"));
    }

    #[test]
    fn rejects_unknown_scope() {
        let result = parse_and_load("[rule]\nscope = \"everything\"\n");
        assert!(matches!(result, Err(LoadError::UnknownScope { .. })));
    }

    #[test]
    fn rejects_packages_scope_without_packages() {
        let result = parse_and_load("[rule]\nscope = \"packages\"\n");
        assert!(matches!(result, Err(LoadError::MissingPackages)));
    }

    #[test]
    fn rejects_packages_with_other_scope() {
        let result = parse_and_load("[rule]\nscope = \"diagram\"\npackages = [\"a\"]\n");
        assert!(matches!(result, Err(LoadError::UnexpectedPackages { .. })));
    }

    #[test]
    fn rejects_invalid_pattern() {
        let result = parse_and_load("[rule]\nscope = \"packages\"\npackages = [\"a...b\"]\n");
        assert!(matches!(result, Err(LoadError::Pattern { .. })));
    }

    #[test]
    fn rejects_empty_ignore() {
        let result = parse_and_load("[[ignore]]\n");
        assert!(matches!(result, Err(LoadError::EmptyIgnore { index: 0 })));
    }

    #[test]
    fn rejects_unknown_priority() {
        let result = parse_and_load("[rule]\npriority = \"urgent\"\n");
        assert!(matches!(result, Err(LoadError::UnknownPriority(ref e)) if e.value == "urgent"));
    }
}
