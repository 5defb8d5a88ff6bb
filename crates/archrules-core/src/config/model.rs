//! Validated rule settings. No serde, no I/O.

use std::path::PathBuf;

use crate::conditions::DependencyPredicate;
use crate::package_matcher::{PackageMatcher, PackageMatchers};
use crate::result::Priority;
use crate::universe::Dependency;

/// Which dependencies the conformance check considers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScopeSetting {
    /// Every dependency.
    #[default]
    All,
    /// Only dependencies whose target belongs to a diagram component.
    InDiagram,
    /// Only dependencies whose target package matches one of the patterns.
    InPackages(PackageMatchers),
}

/// One validated `[[ignore]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSpec {
    origin: Option<String>,
    target: Option<String>,
    origin_package: Option<PackageMatcher>,
    target_package: Option<PackageMatcher>,
}

impl IgnoreSpec {
    /// Ignores every dependency from the given class.
    #[must_use]
    pub fn origin(name: impl Into<String>) -> Self {
        Self {
            origin: Some(name.into()),
            ..Self::default()
        }
    }

    /// Ignores every dependency onto the given class.
    #[must_use]
    pub fn target(name: impl Into<String>) -> Self {
        Self {
            target: Some(name.into()),
            ..Self::default()
        }
    }

    /// Ignores dependencies from `origin` onto `target`.
    #[must_use]
    pub fn pair(origin: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Restricts to origins in packages matching `pattern`.
    #[must_use]
    pub fn with_origin_package(mut self, pattern: PackageMatcher) -> Self {
        self.origin_package = Some(pattern);
        self
    }

    /// Restricts to targets in packages matching `pattern`.
    #[must_use]
    pub fn with_target_package(mut self, pattern: PackageMatcher) -> Self {
        self.target_package = Some(pattern);
        self
    }

    /// Returns true if no criterion is set; such an entry would ignore everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origin.is_none()
            && self.target.is_none()
            && self.origin_package.is_none()
            && self.target_package.is_none()
    }

    /// Builds the predicate: all set criteria must hold.
    #[must_use]
    pub fn to_predicate(&self) -> DependencyPredicate {
        let mut parts = Vec::new();
        if let Some(origin) = &self.origin {
            parts.push(format!("origin {origin}"));
        }
        if let Some(target) = &self.target {
            parts.push(format!("target {target}"));
        }
        if let Some(pattern) = &self.origin_package {
            parts.push(format!("origin in '{pattern}'"));
        }
        if let Some(pattern) = &self.target_package {
            parts.push(format!("target in '{pattern}'"));
        }

        let spec = self.clone();
        DependencyPredicate::new(parts.join(" and "), move |d: &Dependency| {
            spec.origin.as_ref().map_or(true, |o| *o == d.origin.name)
                && spec.target.as_ref().map_or(true, |t| *t == d.target.name)
                && spec
                    .origin_package
                    .as_ref()
                    .map_or(true, |p| p.matches(&d.origin.package))
                && spec
                    .target_package
                    .as_ref()
                    .map_or(true, |p| p.matches(&d.target.package))
        })
    }
}

/// Validated contents of `archrules.toml`.
#[derive(Debug, Clone, Default)]
pub struct RuleSettings {
    /// Diagram file.
    pub diagram: Option<PathBuf>,
    /// Code universe JSON file.
    pub universe: Option<PathBuf>,
    /// Priority reported on failure.
    pub priority: Priority,
    /// Dependency scope.
    pub scope: ScopeSetting,
    /// Whether an empty code universe passes.
    pub allow_empty: bool,
    /// Reason appended to the rule description.
    pub because: Option<String>,
    /// Ignore entries, in file order.
    pub ignores: Vec<IgnoreSpec>,
}
