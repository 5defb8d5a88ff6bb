//! The analyzed code universe: units, their packages and dependency edges.
//!
//! Producing a universe from compiled artifacts is the job of an importer;
//! this module only defines the language-agnostic shape rules consume.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Reference to a class-like unit by fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassRef {
    /// Fully-qualified name (e.g., `com.example.domain.User`).
    pub name: String,
    /// Package the unit lives in (e.g., `com.example.domain`).
    pub package: String,
}

impl ClassRef {
    /// Creates a reference with an explicit package.
    #[must_use]
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
        }
    }

    /// Creates a reference, deriving the package from the name.
    #[must_use]
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let package = package_of(&name).to_string();
        Self { name, package }
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Returns everything before the last `.` of a fully-qualified name.
///
/// Names without a `.` live in the default package, `""`.
#[must_use]
pub fn package_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or("", |(package, _)| package)
}

/// Where a dependency occurs in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file name (e.g., `Service.java`).
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
}

impl SourceLocation {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// A direct dependency edge from one unit to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// The depending unit.
    pub origin: ClassRef,
    /// The unit depended upon.
    pub target: ClassRef,
    /// Source location, if the importer recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Dependency {
    /// Creates a new dependency without location.
    #[must_use]
    pub fn new(origin: ClassRef, target: ClassRef) -> Self {
        Self {
            origin,
            target,
            location: None,
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Human-readable description used in violation messages.
    #[must_use]
    pub fn description(&self) -> String {
        use std::fmt::Write;
        let mut text = format!(
            "Class <{}> depends on class <{}>",
            self.origin.name, self.target.name
        );
        if let Some(location) = &self.location {
            let _ = write!(text, " in ({location})");
        }
        text
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// One analyzed class-like unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeUnit {
    /// Fully-qualified name.
    pub name: String,
    /// Package name; empty for the default package.
    pub package: String,
    /// Outgoing dependencies, in importer order.
    pub dependencies: Vec<Dependency>,
}

impl CodeUnit {
    /// Creates a unit with no dependencies, deriving the package from the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let class = ClassRef::from_name(name);
        Self {
            name: class.name,
            package: class.package,
            dependencies: Vec::new(),
        }
    }

    /// Creates a unit in an explicit package.
    #[must_use]
    pub fn in_package(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            dependencies: Vec::new(),
        }
    }

    /// Returns a reference to this unit.
    #[must_use]
    pub fn class_ref(&self) -> ClassRef {
        ClassRef::new(self.name.clone(), self.package.clone())
    }

    /// Adds a dependency on `target`, deriving its package from the name.
    #[must_use]
    pub fn depends_on(mut self, target: impl Into<String>) -> Self {
        let dependency = Dependency::new(self.class_ref(), ClassRef::from_name(target));
        self.dependencies.push(dependency);
        self
    }

    /// Adds a fully specified dependency; its origin is replaced by this unit.
    #[must_use]
    pub fn with_dependency(mut self, mut dependency: Dependency) -> Self {
        dependency.origin = self.class_ref();
        self.dependencies.push(dependency);
        self
    }

    /// Returns the outgoing dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }
}

/// The materialized set of units a rule is evaluated against.
#[derive(Debug, Clone, Default)]
pub struct CodeUniverse {
    units: Vec<CodeUnit>,
    index: HashMap<String, usize>,
}

impl CodeUniverse {
    /// Creates an empty universe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a universe from units. A later unit with a name already
    /// present replaces the earlier one.
    #[must_use]
    pub fn from_units(units: impl IntoIterator<Item = CodeUnit>) -> Self {
        let mut universe = Self::new();
        for unit in units {
            universe.insert(unit);
        }
        universe
    }

    /// Inserts or replaces a unit.
    pub fn insert(&mut self, unit: CodeUnit) {
        if let Some(&i) = self.index.get(&unit.name) {
            tracing::warn!("duplicate unit `{}` replaces earlier definition", unit.name);
            self.units[i] = unit;
        } else {
            self.index.insert(unit.name.clone(), self.units.len());
            self.units.push(unit);
        }
    }

    /// Looks up a unit by fully-qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CodeUnit> {
        self.index.get(name).map(|&i| &self.units[i])
    }

    /// Iterates units in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CodeUnit> {
        self.units.iter()
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if there are no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<'a> IntoIterator for &'a CodeUniverse {
    type Item = &'a CodeUnit;
    type IntoIter = std::slice::Iter<'a, CodeUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<CodeUnit> for CodeUniverse {
    fn from_iter<I: IntoIterator<Item = CodeUnit>>(iter: I) -> Self {
        Self::from_units(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_is_derived_from_name() {
        assert_eq!(package_of("com.example.User"), "com.example");
        assert_eq!(package_of("User"), "");
        assert_eq!(ClassRef::from_name("a.b.C").package, "a.b");
    }

    #[test]
    fn depends_on_records_origin_and_target() {
        let unit = CodeUnit::new("src.A").depends_on("tgt.B");
        assert_eq!(unit.package, "src");
        assert_eq!(unit.dependencies().len(), 1);
        let dep = &unit.dependencies()[0];
        assert_eq!(dep.origin.name, "src.A");
        assert_eq!(dep.target.package, "tgt");
    }

    #[test]
    fn dependency_description_includes_location() {
        let dep = Dependency::new(ClassRef::from_name("a.A"), ClassRef::from_name("b.B"))
            .with_location(SourceLocation::new("A.java", 12));
        assert_eq!(
            dep.description(),
            "Class <a.A> depends on class <b.B> in (A.java:12)"
        );
    }

    #[test]
    fn with_dependency_rewrites_origin() {
        let dep = Dependency::new(ClassRef::from_name("x.X"), ClassRef::from_name("b.B"));
        let unit = CodeUnit::in_package("a.A", "a").with_dependency(dep);
        assert_eq!(unit.dependencies()[0].origin.name, "a.A");
    }

    #[test]
    fn universe_indexes_and_replaces_by_name() {
        let universe = CodeUniverse::from_units([
            CodeUnit::new("a.A"),
            CodeUnit::new("b.B"),
            CodeUnit::new("a.A").depends_on("b.B"),
        ]);
        assert_eq!(universe.len(), 2);
        assert_eq!(universe.get("a.A").unwrap().dependencies().len(), 1);
        assert!(universe.get("c.C").is_none());
        let names: Vec<&str> = universe.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["a.A", "b.B"]);
    }
}
