//! Component identity types shared by the parser and the diagram model.

use std::fmt;

use archrules_core::{PackageMatcher, PatternError};

/// Name of a diagram component, unique per diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentName(String);

impl ComponentName {
    /// Creates a name. Returns `None` for blank input.
    #[must_use]
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        (!name.is_empty()).then(|| Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Secondary identifier of a component, unique among aliased components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
    /// Creates an alias. Returns `None` for blank input.
    #[must_use]
    pub fn new(alias: &str) -> Option<Self> {
        let alias = alias.trim();
        (!alias.is_empty()).then(|| Self(alias.to_string()))
    }

    /// Returns the alias as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A package pattern tagging a component, written `<<..pattern..>>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stereotype(PackageMatcher);

impl Stereotype {
    /// Compiles a stereotype.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid package pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        PackageMatcher::new(pattern.trim()).map(Self)
    }

    /// Returns the pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub fn matcher(&self) -> &PackageMatcher {
        &self.0
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<<{}>>", self.0)
    }
}

/// Unresolved dependency endpoint.
///
/// `[Name]` yields an identifier without alias; a bare `Name` may refer to
/// either an alias or a name, so it carries the text as both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentifier {
    /// Name to look up.
    pub name: ComponentName,
    /// Alias to look up first, if any.
    pub alias: Option<Alias>,
}

impl ComponentIdentifier {
    /// Identifier written as `[Name]`.
    #[must_use]
    pub fn name(name: ComponentName) -> Self {
        Self { name, alias: None }
    }

    /// Identifier written as a bare word.
    #[must_use]
    pub fn bare(name: ComponentName) -> Self {
        let alias = Alias(name.0.clone());
        Self {
            name,
            alias: Some(alias),
        }
    }
}

impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => f.write_str(alias.as_str()),
            None => write!(f, "[{}]", self.name),
        }
    }
}

/// A finished, immutable diagram component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantUmlComponent {
    pub(crate) name: ComponentName,
    pub(crate) stereotypes: Vec<Stereotype>,
    pub(crate) alias: Option<Alias>,
    pub(crate) dependencies: Vec<ComponentName>,
}

impl PlantUmlComponent {
    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &ComponentName {
        &self.name
    }

    /// Returns the stereotypes in declaration order. Never empty.
    #[must_use]
    pub fn stereotypes(&self) -> &[Stereotype] {
        &self.stereotypes
    }

    /// Returns the alias, if declared.
    #[must_use]
    pub fn alias(&self) -> Option<&Alias> {
        self.alias.as_ref()
    }

    /// Returns the targets of outgoing edges, in diagram order. Duplicates are kept.
    #[must_use]
    pub fn dependencies(&self) -> &[ComponentName] {
        &self.dependencies
    }
}
