//! The conformance condition: every class depends only on what the diagram allows.

use std::sync::Arc;

use archrules_core::{
    ArchCondition, ClassRef, CodeUnit, ConditionEvent, ConditionEvents, DependencyPredicate,
    DescribedPredicate, Dependency, OnlyDependenciesInAnyPackage, PackageMatchers, PatternError,
    ViolationObject,
};
use tracing::debug;

use crate::association::ClassDiagramAssociation;
use crate::diagram::PlantUmlDiagram;
use crate::error::DiagramError;
use crate::source::DiagramSource;

/// Which dependencies are checked against the diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Configuration {
    /// Every dependency.
    #[default]
    AllDependencies,
    /// Only dependencies whose target belongs to some component.
    OnlyDependenciesInDiagram,
    /// Only dependencies whose target package matches one of the patterns.
    OnlyDependenciesInAnyPackage(PackageMatchers),
}

impl Configuration {
    /// Checks every dependency.
    #[must_use]
    pub fn consider_all_dependencies() -> Self {
        Self::AllDependencies
    }

    /// Ignores dependencies on classes outside every component.
    #[must_use]
    pub fn consider_only_dependencies_in_diagram() -> Self {
        Self::OnlyDependenciesInDiagram
    }

    /// Ignores dependencies on classes outside the given packages.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is invalid.
    pub fn consider_only_dependencies_in_any_package<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        PackageMatchers::of(patterns).map(Self::OnlyDependenciesInAnyPackage)
    }

    fn ignore_predicate(&self, association: &Arc<ClassDiagramAssociation>) -> DependencyPredicate {
        match self {
            Self::AllDependencies => DependencyPredicate::always_false(),
            Self::OnlyDependenciesInDiagram => {
                let association = Arc::clone(association);
                DependencyPredicate::new(
                    "dependencies not contained in the diagram",
                    move |d: &Dependency| !association.contains_package(&d.target.package),
                )
            }
            Self::OnlyDependenciesInAnyPackage(packages) => {
                let packages = packages.clone();
                DependencyPredicate::new(
                    format!("dependencies outside of packages {packages}"),
                    move |d: &Dependency| !packages.matches_any(&d.target.package),
                )
            }
        }
    }

    fn description_suffix(&self) -> String {
        match self {
            Self::AllDependencies => String::new(),
            Self::OnlyDependenciesInDiagram => {
                " while ignoring dependencies not contained in the diagram".to_string()
            }
            Self::OnlyDependenciesInAnyPackage(packages) => {
                format!(" while ignoring dependencies outside of packages {packages}")
            }
        }
    }
}

/// Builds the conformance condition for a diagram.
///
/// The diagram is read and resolved once, here.
///
/// # Errors
///
/// Returns an error if the diagram cannot be read or is malformed.
pub fn adhere_to_plantuml_diagram(
    source: impl Into<DiagramSource>,
    configuration: Configuration,
) -> Result<PlantUmlCondition, DiagramError> {
    let diagram = PlantUmlDiagram::from_source(&source.into())?;
    Ok(PlantUmlCondition::new(Arc::new(diagram), &configuration))
}

/// Checks each class against the component it belongs to.
///
/// Immutable: the `ignore_*` methods return a new condition whose ignore
/// predicate is the old one OR the new one.
#[derive(Debug, Clone)]
pub struct PlantUmlCondition {
    association: Arc<ClassDiagramAssociation>,
    ignore: DependencyPredicate,
    description: String,
}

impl PlantUmlCondition {
    /// Creates the condition for an already built diagram.
    #[must_use]
    pub fn new(diagram: Arc<PlantUmlDiagram>, configuration: &Configuration) -> Self {
        let description = format!(
            "adhere to PlantUML diagram {}{}",
            diagram.name(),
            configuration.description_suffix()
        );
        let association = Arc::new(ClassDiagramAssociation::new(diagram));
        let ignore = configuration.ignore_predicate(&association);
        Self {
            association,
            ignore,
            description,
        }
    }

    /// Returns the class-to-component mapping.
    #[must_use]
    pub fn association(&self) -> &ClassDiagramAssociation {
        &self.association
    }

    /// Ignores dependencies whose origin class satisfies `predicate`.
    #[must_use]
    pub fn ignore_dependencies_with_origin(&self, predicate: &DescribedPredicate<ClassRef>) -> Self {
        let p = predicate.clone();
        self.ignore_dependencies(&DependencyPredicate::new(
            format!("dependencies with origin {}", predicate.description()),
            move |d: &Dependency| p.test(&d.origin),
        ))
    }

    /// Ignores dependencies whose target class satisfies `predicate`.
    #[must_use]
    pub fn ignore_dependencies_with_target(&self, predicate: &DescribedPredicate<ClassRef>) -> Self {
        let p = predicate.clone();
        self.ignore_dependencies(&DependencyPredicate::new(
            format!("dependencies with target {}", predicate.description()),
            move |d: &Dependency| p.test(&d.target),
        ))
    }

    /// Ignores dependencies from the class named `origin` to the class named `target`.
    #[must_use]
    pub fn ignore_dependency(&self, origin: &str, target: &str) -> Self {
        let (o, t) = (origin.to_string(), target.to_string());
        self.ignore_dependencies(&DependencyPredicate::new(
            format!("dependency {origin} -> {target}"),
            move |d: &Dependency| d.origin.name == o && d.target.name == t,
        ))
    }

    /// Ignores dependencies whose origin satisfies `origin` and whose
    /// target satisfies `target`.
    #[must_use]
    pub fn ignore_dependencies_between(
        &self,
        origin: &DescribedPredicate<ClassRef>,
        target: &DescribedPredicate<ClassRef>,
    ) -> Self {
        let (o, t) = (origin.clone(), target.clone());
        self.ignore_dependencies(&DependencyPredicate::new(
            format!(
                "dependencies with origin {} and target {}",
                origin.description(),
                target.description()
            ),
            move |d: &Dependency| o.test(&d.origin) && t.test(&d.target),
        ))
    }

    /// Ignores dependencies satisfying `predicate`.
    #[must_use]
    pub fn ignore_dependencies(&self, predicate: &DependencyPredicate) -> Self {
        Self {
            association: Arc::clone(&self.association),
            ignore: self.ignore.or(predicate),
            description: format!("{} while ignoring {}", self.description, predicate.description()),
        }
    }

    fn all_dependencies_ignored(&self, unit: &CodeUnit) -> bool {
        unit.dependencies().iter().all(|d| self.ignore.test(d))
    }
}

impl ArchCondition for PlantUmlCondition {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents) {
        if self.all_dependencies_ignored(unit) {
            return;
        }

        let object = ViolationObject::Class(unit.class_ref());
        let mut components = self.association.associated_components(unit);
        match components.len() {
            0 => events.add(ConditionEvent::violated(
                object,
                format!("Class <{}> is not contained in any component", unit.name),
            )),
            1 => {
                let Some(allowed) = self.association.allowed_patterns(unit) else {
                    return;
                };
                debug!("{} may depend on {}", unit.name, allowed);
                OnlyDependenciesInAnyPackage::new(allowed.clone())
                    .ignore_dependency(&self.ignore)
                    .check(unit, events);
            }
            _ => {
                components.sort_by(|a, b| a.name().cmp(b.name()));
                let names: Vec<&str> = components.iter().map(|c| c.name().as_str()).collect();
                events.add(ConditionEvent::violated(
                    object,
                    format!(
                        "Class <{}> may not be contained in more than one component, but is contained in [{}]",
                        unit.name,
                        names.join(", ")
                    ),
                ));
            }
        }
    }
}
