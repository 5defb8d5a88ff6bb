//! Maps code units onto diagram components by their stereotypes.

use std::sync::Arc;

use archrules_core::{CodeUnit, PackageMatchers};

use crate::component::PlantUmlComponent;
use crate::diagram::PlantUmlDiagram;

#[derive(Debug)]
struct Association {
    own: PackageMatchers,
    allowed_targets: PackageMatchers,
    allowed: PackageMatchers,
}

/// Class-to-component mapping derived from a finished diagram.
///
/// A unit belongs to every component with a stereotype matching its
/// package. Zero or several matches are reported by the caller, never
/// resolved here.
#[derive(Debug)]
pub struct ClassDiagramAssociation {
    diagram: Arc<PlantUmlDiagram>,
    associations: Vec<Association>,
}

impl ClassDiagramAssociation {
    /// Compiles stereotype and target patterns for every component.
    #[must_use]
    pub fn new(diagram: Arc<PlantUmlDiagram>) -> Self {
        let own_patterns = |component: &PlantUmlComponent| {
            component
                .stereotypes()
                .iter()
                .map(|s| s.matcher().clone())
                .collect::<Vec<_>>()
        };

        let associations = diagram
            .components()
            .iter()
            .map(|component| {
                let own = own_patterns(component);
                let targets: Vec<_> = component
                    .dependencies()
                    .iter()
                    .filter_map(|name| diagram.component(name.as_str()))
                    .flat_map(own_patterns)
                    .collect();
                let allowed = own.iter().chain(&targets).cloned().collect();
                Association {
                    own: PackageMatchers::from_matchers(own),
                    allowed_targets: PackageMatchers::from_matchers(targets),
                    allowed: PackageMatchers::from_matchers(allowed),
                }
            })
            .collect();

        Self {
            diagram,
            associations,
        }
    }

    /// Returns the underlying diagram.
    #[must_use]
    pub fn diagram(&self) -> &PlantUmlDiagram {
        &self.diagram
    }

    /// Returns true if the unit belongs to at least one component.
    #[must_use]
    pub fn contains(&self, unit: &CodeUnit) -> bool {
        self.contains_package(&unit.package)
    }

    /// Returns true if the package belongs to at least one component.
    #[must_use]
    pub fn contains_package(&self, package: &str) -> bool {
        self.associations.iter().any(|a| a.own.matches_any(package))
    }

    /// Returns every component the unit belongs to, in diagram order.
    #[must_use]
    pub fn associated_components(&self, unit: &CodeUnit) -> Vec<&PlantUmlComponent> {
        self.matching(&unit.package)
            .map(|i| &self.diagram.components()[i])
            .collect()
    }

    /// Returns the stereotypes of the unit's component, or `None` unless
    /// the unit belongs to exactly one component.
    #[must_use]
    pub fn own_patterns(&self, unit: &CodeUnit) -> Option<&PackageMatchers> {
        self.single(unit).map(|a| &a.own)
    }

    /// Returns the stereotypes of every component the unit's component
    /// depends on, or `None` unless the unit belongs to exactly one component.
    #[must_use]
    pub fn allowed_target_patterns(&self, unit: &CodeUnit) -> Option<&PackageMatchers> {
        self.single(unit).map(|a| &a.allowed_targets)
    }

    /// Own and target patterns together.
    #[must_use]
    pub fn allowed_patterns(&self, unit: &CodeUnit) -> Option<&PackageMatchers> {
        self.single(unit).map(|a| &a.allowed)
    }

    fn matching<'s>(&'s self, package: &'s str) -> impl Iterator<Item = usize> + 's {
        self.associations
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.own.matches_any(package))
            .map(|(i, _)| i)
    }

    fn single(&self, unit: &CodeUnit) -> Option<&Association> {
        let mut matches = self.matching(&unit.package);
        match (matches.next(), matches.next()) {
            (Some(index), None) => Some(&self.associations[index]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn association(text: &str) -> ClassDiagramAssociation {
        ClassDiagramAssociation::new(Arc::new(PlantUmlDiagram::parse("test.puml", text).unwrap()))
    }

    fn patterns(matchers: Option<&PackageMatchers>) -> String {
        matchers.map(ToString::to_string).unwrap_or_default()
    }

    const LAYERS: &str = "\
[Web] <<..web..>>
[Service] <<..service..>> <<..api..>>
[Persistence] <<..persistence..>>
[Web] --> [Service]
[Service] --> [Persistence]
[Web] --> [Persistence]
";

    #[test]
    fn contains_by_package() {
        let association = association(LAYERS);
        assert!(association.contains(&CodeUnit::new("shop.web.Controller")));
        assert!(association.contains(&CodeUnit::new("shop.api.Facade")));
        assert!(!association.contains(&CodeUnit::new("shop.util.Strings")));
        assert!(association.contains_package("persistence"));
    }

    #[test]
    fn own_and_target_patterns() {
        let association = association(LAYERS);
        let controller = CodeUnit::new("shop.web.Controller");
        assert_eq!(patterns(association.own_patterns(&controller)), "['..web..']");
        assert_eq!(
            patterns(association.allowed_target_patterns(&controller)),
            "['..service..', '..api..', '..persistence..']"
        );
        assert_eq!(
            patterns(association.allowed_patterns(&controller)),
            "['..web..', '..service..', '..api..', '..persistence..']"
        );

        let repository = CodeUnit::new("shop.persistence.Repository");
        assert_eq!(patterns(association.allowed_target_patterns(&repository)), "[]");
    }

    #[test]
    fn multiplicity_is_surfaced() {
        let association = association("[A] <<..a..>>\n[B] <<..b..>>\n");
        let both = CodeUnit::new("x.a.b.Both");
        let names: Vec<&str> = association
            .associated_components(&both)
            .iter()
            .map(|c| c.name().as_str())
            .collect();
        assert_eq!(names, ["A", "B"]);
        assert!(association.own_patterns(&both).is_none());

        let none = CodeUnit::new("x.c.None");
        assert!(association.associated_components(&none).is_empty());
        assert!(association.allowed_patterns(&none).is_none());
    }
}
