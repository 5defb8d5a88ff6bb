//! Resolution pass: parsed declarations → immutable component graph.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::component::{ComponentIdentifier, ComponentName, PlantUmlComponent};
use crate::error::{DiagramError, DiagramFormatError, FormatErrorKind};
use crate::parser::{self, ParsedComponent, ParsedDiagram};
use crate::source::DiagramSource;

/// Index of parsed components by name and by alias.
#[derive(Debug)]
pub struct ComponentRegistry<'a> {
    components: &'a [ParsedComponent],
    by_name: HashMap<&'a str, usize>,
    by_alias: HashMap<&'a str, usize>,
}

impl<'a> ComponentRegistry<'a> {
    /// Indexes the components of `diagram`.
    ///
    /// # Errors
    ///
    /// Fails on the first repeated name, alias or stereotype.
    pub fn new(diagram: &'a ParsedDiagram) -> Result<Self, DiagramFormatError> {
        let mut by_name = HashMap::new();
        let mut by_alias = HashMap::new();
        let mut stereotypes = HashSet::new();

        for (index, component) in diagram.components.iter().enumerate() {
            let duplicate = |kind| diagram.error(kind, Some(component.line));

            if by_name.insert(component.name.as_str(), index).is_some() {
                return Err(duplicate(FormatErrorKind::DuplicateComponentName {
                    name: component.name.to_string(),
                }));
            }
            if let Some(alias) = &component.alias {
                if by_alias.insert(alias.as_str(), index).is_some() {
                    return Err(duplicate(FormatErrorKind::DuplicateAlias {
                        alias: alias.to_string(),
                    }));
                }
            }
            for stereotype in &component.stereotypes {
                if !stereotypes.insert(stereotype.as_str()) {
                    return Err(duplicate(FormatErrorKind::DuplicateStereotype {
                        stereotype: stereotype.as_str().to_string(),
                    }));
                }
            }
        }

        Ok(Self {
            components: &diagram.components,
            by_name,
            by_alias,
        })
    }

    /// Looks up the alias first, if the identifier carries one, then the name.
    #[must_use]
    pub fn resolve(&self, identifier: &ComponentIdentifier) -> Option<&'a ParsedComponent> {
        let components = self.components;
        identifier
            .alias
            .as_ref()
            .and_then(|alias| self.by_alias.get(alias.as_str()))
            .or_else(|| self.by_name.get(identifier.name.as_str()))
            .map(|&index| &components[index])
    }
}

/// A finished diagram. Built once, then shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantUmlDiagram {
    name: String,
    components: Vec<PlantUmlComponent>,
    index: HashMap<ComponentName, usize>,
}

impl PlantUmlDiagram {
    /// Resolves every dependency of `parsed` and attaches it to its origin.
    ///
    /// Edge order follows the diagram text; repeated arrows stay repeated.
    ///
    /// # Errors
    ///
    /// Fails on duplicate declarations and on endpoints naming no component.
    pub fn build(parsed: &ParsedDiagram) -> Result<Self, DiagramFormatError> {
        let registry = ComponentRegistry::new(parsed)?;

        let mut edges: HashMap<&ComponentName, Vec<ComponentName>> = HashMap::new();
        for dependency in &parsed.dependencies {
            let resolve = |identifier: &ComponentIdentifier| {
                registry.resolve(identifier).ok_or_else(|| {
                    parsed.error(
                        FormatErrorKind::UnknownComponent {
                            identifier: identifier.to_string(),
                        },
                        Some(dependency.line),
                    )
                })
            };
            let origin = resolve(&dependency.origin)?;
            let target = resolve(&dependency.target)?;
            edges
                .entry(&origin.name)
                .or_default()
                .push(target.name.clone());
        }

        let components: Vec<PlantUmlComponent> = parsed
            .components
            .iter()
            .map(|c| PlantUmlComponent {
                name: c.name.clone(),
                stereotypes: c.stereotypes.clone(),
                alias: c.alias.clone(),
                dependencies: edges.remove(&c.name).unwrap_or_default(),
            })
            .collect();
        let index = components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        debug!(
            "Built diagram {} with {} component(s) and {} dependency arrow(s)",
            parsed.name,
            components.len(),
            parsed.dependencies.len()
        );
        Ok(Self {
            name: parsed.name.clone(),
            components,
            index,
        })
    }

    /// Parses and builds diagram text.
    ///
    /// # Errors
    ///
    /// Returns the first format error.
    pub fn parse(name: &str, text: &str) -> Result<Self, DiagramFormatError> {
        Self::build(&parser::parse(name, text)?)
    }

    /// Reads, parses and builds a diagram.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is not a valid diagram.
    pub fn from_source(source: &DiagramSource) -> Result<Self, DiagramError> {
        let text = source.read()?;
        Ok(Self::parse(&source.name(), &text)?)
    }

    /// Returns the diagram name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all components in declaration order.
    #[must_use]
    pub fn components(&self) -> &[PlantUmlComponent] {
        &self.components
    }

    /// Looks up a component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&PlantUmlComponent> {
        ComponentName::new(name)
            .and_then(|n| self.index.get(&n))
            .map(|&i| &self.components[i])
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if there are no components. Never true for a built diagram.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> Result<PlantUmlDiagram, DiagramFormatError> {
        PlantUmlDiagram::parse("test.puml", text)
    }

    fn targets<'a>(diagram: &'a PlantUmlDiagram, name: &str) -> Vec<&'a str> {
        diagram
            .component(name)
            .unwrap()
            .dependencies()
            .iter()
            .map(ComponentName::as_str)
            .collect()
    }

    #[test]
    fn resolves_forward_references() {
        let diagram = build(
            "[A] --> [B]\n\
             [A] <<..a..>>\n\
             [B] <<..b..>>\n",
        )
        .unwrap();
        assert_eq!(targets(&diagram, "A"), ["B"]);
        assert!(targets(&diagram, "B").is_empty());
    }

    #[test]
    fn keeps_duplicate_edges_in_order() {
        let diagram = build(
            "[A] <<..a..>>\n[B] <<..b..>>\n[C] <<..c..>>\n\
             [A] --> [C]\n[A] --> [B]\n[A] --> [C]\n",
        )
        .unwrap();
        assert_eq!(targets(&diagram, "A"), ["C", "B", "C"]);
    }

    #[test]
    fn alias_is_resolved_before_name() {
        // `B` is the alias of component `A` and also the name of another component.
        let diagram = build(
            "[A] <<..a..>> as B\n\
             [B] <<..b..>>\n\
             [C] <<..c..>>\n\
             B --> [C]\n\
             [B] --> [C]\n",
        )
        .unwrap();
        assert_eq!(targets(&diagram, "A"), ["C"]);
        assert_eq!(targets(&diagram, "B"), ["C"]);
    }

    #[test]
    fn bare_name_falls_back_to_component_name() {
        let diagram = build("[A] <<..a..>>\n[B] <<..b..>>\nA --> B\n").unwrap();
        assert_eq!(targets(&diagram, "A"), ["B"]);
    }

    #[test]
    fn unknown_endpoint_fails() {
        let err = build("[A] <<..a..>>\n[A] --> [Missing]\n").unwrap_err();
        assert_eq!(
            err.kind(),
            &FormatErrorKind::UnknownComponent {
                identifier: "[Missing]".into()
            }
        );
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn duplicates_fail() {
        let kind = |text| build(text).unwrap_err().kind().clone();
        assert!(matches!(
            kind("[A] <<..a..>>\n[A] <<..b..>>\n"),
            FormatErrorKind::DuplicateComponentName { .. }
        ));
        assert!(matches!(
            kind("[A] <<..a..>> as x\n[B] <<..b..>> as x\n"),
            FormatErrorKind::DuplicateAlias { .. }
        ));
        assert!(matches!(
            kind("[A] <<..a..>>\n[B] <<..a..>>\n"),
            FormatErrorKind::DuplicateStereotype { ref stereotype } if stereotype == "..a.."
        ));
        assert!(matches!(
            kind("[A] <<..a..>> <<..a..>>\n"),
            FormatErrorKind::DuplicateStereotype { .. }
        ));
    }

    #[test]
    fn same_text_builds_equal_diagrams() {
        let text = "[A] <<..a..>>\n[B] <<..b..>>\n[A] --> [B]\n";
        assert_eq!(build(text).unwrap(), build(text).unwrap());
        assert_ne!(build(text).unwrap(), build("[A] <<..a..>>\n[B] <<..b..>>\n").unwrap());
    }

    #[test]
    fn queries() {
        let diagram = build("[A] <<..a..>> <<..aa..>> as x\n").unwrap();
        assert_eq!(diagram.len(), 1);
        assert!(!diagram.is_empty());
        assert_eq!(diagram.name(), "test.puml");
        let a = diagram.component("A").unwrap();
        assert_eq!(a.alias().unwrap().as_str(), "x");
        assert_eq!(a.stereotypes().len(), 2);
        assert!(diagram.component("x").is_none());
    }

    #[test]
    fn format_errors_render_as_diagnostics() {
        let err = build("[A] <<..a..>>\n[A] --> [B]\n").unwrap_err();
        let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
        let mut rendered = String::new();
        handler.render_report(&mut rendered, &err).unwrap();
        assert!(rendered.contains("test.puml:2: dependency refers to unknown component [B]"));
        assert!(rendered.contains("[A] --> [B]"));
    }
}
