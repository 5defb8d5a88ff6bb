//! # archrules
//!
//! Keeps class dependencies in line with a PlantUML component diagram.
//!
//! This is the facade crate re-exporting the rule engine and the diagram
//! conformance condition.
//!
//! ## Quick Start
//!
//! ```toml
//! [dev-dependencies]
//! archrules = "0.4"
//! ```
//!
//! ```rust,ignore
//! // tests/architecture.rs
//! use archrules::plantuml::{adhere_to_plantuml_diagram, Configuration};
//! use archrules::{ArchRule, Rule};
//!
//! #[test]
//! fn code_follows_the_diagram() {
//!     let universe = load_universe();
//!     let condition = adhere_to_plantuml_diagram(
//!         std::path::Path::new("docs/architecture.puml"),
//!         Configuration::consider_only_dependencies_in_diagram(),
//!     )
//!     .unwrap()
//!     .ignore_dependency("com.example.legacy.Old", "com.example.web.Controller");
//!
//!     ArchRule::classes_should(condition).check(&universe).unwrap();
//! }
//! ```
//!
//! A failing check produces one report listing every distinct violation:
//!
//! ```text
//! Architecture Violation [Priority: MEDIUM] - Rule 'classes should adhere to PlantUML diagram architecture.puml' was violated (2 times):
//! Class <com.example.service.Orders> depends on class <com.example.web.Controller>
//! Class <com.example.util.Strings> is not contained in any component
//! ```

#![forbid(unsafe_code)]

// Re-export the rule engine
pub use archrules_core::*;

/// PlantUML component diagrams and the conformance condition.
pub mod plantuml {
    pub use archrules_plantuml::*;
}
