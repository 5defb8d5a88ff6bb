//! # archrules-plantuml
//!
//! Checks a code universe against a PlantUML component diagram.
//!
//! Each component carries one or more stereotypes, which are package
//! patterns. A class belongs to the component whose stereotype matches its
//! package, and may only depend on classes of its own component or of the
//! components its component points to.
//!
//! ```text
//! @startuml
//! [Web] <<..web..>>
//! [Service] <<..service..>>
//! [Web] --> [Service]
//! @enduml
//! ```
//!
//! ## Example
//!
//! ```
//! use archrules_core::{ArchRule, CodeUnit, CodeUniverse, Rule};
//! use archrules_plantuml::{adhere_to_plantuml_diagram, Configuration, DiagramSource};
//!
//! let diagram = DiagramSource::from_text(
//!     "layers.puml",
//!     "[Web] <<..web..>>\n[Service] <<..service..>>\n[Web] --> [Service]\n",
//! );
//! let condition = adhere_to_plantuml_diagram(diagram, Configuration::AllDependencies).unwrap();
//!
//! let universe = CodeUniverse::from_units([
//!     CodeUnit::new("app.web.Controller").depends_on("app.service.Orders"),
//!     CodeUnit::new("app.service.Orders").depends_on("app.web.Controller"),
//! ]);
//! let err = ArchRule::classes_should(condition).check(&universe).unwrap_err();
//! assert_eq!(err.report().messages().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod association;
mod component;
mod condition;
mod diagram;
mod error;
mod parser;
mod source;

pub use association::ClassDiagramAssociation;
pub use component::{Alias, ComponentIdentifier, ComponentName, PlantUmlComponent, Stereotype};
pub use condition::{adhere_to_plantuml_diagram, Configuration, PlantUmlCondition};
pub use diagram::{ComponentRegistry, PlantUmlDiagram};
pub use error::{DiagramError, DiagramFormatError, FormatErrorKind, LineSpan};
pub use parser::{parse, ParsedComponent, ParsedDependency, ParsedDiagram};
pub use source::{DiagramSource, DiagramSourceError};
