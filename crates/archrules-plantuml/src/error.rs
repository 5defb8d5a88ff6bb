//! Errors raised while building a diagram.

use miette::{Diagnostic, NamedSource, SourceSpan};

use archrules_core::PatternError;

use crate::source::DiagramSourceError;

/// Position of one line inside the diagram text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Byte length, without the line terminator.
    pub len: usize,
}

impl From<LineSpan> for SourceSpan {
    fn from(line: LineSpan) -> Self {
        Self::from((line.offset, line.len))
    }
}

/// What is wrong with the diagram.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatErrorKind {
    /// A line opens like a component but does not follow the grammar.
    #[error("malformed component declaration `{text}`")]
    MalformedComponent {
        /// The offending line, trimmed.
        text: String,
    },

    /// A line holds an arrow but no endpoint pair the arrow grammar accepts.
    #[error("malformed dependency arrow `{text}`")]
    MalformedDependency {
        /// The offending line, trimmed.
        text: String,
    },

    /// Two components share a name.
    #[error("component [{name}] is declared more than once")]
    DuplicateComponentName {
        /// The repeated name.
        name: String,
    },

    /// Two components share an alias.
    #[error("alias '{alias}' is declared more than once")]
    DuplicateAlias {
        /// The repeated alias.
        alias: String,
    },

    /// A stereotype literal is used more than once in the diagram.
    #[error("stereotype <<{stereotype}>> must be unique within the diagram")]
    DuplicateStereotype {
        /// The repeated stereotype.
        stereotype: String,
    },

    /// A component without any stereotype.
    #[error("component [{name}] must declare at least one stereotype")]
    MissingStereotype {
        /// The component name.
        name: String,
    },

    /// A stereotype that is not a package pattern.
    #[error("stereotype <<{stereotype}>> is not a valid package pattern: {source}")]
    InvalidStereotype {
        /// The stereotype text.
        stereotype: String,
        /// Why the pattern was rejected.
        source: PatternError,
    },

    /// A dependency endpoint that names no component.
    #[error("dependency refers to unknown component {identifier}")]
    UnknownComponent {
        /// The endpoint as written.
        identifier: String,
    },

    /// No component was declared at all.
    #[error("diagram declares no component")]
    EmptyDiagram,
}

/// Structural error in diagram text. No partial diagram is produced.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{}: {kind}", location(.diagram, .line))]
#[diagnostic(code(archrules::diagram_format))]
pub struct DiagramFormatError {
    kind: FormatErrorKind,
    diagram: String,
    line: Option<usize>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{kind}")]
    span: Option<SourceSpan>,
}

fn location(diagram: &str, line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("{diagram}:{line}"),
        None => diagram.to_string(),
    }
}

impl DiagramFormatError {
    pub(crate) fn new(
        kind: FormatErrorKind,
        diagram: &str,
        text: &str,
        line: Option<LineSpan>,
    ) -> Self {
        Self {
            kind,
            diagram: diagram.to_string(),
            line: line.map(|l| l.number),
            source_code: NamedSource::new(diagram, text.to_string()),
            span: line.map(SourceSpan::from),
        }
    }

    /// Returns what is wrong.
    #[must_use]
    pub fn kind(&self) -> &FormatErrorKind {
        &self.kind
    }

    /// Returns the diagram name.
    #[must_use]
    pub fn diagram(&self) -> &str {
        &self.diagram
    }

    /// Returns the 1-based line number, if the error belongs to one line.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

/// Any failure while turning a diagram source into a condition.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum DiagramError {
    /// The text is not a valid diagram.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] DiagramFormatError),

    /// The text could not be read.
    #[error(transparent)]
    Source(#[from] DiagramSourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_diagram_and_line() {
        let err = DiagramFormatError::new(
            FormatErrorKind::MissingStereotype { name: "A".into() },
            "arch.puml",
            "@startuml\n[A]\n@enduml\n",
            Some(LineSpan {
                number: 2,
                offset: 10,
                len: 3,
            }),
        );
        assert_eq!(
            err.to_string(),
            "arch.puml:2: component [A] must declare at least one stereotype"
        );
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn message_without_line() {
        let err = DiagramFormatError::new(FormatErrorKind::EmptyDiagram, "empty.puml", "", None);
        assert_eq!(err.to_string(), "empty.puml: diagram declares no component");
    }
}
