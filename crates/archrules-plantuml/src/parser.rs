//! Line-oriented parser for the component diagram subset of PlantUML.
//!
//! Recognized lines:
//!
//! ```text
//! ' comment
//! [Name] <<..pattern..>> <<other.pattern..>> as Alias #Color
//! [Origin] --> [Target] : description
//! Target <-[#red]- Origin
//! ```
//!
//! Aliases are word characters only, so every alias can be written as an
//! arrow endpoint. Everything else (`@startuml`, `skinparam`, notes, ...) is
//! skipped, except lines starting with `[` that fit neither shape and lines
//! holding an arrow (`->`, `<-`) that fits no arrow grammar.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::component::{Alias, ComponentIdentifier, ComponentName, Stereotype};
use crate::error::{DiagramFormatError, FormatErrorKind, LineSpan};

const COMMENT_MARKER: char = '\'';

const COMPONENT_PATTERN: &str =
    r"^\[(?P<name>[^\]]+)\]\s*(?P<stereotypes>(?:<<[^>]*>>\s*)*)(?:as\s+(?P<alias>\w+)\s*)?(?:#\w+\s*)?$";
const STEREOTYPE_PATTERN: &str = r"<<(?P<stereotype>[^>]*)>>";
const ENDPOINT: &str = r"\[[^\]]+\]|[^\s\[\]<>:-]+";
const ARROW_MIDDLE: &str = r"(?:left|right|up|down|\[[^\]]*\])?";

static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMPONENT_PATTERN).unwrap_or_else(|_| panic!("Invalid Regex")));
static STEREOTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STEREOTYPE_PATTERN).unwrap_or_else(|_| panic!("Invalid Regex")));
static RIGHT_ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(?P<origin>{ENDPOINT})\s*-+{ARROW_MIDDLE}-*>\s*(?P<target>{ENDPOINT})$"
    );
    Regex::new(&pattern).unwrap_or_else(|_| panic!("Invalid Regex"))
});
static LEFT_ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(?P<target>{ENDPOINT})\s*<-+{ARROW_MIDDLE}-*\s*(?P<origin>{ENDPOINT})$"
    );
    Regex::new(&pattern).unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// A component declaration before dependencies are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComponent {
    /// Declared name.
    pub name: ComponentName,
    /// Stereotypes in declaration order.
    pub stereotypes: Vec<Stereotype>,
    /// Declared alias.
    pub alias: Option<Alias>,
    /// Where it was declared.
    pub line: LineSpan,
}

/// A dependency arrow before its endpoints are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDependency {
    /// The depending side.
    pub origin: ComponentIdentifier,
    /// The side depended upon.
    pub target: ComponentIdentifier,
    /// Where it was declared.
    pub line: LineSpan,
}

/// Output of the parse pass: plain data, nothing resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDiagram {
    /// Diagram name, used in messages.
    pub name: String,
    /// The full text, kept for diagnostics.
    pub text: String,
    /// Components in declaration order.
    pub components: Vec<ParsedComponent>,
    /// Dependencies in declaration order.
    pub dependencies: Vec<ParsedDependency>,
}

impl ParsedDiagram {
    pub(crate) fn error(&self, kind: FormatErrorKind, line: Option<LineSpan>) -> DiagramFormatError {
        DiagramFormatError::new(kind, &self.name, &self.text, line)
    }
}

/// Parses diagram text.
///
/// # Errors
///
/// Returns an error for malformed component lines, components without or
/// with invalid stereotypes, and diagrams without any component.
pub fn parse(name: &str, text: &str) -> Result<ParsedDiagram, DiagramFormatError> {
    let mut diagram = ParsedDiagram {
        name: name.to_string(),
        text: text.to_string(),
        components: Vec::new(),
        dependencies: Vec::new(),
    };

    for (line, content) in lines(text) {
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }

        let statement = strip_description(trimmed);
        if let Some(dependency) = parse_dependency(statement, line) {
            debug!(
                "{}:{}: dependency {} -> {}",
                name, line.number, dependency.origin, dependency.target
            );
            diagram.dependencies.push(dependency);
        } else if let Some(caps) = COMPONENT_RE.captures(trimmed) {
            let component = parse_component(&caps, trimmed, line)
                .map_err(|kind| diagram.error(kind, Some(line)))?;
            debug!(
                "{}:{}: component [{}] with {} stereotype(s)",
                name,
                line.number,
                component.name,
                component.stereotypes.len()
            );
            diagram.components.push(component);
        } else if statement.contains("->") || statement.contains("<-") {
            return Err(diagram.error(
                FormatErrorKind::MalformedDependency {
                    text: trimmed.to_string(),
                },
                Some(line),
            ));
        } else if trimmed.starts_with('[') {
            return Err(diagram.error(
                FormatErrorKind::MalformedComponent {
                    text: trimmed.to_string(),
                },
                Some(line),
            ));
        }
    }

    if diagram.components.is_empty() {
        return Err(diagram.error(FormatErrorKind::EmptyDiagram, None));
    }
    Ok(diagram)
}

/// Splits text into lines with their spans. Handles `\n` and `\r\n`.
fn lines(text: &str) -> impl Iterator<Item = (LineSpan, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .enumerate()
        .map(move |(index, raw)| {
            let content = raw.trim_end_matches(['\n', '\r']);
            let span = LineSpan {
                number: index + 1,
                offset,
                len: content.len(),
            };
            offset += raw.len();
            (span, content)
        })
}

fn parse_component(
    caps: &Captures<'_>,
    trimmed: &str,
    line: LineSpan,
) -> Result<ParsedComponent, FormatErrorKind> {
    let malformed = || FormatErrorKind::MalformedComponent {
        text: trimmed.to_string(),
    };
    let name = ComponentName::new(&caps["name"]).ok_or_else(malformed)?;

    let stereotypes = STEREOTYPE_RE
        .captures_iter(caps.name("stereotypes").map_or("", |m| m.as_str()))
        .map(|c| {
            let raw = c["stereotype"].trim();
            Stereotype::new(raw).map_err(|source| FormatErrorKind::InvalidStereotype {
                stereotype: raw.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if stereotypes.is_empty() {
        return Err(FormatErrorKind::MissingStereotype {
            name: name.to_string(),
        });
    }

    let alias = match caps.name("alias") {
        Some(m) => Some(Alias::new(m.as_str()).ok_or_else(malformed)?),
        None => None,
    };

    Ok(ParsedComponent {
        name,
        stereotypes,
        alias,
        line,
    })
}

/// Cuts a trailing `: description`. Colons inside `[...]` are part of a name.
fn strip_description(trimmed: &str) -> &str {
    let mut depth = 0usize;
    for (index, c) in trimmed.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return trimmed[..index].trim_end(),
            _ => {}
        }
    }
    trimmed
}

/// Matches a dependency arrow. The left-to-right form is tried before the
/// right-to-left one.
fn parse_dependency(statement: &str, line: LineSpan) -> Option<ParsedDependency> {
    let caps = RIGHT_ARROW_RE
        .captures(statement)
        .or_else(|| LEFT_ARROW_RE.captures(statement))?;
    Some(ParsedDependency {
        origin: endpoint(&caps["origin"])?,
        target: endpoint(&caps["target"])?,
        line,
    })
}

fn endpoint(raw: &str) -> Option<ComponentIdentifier> {
    match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        Some(inner) => ComponentName::new(inner).map(ComponentIdentifier::name),
        None => ComponentName::new(raw).map(ComponentIdentifier::bare),
    }
}
