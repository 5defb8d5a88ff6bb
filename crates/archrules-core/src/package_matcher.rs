//! Package pattern matching.
//!
//! Patterns are dot separated, like the packages they match:
//!
//! - `..` matches zero or more consecutive segments
//! - `*` matches exactly one segment
//! - any other segment must match literally
//!
//! So `..service..` matches `com.app.service.impl`, `service` and
//! `com.service`, while `com.*.api` matches `com.billing.api` but not
//! `com.api` or `com.billing.v2.api`.

use std::fmt;

/// Errors from compiling a package pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern is empty.
    #[error("package pattern must not be empty")]
    Empty,

    /// The pattern contains three or more consecutive dots.
    #[error("package pattern `{pattern}` may not contain more than two '.' in a row")]
    TooManyDots {
        /// The rejected pattern.
        pattern: String,
    },

    /// A single `.` is missing a segment on one side.
    #[error("package pattern `{pattern}` contains an empty segment")]
    EmptySegment {
        /// The rejected pattern.
        pattern: String,
    },

    /// `*` was combined with other characters inside one segment.
    #[error("package pattern `{pattern}`: `*` must stand alone as a segment, found `{segment}`")]
    PartialWildcard {
        /// The rejected pattern.
        pattern: String,
        /// The offending segment.
        segment: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Token {
    AnySegments,
    OneSegment,
    Literal(String),
}

/// A compiled package pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageMatcher {
    raw: String,
    tokens: Vec<Token>,
}

impl PackageMatcher {
    /// Compiles a package pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is empty, contains `...`, has an
    /// empty segment or mixes `*` with other characters in a segment.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            raw: pattern.to_string(),
            tokens: tokenize(pattern)?,
        })
    }

    /// Tests whether a package name matches this pattern.
    ///
    /// The default package is the empty string and has no segments.
    #[must_use]
    pub fn matches(&self, package: &str) -> bool {
        let segments: Vec<&str> = if package.is_empty() {
            Vec::new()
        } else {
            package.split('.').collect()
        };
        match_tokens(&segments, &self.tokens)
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PackageMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    if pattern.contains("...") {
        return Err(PatternError::TooManyDots {
            pattern: pattern.to_string(),
        });
    }

    let mut tokens = Vec::new();
    for (i, part) in pattern.split("..").enumerate() {
        if i > 0 {
            tokens.push(Token::AnySegments);
        }
        if part.is_empty() {
            continue;
        }
        for segment in part.split('.') {
            tokens.push(match segment {
                "" => {
                    return Err(PatternError::EmptySegment {
                        pattern: pattern.to_string(),
                    })
                }
                "*" => Token::OneSegment,
                s if s.contains('*') => {
                    return Err(PatternError::PartialWildcard {
                        pattern: pattern.to_string(),
                        segment: s.to_string(),
                    })
                }
                s => Token::Literal(s.to_string()),
            });
        }
    }
    Ok(tokens)
}

fn match_tokens(segments: &[&str], tokens: &[Token]) -> bool {
    let Some((first, rest)) = tokens.split_first() else {
        return segments.is_empty();
    };

    match first {
        Token::AnySegments => (0..=segments.len()).any(|i| match_tokens(&segments[i..], rest)),
        Token::OneSegment => !segments.is_empty() && match_tokens(&segments[1..], rest),
        Token::Literal(literal) => segments
            .first()
            .is_some_and(|s| *s == literal.as_str() && match_tokens(&segments[1..], rest)),
    }
}

/// Several package patterns combined with OR semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMatchers(Vec<PackageMatcher>);

impl PackageMatchers {
    /// Compiles every pattern.
    ///
    /// # Errors
    ///
    /// Returns the first pattern error encountered.
    pub fn of<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .map(|p| PackageMatcher::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Combines already compiled matchers.
    #[must_use]
    pub fn from_matchers(matchers: Vec<PackageMatcher>) -> Self {
        Self(matchers)
    }

    /// Tests whether any pattern matches the package.
    #[must_use]
    pub fn matches_any(&self, package: &str) -> bool {
        self.0.iter().any(|m| m.matches(package))
    }

    /// Returns the compiled matchers.
    #[must_use]
    pub fn matchers(&self) -> &[PackageMatcher] {
        &self.0
    }

    /// Returns true if there are no patterns; such a set matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PackageMatchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.0.iter().map(|m| format!("'{m}'")).collect();
        write!(f, "[{}]", quoted.join(", "))
    }
}

/// One-shot match of a package against a pattern.
///
/// # Errors
///
/// Returns an error if the pattern is invalid.
pub fn package_matches(pattern: &str, package: &str) -> Result<bool, PatternError> {
    Ok(PackageMatcher::new(pattern)?.matches(package))
}
