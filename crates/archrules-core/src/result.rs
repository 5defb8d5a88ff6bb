//! Evaluation results and failure reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::events::{ConditionEvents, ViolationKind, ViolationObject};

/// Priority of a rule, shown in failure reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Returns the upper-case label used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priority name other than `low`, `medium` or `high`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority `{value}`, expected: low, medium, high")]
pub struct PriorityError {
    /// The rejected text.
    pub value: String,
}

impl std::str::FromStr for Priority {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(PriorityError {
                value: s.to_string(),
            }),
        }
    }
}

/// Violation messages, deduplicated and sorted lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailureMessages(BTreeSet<String>);

impl FailureMessages {
    /// Collects the messages of all violating events.
    #[must_use]
    pub fn from_events(events: &ConditionEvents) -> Self {
        Self(
            events
                .violating()
                .iter()
                .flat_map(|e| e.messages().iter().cloned())
                .collect(),
        )
    }

    /// Number of distinct messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates messages in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Rendered failure of one rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    priority: Priority,
    rule: String,
    messages: FailureMessages,
}

impl FailureReport {
    /// Creates a report.
    #[must_use]
    pub fn new(priority: Priority, rule: impl Into<String>, messages: FailureMessages) -> Self {
        Self {
            priority,
            rule: rule.into(),
            messages,
        }
    }

    /// Returns true if there is nothing to report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the deduplicated messages.
    #[must_use]
    pub fn messages(&self) -> &FailureMessages {
        &self.messages
    }

    /// Returns the rule description.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Returns the priority.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Architecture Violation [Priority: {}] - Rule '{}' was violated ({} times):",
            self.priority,
            self.rule,
            self.messages.len()
        )?;
        for message in self.messages.iter() {
            write!(f, "\n{message}")?;
        }
        Ok(())
    }
}

/// Result of evaluating one rule against a code universe.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    description: String,
    events: ConditionEvents,
    priority: Priority,
}

impl EvaluationResult {
    /// Creates a result.
    #[must_use]
    pub fn new(description: impl Into<String>, events: ConditionEvents, priority: Priority) -> Self {
        Self {
            description: description.into(),
            events,
            priority,
        }
    }

    /// Returns the rule description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the collected events.
    #[must_use]
    pub fn events(&self) -> &ConditionEvents {
        &self.events
    }

    /// Returns true if any violation was recorded.
    #[must_use]
    pub fn has_violation(&self) -> bool {
        self.events.contain_violation()
    }

    /// Merges the events of another result into this one.
    ///
    /// Description and priority of `self` are kept.
    pub fn add(&mut self, other: Self) {
        self.events.extend(other.events);
    }

    /// Builds the failure report for this result.
    #[must_use]
    pub fn failure_report(&self) -> FailureReport {
        FailureReport::new(
            self.priority,
            self.description.clone(),
            FailureMessages::from_events(&self.events),
        )
    }

    /// Delivers violations whose objects are all of `kind`.
    pub fn handle_violations<F>(&self, kind: ViolationKind, handler: F)
    where
        F: FnMut(&[ViolationObject], &[String]),
    {
        self.events.handle_violations(kind, handler);
    }

    /// Returns a copy keeping only violations with at least one message
    /// accepted by `keep`.
    #[must_use]
    pub fn filter_descriptions_matching<F>(&self, keep: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let mut events = self.events.clone();
        events.retain_violating(|e| e.messages().iter().any(|m| keep(m)));
        Self {
            description: self.description.clone(),
            events,
            priority: self.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ConditionEvent;
    use crate::universe::ClassRef;

    fn violation(message: &str) -> ConditionEvent {
        ConditionEvent::violated(
            ViolationObject::Class(ClassRef::from_name("a.A")),
            message,
        )
    }

    fn result_with(messages: &[&str], priority: Priority) -> EvaluationResult {
        let mut events = ConditionEvents::new();
        for m in messages {
            events.add(violation(m));
        }
        EvaluationResult::new("classes should behave", events, priority)
    }

    #[test]
    fn report_deduplicates_and_sorts() {
        let result = result_with(&["b message", "a message", "b message"], Priority::Medium);
        let report = result.failure_report();
        insta::assert_snapshot!(report.to_string(), @r"
        Architecture Violation [Priority: MEDIUM] - Rule 'classes should behave' was violated (2 times):
        a message
        b message
        ");
    }

    #[test]
    fn differently_worded_messages_never_collapse() {
        let result = result_with(&["x depends on y", "x depends on y "], Priority::Low);
        assert_eq!(result.failure_report().messages().len(), 2);
    }

    #[test]
    fn merge_keeps_own_priority_and_unions_events() {
        let mut composite = result_with(&["one"], Priority::High);
        composite.add(result_with(&["two"], Priority::Low));
        assert_eq!(composite.priority(), Priority::High);
        assert_eq!(composite.events().violating().len(), 2);
        assert!(composite
            .failure_report()
            .to_string()
            .starts_with("Architecture Violation [Priority: HIGH]"));
    }

    #[test]
    fn filter_descriptions_keeps_matching_violations() {
        let result = result_with(&["keep me", "drop me"], Priority::Medium);
        let filtered = result.filter_descriptions_matching(|m| m.starts_with("keep"));
        assert_eq!(filtered.events().violating().len(), 1);
        assert_eq!(result.events().violating().len(), 2);
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.value, "urgent");
        assert_eq!(err.to_string(), "unknown priority `urgent`, expected: low, medium, high");
    }
}
