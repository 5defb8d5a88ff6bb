//! Rules: a condition applied to every unit of a code universe.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::condition::{ArchCondition, ConditionBox};
use crate::events::{ConditionEvent, ConditionEvents, ViolationObject};
use crate::result::{EvaluationResult, FailureReport, Priority};
use crate::universe::CodeUniverse;

/// Error returned by the assert entry point [`Rule::check`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArchRuleError {
    /// The rule was violated; the report lists every distinct violation.
    #[error("{0}")]
    Violated(FailureReport),
}

impl ArchRuleError {
    /// Returns the failure report.
    #[must_use]
    pub fn report(&self) -> &FailureReport {
        match self {
            Self::Violated(report) => report,
        }
    }
}

/// Something that can be evaluated against a code universe.
pub trait Rule: Send + Sync {
    /// Returns the full rule text, e.g. `classes should adhere to ...`.
    fn description(&self) -> String;

    /// Returns the priority reported on failure.
    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// Evaluates the rule and returns all events for inspection.
    fn evaluate(&self, universe: &CodeUniverse) -> EvaluationResult;

    /// Evaluates the rule and fails with one aggregated report if any
    /// violation was found.
    ///
    /// # Errors
    ///
    /// Returns [`ArchRuleError::Violated`] with the deduplicated, sorted
    /// failure report.
    fn check(&self, universe: &CodeUniverse) -> Result<(), ArchRuleError> {
        let result = self.evaluate(universe);
        if result.has_violation() {
            return Err(ArchRuleError::Violated(result.failure_report()));
        }
        Ok(())
    }
}

/// Type alias for boxed rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// A condition applied to every unit.
#[derive(Clone)]
pub struct ArchRule {
    condition: ConditionBox,
    priority: Priority,
    because: Option<String>,
    description: Option<String>,
    allow_empty_should: bool,
}

impl ArchRule {
    /// Creates a rule stating that all classes should satisfy `condition`.
    #[must_use]
    pub fn classes_should<C: ArchCondition + 'static>(condition: C) -> Self {
        Self::from_condition(Arc::new(condition))
    }

    /// Creates a rule from a shared condition.
    #[must_use]
    pub fn from_condition(condition: ConditionBox) -> Self {
        Self {
            condition,
            priority: Priority::Medium,
            because: None,
            description: None,
            allow_empty_should: false,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Appends a reason to the description.
    #[must_use]
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.because = Some(reason.into());
        self
    }

    /// Replaces the generated description.
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether evaluating against an empty universe passes (default: no).
    #[must_use]
    pub fn allow_empty_should(mut self, allow: bool) -> Self {
        self.allow_empty_should = allow;
        self
    }
}

impl fmt::Debug for ArchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchRule")
            .field("description", &self.description())
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl Rule for ArchRule {
    fn description(&self) -> String {
        let base = self
            .description
            .clone()
            .unwrap_or_else(|| format!("classes should {}", self.condition.description()));
        match &self.because {
            Some(reason) => format!("{base}, because {reason}"),
            None => base,
        }
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn evaluate(&self, universe: &CodeUniverse) -> EvaluationResult {
        let description = self.description();
        info!("Evaluating '{}' against {} unit(s)", description, universe.len());

        let mut events = ConditionEvents::new();
        self.condition.init(universe);
        for unit in universe {
            self.condition.check(unit, &mut events);
        }
        self.condition.finish(&mut events);

        if universe.is_empty() && !self.allow_empty_should {
            events.add(ConditionEvent::violated(
                ViolationObject::Text {
                    value: description.clone(),
                },
                format!(
                    "Rule '{description}' failed to check any classes. \
                     Pass a non-empty code universe or allow empty evaluation \
                     with `allow_empty_should(true)`"
                ),
            ));
        }

        debug!(
            "'{}': {} allowed, {} violating event(s)",
            description,
            events.allowed().len(),
            events.violating().len()
        );
        EvaluationResult::new(description, events, self.priority)
    }
}

/// Several rules evaluated together and reported as one.
pub struct CompositeArchRule {
    rules: Vec<RuleBox>,
    priority: Priority,
}

impl CompositeArchRule {
    /// Starts a composite from one rule.
    #[must_use]
    pub fn of<R: Rule + 'static>(rule: R) -> Self {
        Self {
            rules: vec![Box::new(rule)],
            priority: Priority::Medium,
        }
    }

    /// Adds another rule.
    #[must_use]
    pub fn and<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Sets the priority reported for the composite, regardless of the
    /// priorities of its parts.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Debug for CompositeArchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeArchRule")
            .field("description", &self.description())
            .field("priority", &self.priority)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Rule for CompositeArchRule {
    fn description(&self) -> String {
        self.rules
            .iter()
            .map(|r| r.description())
            .collect::<Vec<_>>()
            .join(" and ")
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn evaluate(&self, universe: &CodeUniverse) -> EvaluationResult {
        let mut result =
            EvaluationResult::new(self.description(), ConditionEvents::new(), self.priority);
        for rule in &self.rules {
            result.add(rule.evaluate(universe));
        }
        result
    }
}
