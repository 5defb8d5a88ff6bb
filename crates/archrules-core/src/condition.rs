//! The condition trait every rule check plugs into.

use std::sync::Arc;

use crate::events::ConditionEvents;
use crate::universe::{CodeUniverse, CodeUnit};

/// A check applied to one unit at a time.
///
/// Conditions report into a shared [`ConditionEvents`] sink instead of
/// returning results, so several conditions can contribute to one
/// evaluation. Implementations must not keep per-evaluation state in
/// `self`; a condition may be evaluated from several threads at once.
///
/// # Example
///
/// ```ignore
/// use archrules_core::{ArchCondition, CodeUnit, ConditionEvent, ConditionEvents, ViolationObject};
///
/// struct HasNoDependencies;
///
/// impl ArchCondition for HasNoDependencies {
///     fn description(&self) -> String { "have no dependencies".into() }
///
///     fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents) {
///         let object = ViolationObject::Class(unit.class_ref());
///         if unit.dependencies().is_empty() {
///             events.add(ConditionEvent::satisfied(object, "no dependencies"));
///         } else {
///             events.add(ConditionEvent::violated(object, format!("{} has dependencies", unit.name)));
///         }
///     }
/// }
/// ```
pub trait ArchCondition: Send + Sync {
    /// Describes what units should do, e.g. `have no dependencies`.
    fn description(&self) -> String;

    /// Called once with the whole universe before any unit is checked.
    fn init(&self, _universe: &CodeUniverse) {}

    /// Checks one unit, adding events to the sink.
    fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents);

    /// Called once after every unit was checked.
    fn finish(&self, _events: &mut ConditionEvents) {}
}

/// Type alias for shared condition trait objects.
pub type ConditionBox = Arc<dyn ArchCondition>;

impl<C: ArchCondition + ?Sized> ArchCondition for Arc<C> {
    fn description(&self) -> String {
        (**self).description()
    }

    fn init(&self, universe: &CodeUniverse) {
        (**self).init(universe);
    }

    fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents) {
        (**self).check(unit, events);
    }

    fn finish(&self, events: &mut ConditionEvents) {
        (**self).finish(events);
    }
}

/// Runs every branch against the same sink. Violations from all branches
/// accumulate; there is no short-circuiting.
pub struct AndCondition {
    conditions: Vec<ConditionBox>,
}

impl AndCondition {
    /// Combines the given conditions.
    #[must_use]
    pub fn new(conditions: Vec<ConditionBox>) -> Self {
        Self { conditions }
    }
}

impl ArchCondition for AndCondition {
    fn description(&self) -> String {
        self.conditions
            .iter()
            .map(|c| c.description())
            .collect::<Vec<_>>()
            .join(" and ")
    }

    fn init(&self, universe: &CodeUniverse) {
        for condition in &self.conditions {
            condition.init(universe);
        }
    }

    fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents) {
        for condition in &self.conditions {
            condition.check(unit, events);
        }
    }

    fn finish(&self, events: &mut ConditionEvents) {
        for condition in &self.conditions {
            condition.finish(events);
        }
    }
}

/// Wraps a condition under a different description.
pub struct DescribedCondition<C> {
    inner: C,
    description: String,
}

impl<C: ArchCondition> ArchCondition for DescribedCondition<C> {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn init(&self, universe: &CodeUniverse) {
        self.inner.init(universe);
    }

    fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents) {
        self.inner.check(unit, events);
    }

    fn finish(&self, events: &mut ConditionEvents) {
        self.inner.finish(events);
    }
}

/// Combinators available on every condition.
pub trait ArchConditionExt: ArchCondition + Sized + 'static {
    /// Combines `self` and `other` with AND semantics.
    fn and<O: ArchCondition + 'static>(self, other: O) -> AndCondition {
        let left: ConditionBox = Arc::new(self);
        let right: ConditionBox = Arc::new(other);
        AndCondition::new(vec![left, right])
    }

    /// Overrides the description.
    fn described_as(self, description: impl Into<String>) -> DescribedCondition<Self> {
        DescribedCondition {
            inner: self,
            description: description.into(),
        }
    }
}

impl<C: ArchCondition + Sized + 'static> ArchConditionExt for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ConditionEvent, ViolationObject};

    struct Flag(&'static str);

    impl ArchCondition for Flag {
        fn description(&self) -> String {
            format!("be flagged {}", self.0)
        }

        fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents) {
            events.add(ConditionEvent::violated(
                ViolationObject::Class(unit.class_ref()),
                format!("{} flagged by {}", unit.name, self.0),
            ));
        }
    }

    #[test]
    fn and_runs_every_branch() {
        let condition = Flag("left").and(Flag("right"));
        let mut events = ConditionEvents::new();
        condition.check(&CodeUnit::new("a.A"), &mut events);

        let messages: Vec<&str> = events
            .violating()
            .iter()
            .map(|e| e.messages()[0].as_str())
            .collect();
        assert_eq!(messages, ["a.A flagged by left", "a.A flagged by right"]);
        assert_eq!(condition.description(), "be flagged left and be flagged right");
    }

    #[test]
    fn described_as_replaces_description() {
        let condition = Flag("x").described_as("stay tidy");
        assert_eq!(condition.description(), "stay tidy");
    }
}
