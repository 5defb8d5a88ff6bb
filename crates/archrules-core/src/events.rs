//! Condition events: the per-evaluation sink conditions report into.

use serde::Serialize;

use crate::universe::{ClassRef, Dependency};

/// The kind of object a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// A class-like unit.
    Class,
    /// A dependency edge.
    Dependency,
    /// A diagram component.
    Component,
    /// Free text.
    Text,
}

/// An object a condition event corresponds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViolationObject {
    /// A class-like unit.
    Class(ClassRef),
    /// A dependency edge.
    Dependency(Dependency),
    /// A diagram component, by name.
    Component {
        /// Component name.
        name: String,
    },
    /// Free text.
    Text {
        /// The text.
        value: String,
    },
}

impl ViolationObject {
    /// Returns the tag of this object.
    #[must_use]
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::Class(_) => ViolationKind::Class,
            Self::Dependency(_) => ViolationKind::Dependency,
            Self::Component { .. } => ViolationKind::Component,
            Self::Text { .. } => ViolationKind::Text,
        }
    }
}

/// Outcome of checking one aspect of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionEvent {
    violation: bool,
    messages: Vec<String>,
    corresponding_objects: Vec<ViolationObject>,
}

impl ConditionEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(
        violation: bool,
        corresponding_objects: Vec<ViolationObject>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation,
            messages: vec![message.into()],
            corresponding_objects,
        }
    }

    /// Creates an event recording that the condition held.
    #[must_use]
    pub fn satisfied(object: ViolationObject, message: impl Into<String>) -> Self {
        Self::new(false, vec![object], message)
    }

    /// Creates an event recording a violation.
    #[must_use]
    pub fn violated(object: ViolationObject, message: impl Into<String>) -> Self {
        Self::new(true, vec![object], message)
    }

    /// Returns true if this event is a violation.
    #[must_use]
    pub fn is_violation(&self) -> bool {
        self.violation
    }

    /// Returns the description lines of this event.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Returns the objects this event refers to.
    #[must_use]
    pub fn corresponding_objects(&self) -> &[ViolationObject] {
        &self.corresponding_objects
    }

    /// Returns true if every corresponding object is of `kind`.
    ///
    /// Events without objects never match.
    #[must_use]
    pub fn is_entirely_of(&self, kind: ViolationKind) -> bool {
        !self.corresponding_objects.is_empty()
            && self.corresponding_objects.iter().all(|o| o.kind() == kind)
    }
}

/// Collects events during one evaluation, partitioned into allowed and
/// violating. Insertion order is preserved per partition.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConditionEvents {
    allowed: Vec<ConditionEvent>,
    violating: Vec<ConditionEvent>,
}

impl ConditionEvents {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event to its partition.
    pub fn add(&mut self, event: ConditionEvent) {
        if event.is_violation() {
            self.violating.push(event);
        } else {
            self.allowed.push(event);
        }
    }

    /// Adds all events of another sink, keeping their order.
    pub fn extend(&mut self, other: Self) {
        self.allowed.extend(other.allowed);
        self.violating.extend(other.violating);
    }

    /// Events for which the condition held.
    #[must_use]
    pub fn allowed(&self) -> &[ConditionEvent] {
        &self.allowed
    }

    /// Violation events.
    #[must_use]
    pub fn violating(&self) -> &[ConditionEvent] {
        &self.violating
    }

    /// Returns true if any violation was recorded.
    #[must_use]
    pub fn contain_violation(&self) -> bool {
        !self.violating.is_empty()
    }

    /// Returns true if no event at all was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.violating.is_empty()
    }

    /// Delivers every violation whose objects are all of `kind` to the
    /// handler, in insertion order. Other violations are skipped.
    pub fn handle_violations<F>(&self, kind: ViolationKind, mut handler: F)
    where
        F: FnMut(&[ViolationObject], &[String]),
    {
        for event in self.violating.iter().filter(|e| e.is_entirely_of(kind)) {
            handler(event.corresponding_objects(), event.messages());
        }
    }

    pub(crate) fn retain_violating<F>(&mut self, keep: F)
    where
        F: FnMut(&ConditionEvent) -> bool,
    {
        self.violating.retain(keep);
    }
}
