//! Predicates that carry a human-readable description.

use std::fmt;
use std::sync::Arc;

type Test<T> = dyn Fn(&T) -> bool + Send + Sync;

/// A boolean test over `T` together with a description of what it accepts.
///
/// Predicates are cheap to clone and never mutated; combinators return new
/// values, so earlier references stay valid.
pub struct DescribedPredicate<T: ?Sized> {
    description: String,
    test: Arc<Test<T>>,
}

impl<T: ?Sized> DescribedPredicate<T> {
    /// Creates a predicate from a description and a closure.
    pub fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }

    /// A predicate that accepts nothing.
    #[must_use]
    pub fn always_false() -> Self {
        Self::new("always false", |_| false)
    }

    /// A predicate that accepts everything.
    #[must_use]
    pub fn always_true() -> Self {
        Self::new("always true", |_| true)
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn test(&self, value: &T) -> bool {
        (self.test)(value)
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the description, keeping the test.
    #[must_use]
    pub fn described_as(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<T: ?Sized + 'static> DescribedPredicate<T> {
    /// Returns a predicate accepting values accepted by either side.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        let left = Arc::clone(&self.test);
        let right = Arc::clone(&other.test);
        Self {
            description: format!("{} or {}", self.description, other.description),
            test: Arc::new(move |value| left(value) || right(value)),
        }
    }

    /// Returns a predicate accepting values accepted by both sides.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        let left = Arc::clone(&self.test);
        let right = Arc::clone(&other.test);
        Self {
            description: format!("{} and {}", self.description, other.description),
            test: Arc::new(move |value| left(value) && right(value)),
        }
    }

    /// Returns the negation.
    #[must_use]
    pub fn negate(&self) -> Self {
        let inner = Arc::clone(&self.test);
        Self {
            description: format!("not {}", self.description),
            test: Arc::new(move |value| !inner(value)),
        }
    }
}

impl<T: ?Sized> Clone for DescribedPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<T: ?Sized> fmt::Debug for DescribedPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescribedPredicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> fmt::Display for DescribedPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}
