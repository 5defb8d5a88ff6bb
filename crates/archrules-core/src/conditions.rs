//! Reusable conditions over dependency edges.

use crate::condition::ArchCondition;
use crate::events::{ConditionEvent, ConditionEvents, ViolationObject};
use crate::package_matcher::{PackageMatchers, PatternError};
use crate::predicate::DescribedPredicate;
use crate::universe::{CodeUnit, Dependency};

/// Predicate over dependency edges.
pub type DependencyPredicate = DescribedPredicate<Dependency>;

/// Restricts every non-ignored dependency of a unit to targets whose
/// package matches at least one of the given patterns.
#[derive(Debug, Clone)]
pub struct OnlyDependenciesInAnyPackage {
    packages: PackageMatchers,
    ignore: DependencyPredicate,
}

/// Creates a condition allowing only dependencies into the given packages.
///
/// # Errors
///
/// Returns an error if any pattern is invalid.
pub fn only_have_dependencies_in_any_package<I, S>(
    patterns: I,
) -> Result<OnlyDependenciesInAnyPackage, PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(OnlyDependenciesInAnyPackage::new(PackageMatchers::of(
        patterns,
    )?))
}

impl OnlyDependenciesInAnyPackage {
    /// Creates the condition from compiled matchers.
    #[must_use]
    pub fn new(packages: PackageMatchers) -> Self {
        Self {
            packages,
            ignore: DependencyPredicate::always_false(),
        }
    }

    /// Returns a new condition that additionally ignores dependencies
    /// accepted by `predicate`.
    #[must_use]
    pub fn ignore_dependency(&self, predicate: &DependencyPredicate) -> Self {
        Self {
            packages: self.packages.clone(),
            ignore: self.ignore.or(predicate),
        }
    }

    /// Returns the allowed package patterns.
    #[must_use]
    pub fn packages(&self) -> &PackageMatchers {
        &self.packages
    }
}

impl ArchCondition for OnlyDependenciesInAnyPackage {
    fn description(&self) -> String {
        format!("only have dependencies in any package {}", self.packages)
    }

    fn check(&self, unit: &CodeUnit, events: &mut ConditionEvents) {
        for dependency in unit.dependencies() {
            if self.ignore.test(dependency) {
                continue;
            }
            let allowed = self.packages.matches_any(&dependency.target.package);
            events.add(ConditionEvent::new(
                !allowed,
                vec![ViolationObject::Dependency(dependency.clone())],
                dependency.description(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_only_out_of_pattern_dependencies() {
        let condition = only_have_dependencies_in_any_package(["..a..", "..b.."]).unwrap();
        let unit = CodeUnit::new("x.a.A")
            .depends_on("x.b.B")
            .depends_on("x.c.C");

        let mut events = ConditionEvents::new();
        condition.check(&unit, &mut events);

        assert_eq!(events.allowed().len(), 1);
        assert_eq!(events.violating().len(), 1);
        assert_eq!(
            events.violating()[0].messages(),
            ["Class <x.a.A> depends on class <x.c.C>"]
        );
    }

    #[test]
    fn ignored_dependencies_produce_no_event() {
        let condition = only_have_dependencies_in_any_package(["..a.."])
            .unwrap()
            .ignore_dependency(&DependencyPredicate::new("target c", |d: &Dependency| {
                d.target.package.ends_with(".c")
            }));
        let unit = CodeUnit::new("x.a.A").depends_on("x.c.C");

        let mut events = ConditionEvents::new();
        condition.check(&unit, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn description_lists_patterns() {
        let condition = only_have_dependencies_in_any_package(["..a.."]).unwrap();
        assert_eq!(
            condition.description(),
            "only have dependencies in any package ['..a..']"
        );
    }
}
