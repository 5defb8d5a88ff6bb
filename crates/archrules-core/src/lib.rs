//! # archrules-core
//!
//! Core engine for checking a code base against architecture rules.
//!
//! This crate provides:
//!
//! - [`CodeUniverse`] and [`CodeUnit`], the class-level model of a code base
//! - [`PackageMatcher`] for `..`/`*` package patterns
//! - [`ArchCondition`] and [`ConditionEvents`] for writing checks
//! - [`ArchRule`] and [`EvaluationResult`] for evaluating them
//! - [`FailureReport`] for the aggregated violation text
//!
//! ## Example
//!
//! ```
//! use archrules_core::{
//!     only_have_dependencies_in_any_package, ArchRule, CodeUnit, CodeUniverse, Rule,
//! };
//!
//! let universe = CodeUniverse::from_units([
//!     CodeUnit::new("app.web.Controller").depends_on("app.service.Service"),
//! ]);
//! let rule = ArchRule::classes_should(
//!     only_have_dependencies_in_any_package(["app.."]).unwrap(),
//! );
//! assert!(rule.check(&universe).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod condition;
mod conditions;
mod events;
mod package_matcher;
mod predicate;
mod result;
mod rule;
mod universe;

/// `archrules.toml` loading.
pub mod config;

pub use condition::{AndCondition, ArchCondition, ArchConditionExt, ConditionBox, DescribedCondition};
pub use conditions::{
    only_have_dependencies_in_any_package, DependencyPredicate, OnlyDependenciesInAnyPackage,
};
pub use events::{ConditionEvent, ConditionEvents, ViolationKind, ViolationObject};
pub use package_matcher::{package_matches, PackageMatcher, PackageMatchers, PatternError};
pub use predicate::DescribedPredicate;
pub use result::{EvaluationResult, FailureMessages, FailureReport, Priority, PriorityError};
pub use rule::{ArchRule, ArchRuleError, CompositeArchRule, Rule, RuleBox};
pub use universe::{package_of, ClassRef, CodeUnit, CodeUniverse, Dependency, SourceLocation};
