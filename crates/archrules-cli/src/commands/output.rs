//! Shared output formatting for evaluation results.

use anyhow::Result;
use archrules_core::{EvaluationResult, Priority};
use serde::Serialize;

use crate::OutputFormat;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    rule: &'a str,
    priority: Priority,
    passed: bool,
    checked: usize,
    violations: Vec<&'a str>,
}

/// Print an evaluation result in the specified format.
pub fn print(result: &EvaluationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &EvaluationResult) {
    let report = result.failure_report();
    if report.is_empty() {
        println!(
            "\x1b[32mRule '{}' passed ({} check(s))\x1b[0m",
            result.description(),
            result.events().allowed().len()
        );
        return;
    }

    println!("{report}");
    println!();
    println!(
        "\x1b[31mFound {} violation(s) [Priority: {}]\x1b[0m",
        report.messages().len(),
        report.priority()
    );
}

fn print_json(result: &EvaluationResult) -> Result<()> {
    println!("{}", render_json(result)?);
    Ok(())
}

fn render_json(result: &EvaluationResult) -> Result<String> {
    let report = result.failure_report();
    let json = JsonReport {
        rule: result.description(),
        priority: result.priority(),
        passed: report.is_empty(),
        checked: result.events().allowed().len() + result.events().violating().len(),
        violations: report.messages().iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

fn print_compact(result: &EvaluationResult) {
    let report = result.failure_report();
    for message in report.messages().iter() {
        println!("{}: {message}", report.priority());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archrules_core::{ConditionEvent, ConditionEvents, ViolationObject};

    #[test]
    fn json_lists_sorted_unique_violations() {
        let mut events = ConditionEvents::new();
        for message in ["b", "a", "b"] {
            events.add(ConditionEvent::violated(
                ViolationObject::Text {
                    value: message.into(),
                },
                message,
            ));
        }
        let result = EvaluationResult::new("classes should x", events, Priority::High);

        let value: serde_json::Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();
        assert_eq!(value["rule"], "classes should x");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["passed"], false);
        assert_eq!(value["checked"], 3);
        assert_eq!(value["violations"], serde_json::json!(["a", "b"]));
    }
}
