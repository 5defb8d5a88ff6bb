//! Integration test: diagram files → condition → rule evaluation.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use archrules_core::{ArchRule, CodeUnit, CodeUniverse, Priority, Rule, ViolationKind};
use archrules_plantuml::{
    adhere_to_plantuml_diagram, Configuration, DiagramError, DiagramSource, FormatErrorKind,
};

const SHOP: &str = "\
@startuml
' Layered shop
[Web] <<..web..>> as web #LightBlue
[Service] <<..service..>>
[Persistence] <<..persistence..>>

web --> [Service] : calls
[Persistence] <-- [Service]
@enduml
";

fn write_diagram(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".puml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn shop_universe() -> CodeUniverse {
    CodeUniverse::from_units([
        CodeUnit::new("shop.web.OrderController")
            .depends_on("shop.service.OrderService")
            .depends_on("shop.persistence.OrderRepository"),
        CodeUnit::new("shop.service.OrderService")
            .depends_on("shop.persistence.OrderRepository")
            .depends_on("java.util.List"),
        CodeUnit::new("shop.persistence.OrderRepository").depends_on("shop.web.OrderController"),
        CodeUnit::new("shop.util.Strings").depends_on("java.lang.String"),
    ])
}

// ── Sources ──

#[test]
fn path_and_url_sources_agree() {
    let file = write_diagram(SHOP);
    let by_path = adhere_to_plantuml_diagram(file.path(), Configuration::AllDependencies).unwrap();
    let url = url::Url::from_file_path(file.path()).unwrap();
    let by_url = adhere_to_plantuml_diagram(url, Configuration::AllDependencies).unwrap();

    assert_eq!(by_path.association().diagram(), by_url.association().diagram());
    assert_eq!(by_path.association().diagram().len(), 3);
}

#[test]
fn missing_file_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = adhere_to_plantuml_diagram(
        DiagramSource::from_path(dir.path().join("nope.puml")),
        Configuration::AllDependencies,
    )
    .unwrap_err();
    assert!(matches!(err, DiagramError::Source(_)));
}

#[test]
fn zero_stereotypes_fail_construction() {
    let file = write_diagram("[Web]\n");
    let err = adhere_to_plantuml_diagram(file.path(), Configuration::AllDependencies).unwrap_err();
    let DiagramError::Format(format) = err else {
        panic!("expected a format error");
    };
    assert!(matches!(format.kind(), FormatErrorKind::MissingStereotype { .. }));
}

// ── Scopes ──

#[test]
fn consider_all_dependencies_report() {
    let file = write_diagram(SHOP);
    let condition = adhere_to_plantuml_diagram(file.path(), Configuration::AllDependencies).unwrap();
    let rule = ArchRule::classes_should(condition).with_priority(Priority::High);

    let report = rule.check(&shop_universe()).unwrap_err().report().clone();
    let lines: Vec<&str> = report.messages().iter().collect();
    assert_eq!(
        lines,
        [
            "Class <shop.persistence.OrderRepository> depends on class <shop.web.OrderController>",
            "Class <shop.service.OrderService> depends on class <java.util.List>",
            "Class <shop.util.Strings> is not contained in any component",
            "Class <shop.web.OrderController> depends on class <shop.persistence.OrderRepository>",
        ]
    );
}

#[test]
fn consider_only_in_diagram_report() {
    let file = write_diagram(SHOP);
    let condition = adhere_to_plantuml_diagram(
        file.path(),
        Configuration::consider_only_dependencies_in_diagram(),
    )
    .unwrap();
    let result = ArchRule::classes_should(condition).evaluate(&shop_universe());

    let lines: Vec<String> = result
        .failure_report()
        .messages()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(
        lines,
        [
            "Class <shop.persistence.OrderRepository> depends on class <shop.web.OrderController>",
            "Class <shop.web.OrderController> depends on class <shop.persistence.OrderRepository>",
        ]
    );

    let mut dependency_violations = 0;
    result.handle_violations(ViolationKind::Dependency, |_, _| dependency_violations += 1);
    assert_eq!(dependency_violations, 2);
}

#[test]
fn consider_only_in_packages_report() {
    let file = write_diagram(SHOP);
    let condition = adhere_to_plantuml_diagram(
        file.path(),
        Configuration::consider_only_dependencies_in_any_package(["shop.web..", "java.."]).unwrap(),
    )
    .unwrap();
    let result = ArchRule::classes_should(condition).evaluate(&shop_universe());
    let report = result.failure_report();
    assert_eq!(report.messages().len(), 3);
    assert!(report
        .messages()
        .iter()
        .any(|m| m == "Class <shop.util.Strings> is not contained in any component"));
}

// ── Sharing ──

#[test]
fn one_condition_evaluated_from_many_threads() {
    let file = write_diagram(SHOP);
    let condition = adhere_to_plantuml_diagram(file.path(), Configuration::AllDependencies).unwrap();
    let rule = Arc::new(ArchRule::classes_should(condition));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let rule = Arc::clone(&rule);
            thread::spawn(move || rule.evaluate(&shop_universe()).failure_report().messages().len())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 4);
    }
}
