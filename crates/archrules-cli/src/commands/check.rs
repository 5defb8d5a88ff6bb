//! Check command implementation.

use anyhow::{anyhow, bail, Context, Result};
use archrules_core::config::{IgnoreSpec, RuleSettings, ScopeSetting};
use archrules_core::{ArchRule, PackageMatchers, Rule};
use archrules_plantuml::{adhere_to_plantuml_diagram, Configuration, DiagramError, DiagramSource};
use clap::Args;
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::{OutputFormat, PriorityArg, ScopeArg};

/// Flags of `archrules check`. Each one overrides the config file.
#[derive(Debug, Default, Args)]
pub struct CheckArgs {
    /// Diagram file
    #[arg(short, long)]
    pub diagram: Option<PathBuf>,

    /// Code universe JSON file
    #[arg(short, long)]
    pub universe: Option<PathBuf>,

    /// Which dependencies to check
    #[arg(long)]
    pub scope: Option<ScopeArg>,

    /// Package pattern for `--scope packages` (repeatable)
    #[arg(long = "package")]
    pub packages: Vec<String>,

    /// Ignore every dependency from this class (repeatable)
    #[arg(long = "ignore-origin")]
    pub ignore_origins: Vec<String>,

    /// Ignore every dependency onto this class (repeatable)
    #[arg(long = "ignore-target")]
    pub ignore_targets: Vec<String>,

    /// Priority shown in the report
    #[arg(long)]
    pub priority: Option<PriorityArg>,
}

/// Runs the check command.
pub fn run(args: &CheckArgs, format: OutputFormat, source: &ConfigSource) -> Result<()> {
    let settings = apply_overrides(source.load()?, args)?;

    let universe_path = settings
        .universe
        .clone()
        .context("No code universe given. Pass --universe or set rule.universe in archrules.toml")?;
    let universe = crate::universe::load(&universe_path)?;

    let rule = build_rule(&settings)?;
    tracing::info!(
        "Checking {} class(es) from {}",
        universe.len(),
        universe_path.display()
    );
    let result = rule.evaluate(&universe);

    super::output::print(&result, format)?;

    if result.has_violation() {
        std::process::exit(1);
    }

    Ok(())
}

/// Merges command line flags into the loaded settings.
pub fn apply_overrides(mut settings: RuleSettings, args: &CheckArgs) -> Result<RuleSettings> {
    if let Some(diagram) = &args.diagram {
        settings.diagram = Some(diagram.clone());
    }
    if let Some(universe) = &args.universe {
        settings.universe = Some(universe.clone());
    }
    if let Some(priority) = args.priority {
        settings.priority = priority.into();
    }

    let packages = || PackageMatchers::of(&args.packages).context("Invalid --package pattern");
    match (args.scope, args.packages.is_empty()) {
        (Some(ScopeArg::All), true) => settings.scope = ScopeSetting::All,
        (Some(ScopeArg::Diagram), true) => settings.scope = ScopeSetting::InDiagram,
        (Some(ScopeArg::All | ScopeArg::Diagram), false) => {
            bail!("--package is only valid with --scope packages")
        }
        (Some(ScopeArg::Packages), true) => {
            bail!("--scope packages needs at least one --package")
        }
        (Some(ScopeArg::Packages) | None, false) => {
            settings.scope = ScopeSetting::InPackages(packages()?);
        }
        (None, true) => {}
    }

    settings
        .ignores
        .extend(args.ignore_origins.iter().map(IgnoreSpec::origin));
    settings
        .ignores
        .extend(args.ignore_targets.iter().map(IgnoreSpec::target));
    Ok(settings)
}

/// Builds the conformance rule described by `settings`.
pub fn build_rule(settings: &RuleSettings) -> Result<ArchRule> {
    let diagram = settings
        .diagram
        .as_deref()
        .context("No diagram given. Pass --diagram or set rule.diagram in archrules.toml")?;

    let configuration = match &settings.scope {
        ScopeSetting::All => Configuration::AllDependencies,
        ScopeSetting::InDiagram => Configuration::OnlyDependenciesInDiagram,
        ScopeSetting::InPackages(packages) => {
            Configuration::OnlyDependenciesInAnyPackage(packages.clone())
        }
    };

    let mut condition = adhere_to_plantuml_diagram(DiagramSource::from_path(diagram), configuration)
        .map_err(report_diagram_error)?;
    for spec in &settings.ignores {
        condition = condition.ignore_dependencies(&spec.to_predicate());
    }

    let mut rule = ArchRule::classes_should(condition)
        .with_priority(settings.priority)
        .allow_empty_should(settings.allow_empty);
    if let Some(reason) = &settings.because {
        rule = rule.because(reason);
    }
    tracing::debug!("Rule: {}", rule.description());
    Ok(rule)
}

/// Prints format errors with their source snippet before failing.
fn report_diagram_error(err: DiagramError) -> anyhow::Error {
    match err {
        DiagramError::Format(format) => {
            let summary = format.to_string();
            eprintln!("{:?}", miette::Report::new(format));
            anyhow!("Invalid diagram: {summary}")
        }
        DiagramError::Source(source) => anyhow::Error::new(source).context("Failed to load diagram"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archrules_core::{CodeUnit, CodeUniverse, Priority};
    use std::fs;
    use tempfile::TempDir;

    const DIAGRAM: &str = "[Source] <<..src..>>\n[Target] <<..tgt..>>\n[Source] --> [Target]\n";

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let diagram = dir.path().join("arch.puml");
        fs::write(&diagram, DIAGRAM).unwrap();
        (dir, diagram)
    }

    fn universe() -> CodeUniverse {
        CodeUniverse::from_units([
            CodeUnit::new("src.A").depends_on("tgt.B").depends_on("other.C"),
            CodeUnit::new("src.legacy.Old").depends_on("other.D"),
        ])
    }

    #[test]
    fn flags_override_settings() {
        let args = CheckArgs {
            diagram: Some(PathBuf::from("cli.puml")),
            priority: Some(PriorityArg::High),
            packages: vec!["..src..".into()],
            ignore_origins: vec!["src.A".into()],
            ..CheckArgs::default()
        };
        let settings = RuleSettings {
            diagram: Some(PathBuf::from("config.puml")),
            ..RuleSettings::default()
        };

        let merged = apply_overrides(settings, &args).unwrap();
        assert_eq!(merged.diagram, Some(PathBuf::from("cli.puml")));
        assert_eq!(merged.priority, Priority::High);
        assert!(matches!(merged.scope, ScopeSetting::InPackages(_)));
        assert_eq!(merged.ignores, [IgnoreSpec::origin("src.A")]);
    }

    #[test]
    fn inconsistent_scope_flags_are_rejected() {
        let packages_without_pattern = CheckArgs {
            scope: Some(ScopeArg::Packages),
            ..CheckArgs::default()
        };
        assert!(apply_overrides(RuleSettings::default(), &packages_without_pattern).is_err());

        let pattern_with_all = CheckArgs {
            scope: Some(ScopeArg::All),
            packages: vec!["a..".into()],
            ..CheckArgs::default()
        };
        assert!(apply_overrides(RuleSettings::default(), &pattern_with_all).is_err());
    }

    #[test]
    fn built_rule_reports_violations() {
        let (_dir, diagram) = project();
        let settings = RuleSettings {
            diagram: Some(diagram),
            because: Some("the diagram says so".into()),
            ..RuleSettings::default()
        };

        let rule = build_rule(&settings).unwrap();
        assert_eq!(
            rule.description(),
            "classes should adhere to PlantUML diagram arch.puml, because the diagram says so"
        );
        let report = rule.evaluate(&universe()).failure_report();
        assert_eq!(report.messages().len(), 2);
    }

    #[test]
    fn built_rule_applies_ignores() {
        let (_dir, diagram) = project();
        let settings = RuleSettings {
            diagram: Some(diagram),
            ignores: vec![IgnoreSpec::origin("src.legacy.Old"), IgnoreSpec::target("other.C")],
            ..RuleSettings::default()
        };
        assert!(build_rule(&settings).unwrap().check(&universe()).is_ok());
    }

    #[test]
    fn missing_diagram_is_reported() {
        let err = build_rule(&RuleSettings::default()).unwrap_err();
        assert!(err.to_string().starts_with("No diagram given"));
    }

    #[test]
    fn malformed_diagram_is_reported() {
        let dir = TempDir::new().unwrap();
        let diagram = dir.path().join("broken.puml");
        fs::write(&diagram, "[Source]\n").unwrap();
        let settings = RuleSettings {
            diagram: Some(diagram),
            ..RuleSettings::default()
        };
        let err = build_rule(&settings).unwrap_err();
        assert!(err.to_string().starts_with("Invalid diagram: broken.puml:1"));
    }
}
