//! Loading a code universe from its JSON form.
//!
//! ```json
//! { "classes": [ { "name": "shop.web.Controller", "package": "shop.web",
//!                  "dependencies": [ { "target": "shop.service.Orders", "file": "Controller.java", "line": 12 } ] } ] }
//! ```

use anyhow::{Context, Result};
use archrules_core::{package_of, ClassRef, CodeUnit, CodeUniverse, Dependency, SourceLocation};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UniverseDto {
    classes: Vec<ClassDto>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassDto {
    name: String,
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    dependencies: Vec<DependencyDto>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DependencyDto {
    target: String,
    #[serde(default)]
    file: Option<PathBuf>,
    #[serde(default)]
    line: Option<usize>,
}

/// Reads a code universe file.
pub fn load(path: &Path) -> Result<CodeUniverse> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read code universe: {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid code universe: {}", path.display()))
}

/// Parses the JSON form. Target packages come from the target's own entry
/// when it has one, else from its name.
pub fn parse(json: &str) -> Result<CodeUniverse> {
    let dto: UniverseDto = serde_json::from_str(json)?;

    let packages: HashMap<&str, &str> = dto
        .classes
        .iter()
        .filter_map(|c| c.package.as_deref().map(|p| (c.name.as_str(), p)))
        .collect();
    let class_ref = |name: &str| {
        let package = packages.get(name).copied().unwrap_or_else(|| package_of(name));
        ClassRef::new(name, package)
    };

    let universe = dto
        .classes
        .iter()
        .map(|class| {
            let unit = match &class.package {
                Some(package) => CodeUnit::in_package(&class.name, package),
                None => CodeUnit::new(&class.name),
            };
            class.dependencies.iter().fold(unit, |unit, d| {
                let mut dependency = Dependency::new(unit.class_ref(), class_ref(&d.target));
                if let (Some(file), Some(line)) = (&d.file, d.line) {
                    dependency = dependency.with_location(SourceLocation::new(file, line));
                }
                unit.with_dependency(dependency)
            })
        })
        .collect();
    Ok(universe)
}
