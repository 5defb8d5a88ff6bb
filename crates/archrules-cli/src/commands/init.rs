//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "archrules.toml";

const DEFAULT_CONFIG: &str = r#"# archrules configuration

[rule]
# PlantUML component diagram; each component lists package patterns as stereotypes:
#   [Web] <<..web..>>
#   [Service] <<..service..>>
#   [Web] --> [Service]
diagram = "docs/architecture.puml"

# Code universe exported by your build (JSON)
universe = "build/archrules/universe.json"

# low | medium | high
priority = "medium"

# all      - check every dependency
# diagram  - skip dependencies on classes outside every component
# packages - only check dependencies into `packages`
scope = "all"
# packages = ["com.example.."]

# Fail when the code universe is empty
allow_empty = false

# because = "the layers are documented in docs/architecture.puml"

# Dependencies to skip. All fields given in one entry must match.
# [[ignore]]
# origin = "com.example.legacy.OldService"
#
# [[ignore]]
# target_package = "..generated.."
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Point rule.diagram and rule.universe at your files");
    println!("  2. Run: archrules check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
