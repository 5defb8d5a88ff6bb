//! Components command implementation.

use anyhow::{Context, Result};
use archrules_plantuml::{DiagramSource, PlantUmlDiagram};
use serde::Serialize;
use std::path::Path;

use crate::OutputFormat;

#[derive(Debug, Serialize)]
struct ComponentView<'a> {
    name: &'a str,
    alias: Option<&'a str>,
    stereotypes: Vec<&'a str>,
    dependencies: Vec<&'a str>,
}

/// Runs the components command.
pub fn run(diagram: &Path, format: OutputFormat) -> Result<()> {
    let diagram = PlantUmlDiagram::from_source(&DiagramSource::from_path(diagram))
        .with_context(|| format!("Failed to load diagram: {}", diagram.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views(&diagram))?),
        OutputFormat::Text | OutputFormat::Compact => print!("{}", render_text(&diagram)),
    }
    Ok(())
}

fn views(diagram: &PlantUmlDiagram) -> Vec<ComponentView<'_>> {
    diagram
        .components()
        .iter()
        .map(|c| ComponentView {
            name: c.name().as_str(),
            alias: c.alias().map(|a| a.as_str()),
            stereotypes: c.stereotypes().iter().map(|s| s.as_str()).collect(),
            dependencies: c.dependencies().iter().map(|d| d.as_str()).collect(),
        })
        .collect()
}

fn render_text(diagram: &PlantUmlDiagram) -> String {
    let mut out = String::new();
    for view in views(diagram) {
        let stereotypes: Vec<String> = view.stereotypes.iter().map(|s| format!("<<{s}>>")).collect();
        out.push('[');
        out.push_str(view.name);
        out.push_str("] ");
        out.push_str(&stereotypes.join(" "));
        if let Some(alias) = view.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
        out.push('\n');
        for target in view.dependencies {
            out.push_str("  --> ");
            out.push_str(target);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_components_and_edges() {
        let diagram = PlantUmlDiagram::parse(
            "layers.puml",
            "[Web] <<..web..>> as web\n[Service] <<..service..>> <<..api..>>\nweb --> [Service]\n",
        )
        .unwrap();
        assert_eq!(
            render_text(&diagram),
            "[Web] <<..web..>> as web\n  --> Service\n[Service] <<..service..>> <<..api..>>\n"
        );
    }

    #[test]
    fn json_view_keeps_order() {
        let diagram =
            PlantUmlDiagram::parse("d.puml", "[A] <<..a..>>\n[B] <<..b..>>\n[A] --> [B]\n[A] --> [B]\n")
                .unwrap();
        let json = serde_json::to_value(views(&diagram)).unwrap();
        assert_eq!(json[0]["dependencies"], serde_json::json!(["B", "B"]));
        assert_eq!(json[1]["alias"], serde_json::Value::Null);
    }
}
