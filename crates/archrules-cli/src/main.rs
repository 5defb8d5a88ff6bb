//! archrules CLI tool.
//!
//! Usage:
//! ```bash
//! archrules check [OPTIONS] [PATH]
//! archrules components <DIAGRAM>
//! archrules init
//! ```

use anyhow::Result;
use archrules_core::Priority;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod universe;

/// Checks class dependencies against a PlantUML component diagram
#[derive(Parser)]
#[command(name = "archrules")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a code universe against a diagram
    Check {
        /// Project directory used to find `archrules.toml` (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        args: commands::check::CheckArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the components and edges of a diagram
    Components {
        /// Diagram file
        diagram: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per violation.
    Compact,
}

/// Which dependencies are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ScopeArg {
    /// Every dependency.
    All,
    /// Only dependencies on classes that belong to a component.
    Diagram,
    /// Only dependencies into the packages given with `--package`.
    Packages,
}

/// Priority given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PriorityArg {
    /// LOW
    Low,
    /// MEDIUM
    Medium,
    /// HIGH
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { path, args, format } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::check::run(&args, format, &source)
        }
        Commands::Components { diagram, format } => commands::components::run(&diagram, format),
        Commands::Init { force } => commands::init::run(force),
    }
}
