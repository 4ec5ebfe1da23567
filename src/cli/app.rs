//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::{Output, OutputFormat};
use super::{query, task};
use crate::logging;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "taskgraph")]
#[command(author, version, about = "Dependency analysis for task lists")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new taskgraph project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Show tasks ready to work on
    Ready,

    /// Show blocked tasks and what blocks them
    Blocked,

    /// Show available tasks in suggested work order
    Order,

    /// Show the longest dependency chain
    CriticalPath,

    /// List circular dependencies
    Cycles,

    /// Show dependency statistics for a task
    Stats {
        /// Task ID
        id: String,
    },

    /// Check dependencies for structural problems
    Validate,

    /// Dump the dependency graph (nodes and edges)
    Graph,

    /// Show project status overview
    Status,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format);

    debug!(?format, "taskgraph starting");

    match cli.command {
        Commands::Init { path } => {
            debug!(%path, "initializing project");
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized taskgraph project at {}",
                project.root().display()
            ));
        }

        Commands::Task(cmd) => task::run(cmd, &output)?,

        Commands::Ready => query::ready(&output)?,
        Commands::Blocked => query::blocked(&output)?,
        Commands::Order => query::order(&output)?,
        Commands::CriticalPath => query::critical_path(&output)?,
        Commands::Cycles => query::cycles(&output)?,
        Commands::Stats { id } => query::stats(&output, &id)?,
        Commands::Validate => query::validate(&output)?,
        Commands::Graph => query::graph(&output)?,
        Commands::Status => query::status(&output)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_task_add_flags() {
        let cli = Cli::try_parse_from([
            "taskgraph",
            "--format",
            "json",
            "task",
            "add",
            "Write docs",
            "--priority",
            "high",
            "--after",
            "a",
            "--after",
            "b",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Task(_)));
    }

    #[test]
    fn parses_critical_path_command() {
        let cli = Cli::try_parse_from(["taskgraph", "critical-path"]).unwrap();
        assert!(matches!(cli.command, Commands::CriticalPath));
        assert_eq!(cli.format, None);
    }
}
