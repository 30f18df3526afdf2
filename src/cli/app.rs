//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{pomodoro_cmd, query, task};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "focus")]
#[command(author, version, about = "Local-first productivity tracking")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured default_format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new focus project
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

    /// Show blocked tasks and their blockers
    Blocked,

    /// Show project status overview
    Status,

    /// Pomodoro timer
    #[command(subcommand)]
    Pomodoro(pomodoro_cmd::PomodoroCommands),
}

/// Resolves the output format from global config when no flag is given.
fn default_format() -> OutputFormat {
    match Config::load() {
        Ok(config) => match config.global.default_format {
            crate::storage::OutputFormat::Json => OutputFormat::Json,
            crate::storage::OutputFormat::Text => OutputFormat::Text,
        },
        Err(_) => OutputFormat::Text,
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_else(default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose("Focus CLI starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized focus project at {}",
                project.root().display()
            ));
        }

        Commands::Task(cmd) => task::run(cmd, &output)?,

        Commands::Ready => query::ready(&output)?,
        Commands::Blocked => query::blocked(&output)?,
        Commands::Status => query::status(&output)?,

        Commands::Pomodoro(cmd) => pomodoro_cmd::run(cmd, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
