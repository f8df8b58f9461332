//! Tutor Control - interactive code and proof tutoring CLI
//!
//! Thin dispatch layer: argument parsing here, flow in `commands`, shared
//! parsing and orchestration in `tutor_common`.

mod commands;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tutorctl")]
#[command(about = "Code Tutor - respectful, interactive code and proof review", long_about = None)]
#[command(version)]
struct Cli {
    /// Custom configuration directory path
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initial setup: configure API key and preferences
    Setup,

    /// Review a source code file or directory
    Review {
        /// Path to the file or directory to review
        path: PathBuf,

        /// Recursively search directories
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        recursive: bool,
    },

    /// Review a mathematical proof file
    Proof {
        /// Path to the proof file
        path: PathBuf,

        /// Mathematical domain (e.g. "number theory")
        #[arg(long)]
        domain: Option<String>,

        /// Experience level: student, undergrad, graduate, researcher
        #[arg(long, default_value = "undergrad")]
        level: String,
    },

    /// Practice exercises: generate, work through, submit
    Exercise {
        #[command(subcommand)]
        action: ExerciseCommands,
    },

    /// Teaching mode: the model plays a stuck student, you teach
    Teach {
        /// Topic to teach (e.g. "list comprehensions", "induction")
        topic: String,

        /// Programming language for code rounds
        #[arg(long, default_value = "Python")]
        language: String,

        /// Teach proofs instead of code
        #[arg(long)]
        proof: bool,

        /// Mathematical domain for proof rounds
        #[arg(long, default_value = "general mathematics")]
        domain: String,
    },

    /// View configuration
    Config,

    /// Manage session logs
    Logs {
        #[command(subcommand)]
        action: LogCommands,
    },

    /// Show information about Code Tutor
    Info,
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Generate a new practice exercise
    New {
        /// Exercise topic
        topic: String,

        /// Programming language
        #[arg(long, default_value = "Python")]
        language: String,

        /// Exercise type: fill_in_blank, bug_fix, implementation, refactoring, test_writing
        #[arg(long = "type", default_value = "implementation")]
        exercise_type: String,

        /// Difficulty: beginner, intermediate, advanced, expert
        #[arg(long, default_value = "intermediate")]
        difficulty: String,
    },

    /// List exercises in the working directory
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },

    /// Reveal the next hint for an exercise
    Hint {
        /// Exercise ID or path
        exercise: String,
    },

    /// Submit an exercise solution for review
    Submit {
        /// Exercise ID or path
        exercise: String,
    },

    /// Move an exercise to the archive
    Archive {
        /// Exercise ID or path
        exercise: String,
    },

    /// Permanently delete an exercise
    Delete {
        /// Exercise ID or path
        exercise: String,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Export all session logs to a single JSON file
    Export {
        /// Output path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete all session logs
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_dir = cli.config_dir;

    match cli.command {
        Commands::Setup => commands::setup::run(config_dir),
        Commands::Review { path, recursive } => commands::review::run(config_dir, &path, recursive),
        Commands::Proof {
            path,
            domain,
            level,
        } => commands::proof::run(config_dir, &path, domain.as_deref(), &level),
        Commands::Exercise { action } => match action {
            ExerciseCommands::New {
                topic,
                language,
                exercise_type,
                difficulty,
            } => commands::exercise::new(config_dir, &topic, &language, &exercise_type, &difficulty),
            ExerciseCommands::List { status } => {
                commands::exercise::list(config_dir, status.as_deref())
            }
            ExerciseCommands::Hint { exercise } => commands::exercise::hint(config_dir, &exercise),
            ExerciseCommands::Submit { exercise } => {
                commands::exercise::submit(config_dir, &exercise)
            }
            ExerciseCommands::Archive { exercise } => {
                commands::exercise::archive(config_dir, &exercise)
            }
            ExerciseCommands::Delete { exercise } => {
                commands::exercise::delete(config_dir, &exercise)
            }
        },
        Commands::Teach {
            topic,
            language,
            proof,
            domain,
        } => {
            if proof {
                commands::teach::run_proof(config_dir, &topic, &domain)
            } else {
                commands::teach::run_code(config_dir, &topic, &language)
            }
        }
        Commands::Config => commands::config::run(config_dir),
        Commands::Logs { action } => match action {
            LogCommands::Export { output } => commands::logs::export(config_dir, output),
            LogCommands::Clear => commands::logs::clear(config_dir),
        },
        Commands::Info => commands::info::run(),
    }
}
