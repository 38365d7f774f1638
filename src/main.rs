//! # task-tracker
//!
//! A personal task tracker for the terminal. Tasks live in one JSON file and
//! are addressed by their position in the list.
//!
//! ## Key Features
//!
//! - **Validated tasks**: name, description, importance (high/medium/low), due date
//!   (`YYYY-MM-DD`) and status (Pending/In Progress/Completed)
//! - **RAG ratings**: overdue and unfinished tasks show red, overdue but completed
//!   show amber, everything else green; computed fresh on every listing
//! - **Safe storage**: the whole file is rewritten through a temp file and rename
//!   on every change, with timestamped backups on demand
//! - **Two interfaces**: plain subcommands for scripting and an interactive TUI
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! task-tracker add "Write report" --due 2024-12-31 --importance high --desc "Q4 numbers"
//!
//! # List tasks
//! task-tracker list
//!
//! # Mark task 1 in progress
//! task-tracker update 1 --status "In Progress"
//!
//! # Browse interactively
//! task-tracker ui
//! ```
//!
//! The task file defaults to `./tasks.json`; override it with `--db <PATH>` or
//! `TASK_TRACKER_DB`. Diagnostic logging goes to stderr and is controlled by
//! `TASK_TRACKER_LOG` (an `EnvFilter` directive, default `warn`).

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod rag;
pub mod render;
pub mod repo;
pub mod store;
pub mod task;
pub mod validate;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use error::AppError;
use repo::TaskRepository;
use store::TaskStore;

fn init_logging() {
    let filter = EnvFilter::try_from_env("TASK_TRACKER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let open = || TaskRepository::open(TaskStore::new(&cli.db));

    match cli.command {
        // Completions never touch the task file.
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
        Commands::Ui => cmd_ui(open()?),
        Commands::Add { name, due, desc, importance } =>
            cmd_add(&mut open()?, name, due, desc, importance),
        Commands::List => cmd_list(&open()?),
        Commands::View { number } => cmd_view(&open()?, number),
        Commands::Update { number, name, desc, importance, due, status, rag, clear_rag } =>
            cmd_update(&mut open()?, number, name, desc, importance, due, status, rag, clear_rag),
        Commands::Delete { number } => cmd_delete(&mut open()?, number),
        Commands::Backup => cmd_backup(&open()?),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_completions_skip_the_task_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{ not json").unwrap();
        let db = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["task-tracker", "--db", db, "completions", "bash"]).unwrap();
        assert!(run(cli).is_ok());

        let cli = Cli::try_parse_from(["task-tracker", "--db", db, "list"]).unwrap();
        assert!(matches!(run(cli), Err(AppError::Task(_))));
    }
}
