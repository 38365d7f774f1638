//! Command implementations for the CLI interface.
//!
//! Each handler takes the already-parsed arguments, calls into the
//! repository, prints the outcome and hands any failure back to `main`.

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::info;

use crate::error::AppError;
use crate::fields::Importance;
use crate::render::{print_detail, print_table, render_table};
use crate::repo::TaskRepository;
use crate::task::{NewTask, TaskEdit};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// Short name for the task.
        name: String,
        /// Due date: YYYY-MM-DD.
        #[arg(long)]
        due: String,
        /// Optional longer description.
        #[arg(long, default_value = "")]
        desc: String,
        /// Importance: high | medium | low.
        #[arg(long, value_enum, default_value_t = Importance::Medium)]
        importance: Importance,
    },

    /// List all tasks with their RAG rating.
    List,

    /// View a single task by number.
    View {
        /// Task number as shown by `list`.
        number: usize,
    },

    /// Update fields on a task.
    Update {
        /// Task number as shown by `list`.
        number: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Importance: high | medium | low.
        #[arg(long)]
        importance: Option<String>,
        /// Due date: YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        /// Status: "Pending" | "In Progress" | "Completed".
        #[arg(long)]
        status: Option<String>,
        /// Pin the RAG rating: red | amber | green.
        #[arg(long, conflicts_with = "clear_rag")]
        rag: Option<String>,
        /// Drop a pinned RAG rating and go back to the computed one.
        #[arg(long)]
        clear_rag: bool,
    },

    /// Delete a task by number.
    Delete {
        /// Task number as shown by `list`.
        number: usize,
    },

    /// Copy the task file into a timestamped backup.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(repo: TaskRepository) -> Result<(), AppError> {
    run_tui(repo)?;
    Ok(())
}

/// Add a new task.
pub fn cmd_add(
    repo: &mut TaskRepository,
    name: String,
    due: String,
    desc: String,
    importance: Importance,
) -> Result<(), AppError> {
    let task = repo.add(NewTask {
        name,
        description: desc,
        importance: importance.as_str().to_string(),
        due_date: due,
    })?;
    info!(name = %task.name, "task added");
    println!("Added task {}: {}", repo.len(), task.name);
    Ok(())
}

/// Print every task as a RAG-coloured table.
pub fn cmd_list(repo: &TaskRepository) -> Result<(), AppError> {
    print_table(&render_table(&repo.list()));
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_view(repo: &TaskRepository, number: usize) -> Result<(), AppError> {
    let task = repo.get(number)?;
    print_detail(number, &task);
    Ok(())
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    repo: &mut TaskRepository,
    number: usize,
    name: Option<String>,
    desc: Option<String>,
    importance: Option<String>,
    due: Option<String>,
    status: Option<String>,
    rag: Option<String>,
    clear_rag: bool,
) -> Result<(), AppError> {
    let edit = TaskEdit {
        name,
        description: desc,
        importance,
        due_date: due,
        status,
        rag,
        clear_rag_override: clear_rag,
    };
    if edit.is_empty() {
        return Err(AppError::Usage(
            "nothing to update; pass at least one of --name, --desc, --importance, --due, --status, --rag, --clear-rag".into(),
        ));
    }
    let task = repo.update_record(number, edit)?;
    info!(number, name = %task.name, "task updated");
    println!("Updated task {}", number);
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(repo: &mut TaskRepository, number: usize) -> Result<(), AppError> {
    let removed = repo.delete(number)?;
    info!(number, name = %removed.name, "task deleted");
    println!("Deleted task {}: {}", number, removed.name);
    Ok(())
}

/// Create a backup of the task file.
pub fn cmd_backup(repo: &TaskRepository) -> Result<(), AppError> {
    let path = repo.store().backup()?;
    println!("Backup created: {}", path.display());
    Ok(())
}

/// Write a completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::fields::Status;
    use crate::store::TaskStore;
    use tempfile::tempdir;

    #[test]
    fn test_add_update_delete_through_commands() {
        let dir = tempdir().unwrap();
        let mut repo = TaskRepository::open(TaskStore::new(dir.path().join("tasks.json"))).unwrap();

        cmd_add(&mut repo, "Write report".into(), "2030-05-01".into(), String::new(), Importance::Low).unwrap();
        cmd_update(
            &mut repo,
            1,
            None,
            Some("quarterly numbers".into()),
            None,
            None,
            Some("In Progress".into()),
            None,
            false,
        )
        .unwrap();

        let task = repo.get(1).unwrap();
        assert!(task.has_description);
        assert_eq!(task.status, Status::InProgress);

        cmd_delete(&mut repo, 1).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_empty_update_is_usage_error() {
        let dir = tempdir().unwrap();
        let mut repo = TaskRepository::open(TaskStore::new(dir.path().join("tasks.json"))).unwrap();
        cmd_add(&mut repo, "a".into(), "2030-05-01".into(), String::new(), Importance::High).unwrap();
        let err = cmd_update(&mut repo, 1, None, None, None, None, None, None, false).unwrap_err();
        assert!(matches!(err, AppError::Usage(_)));
    }

    #[test]
    fn test_view_out_of_range() {
        let dir = tempdir().unwrap();
        let repo = TaskRepository::open(TaskStore::new(dir.path().join("tasks.json"))).unwrap();
        let err = cmd_view(&repo, 1).unwrap_err();
        assert!(matches!(err, AppError::Task(TaskError::OutOfRange { index: 1, size: 0 })));
    }
}
