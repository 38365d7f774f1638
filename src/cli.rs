use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::store::DEFAULT_TASKS_FILE;

/// Personal task tracker backed by a single JSON file.
/// Storage defaults to ./tasks.json, or the path given via --db / TASK_TRACKER_DB.
#[derive(Parser)]
#[command(name = "task-tracker", version, about = "Personal task tracker CLI")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true, env = "TASK_TRACKER_DB", default_value = DEFAULT_TASKS_FILE)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_db_flag_overrides_default() {
        let cli = Cli::try_parse_from(["task-tracker", "--db", "/tmp/x.json", "list"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/x.json"));
    }
}
