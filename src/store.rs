//! Flat-file persistence for the task list.
//!
//! The whole collection is one JSON array. Every save rewrites the file in
//! full through a temp file + rename, so a crash mid-write leaves the previous
//! contents in place.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::error::StoreError;
use crate::task::Task;

/// File name used when no path is configured.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Reads and writes the task file at a fixed path.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every task. A missing file is an empty list; an unreadable or
    /// malformed one is an error.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let buf = match fs::read_to_string(&self.path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let tasks: Vec<Task> = serde_json::from_str(&buf).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Replace the file contents with `tasks`.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let data = serde_json::to_string_pretty(tasks).map_err(StoreError::Encode)?;
        let tmp = self.temp_path();
        let write = || -> std::io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(data.as_bytes())?;
            f.write_all(b"\n")?;
            f.sync_all()?;
            Ok(())
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&self.path, e));
        }

        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Copy the task file into a timestamped file under `backup/` next to it.
    pub fn backup(&self) -> Result<PathBuf, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::io(
                &self.path,
                std::io::Error::new(ErrorKind::NotFound, "task file does not exist"),
            ));
        }

        let parent_dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let backup_dir = parent_dir.join("backup");
        fs::create_dir_all(&backup_dir).map_err(|e| StoreError::io(&backup_dir, e))?;

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_TASKS_FILE);
        let backup_path = backup_dir.join(format!("{timestamp}_{file_name}"));

        fs::copy(&self.path, &backup_path).map_err(|e| StoreError::io(&backup_path, e))?;
        debug!(from = %self.path.display(), to = %backup_path.display(), "backed up task file");
        Ok(backup_path)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(DEFAULT_TASKS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task {
                name: "Task 1".into(),
                description: "Description 1".into(),
                has_description: true,
                importance: Importance::High,
                date_made: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                status: Status::Pending,
                rag: Rag::Green,
                rag_override: None,
            },
            Task {
                name: "Task 2".into(),
                description: String::new(),
                has_description: false,
                importance: Importance::Low,
                date_made: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(),
                status: Status::InProgress,
                rag: Rag::Amber,
                rag_override: Some(Rag::Amber),
            },
        ]
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("sub").join("tasks.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[
    {"name": "Task 1", "description": "Description 1", "has_description": true,
     "importance": "high", "date_made": "2024-10-01", "due_date": "2024-12-31",
     "status": "Pending", "rag": "green"},
    {"name": "Task 2", "description": "", "has_description": false,
     "importance": "low", "date_made": "2023-03-01", "due_date": "2024-11-30",
     "status": "In Progress", "rag": "green"}
]"#,
        )
        .unwrap();

        let tasks = TaskStore::new(&path).load().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "Task 1");
        assert_eq!(tasks[1].name, "Task 2");
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        let tasks = sample_tasks();
        store.save(&tasks).unwrap();
        assert_eq!(store.load().unwrap(), tasks);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        store.save(&sample_tasks()).unwrap();
        store.save(&sample_tasks()[1..]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Task 2");
    }

    #[test]
    fn test_malformed_file_is_corrupt_not_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{ not json").unwrap();
        let err = TaskStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "{err:?}");
    }

    #[test]
    fn test_invalid_date_in_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        for due in ["2024-11-31", "2024-1-5"] {
            fs::write(
                &path,
                format!(
                    r#"[{{"name": "x", "description": "", "has_description": false,
                    "importance": "low", "date_made": "2023-03-01", "due_date": "{due}",
                    "status": "Pending", "rag": "green"}}]"#
                ),
            )
            .unwrap();
            assert!(
                matches!(TaskStore::new(&path).load(), Err(StoreError::Corrupt { .. })),
                "{due} should be rejected"
            );
        }
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be cannot be read as text.
        let store = TaskStore::new(dir.path());
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_backup_copies_file() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        assert!(store.backup().is_err());

        store.save(&sample_tasks()).unwrap();
        let backup = store.backup().unwrap();
        assert_eq!(backup.parent().unwrap(), dir.path().join("backup"));
        assert!(backup.to_string_lossy().ends_with("_tasks.json"));
        assert_eq!(TaskStore::new(&backup).load().unwrap(), sample_tasks());
    }
}
