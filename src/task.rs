//! Task data structure and related functionality.
//!
//! A `Task` is one line of work in the task file. Tasks are only ever built by
//! the repository, which validates every field first.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::*;
use crate::rag::classify;
use crate::validate::{validate_date, DATE_FORMAT};

/// A single tracked task as stored in the task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "bool_or_legacy_string")]
    pub has_description: bool,
    pub importance: Importance,
    #[serde(deserialize_with = "strict_date")]
    pub date_made: NaiveDate,
    #[serde(deserialize_with = "strict_date")]
    pub due_date: NaiveDate,
    pub status: Status,
    /// Last rating written to disk. Display code should use [`Task::effective_rag`].
    pub rag: Rag,
    /// Rating pinned by hand; cleared when the due date or status changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_override: Option<Rag>,
}

impl Task {
    /// The rating derived purely from due date and status.
    pub fn derived_rag(&self, today: NaiveDate) -> Rag {
        classify(self.due_date, self.status, today)
    }

    /// The rating to show: a manual override if one is set, otherwise derived.
    pub fn effective_rag(&self, today: NaiveDate) -> Rag {
        self.rag_override.unwrap_or_else(|| self.derived_rag(today))
    }

    /// Recompute the stored `rag` as of `today`.
    pub fn refresh_rag(&mut self, today: NaiveDate) {
        self.rag = self.effective_rag(today);
    }
}

/// Raw fields for a new task, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub importance: String,
    pub due_date: String,
}

/// A set of field changes applied to one task in a single step.
///
/// Values are raw text and are validated before anything is changed.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub importance: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub rag: Option<String>,
    pub clear_rag_override: bool,
}

impl TaskEdit {
    /// An edit touching exactly one field.
    pub fn single(field: TaskField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        let mut edit = TaskEdit::default();
        match field {
            TaskField::Name => edit.name = value,
            TaskField::Description => edit.description = value,
            TaskField::Importance => edit.importance = value,
            TaskField::DueDate => edit.due_date = value,
            TaskField::Status => edit.status = value,
            TaskField::Rag => edit.rag = value,
        }
        edit
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.importance.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.rag.is_none()
            && !self.clear_rag_override
    }
}

/// Stored dates must be zero-padded `YYYY-MM-DD`, the same rule applied to input.
fn strict_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    if !validate_date(&text) {
        return Err(serde::de::Error::custom(format!(
            "'{text}' is not a valid YYYY-MM-DD date"
        )));
    }
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
}

/// Older task files wrote `has_description` as the strings "True"/"False".
fn bool_or_legacy_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.as_str() {
            "True" | "true" => Ok(true),
            "False" | "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean for has_description, got '{other}'"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
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
        }
    }

    #[test]
    fn test_record_uses_file_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "date_made",
                "description",
                "due_date",
                "has_description",
                "importance",
                "name",
                "rag",
                "status"
            ]
        );
        assert_eq!(obj["due_date"], "2024-12-31");
        assert_eq!(obj["importance"], "high");
    }

    #[test]
    fn test_legacy_has_description_string() {
        let json = r#"{"name": "Task 2", "description": "", "has_description": "False",
            "importance": "low", "date_made": "2023-03-01", "due_date": "2024-11-30",
            "status": "In Progress", "rag": "green"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.has_description);
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.rag_override, None);
    }

    #[test]
    fn test_bad_has_description_is_rejected() {
        let json = r#"{"name": "x", "description": "", "has_description": "maybe",
            "importance": "low", "date_made": "2023-03-01", "due_date": "2024-11-30",
            "status": "Pending", "rag": "green"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_stored_dates_must_be_padded() {
        let json = |due: &str| {
            format!(
                r#"{{"name": "x", "description": "", "has_description": false,
                "importance": "low", "date_made": "2024-01-01", "due_date": "{due}",
                "status": "Pending", "rag": "green"}}"#
            )
        };
        let task: Task = serde_json::from_str(&json("2024-01-05")).unwrap();
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert!(serde_json::from_str::<Task>(&json("2024-1-5")).is_err());
        assert!(serde_json::from_str::<Task>(&json("2024-11-31")).is_err());
        assert!(serde_json::from_str::<Task>(&json(" 2024-01-05")).is_err());
    }

    #[test]
    fn test_override_wins_over_derived() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let mut task = sample();
        assert_eq!(task.effective_rag(today), Rag::Red);
        task.rag_override = Some(Rag::Green);
        assert_eq!(task.derived_rag(today), Rag::Red);
        assert_eq!(task.effective_rag(today), Rag::Green);
        task.refresh_rag(today);
        assert_eq!(task.rag, Rag::Green);
    }

    #[test]
    fn test_single_edit_sets_one_field() {
        let edit = TaskEdit::single(TaskField::Status, "Completed");
        assert_eq!(edit.status.as_deref(), Some("Completed"));
        assert!(edit.name.is_none() && edit.rag.is_none());
        assert!(!edit.is_empty());
        assert!(TaskEdit::default().is_empty());
    }
}
