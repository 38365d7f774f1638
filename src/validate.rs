//! Field validation rules.
//!
//! The `validate_*` predicates answer yes/no; the `parse_*` companions return
//! the typed value or a [`ValidationError`] naming the field and the rule that
//! failed. Nothing here touches the store.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::fields::{Importance, Rag, Status, TaskField};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// True iff `text` is a real calendar date written exactly as `YYYY-MM-DD`.
pub fn validate_date(text: &str) -> bool {
    let b = text.as_bytes();
    // chrono alone accepts unpadded months and signed years, so check the shape first.
    let shape_ok = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    shape_ok && NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok()
}

pub fn validate_importance(text: &str) -> bool {
    Importance::ALL.iter().any(|i| i.as_str() == text)
}

pub fn validate_status(text: &str) -> bool {
    Status::ALL.iter().any(|s| s.as_str() == text)
}

pub fn validate_rag(text: &str) -> bool {
    Rag::ALL.iter().any(|r| r.as_str() == text.trim().to_lowercase())
}

pub fn validate_nonempty(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Parse a task name, returning it trimmed.
pub fn parse_name(text: &str) -> Result<String, ValidationError> {
    if !validate_nonempty(text) {
        return Err(ValidationError::new(TaskField::Name, "name cannot be empty"));
    }
    Ok(text.trim().to_string())
}

/// Parse a due date written exactly as `YYYY-MM-DD`; surrounding spaces are rejected.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new(TaskField::DueDate, "date cannot be empty"));
    }
    if !validate_date(text) {
        return Err(ValidationError::new(
            TaskField::DueDate,
            format!("'{text}' is not a valid date, use YYYY-MM-DD"),
        ));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| ValidationError::new(TaskField::DueDate, e.to_string()))
}

pub fn parse_importance(text: &str) -> Result<Importance, ValidationError> {
    Importance::ALL
        .into_iter()
        .find(|i| i.as_str() == text)
        .ok_or_else(|| {
            ValidationError::new(
                TaskField::Importance,
                format!("'{text}' is not one of 'high', 'medium' or 'low'"),
            )
        })
}

pub fn parse_status(text: &str) -> Result<Status, ValidationError> {
    Status::ALL
        .into_iter()
        .find(|s| s.as_str() == text)
        .ok_or_else(|| {
            ValidationError::new(
                TaskField::Status,
                format!("'{text}' is not one of 'Pending', 'In Progress' or 'Completed'"),
            )
        })
}

/// RAG ratings are matched case-insensitively.
pub fn parse_rag(text: &str) -> Result<Rag, ValidationError> {
    let wanted = text.trim().to_lowercase();
    Rag::ALL
        .into_iter()
        .find(|r| r.as_str() == wanted)
        .ok_or_else(|| {
            ValidationError::new(
                TaskField::Rag,
                format!("'{text}' is not one of 'red', 'amber' or 'green'"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-12-31"));
        assert!(validate_date("2024-02-29"));
        assert!(!validate_date("12/31/2024"));
        assert!(!validate_date("31-12-2024"));
        assert!(!validate_date("2024-1-05"));
        assert!(!validate_date("2024/12/31"));
        assert!(!validate_date("2024-12-31T10:00"));
        assert!(!validate_date("2023-02-29"));
        assert!(!validate_date("2024-11-31"));
        assert!(!validate_date(""));
    }

    #[test]
    fn test_enumerations_are_case_sensitive() {
        assert!(validate_importance("high"));
        assert!(validate_importance("low"));
        assert!(!validate_importance("High"));
        assert!(!validate_importance("urgent"));

        assert!(validate_status("In Progress"));
        assert!(validate_status("Completed"));
        assert!(!validate_status("completed"));
        assert!(!validate_status("Done"));
    }

    #[test]
    fn test_rag_ignores_case() {
        assert!(validate_rag("Red"));
        assert!(validate_rag(" amber "));
        assert_eq!(parse_rag("GREEN").unwrap(), Rag::Green);
        assert!(!validate_rag("blue"));
    }

    #[test]
    fn test_nonempty() {
        assert!(validate_nonempty("x"));
        assert!(!validate_nonempty(""));
        assert!(!validate_nonempty("   \t"));
    }

    #[test]
    fn test_parse_errors_name_the_field() {
        assert_eq!(parse_name("  ").unwrap_err().field, TaskField::Name);
        assert_eq!(parse_date("tomorrow").unwrap_err().field, TaskField::DueDate);
        assert_eq!(parse_importance("HIGH").unwrap_err().field, TaskField::Importance);
        assert_eq!(parse_status("done").unwrap_err().field, TaskField::Status);
        assert_eq!(parse_rag("purple").unwrap_err().field, TaskField::Rag);
    }

    #[test]
    fn test_parse_name_trims_but_date_is_exact() {
        assert_eq!(parse_name("  Write report ").unwrap(), "Write report");
        assert_eq!(
            parse_date("2024-12-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert_eq!(parse_date(" 2024-12-31 ").unwrap_err().field, TaskField::DueDate);
        assert!(parse_date("   ").unwrap_err().reason.contains("empty"));
    }
}
