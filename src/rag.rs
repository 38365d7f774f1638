//! RAG (red/amber/green) classification of tasks by due date and status.

use chrono::{Local, NaiveDate};

use crate::fields::{Rag, Status};

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Classify a task as of `today`.
///
/// Overdue and unfinished is red, overdue but completed is amber, and
/// anything due today or later is green whatever its status.
pub fn classify(due_date: NaiveDate, status: Status, today: NaiveDate) -> Rag {
    if due_date < today {
        if status == Status::Completed {
            Rag::Amber
        } else {
            Rag::Red
        }
    } else {
        Rag::Green
    }
}

/// Classify against the local clock.
pub fn classify_now(due_date: NaiveDate, status: Status) -> Rag {
    classify(due_date, status, today())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_overdue_incomplete_is_red() {
        let today = d(2024, 6, 15);
        assert_eq!(classify(d(2024, 6, 14), Status::Pending, today), Rag::Red);
        assert_eq!(classify(d(2023, 1, 1), Status::InProgress, today), Rag::Red);
    }

    #[test]
    fn test_overdue_completed_is_amber() {
        assert_eq!(classify(d(2024, 6, 14), Status::Completed, d(2024, 6, 15)), Rag::Amber);
    }

    #[test]
    fn test_due_today_or_later_is_green() {
        let today = d(2024, 6, 15);
        for status in Status::ALL {
            assert_eq!(classify(today, status, today), Rag::Green);
            assert_eq!(classify(d(2025, 1, 1), status, today), Rag::Green);
        }
    }

    #[test]
    fn test_classify_now_uses_local_date() {
        let now = today();
        assert_eq!(classify_now(now, Status::Pending), Rag::Green);
        assert_eq!(classify_now(now.pred_opt().unwrap(), Status::Pending), Rag::Red);
    }
}
