//! Enumerations for TUI state management.

use crate::fields::TaskField;

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    TaskList,
    TaskDetail,
    AddTask,
    EditField(TaskField),
    Help,
    Confirm,
}

/// Fields of the add-task form, in tab order.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormField {
    Name,
    Description,
    Importance,
    DueDate,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Description,
        FormField::Importance,
        FormField::DueDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Description => "Description",
            FormField::Importance => "Importance (high, medium, low)",
            FormField::DueDate => "Due Date (YYYY-MM-DD)",
        }
    }

    /// Position of this field in the form.
    pub fn index(self) -> usize {
        match self {
            FormField::Name => 0,
            FormField::Description => 1,
            FormField::Importance => 2,
            FormField::DueDate => 3,
        }
    }

    pub fn next(self) -> FormField {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> FormField {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
