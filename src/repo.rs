//! The in-memory task list and the only place tasks are created, changed or removed.
//!
//! Tasks are addressed by their 1-based position in display order. Every
//! mutation validates first, then changes memory, then saves the whole list;
//! if the save fails the in-memory change is rolled back.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::TaskError;
use crate::fields::*;
use crate::rag::{classify, today};
use crate::store::TaskStore;
use crate::task::{NewTask, Task, TaskEdit};
use crate::validate::*;

/// Ordered collection of tasks backed by a [`TaskStore`].
#[derive(Debug)]
pub struct TaskRepository {
    store: TaskStore,
    tasks: Vec<Task>,
}

/// A validated change to one field.
#[derive(Debug, Clone)]
enum Change {
    Name(String),
    Description(String),
    Importance(Importance),
    DueDate(NaiveDate),
    Status(Status),
    Rag(Rag),
    ClearRagOverride,
}

impl TaskRepository {
    /// Load the repository from its store.
    pub fn open(store: TaskStore) -> Result<Self, TaskError> {
        let tasks = store.load()?;
        Ok(Self { store, tasks })
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate and append a new task, returning it.
    pub fn add(&mut self, fields: NewTask) -> Result<Task, TaskError> {
        let date_made = today();
        let name = parse_name(&fields.name)?;
        let importance = parse_importance(&fields.importance)?;
        let due_date = parse_date(&fields.due_date)?;

        let task = Task {
            name,
            has_description: !fields.description.is_empty(),
            description: fields.description,
            importance,
            date_made,
            due_date,
            status: Status::Pending,
            rag: classify(due_date, Status::Pending, date_made),
            rag_override: None,
        };

        self.tasks.push(task.clone());
        if let Err(e) = self.persist() {
            self.tasks.pop();
            return Err(e);
        }
        debug!(index = self.tasks.len(), name = %task.name, "added task");
        Ok(task)
    }

    /// The task at 1-based `index`, with its rating current as of today.
    pub fn get(&self, index: usize) -> Result<Task, TaskError> {
        let pos = self.position(index)?;
        let mut task = self.tasks[pos].clone();
        task.refresh_rag(today());
        Ok(task)
    }

    /// Change one field of the task at `index`.
    pub fn update(&mut self, index: usize, field: TaskField, value: &str) -> Result<Task, TaskError> {
        self.update_record(index, TaskEdit::single(field, value))
    }

    /// Apply several field changes to the task at `index` at once.
    ///
    /// Every value is validated before any is applied.
    pub fn update_record(&mut self, index: usize, edit: TaskEdit) -> Result<Task, TaskError> {
        let pos = self.position(index)?;
        let changes = parse_edit(&edit)?;

        let previous = self.tasks[pos].clone();
        let now = today();
        let task = &mut self.tasks[pos];
        for change in changes {
            apply(task, change);
        }
        task.refresh_rag(now);
        let updated = task.clone();

        if let Err(e) = self.persist() {
            self.tasks[pos] = previous;
            return Err(e);
        }
        debug!(index, name = %updated.name, "updated task");
        Ok(updated)
    }

    /// Remove the task at `index`; later tasks move up one place.
    pub fn delete(&mut self, index: usize) -> Result<Task, TaskError> {
        let pos = self.position(index)?;
        let removed = self.tasks.remove(pos);
        if let Err(e) = self.persist() {
            self.tasks.insert(pos, removed);
            return Err(e);
        }
        debug!(index, name = %removed.name, "deleted task");
        Ok(removed)
    }

    /// Snapshot of all tasks in display order, ratings current as of today.
    pub fn list(&self) -> Vec<Task> {
        self.list_as_of(today())
    }

    pub fn list_as_of(&self, today: NaiveDate) -> Vec<Task> {
        self.tasks
            .iter()
            .cloned()
            .map(|mut t| {
                t.refresh_rag(today);
                t
            })
            .collect()
    }

    fn position(&self, index: usize) -> Result<usize, TaskError> {
        if index == 0 || index > self.tasks.len() {
            return Err(TaskError::OutOfRange {
                index,
                size: self.tasks.len(),
            });
        }
        Ok(index - 1)
    }

    fn persist(&mut self) -> Result<(), TaskError> {
        let now = today();
        for t in self.tasks.iter_mut() {
            t.refresh_rag(now);
        }
        self.store.save(&self.tasks)?;
        Ok(())
    }
}

/// Validate every field in `edit`, in the same order `add` checks them.
fn parse_edit(edit: &TaskEdit) -> Result<Vec<Change>, TaskError> {
    let mut changes = Vec::new();
    if let Some(name) = &edit.name {
        changes.push(Change::Name(parse_name(name)?));
    }
    if let Some(desc) = &edit.description {
        changes.push(Change::Description(desc.trim().to_string()));
    }
    if let Some(importance) = &edit.importance {
        changes.push(Change::Importance(parse_importance(importance.trim())?));
    }
    if let Some(due) = &edit.due_date {
        changes.push(Change::DueDate(parse_date(due.trim())?));
    }
    if let Some(status) = &edit.status {
        changes.push(Change::Status(parse_status(status.trim())?));
    }
    if edit.clear_rag_override {
        changes.push(Change::ClearRagOverride);
    }
    if let Some(rag) = &edit.rag {
        changes.push(Change::Rag(parse_rag(rag)?));
    }
    Ok(changes)
}

fn apply(task: &mut Task, change: Change) {
    match change {
        Change::Name(name) => task.name = name,
        Change::Description(desc) => {
            task.has_description = !desc.is_empty();
            task.description = desc;
        }
        Change::Importance(importance) => task.importance = importance,
        Change::DueDate(due) => {
            task.due_date = due;
            task.rag_override = None;
        }
        Change::Status(status) => {
            task.status = status;
            task.rag_override = None;
        }
        Change::Rag(rag) => {
            task.rag_override = Some(rag);
            task.rag = rag;
        }
        Change::ClearRagOverride => task.rag_override = None,
    }
}
