//! Error types shared by the store, the repository and the command layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::fields::TaskField;

/// A user-supplied value failed one of the field rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: TaskField,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: TaskField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("task file {} is not a valid task list: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task number {index} is out of range (there are {size} tasks)")]
    OutOfRange { index: usize, size: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by the command-line shell.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("{0}")]
    Usage(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Task(TaskError::Store(e))
    }
}
