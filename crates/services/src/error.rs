//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AttemptError, CategoryId, SettingsError};
use storage::repository::StorageError;

/// Errors emitted by the session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),
    #[error("category has no questions: {0}")]
    EmptyCategory(CategoryId),
    #[error("no quiz session is in progress")]
    SessionNotActive,
    #[error("question {index} already has an answer")]
    DuplicateAnswer { index: usize },
    #[error("question {index} cannot be answered before question {expected}")]
    AnswerOutOfOrder { index: usize, expected: usize },
    #[error("option {index} does not exist (question has {options} options)")]
    InvalidOption { index: usize, options: usize },
    #[error(transparent)]
    Attempt(#[from] AttemptError),
}

/// Errors emitted while deriving results from a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultsError {
    #[error("session is not completed yet")]
    SessionIncomplete,
    #[error("session category no longer exists: {0}")]
    CategoryMismatch(CategoryId),
    #[error("no quiz session has been started")]
    NoSession,
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
