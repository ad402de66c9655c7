//! Error types for bank building, sessions and the wrong-question notebook.
//!
//! Grading and classification are total and have no error type. These
//! errors cover the places where a caller asked for something that does not
//! exist or is not allowed yet.

use thiserror::Error;

/// A spreadsheet row that could not become a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The question cell is blank.
    #[error("row {row_index} of '{sheet}' has no question text")]
    MissingQuestion { sheet: String, row_index: usize },
}

/// Errors raised by practice session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The requested selection matched no questions.
    #[error("no questions match the selection")]
    EmptySelection,

    /// A question number outside the bank was requested.
    #[error("question {requested} is out of range (bank has {available} questions)")]
    OutOfRange { requested: usize, available: usize },

    /// The session cursor is already past the last question.
    #[error("the session is finished")]
    Finished,

    /// A saved session refers to questions the loaded bank does not have.
    #[error("saved session does not match the loaded bank '{0}'")]
    BankMismatch(String),
}

/// Errors raised by the wrong-question notebook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotebookError {
    /// No record exists for the question.
    #[error("question {0} is not in the notebook")]
    NotFound(String),

    /// Mastery requires the most recent attempt to be correct.
    #[error("question {0} must be answered correctly before it can be marked mastered")]
    NotYetCorrect(String),
}

impl SessionError {
    /// Returns `true` if the session can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::OutOfRange { .. } | SessionError::Finished
        )
    }
}
