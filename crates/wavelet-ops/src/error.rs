//! Error types for the operation algebra.

use thiserror::Error;

/// Errors raised when an operation cannot be applied or composed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("Operation covers {covered} characters but the document has {length}")]
    LengthMismatch { covered: usize, length: usize },

    #[error("Retain of {count} at {position} runs past the end (length: {length})")]
    RetainPastEnd {
        position: usize,
        count: usize,
        length: usize,
    },

    #[error("Delete of {count} at {position} runs past the end (length: {length})")]
    DeletePastEnd {
        position: usize,
        count: usize,
        length: usize,
    },

    #[error("Delete at {position} expected {expected:?}, found {found:?}")]
    DeleteMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Cannot compose: first produces {first_target} characters, second expects {second_source}")]
    ComposeMismatch {
        first_target: usize,
        second_source: usize,
    },

    #[error("Participant already present: {0}")]
    DuplicateParticipant(String),

    #[error("Participant not found: {0}")]
    UnknownParticipant(String),
}

pub type Result<T> = std::result::Result<T, OpError>;
