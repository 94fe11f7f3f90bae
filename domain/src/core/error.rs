//! Domain error types

use thiserror::Error;

/// Errors raised when caller-supplied input fails validation.
///
/// These indicate a defect in the request itself, never a backend
/// problem, so they are surfaced immediately and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Conversation must contain at least one turn")]
    EmptyConversation,

    #[error("Turn {index} has empty content")]
    EmptyTurn { index: usize },

    #[error("Unrecognized role: {0} (expected 'user' or 'assistant')")]
    InvalidRole(String),
}
