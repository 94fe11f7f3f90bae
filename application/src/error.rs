//! Stage-level error taxonomy.
//!
//! Every pipeline entry point resolves to one of these variants, and each
//! variant maps to a stable category string so the caller can decide
//! whether to retry, abort, or show model text to a human.

use crate::ports::llm_gateway::GenerationError;
use prd_domain::ValidationError;
use thiserror::Error;

/// Failure of one pipeline stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Generated text failed the structural contract (blank, or missing
    /// section markers). Fatal at synthesis and revision — a document
    /// that downstream stages would mistake for valid is worse than an
    /// error.
    #[error("Generated output is malformed: {0}")]
    MalformedOutput(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl StageError {
    /// Stable category identifier for the client boundary.
    pub fn category(&self) -> &'static str {
        match self {
            StageError::Validation(_) => "validation",
            StageError::Generation(GenerationError::Auth(_)) => "auth",
            StageError::Generation(GenerationError::Unavailable(_)) => "backend_unavailable",
            StageError::Generation(GenerationError::Timeout) => "timeout",
            StageError::Generation(GenerationError::EmptyOutput) => "empty_output",
            StageError::MalformedOutput(_) => "malformed_output",
            StageError::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_distinct() {
        let errors = [
            StageError::Validation(ValidationError::EmptyConversation),
            StageError::Generation(GenerationError::Auth("k".into())),
            StageError::Generation(GenerationError::Unavailable("503".into())),
            StageError::Generation(GenerationError::Timeout),
            StageError::Generation(GenerationError::EmptyOutput),
            StageError::MalformedOutput("blank".into()),
            StageError::Cancelled,
        ];
        let mut categories: Vec<_> = errors.iter().map(|e| e.category()).collect();
        categories.sort_unstable();
        categories.dedup();
        assert_eq!(categories.len(), errors.len());
    }

    #[test]
    fn test_from_conversions() {
        let err: StageError = ValidationError::EmptyConversation.into();
        assert_eq!(err.category(), "validation");

        let err: StageError = GenerationError::Timeout.into();
        assert_eq!(err.category(), "timeout");
    }
}
