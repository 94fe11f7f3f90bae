//! LLM Gateway port
//!
//! Defines the interface for the text-generation backend. The pipeline
//! depends only on this narrow capability; backend-specific request and
//! response shapes never cross this boundary. Implementations (adapters)
//! live in the infrastructure layer.

use async_trait::async_trait;
use prd_domain::prompt::PromptSpec;
use prd_domain::Turn;
use thiserror::Error;

/// Errors that can occur during a generation call.
///
/// `Unavailable` and `Timeout` are transient and may be retried by the
/// calling stage (never by the adapter itself); `Auth` indicates a
/// configuration defect and is never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Backend returned no usable text")]
    EmptyOutput,
}

impl GenerationError {
    /// Transient failures are candidates for a bounded retry at the
    /// stage boundary.
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Unavailable(_) | GenerationError::Timeout)
    }
}

/// Generation controls forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
}

impl GenerationParams {
    /// Interview stage: conversational, some creative latitude.
    pub fn interview() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: None,
        }
    }

    /// Synthesis stage: structured document writing.
    pub fn synthesis() -> Self {
        Self {
            temperature: 0.5,
            max_output_tokens: None,
        }
    }

    /// Critique stage: focused review, bounded length.
    pub fn critique() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: Some(3000),
        }
    }

    /// Revision stage: full rewritten document, generous length.
    pub fn revision() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: Some(8000),
        }
    }

    /// Memory-summary compression: near-deterministic.
    pub fn summary() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: None,
        }
    }
}

/// One generation call: system instruction, conversation history, and
/// generation controls.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub history: Vec<Turn>,
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// Build a request from a prompt spec. A non-empty `user_content`
    /// becomes the final user turn of the history, so single-shot stages
    /// (synthesis, critique, revision) and conversational stages share
    /// one shape.
    pub fn from_spec(spec: PromptSpec, mut history: Vec<Turn>, params: GenerationParams) -> Self {
        if !spec.user_content.is_empty() {
            history.push(Turn::user(spec.user_content));
        }
        Self {
            system_instruction: spec.system_instruction,
            history,
            params,
        }
    }
}

/// Gateway for text generation.
///
/// The adapter performs a single call per invocation — no internal
/// retries — and resolves to plain generated text or a typed failure.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GenerationError::Unavailable("503".into()).is_transient());
        assert!(GenerationError::Timeout.is_transient());
        assert!(!GenerationError::Auth("bad key".into()).is_transient());
        assert!(!GenerationError::EmptyOutput.is_transient());
    }

    #[test]
    fn test_from_spec_appends_user_content() {
        let spec = PromptSpec {
            system_instruction: "be brief".into(),
            user_content: "review this".into(),
        };
        let request =
            GenerationRequest::from_spec(spec, vec![Turn::assistant("earlier")], GenerationParams::critique());

        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[1].content, "review this");
        assert_eq!(request.params.max_output_tokens, Some(3000));
    }

    #[test]
    fn test_from_spec_keeps_history_when_no_user_content() {
        let spec = PromptSpec {
            system_instruction: "interviewer".into(),
            user_content: String::new(),
        };
        let history = vec![Turn::user("hi"), Turn::assistant("hello")];
        let request = GenerationRequest::from_spec(spec, history.clone(), GenerationParams::interview());
        assert_eq!(request.history, history);
    }
}
