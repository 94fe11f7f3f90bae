//! Interview (chat) use case
//!
//! Answers the user inside the requirements conversation, optionally
//! grounded in the current PRD and a hidden memory summary. Also hosts
//! the memory-summary compressor that keeps long conversations inside
//! the history budget.

use crate::error::StageError;
use crate::ports::llm_gateway::{GenerationParams, GenerationRequest, LlmGateway};
use crate::use_cases::shared::generate_with_retry;
use prd_domain::conversation::{reduce, HistoryBudget, RawTurn};
use prd_domain::prompt::{PromptSpec, Stage};
use prd_domain::PrdDocument;
use std::sync::Arc;
use tracing::debug;

/// Input for the Chat use case.
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    pub turns: Vec<RawTurn>,
    pub prd_context: Option<PrdDocument>,
    pub memory_summary: Option<String>,
}

impl ChatInput {
    pub fn new(turns: Vec<RawTurn>) -> Self {
        Self {
            turns,
            ..Self::default()
        }
    }

    pub fn with_prd_context(mut self, prd: PrdDocument) -> Self {
        self.prd_context = Some(prd);
        self
    }

    pub fn with_memory_summary(mut self, summary: impl Into<String>) -> Self {
        self.memory_summary = Some(summary.into());
        self
    }
}

/// Use case for the interview stage.
pub struct ChatUseCase {
    gateway: Arc<dyn LlmGateway>,
    budget: HistoryBudget,
}

impl ChatUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            budget: HistoryBudget::default(),
        }
    }

    pub fn with_budget(mut self, budget: HistoryBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Produce the assistant's next reply.
    pub async fn execute(&self, input: ChatInput) -> Result<String, StageError> {
        let conversation = reduce(&input.turns, self.budget)?;
        debug!("Interview reply over {} turns", conversation.len());

        let spec = PromptSpec::interview(
            input.prd_context.as_ref(),
            input.memory_summary.as_deref(),
        );
        let request = GenerationRequest::from_spec(
            spec,
            conversation.turns().to_vec(),
            GenerationParams::interview(),
        );

        let reply = generate_with_retry(self.gateway.as_ref(), Stage::Interview, request).await?;
        Ok(reply)
    }

    /// Compress the recent conversation plus any existing summary into a
    /// new hidden memory summary. Only the most recent turns (summary
    /// window) are fed to the compressor.
    pub async fn summarize(
        &self,
        turns: &[RawTurn],
        existing_summary: Option<&str>,
    ) -> Result<String, StageError> {
        let recent = reduce(turns, HistoryBudget::summary_window())?;

        let spec = PromptSpec::summary(&recent, existing_summary);
        let request = GenerationRequest::from_spec(spec, vec![], GenerationParams::summary());

        let summary = generate_with_retry(self.gateway.as_ref(), Stage::Summary, request).await?;
        Ok(summary.trim().to_string())
    }
}
