//! PRD synthesis use case
//!
//! Conversation in, structured PRD document out. Validation happens at
//! the conversation reducer boundary, so a malformed conversation never
//! reaches the gateway.

use crate::error::StageError;
use crate::ports::llm_gateway::{GenerationError, GenerationParams, GenerationRequest, LlmGateway};
use crate::use_cases::shared::generate_with_retry;
use prd_domain::conversation::{reduce, HistoryBudget, RawTurn};
use prd_domain::prompt::{PromptSpec, Stage};
use prd_domain::PrdDocument;
use std::sync::Arc;
use tracing::{debug, info};

/// Use case for synthesizing a PRD from a requirements conversation.
pub struct SynthesizePrdUseCase {
    gateway: Arc<dyn LlmGateway>,
    budget: HistoryBudget,
}

impl SynthesizePrdUseCase {
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

    /// Execute the use case: reduce, prompt, generate, structurally check.
    ///
    /// Unlike critique, a malformed document here is fatal — partial
    /// output must never flow downstream as if it were a valid PRD.
    pub async fn execute(&self, raw_turns: &[RawTurn]) -> Result<PrdDocument, StageError> {
        let conversation = reduce(raw_turns, self.budget)?;
        debug!("Synthesizing PRD from {} turns", conversation.len());

        let spec = PromptSpec::synthesis(&conversation);
        let request = GenerationRequest::from_spec(spec, vec![], GenerationParams::synthesis());

        let text = match generate_with_retry(self.gateway.as_ref(), Stage::Synthesis, request).await {
            Ok(text) => text,
            // An empty synthesis response is a malformed document, not a
            // transport condition the caller should distinguish.
            Err(GenerationError::EmptyOutput) => {
                return Err(StageError::MalformedOutput(
                    "backend returned no text for the document".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        let document = PrdDocument::new(text);
        check_document(&document)?;

        info!("Synthesized PRD ({} words)", document.word_count());
        Ok(document)
    }
}

/// Structural contract shared by synthesis and revision output.
pub(crate) fn check_document(document: &PrdDocument) -> Result<(), StageError> {
    if document.is_blank() {
        return Err(StageError::MalformedOutput(
            "generated document is blank".to_string(),
        ));
    }
    if !document.has_section_markers() {
        return Err(StageError::MalformedOutput(
            "generated document has no section markers".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::ScriptedGateway;
    use prd_domain::ValidationError;

    const VALID_PRD: &str = "# Overview\nA budgeting app for personal use.\n\n## Features\n- track expenses\n- monthly stats\n\n## Data & Storage\nLocal storage only.";

    fn budgeting_conversation() -> Vec<RawTurn> {
        vec![
            RawTurn::new(
                "user",
                "I want a budgeting app, personal use, track expenses/categories/monthly stats",
            ),
            RawTurn::new("assistant", "Where is data stored?"),
            RawTurn::new("user", "Local storage only"),
        ]
    }

    #[tokio::test]
    async fn test_synthesis_end_to_end() {
        let gateway = Arc::new(ScriptedGateway::always_ok(VALID_PRD));
        let use_case = SynthesizePrdUseCase::new(gateway.clone());

        let document = use_case.execute(&budgeting_conversation()).await.unwrap();
        assert!(!document.is_blank());
        assert!(document.has_section_markers());
        assert!(document.as_str().contains("Local storage"));

        // The transcript reached the backend.
        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0].history.last().unwrap().content;
        assert!(prompt.contains("budgeting app"));
        assert!(prompt.contains("Local storage only"));
    }

    #[tokio::test]
    async fn test_empty_conversation_never_reaches_gateway() {
        let gateway = Arc::new(ScriptedGateway::always_ok(VALID_PRD));
        let use_case = SynthesizePrdUseCase::new(gateway.clone());

        let result = use_case.execute(&[]).await;
        assert_eq!(
            result.unwrap_err(),
            StageError::Validation(ValidationError::EmptyConversation)
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unstructured_output_is_malformed() {
        let gateway = Arc::new(ScriptedGateway::always_ok("sure, sounds like a nice app"));
        let use_case = SynthesizePrdUseCase::new(gateway);

        let result = use_case.execute(&budgeting_conversation()).await;
        assert!(matches!(result, Err(StageError::MalformedOutput(_))));
    }

    #[tokio::test]
    async fn test_empty_output_becomes_malformed() {
        let gateway = Arc::new(ScriptedGateway::repeating(Err(GenerationError::EmptyOutput)));
        let use_case = SynthesizePrdUseCase::new(gateway);

        let result = use_case.execute(&budgeting_conversation()).await;
        assert!(matches!(result, Err(StageError::MalformedOutput(_))));
    }

    #[tokio::test]
    async fn test_unavailable_backend_surfaces_after_one_retry() {
        let gateway = Arc::new(ScriptedGateway::always_unavailable());
        let use_case = SynthesizePrdUseCase::new(gateway.clone());

        let result = use_case.execute(&budgeting_conversation()).await;
        assert_eq!(result.unwrap_err().category(), "backend_unavailable");
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_budget_truncates_before_prompting() {
        let gateway = Arc::new(ScriptedGateway::always_ok(VALID_PRD));
        let use_case =
            SynthesizePrdUseCase::new(gateway.clone()).with_budget(HistoryBudget::new(1));

        use_case.execute(&budgeting_conversation()).await.unwrap();
        let requests = gateway.requests();
        let prompt = &requests[0].history.last().unwrap().content;
        assert!(prompt.contains("Local storage only"));
        assert!(!prompt.contains("Where is data stored?"));
    }
}
