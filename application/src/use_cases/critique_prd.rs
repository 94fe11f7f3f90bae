//! PRD critique use case
//!
//! Critique is advisory, so this stage degrades instead of failing when
//! the reviewer's text cannot be parsed or comes back empty — partial
//! information is better than none. Contrast with synthesis, where a
//! malformed document is fatal.

use crate::error::StageError;
use crate::ports::llm_gateway::{GenerationError, GenerationParams, GenerationRequest, LlmGateway};
use crate::use_cases::shared::generate_with_retry;
use prd_domain::critique::{is_well_formed_critique, parse_critique};
use prd_domain::prompt::{PromptSpec, Stage};
use prd_domain::{CritiqueResult, PrdDocument};
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for running a CTO critique over a PRD document.
pub struct CritiquePrdUseCase {
    gateway: Arc<dyn LlmGateway>,
}

impl CritiquePrdUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    /// Execute the use case. Returns `Err` only for gateway failures
    /// other than empty output; any successfully returned text yields a
    /// usable [`CritiqueResult`].
    pub async fn execute(&self, prd: &PrdDocument) -> Result<CritiqueResult, StageError> {
        let critique = self.request_critique(prd).await?;
        info!(
            "Critique complete: {} issues, score {:?}",
            critique.issues.len(),
            critique.score
        );
        Ok(critique)
    }

    /// Like [`execute`](Self::execute), but re-asks once when the
    /// response is missing the expected sections. Deep review uses this:
    /// a well-formed critique makes the loop's stop condition reliable,
    /// so one extra call is worth it there.
    pub async fn execute_with_reask(&self, prd: &PrdDocument) -> Result<CritiqueResult, StageError> {
        let spec = PromptSpec::critique(prd);
        let request = GenerationRequest::from_spec(spec, vec![], GenerationParams::critique());

        let text = match generate_with_retry(self.gateway.as_ref(), Stage::Critique, request.clone()).await
        {
            Ok(text) => text,
            Err(GenerationError::EmptyOutput) => return Ok(empty_output_fallback()),
            Err(e) => return Err(e.into()),
        };

        if is_well_formed_critique(&text) {
            return Ok(parse_critique(&text));
        }

        warn!("Critique response missing expected sections, re-asking once");
        match generate_with_retry(self.gateway.as_ref(), Stage::Critique, request).await {
            // Whatever comes back the second time is accepted as-is.
            Ok(second) => Ok(parse_critique(&second)),
            // The first response already succeeded; a failed re-ask must
            // not discard it. Fall back to parsing the text in hand.
            Err(e) => {
                warn!("Re-ask failed ({e}), keeping the first critique response");
                Ok(parse_critique(&text))
            }
        }
    }

    async fn request_critique(&self, prd: &PrdDocument) -> Result<CritiqueResult, StageError> {
        let spec = PromptSpec::critique(prd);
        let request = GenerationRequest::from_spec(spec, vec![], GenerationParams::critique());

        match generate_with_retry(self.gateway.as_ref(), Stage::Critique, request).await {
            Ok(text) => Ok(parse_critique(&text)),
            Err(GenerationError::EmptyOutput) => Ok(empty_output_fallback()),
            Err(e) => Err(e.into()),
        }
    }
}

fn empty_output_fallback() -> CritiqueResult {
    CritiqueResult::fallback("The reviewer returned no text; treat the document as unreviewed.")
}
