//! Deep review use case
//!
//! Composes critique and revision into a bounded improvement loop,
//! modeled as an explicit three-state machine rather than an open-ended
//! loop so termination and worst-case cost are guaranteed:
//!
//! ```text
//! Critiquing --acceptable or cap reached--> Done
//! Critiquing --issues found--------------> Revising
//! Revising ------------------------------> Critiquing
//! ```
//!
//! Any stage failure aborts the loop and carries the partial trail, so
//! the caller can inspect how far review progressed.

use crate::error::StageError;
use crate::ports::llm_gateway::{GenerationError, GenerationParams, GenerationRequest, LlmGateway};
use crate::use_cases::critique_prd::CritiquePrdUseCase;
use crate::use_cases::shared::generate_with_retry;
use crate::use_cases::synthesize_prd::check_document;
use prd_domain::prompt::{PromptSpec, Stage};
use prd_domain::{CritiqueResult, PrdDocument, ReviewRound, ReviewTrail, VersionKind, VersionLog};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default maximum number of critique rounds per invocation.
pub const DEFAULT_ITERATION_CAP: usize = 3;

/// State of the deep-review machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    Critiquing,
    Revising,
    Done,
}

/// Successful deep-review result: the final document, the full critique
/// trail, and the version log of accepted revisions.
#[derive(Debug, Clone)]
pub struct DeepReviewOutcome {
    pub document: PrdDocument,
    pub trail: ReviewTrail,
    pub versions: VersionLog,
}

/// Deep-review failure carrying the partial trail accumulated before the
/// failing step.
#[derive(Error, Debug)]
#[error("Deep review failed after {} completed round(s): {error}", trail.len())]
pub struct DeepReviewFailure {
    #[source]
    pub error: StageError,
    pub trail: ReviewTrail,
}

/// Use case for the bounded critique-and-revise loop.
pub struct DeepReviewUseCase {
    gateway: Arc<dyn LlmGateway>,
    critique: CritiquePrdUseCase,
    iteration_cap: usize,
    cancellation_token: Option<CancellationToken>,
}

impl DeepReviewUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            critique: CritiquePrdUseCase::new(Arc::clone(&gateway)),
            gateway,
            iteration_cap: DEFAULT_ITERATION_CAP,
            cancellation_token: None,
        }
    }

    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = cap.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run the loop to completion or failure.
    pub async fn execute(&self, prd: PrdDocument) -> Result<DeepReviewOutcome, DeepReviewFailure> {
        let mut trail = ReviewTrail::new();
        let mut versions = VersionLog::new();
        versions.record(VersionKind::Manual, &prd, "input document");

        let mut current = prd;
        let mut latest_critique: Option<CritiqueResult> = None;
        let mut phase = ReviewPhase::Critiquing;

        info!("Starting deep review (cap {} rounds)", self.iteration_cap);

        while phase != ReviewPhase::Done {
            match phase {
                ReviewPhase::Critiquing => {
                    let critique = self
                        .step(self.critique.execute_with_reask(&current))
                        .await
                        .map_err(|error| fail(error, &trail))?;

                    trail.push(ReviewRound::new(current.clone(), critique.clone()));
                    debug!(
                        "Round {}: {} issues (max severity {:?})",
                        trail.len(),
                        critique.issues.len(),
                        critique.max_severity()
                    );

                    if critique.is_acceptable() {
                        info!("Critique acceptable after {} round(s)", trail.len());
                        phase = ReviewPhase::Done;
                    } else if trail.len() >= self.iteration_cap {
                        info!("Iteration cap reached with open issues");
                        phase = ReviewPhase::Done;
                    } else {
                        latest_critique = Some(critique);
                        phase = ReviewPhase::Revising;
                    }
                }
                ReviewPhase::Revising => {
                    let critique = latest_critique
                        .as_ref()
                        .expect("revising phase always follows a critique");
                    let revised = self
                        .step(self.revise(&current, critique))
                        .await
                        .map_err(|error| fail(error, &trail))?;

                    versions.record(
                        VersionKind::DeepReview,
                        &revised,
                        format!("revision after round {}", trail.len()),
                    );
                    current = revised;
                    phase = ReviewPhase::Critiquing;
                }
                ReviewPhase::Done => unreachable!(),
            }
        }

        Ok(DeepReviewOutcome {
            document: current,
            trail,
            versions,
        })
    }

    /// Revision call: same structural contract as synthesis output.
    async fn revise(
        &self,
        prd: &PrdDocument,
        critique: &CritiqueResult,
    ) -> Result<PrdDocument, StageError> {
        let spec = PromptSpec::revision(prd, critique);
        let request = GenerationRequest::from_spec(spec, vec![], GenerationParams::revision());

        let text = match generate_with_retry(self.gateway.as_ref(), Stage::Revision, request).await {
            Ok(text) => text,
            Err(GenerationError::EmptyOutput) => {
                return Err(StageError::MalformedOutput(
                    "backend returned no text for the revision".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        let document = PrdDocument::new(text);
        check_document(&document)?;
        Ok(document)
    }

    /// Run one stage step, abandoning the in-flight call on cancellation.
    async fn step<F, T>(&self, fut: F) -> Result<T, StageError>
    where
        F: Future<Output = Result<T, StageError>>,
    {
        match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(StageError::Cancelled),
                    result = fut => result,
                }
            }
            None => fut.await,
        }
    }
}

fn fail(error: StageError, trail: &ReviewTrail) -> DeepReviewFailure {
    DeepReviewFailure {
        error,
        trail: trail.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::ScriptedGateway;

    const CLEAN_CRITIQUE: &str = "## Verdict\nSolid.\n\n## Score\n95/100\n\n## Issues\n(none)\n\n## Next Steps\nNothing blocking.";
    const LOW_ONLY_CRITIQUE: &str = "## Verdict\nNits only.\n\n## Score\n88/100\n\n## Issues\n- [low] heading typo\n\n## Next Steps\nOptional polish.";
    const HARSH_CRITIQUE: &str = "## Verdict\nIncomplete.\n\n## Score\n45/100\n\n## Issues\n- [high] no storage decision\n\n## Next Steps\nDecide storage.";
    const REVISED_PRD: &str = "# Overview\nRevised draft.\n\n## Data & Storage\nLocal storage only.";

    fn input_prd() -> PrdDocument {
        PrdDocument::new("# Overview\nFirst draft.")
    }

    #[tokio::test]
    async fn test_clean_first_critique_terminates_in_one_round() {
        let gateway = Arc::new(ScriptedGateway::always_ok(CLEAN_CRITIQUE));
        let use_case = DeepReviewUseCase::new(gateway.clone());

        let outcome = use_case.execute(input_prd()).await.unwrap();
        assert_eq!(outcome.trail.len(), 1);
        assert_eq!(outcome.document, input_prd());
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_all_low_critique_also_terminates() {
        let gateway = Arc::new(ScriptedGateway::always_ok(LOW_ONLY_CRITIQUE));
        let use_case = DeepReviewUseCase::new(gateway);

        let outcome = use_case.execute(input_prd()).await.unwrap();
        assert_eq!(outcome.trail.len(), 1);
        assert!(outcome.trail.rounds()[0].critique.is_acceptable());
    }

    #[tokio::test]
    async fn test_critique_revise_critique_flow() {
        let gateway = Arc::new(ScriptedGateway::sequence([
            Ok(HARSH_CRITIQUE.to_string()),
            Ok(REVISED_PRD.to_string()),
            Ok(CLEAN_CRITIQUE.to_string()),
        ]));
        let use_case = DeepReviewUseCase::new(gateway.clone());

        let outcome = use_case.execute(input_prd()).await.unwrap();
        assert_eq!(outcome.trail.len(), 2);
        assert_eq!(outcome.document.as_str(), REVISED_PRD);
        assert_eq!(gateway.call_count(), 3);

        // Version log: input + one accepted revision.
        assert_eq!(outcome.versions.len(), 2);
        assert_eq!(outcome.versions.latest().unwrap().kind, VersionKind::DeepReview);
    }

    #[tokio::test]
    async fn test_terminates_at_iteration_cap() {
        // Every critique is harsh, every revision valid: the loop must
        // stop at the cap, with trail length == cap.
        let gateway = Arc::new(ScriptedGateway::sequence([
            Ok(HARSH_CRITIQUE.to_string()),
            Ok(REVISED_PRD.to_string()),
            Ok(HARSH_CRITIQUE.to_string()),
            Ok(REVISED_PRD.to_string()),
            Ok(HARSH_CRITIQUE.to_string()),
        ]));
        let use_case = DeepReviewUseCase::new(gateway.clone());

        let outcome = use_case.execute(input_prd()).await.unwrap();
        assert_eq!(outcome.trail.len(), DEFAULT_ITERATION_CAP);
        assert_eq!(gateway.call_count(), 5);
    }

    #[tokio::test]
    async fn test_failure_carries_partial_trail() {
        let gateway = Arc::new(ScriptedGateway::sequence([
            Ok(HARSH_CRITIQUE.to_string()),
            Err(GenerationError::Unavailable("outage".into())),
            Err(GenerationError::Unavailable("outage".into())),
        ]));
        let use_case = DeepReviewUseCase::new(gateway);

        let failure = use_case.execute(input_prd()).await.unwrap_err();
        assert_eq!(failure.trail.len(), 1);
        assert_eq!(failure.error.category(), "backend_unavailable");
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_with_empty_trail() {
        let gateway = Arc::new(ScriptedGateway::always_unavailable());
        let use_case = DeepReviewUseCase::new(gateway.clone());

        let failure = use_case.execute(input_prd()).await.unwrap_err();
        assert!(failure.trail.is_empty());
        // First attempt plus the single stage-boundary retry.
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_revision_aborts_loop() {
        let gateway = Arc::new(ScriptedGateway::sequence([
            Ok(HARSH_CRITIQUE.to_string()),
            Ok("no headings in this revision".to_string()),
        ]));
        let use_case = DeepReviewUseCase::new(gateway);

        let failure = use_case.execute(input_prd()).await.unwrap_err();
        assert_eq!(failure.error.category(), "malformed_output");
        assert_eq!(failure.trail.len(), 1);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_stops_before_any_call() {
        let token = CancellationToken::new();
        token.cancel();

        let gateway = Arc::new(ScriptedGateway::always_ok(CLEAN_CRITIQUE));
        let use_case = DeepReviewUseCase::new(gateway.clone()).with_cancellation(token);

        let failure = use_case.execute(input_prd()).await.unwrap_err();
        assert_eq!(failure.error, StageError::Cancelled);
        assert!(failure.trail.is_empty());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_custom_cap_of_one() {
        let gateway = Arc::new(ScriptedGateway::always_ok(HARSH_CRITIQUE));
        let use_case = DeepReviewUseCase::new(gateway.clone()).with_iteration_cap(1);

        let outcome = use_case.execute(input_prd()).await.unwrap();
        assert_eq!(outcome.trail.len(), 1);
        assert_eq!(gateway.call_count(), 1);
    }
}
