//! Helpers shared by the pipeline use cases.

use crate::ports::llm_gateway::{GenerationError, GenerationRequest, LlmGateway};
use prd_domain::Stage;
use tracing::warn;

/// Issue a generation call with the stage-boundary retry policy: one
/// additional attempt on a transient failure (`Unavailable`, `Timeout`),
/// nothing more. `Auth` and `EmptyOutput` surface immediately.
pub(crate) async fn generate_with_retry(
    gateway: &dyn LlmGateway,
    stage: Stage,
    request: GenerationRequest,
) -> Result<String, GenerationError> {
    match gateway.generate(request.clone()).await {
        Err(e) if e.is_transient() => {
            warn!(stage = %stage, "Transient generation failure, retrying once: {e}");
            gateway.generate(request).await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GenerationParams;
    use crate::use_cases::testing::ScriptedGateway;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "sys".into(),
            history: vec![],
            params: GenerationParams::synthesis(),
        }
    }

    #[tokio::test]
    async fn test_retries_once_on_transient_failure() {
        let gateway = ScriptedGateway::sequence([
            Err(GenerationError::Timeout),
            Ok("recovered".to_string()),
        ]);
        let result = generate_with_retry(&gateway, Stage::Synthesis, request()).await;
        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry_budget() {
        let gateway = ScriptedGateway::always_unavailable();
        let result = generate_with_retry(&gateway, Stage::Synthesis, request()).await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let gateway = ScriptedGateway::repeating(Err(GenerationError::Auth("rejected".into())));
        let result = generate_with_retry(&gateway, Stage::Synthesis, request()).await;
        assert!(matches!(result, Err(GenerationError::Auth(_))));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_output_is_not_retried() {
        let gateway = ScriptedGateway::repeating(Err(GenerationError::EmptyOutput));
        let result = generate_with_retry(&gateway, Stage::Synthesis, request()).await;
        assert_eq!(result.unwrap_err(), GenerationError::EmptyOutput);
        assert_eq!(gateway.call_count(), 1);
    }
}
