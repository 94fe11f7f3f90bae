//! Use cases (application services)

pub mod chat;
pub mod critique_prd;
pub mod deep_review;
pub mod shared;
pub mod synthesize_prd;

#[cfg(test)]
pub(crate) mod testing {
    //! Programmable stub gateway for use-case tests.

    use crate::ports::llm_gateway::{GenerationError, GenerationRequest, LlmGateway};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Script {
        /// Pop responses in order; panic when exhausted.
        Sequence(Mutex<VecDeque<Result<String, GenerationError>>>),
        /// Return the same result for every call.
        Repeat(Result<String, GenerationError>),
    }

    pub(crate) struct ScriptedGateway {
        script: Script,
        calls: AtomicUsize,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGateway {
        pub(crate) fn sequence(
            responses: impl IntoIterator<Item = Result<String, GenerationError>>,
        ) -> Self {
            Self {
                script: Script::Sequence(Mutex::new(responses.into_iter().collect())),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn repeating(response: Result<String, GenerationError>) -> Self {
            Self {
                script: Script::Repeat(response),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn always_ok(text: impl Into<String>) -> Self {
            Self::repeating(Ok(text.into()))
        }

        pub(crate) fn always_unavailable() -> Self {
            Self::repeating(Err(GenerationError::Unavailable("stub outage".into())))
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            match &self.script {
                Script::Sequence(queue) => queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("scripted gateway ran out of responses"),
                Script::Repeat(response) => response.clone(),
            }
        }
    }
}
