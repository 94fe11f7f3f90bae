//! Application layer for prd-studio
//!
//! Use cases orchestrate the pipeline stages; ports define the boundaries
//! the infrastructure layer implements. The only port is [`LlmGateway`],
//! the narrow capability every stage routes its model calls through.

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::StageError;
pub use ports::llm_gateway::{GenerationError, GenerationParams, GenerationRequest, LlmGateway};
pub use use_cases::chat::{ChatInput, ChatUseCase};
pub use use_cases::critique_prd::CritiquePrdUseCase;
pub use use_cases::deep_review::{DeepReviewFailure, DeepReviewOutcome, DeepReviewUseCase, ReviewPhase};
pub use use_cases::synthesize_prd::SynthesizePrdUseCase;
