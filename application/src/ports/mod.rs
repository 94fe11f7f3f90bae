//! Ports (interfaces) for external dependencies

pub mod llm_gateway;

pub use llm_gateway::{GenerationError, GenerationParams, GenerationRequest, LlmGateway};
