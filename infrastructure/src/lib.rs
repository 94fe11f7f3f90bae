//! Infrastructure layer for prd-studio
//!
//! Adapters for everything outside the pipeline: the Gemini generation
//! backend and process configuration. Wire formats stay inside this
//! crate; the application layer only ever sees the `LlmGateway` port.

pub mod config;
pub mod providers;

pub use config::{ConfigLoader, Settings};
pub use providers::gemini::GeminiGateway;
