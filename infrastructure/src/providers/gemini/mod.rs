//! Gemini `generateContent` adapter
//!
//! Implements the `LlmGateway` port against the Gemini REST API. Wire
//! types live in [`types`]; nothing outside this module sees them.

mod adapter;
mod types;

pub use adapter::GeminiGateway;
