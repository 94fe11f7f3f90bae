//! Generation backend adapters.

pub mod gemini;
