//! Domain layer for prd-studio
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Pipeline stages
//!
//! A free-form requirements conversation flows through four stages, each
//! with its own prompt contract:
//!
//! - **Interview**: clarifying dialogue with the user
//! - **Synthesis**: conversation is condensed into a PRD document
//! - **Critique**: a CTO-persona review of an existing PRD
//! - **Revision**: the critique is applied to produce a new PRD
//!
//! ## Deep review
//!
//! Critique and revision compose into a bounded improvement loop. The loop
//! history is recorded as a [`ReviewTrail`] of (document, critique) pairs.

pub mod conversation;
pub mod core;
pub mod critique;
pub mod document;
pub mod prompt;
pub mod review;
pub mod version;

// Re-export commonly used types
pub use conversation::{
    budget::HistoryBudget,
    entities::{Conversation, Role, Turn},
    reducer::reduce,
};
pub use core::error::ValidationError;
pub use critique::{
    entities::{CritiqueResult, Issue, Severity},
    parsing::{parse_critique, parse_score},
};
pub use document::PrdDocument;
pub use prompt::{template::PromptTemplate, PromptSpec, Stage};
pub use review::{ReviewRound, ReviewTrail};
pub use version::{diff_documents, VersionKind, VersionLog, VersionRecord};
