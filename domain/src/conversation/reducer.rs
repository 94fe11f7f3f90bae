//! Conversation reduction: validation plus drop-oldest truncation.
//!
//! This is the single entry gate for caller-supplied turns. Every pipeline
//! stage that consumes a conversation receives the output of [`reduce`],
//! so validation failures are caught before any backend call is made.

use crate::conversation::budget::HistoryBudget;
use crate::conversation::entities::{Conversation, RawTurn, Turn};
use crate::core::error::ValidationError;

/// Validate raw turns and reduce them to a bounded [`Conversation`].
///
/// Rules:
/// - at least one turn must be present
/// - every turn's content must be non-blank
/// - every role must parse as `user` or `assistant`
/// - when the turn count exceeds the budget, the oldest turns are dropped
///
/// Turn order and role/content pairs are preserved exactly; under the cap
/// the reduction is the identity. A zero cap is treated as a cap of one,
/// so the output is never empty.
pub fn reduce(raw_turns: &[RawTurn], budget: HistoryBudget) -> Result<Conversation, ValidationError> {
    if raw_turns.is_empty() {
        return Err(ValidationError::EmptyConversation);
    }

    let mut turns = Vec::with_capacity(raw_turns.len());
    for (index, raw) in raw_turns.iter().enumerate() {
        if raw.content.trim().is_empty() {
            return Err(ValidationError::EmptyTurn { index });
        }
        turns.push(Turn {
            role: raw.role.parse()?,
            content: raw.content.clone(),
        });
    }

    // A zero cap would drain every turn and break the non-empty
    // guarantee; the newest turn is always retained.
    let cap = budget.max_turns().max(1);
    if turns.len() > cap {
        // Drop oldest first; the tail is the recent exchange.
        turns.drain(..turns.len() - cap);
    }

    Ok(Conversation::from_validated(turns))
}
