//! Conversation entities and reduction
//!
//! A conversation is the ordered exchange of user/assistant turns that
//! drives the interview and synthesis stages. Raw turns arrive untrusted
//! from the client and must pass through [`reducer::reduce`] before any
//! stage sees them.

pub mod budget;
pub mod entities;
pub mod reducer;

pub use budget::HistoryBudget;
pub use entities::{Conversation, RawTurn, Role, Turn};
pub use reducer::reduce;
