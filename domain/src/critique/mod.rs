//! Critique entities and response parsing
//!
//! A critique is advisory: partial information beats none, so parsing is
//! designed to never fail outright (see [`parsing::parse_critique`]).

pub mod entities;
pub mod parsing;

pub use entities::{CritiqueResult, Issue, Severity};
pub use parsing::{is_well_formed_critique, parse_critique, parse_score};
