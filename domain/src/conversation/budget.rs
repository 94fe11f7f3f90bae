//! History budget for controlling conversation length.
//!
//! [`HistoryBudget`] caps how many turns of a conversation are forwarded
//! to the generation backend, preventing unbounded context growth that can
//! push the effective attention window past the backend's limits.
//!
//! # Policy
//!
//! When a conversation exceeds the cap, the **oldest turns are dropped
//! first** — the latest exchange carries the decisions that synthesis
//! needs, the opening pleasantries do not. The most recent turn is always
//! retained.

use serde::{Deserialize, Serialize};

/// Default number of turns retained when no budget is configured.
pub const DEFAULT_MAX_TURNS: usize = 48;

/// Number of recent turns fed to the memory-summary compressor.
pub const SUMMARY_WINDOW_TURNS: usize = 12;

/// Budget controlling how many conversation turns are retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryBudget {
    max_turns: usize,
}

impl HistoryBudget {
    /// Create a budget with an explicit cap.
    pub fn new(max_turns: usize) -> Self {
        Self { max_turns }
    }

    /// Tight preset for the memory-summary window.
    pub fn summary_window() -> Self {
        Self {
            max_turns: SUMMARY_WINDOW_TURNS,
        }
    }

    /// Unlimited preset: no truncation.
    pub fn unlimited() -> Self {
        Self {
            max_turns: usize::MAX,
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Validate this budget, returning a list of issues.
    ///
    /// A zero cap would drop every turn, which violates the non-empty
    /// conversation invariant.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_turns == 0 {
            issues.push("history_budget: max_turns must be >= 1".to_string());
        }
        issues
    }
}

impl Default for HistoryBudget {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}
