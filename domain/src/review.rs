//! Deep review trail.
//!
//! Each deep-review iteration pairs the document that was reviewed with
//! the critique it received. The trail is request-scoped: built fresh per
//! invocation, returned to the caller, then discarded.

use crate::critique::entities::CritiqueResult;
use crate::document::PrdDocument;
use serde::{Deserialize, Serialize};

/// One (document, critique) pair from a deep-review iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRound {
    pub document: PrdDocument,
    pub critique: CritiqueResult,
}

impl ReviewRound {
    pub fn new(document: PrdDocument, critique: CritiqueResult) -> Self {
        Self { document, critique }
    }
}

/// Ordered history of review rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTrail {
    rounds: Vec<ReviewRound>,
}

impl ReviewTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, round: ReviewRound) {
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[ReviewRound] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn latest(&self) -> Option<&ReviewRound> {
        self.rounds.last()
    }
}
