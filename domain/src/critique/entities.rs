//! Critique domain entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a single critique issue.
///
/// Ordering is by impact: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "minor" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" | "major" => Ok(Severity::High),
            "critical" | "blocker" => Ok(Severity::Critical),
            _ => Err(()),
        }
    }
}

/// One problem the reviewer found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub description: String,
}

impl Issue {
    pub fn new(severity: Severity, description: impl Into<String>) -> Self {
        Self {
            severity,
            description: description.into(),
        }
    }
}

/// Structured technical review of a PRD document.
///
/// `issues` may be empty (document judged acceptable). `score` is the
/// reviewer's `NN/100` overall rating when one could be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueResult {
    pub issues: Vec<Issue>,
    pub summary: String,
    pub score: Option<u8>,
}

impl CritiqueResult {
    pub fn new(issues: Vec<Issue>, summary: impl Into<String>, score: Option<u8>) -> Self {
        Self {
            issues,
            summary: summary.into(),
            score,
        }
    }

    /// Degraded form used when the reviewer's output could not be parsed:
    /// one synthetic medium issue carrying the raw text.
    pub fn fallback(raw_text: impl Into<String>) -> Self {
        let raw = raw_text.into();
        Self {
            summary: "Review response did not match the expected format; raw text preserved."
                .to_string(),
            issues: vec![Issue::new(Severity::Medium, raw)],
            score: None,
        }
    }

    /// A document is acceptable when the reviewer found nothing, or found
    /// only low-severity issues. Deep review stops here.
    pub fn is_acceptable(&self) -> bool {
        self.issues.iter().all(|i| i.severity <= Severity::Low)
    }

    /// Highest severity among the issues, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}
