//! In-memory document version log.
//!
//! Records each accepted revision of a PRD within a single request so the
//! caller can see how the document evolved. Nothing here is persisted;
//! the log's lifetime is the request's lifetime.

use crate::document::PrdDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What produced a recorded version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionKind {
    Synthesis,
    DeepReview,
    Manual,
}

/// Metadata for one recorded document version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub number: usize,
    pub kind: VersionKind,
    pub recorded_at: DateTime<Utc>,
    pub note: String,
    pub content_hash: String,
    pub word_count: usize,
    pub document: PrdDocument,
}

/// Append-only version log with identical-content deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLog {
    records: Vec<VersionRecord>,
}

impl VersionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a version. Returns `false` without recording when the
    /// content is identical to the latest recorded version.
    pub fn record(&mut self, kind: VersionKind, document: &PrdDocument, note: impl Into<String>) -> bool {
        if let Some(latest) = self.records.last() {
            if latest.document == *document {
                return false;
            }
        }

        self.records.push(VersionRecord {
            number: self.records.len() + 1,
            kind,
            recorded_at: Utc::now(),
            note: note.into(),
            content_hash: document.content_hash(),
            word_count: document.word_count(),
            document: document.clone(),
        });
        true
    }

    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&VersionRecord> {
        self.records.last()
    }

    /// Diff a recorded version against its predecessor.
    ///
    /// `number` is the 1-based version number. Returns `None` when the
    /// version does not exist or has no predecessor.
    pub fn diff_from_previous(&self, number: usize) -> Option<String> {
        let current = self.records.get(number.checked_sub(1)?)?;
        let previous = self.records.get(number.checked_sub(2)?)?;
        Some(diff_documents(&previous.document, &current.document))
    }
}

/// Line-level diff between two document versions, in unified style:
/// context lines prefixed with a space, removals with `-`, additions
/// with `+`. Empty when the contents are identical.
pub fn diff_documents(old: &PrdDocument, new: &PrdDocument) -> String {
    let old_lines: Vec<&str> = old.as_str().lines().collect();
    let new_lines: Vec<&str> = new.as_str().lines().collect();
    if old_lines == new_lines {
        return String::new();
    }

    // Longest-common-subsequence table over lines; lcs[i][j] is the LCS
    // length of old_lines[i..] and new_lines[j..].
    let n = old_lines.len();
    let m = new_lines.len();
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old_lines[i] == new_lines[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = String::from("--- previous\n+++ current\n");
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old_lines[i] == new_lines[j] {
            out.push(' ');
            out.push_str(old_lines[i]);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push('-');
            out.push_str(old_lines[i]);
            i += 1;
        } else {
            out.push('+');
            out.push_str(new_lines[j]);
            j += 1;
        }
        out.push('\n');
    }
    for line in &old_lines[i..] {
        out.push('-');
        out.push_str(line);
        out.push('\n');
    }
    for line in &new_lines[j..] {
        out.push('+');
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_assigns_sequential_numbers() {
        let mut log = VersionLog::new();
        assert!(log.record(VersionKind::Synthesis, &PrdDocument::new("# v1"), "initial"));
        assert!(log.record(VersionKind::DeepReview, &PrdDocument::new("# v2"), "revised"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].number, 1);
        assert_eq!(log.records()[1].number, 2);
        assert_eq!(log.latest().unwrap().kind, VersionKind::DeepReview);
    }

    #[test]
    fn test_identical_content_not_re_recorded() {
        let mut log = VersionLog::new();
        let doc = PrdDocument::new("# same");
        assert!(log.record(VersionKind::Synthesis, &doc, ""));
        assert!(!log.record(VersionKind::Manual, &doc, "no-op edit"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_diff_marks_changed_lines() {
        let old = PrdDocument::new("# Overview\nA budgeting app.\n\n## Features\n- track expenses");
        let new = PrdDocument::new(
            "# Overview\nA budgeting app.\n\n## Features\n- track expenses\n- monthly stats",
        );
        let diff = diff_documents(&old, &new);

        assert!(diff.starts_with("--- previous\n+++ current\n"));
        assert!(diff.contains(" # Overview"));
        assert!(diff.contains("+- monthly stats"));
        assert!(!diff.contains("-- track expenses"));
    }

    #[test]
    fn test_diff_of_identical_documents_is_empty() {
        let doc = PrdDocument::new("# same\nbody");
        assert!(diff_documents(&doc, &doc).is_empty());
    }

    #[test]
    fn test_diff_from_previous_version() {
        let mut log = VersionLog::new();
        log.record(VersionKind::Synthesis, &PrdDocument::new("# v1\nfirst"), "");
        log.record(VersionKind::DeepReview, &PrdDocument::new("# v1\nsecond"), "");

        let diff = log.diff_from_previous(2).unwrap();
        assert!(diff.contains("-first"));
        assert!(diff.contains("+second"));

        // The first version has no predecessor; out-of-range is None too.
        assert!(log.diff_from_previous(1).is_none());
        assert!(log.diff_from_previous(3).is_none());
    }

    #[test]
    fn test_record_captures_metadata() {
        let mut log = VersionLog::new();
        let doc = PrdDocument::new("# Title\nbody text here");
        log.record(VersionKind::Manual, &doc, "note");

        let record = log.latest().unwrap();
        assert_eq!(record.word_count, doc.word_count());
        assert_eq!(record.content_hash, doc.content_hash());
        assert_eq!(record.note, "note");
    }
}
