//! PRD document value object.
//!
//! The pipeline holds a PRD as opaque markdown text with conventionally
//! expected structure, never as a parsed schema — the backend's phrasing
//! varies too much for full parsing to be reliable. Structural sanity is
//! limited to the light checks in [`PrdDocument::has_section_markers`].

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A structured requirements document produced by synthesis or revision.
///
/// Immutable: revision produces a new value, it never mutates in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrdDocument {
    markdown: String,
}

impl PrdDocument {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.markdown
    }

    pub fn into_markdown(self) -> String {
        self.markdown
    }

    pub fn is_blank(&self) -> bool {
        self.markdown.trim().is_empty()
    }

    /// Light structural check: the document must carry at least one
    /// markdown heading. Synthesis and revision output that fails this is
    /// treated as malformed rather than passed downstream.
    pub fn has_section_markers(&self) -> bool {
        self.markdown
            .lines()
            .any(|line| line.trim_start().starts_with('#'))
    }

    /// Whitespace-delimited word count, recorded in the version log.
    pub fn word_count(&self) -> usize {
        self.markdown.split_whitespace().count()
    }

    /// Short stable content fingerprint for version deduplication.
    pub fn content_hash(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.markdown.hash(&mut hasher);
        format!("{:08x}", hasher.finish() as u32)
    }
}

impl fmt::Display for PrdDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markdown)
    }
}

impl From<String> for PrdDocument {
    fn from(markdown: String) -> Self {
        Self::new(markdown)
    }
}
