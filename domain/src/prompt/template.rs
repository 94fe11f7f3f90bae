//! Prompt templates for the PRD pipeline stages.
//!
//! The section names in these templates are contracts: the synthesis
//! sections feed the structural check on generated documents, and the
//! critique sections feed the critique parser. Changing a heading here
//! without updating those consumers will silently degrade parsing.

use crate::conversation::entities::Conversation;
use crate::critique::entities::CritiqueResult;
use crate::document::PrdDocument;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the interview stage, with optional context
    /// sections appended for the current PRD and the hidden memory
    /// summary. The summary comes first: it is memory, the PRD is state.
    pub fn interview_system(
        prd_context: Option<&PrdDocument>,
        memory_summary: Option<&str>,
    ) -> String {
        let mut system = r#"You are an experienced product manager interviewing a client about a software product they want built.
Ask focused clarifying questions, one or two at a time, about goals, users, features, data, and constraints.
Keep answers short and concrete. Never invent requirements the client did not state."#
            .to_string();

        if let Some(summary) = memory_summary.filter(|s| !s.trim().is_empty()) {
            system.push_str(&format!(
                "\n\n---\n\nHidden memory summary (for your reference only; never mention this section to the user):\n{summary}"
            ));
        }

        if let Some(prd) = prd_context.filter(|p| !p.is_blank()) {
            system.push_str(&format!(
                r#"

---

Current PRD (treat as the latest requirements baseline):
{prd}

Usage:
- Prefer the current PRD when answering questions.
- When the user asks for a change, name the affected PRD section and propose a concrete edit.
- When the user contradicts the PRD, point out the conflict, then ask one or two clarifying questions."#
            ));
        }

        system
    }

    /// System prompt for PRD synthesis.
    ///
    /// The fixed section order doubles as the output contract checked by
    /// `PrdDocument::has_section_markers`.
    pub fn synthesis_system() -> &'static str {
        r#"You are a senior product manager writing a Product Requirements Document (PRD).
Condense the conversation into a complete, self-consistent PRD.
Respond ONLY with the PRD in markdown, using exactly this section order:

# Overview
## Goals & Non-goals
## Target Users
## Features
## Data & Storage
## Technical Notes
## Open Questions

Capture every decision the conversation reached. List genuinely unresolved points under Open Questions instead of guessing."#
    }

    /// User prompt for PRD synthesis
    pub fn synthesis_prompt(conversation: &Conversation) -> String {
        format!(
            "Update the development plan based on the latest conversation:\n\n{}",
            conversation.transcript()
        )
    }

    /// System prompt for the CTO critique stage
    pub fn critique_system() -> &'static str {
        r#"You are a pragmatic CTO reviewing a PRD before engineering commits to it.
Judge feasibility, completeness, and internal consistency. Be specific; vague advice is useless.
Respond in markdown using exactly these sections:

## Verdict
One short paragraph with your overall assessment.

## Score
NN/100

## Issues
One bullet per problem, formatted as: - [severity] description
where severity is one of: low, medium, high, critical.
Write (none) if the document is acceptable as-is.

## Next Steps
The order in which the issues should be fixed."#
    }

    /// User prompt for critique
    pub fn critique_prompt(prd: &PrdDocument) -> String {
        format!("Review the following PRD:\n\n{prd}")
    }

    /// System prompt for the revision stage
    pub fn revision_system() -> &'static str {
        r#"You are a technical editor revising a PRD to address a CTO review.
Apply every recommendation that is consistent with the document's stated goals; keep everything else intact.
Respond ONLY with the complete revised PRD in markdown, preserving the original section order.
Do not include commentary, preamble, or the review itself."#
    }

    /// User prompt for revision
    pub fn revision_prompt(prd: &PrdDocument, critique: &CritiqueResult) -> String {
        format!(
            "Revise the PRD according to the CTO review.\n\nOriginal PRD:\n{prd}\n\nCTO review:\n{}\n\nAddress each point and output the complete revised PRD.",
            render_critique(critique)
        )
    }

    /// System prompt for memory-summary compression
    pub fn summary_system() -> &'static str {
        r#"You are a conversation memory compressor producing a hidden summary that keeps a dialogue's context alive.
Output only the summary body — no heading, no explanation.
Keep: user goals, preferences, constraints, decisions made, open questions, key term definitions, PRD direction, pending items.
Drop: greetings, repetition, trivia.
Stay under 300 words; shorter is better when nothing is lost."#
    }

    /// User prompt for memory-summary compression
    pub fn summary_prompt(recent: &Conversation, existing_summary: Option<&str>) -> String {
        format!(
            "Existing summary:\n{}\n\nRecent conversation:\n{}",
            existing_summary.filter(|s| !s.trim().is_empty()).unwrap_or("(empty)"),
            recent.transcript()
        )
    }
}

/// Render a critique back into markdown for the revision prompt.
fn render_critique(critique: &CritiqueResult) -> String {
    let mut out = String::new();
    if !critique.summary.trim().is_empty() {
        out.push_str(&critique.summary);
        out.push('\n');
    }
    if let Some(score) = critique.score {
        out.push_str(&format!("Score: {score}/100\n"));
    }
    for issue in &critique.issues {
        out.push_str(&format!("- [{}] {}\n", issue.severity, issue.description));
    }
    out
}
