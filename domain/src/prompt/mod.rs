//! Prompt construction for the pipeline stages.
//!
//! Each stage sends a fixed persona as the system instruction and a
//! stage-specific user message. Both halves are deterministic functions of
//! their inputs — no clock, no environment — so identical requests always
//! produce identical prompts.

pub mod template;

use crate::conversation::entities::Conversation;
use crate::critique::entities::CritiqueResult;
use crate::document::PrdDocument;
use serde::{Deserialize, Serialize};
use template::PromptTemplate;

/// Pipeline stage, each with its own prompt contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Interview,
    Synthesis,
    Critique,
    Revision,
    Summary,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Interview => "interview",
            Stage::Synthesis => "synthesis",
            Stage::Critique => "critique",
            Stage::Revision => "revision",
            Stage::Summary => "summary",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The instruction/content pair handed to the generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub system_instruction: String,
    pub user_content: String,
}

impl PromptSpec {
    /// Interview stage: reply to the user inside the requirements
    /// conversation. The conversation itself travels as history; the
    /// current PRD and the hidden memory summary, when present, are folded
    /// into the system instruction.
    pub fn interview(prd_context: Option<&PrdDocument>, memory_summary: Option<&str>) -> Self {
        Self {
            system_instruction: PromptTemplate::interview_system(prd_context, memory_summary),
            user_content: String::new(),
        }
    }

    /// Synthesis stage: condense the conversation into a PRD.
    pub fn synthesis(conversation: &Conversation) -> Self {
        Self {
            system_instruction: PromptTemplate::synthesis_system().to_string(),
            user_content: PromptTemplate::synthesis_prompt(conversation),
        }
    }

    /// Critique stage: CTO review of an existing PRD.
    pub fn critique(prd: &PrdDocument) -> Self {
        Self {
            system_instruction: PromptTemplate::critique_system().to_string(),
            user_content: PromptTemplate::critique_prompt(prd),
        }
    }

    /// Revision stage: apply a critique to produce a new PRD.
    pub fn revision(prd: &PrdDocument, critique: &CritiqueResult) -> Self {
        Self {
            system_instruction: PromptTemplate::revision_system().to_string(),
            user_content: PromptTemplate::revision_prompt(prd, critique),
        }
    }

    /// Memory compression: fold recent turns into a hidden summary.
    pub fn summary(recent: &Conversation, existing_summary: Option<&str>) -> Self {
        Self {
            system_instruction: PromptTemplate::summary_system().to_string(),
            user_content: PromptTemplate::summary_prompt(recent, existing_summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::entities::{Conversation, Turn};
    use crate::critique::entities::{Issue, Severity};

    fn conversation() -> Conversation {
        Conversation::from_validated(vec![
            Turn::user("I want a budgeting app"),
            Turn::assistant("Where is data stored?"),
            Turn::user("Local storage only"),
        ])
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let conv = conversation();
        assert_eq!(PromptSpec::synthesis(&conv), PromptSpec::synthesis(&conv));
    }

    #[test]
    fn test_synthesis_carries_transcript() {
        let spec = PromptSpec::synthesis(&conversation());
        assert!(spec.user_content.contains("user: I want a budgeting app"));
        assert!(spec.user_content.contains("user: Local storage only"));
        assert!(spec.system_instruction.contains("## Features"));
    }

    #[test]
    fn test_interview_injects_context_sections() {
        let prd = PrdDocument::new("# Overview\nA budgeting app");
        let spec = PromptSpec::interview(Some(&prd), Some("user prefers local-only storage"));
        assert!(spec.system_instruction.contains("A budgeting app"));
        assert!(spec
            .system_instruction
            .contains("user prefers local-only storage"));

        let bare = PromptSpec::interview(None, None);
        assert!(!bare.system_instruction.contains("Current PRD"));
        assert!(!bare.system_instruction.contains("Hidden memory summary"));
    }

    #[test]
    fn test_critique_prompt_embeds_document() {
        let prd = PrdDocument::new("# Overview\nTrack expenses locally");
        let spec = PromptSpec::critique(&prd);
        assert!(spec.user_content.contains("Track expenses locally"));
        assert!(spec.system_instruction.contains("## Issues"));
    }

    #[test]
    fn test_revision_prompt_embeds_both_inputs() {
        let prd = PrdDocument::new("# Overview\nold text");
        let critique = CritiqueResult::new(
            vec![Issue::new(Severity::High, "no storage plan")],
            "Needs storage detail",
            Some(60),
        );
        let spec = PromptSpec::revision(&prd, &critique);
        assert!(spec.user_content.contains("old text"));
        assert!(spec.user_content.contains("no storage plan"));
        assert!(spec.user_content.contains("60/100"));
    }
}
