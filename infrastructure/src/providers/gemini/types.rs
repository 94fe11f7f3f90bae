//! Wire types for the Gemini `generateContent` API
//!
//! Request and response DTOs plus the conversions from domain types.
//! The API speaks camelCase JSON and calls the assistant role "model".

use prd_application::ports::llm_gateway::GenerationRequest;
use prd_domain::conversation::{Role, Turn};
use serde::{Deserialize, Serialize};

// ─── Domain → Gemini ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Map a domain role to the Gemini wire role.
pub fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn convert_turn(turn: &Turn) -> Content {
    Content {
        role: Some(wire_role(turn.role).to_string()),
        parts: vec![Part {
            text: turn.content.clone(),
        }],
    }
}

impl GenerateContentRequest {
    pub fn from_generation_request(request: &GenerationRequest) -> Self {
        let system_instruction = if request.system_instruction.trim().is_empty() {
            None
        } else {
            Some(Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            })
        };

        Self {
            system_instruction,
            contents: request.history.iter().map(convert_turn).collect(),
            generation_config: GenerationConfig {
                temperature: request.params.temperature,
                max_output_tokens: request.params.max_output_tokens,
            },
        }
    }
}

// ─── Gemini → Domain ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Extract the generated text from the first candidate, joining
    /// multiple parts. Returns `None` when there is no non-empty text.
    pub fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text = content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
