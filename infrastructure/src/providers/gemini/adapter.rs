//! Gemini gateway adapter
//!
//! Implements the `LlmGateway` port by calling the Gemini
//! `generateContent` endpoint over HTTPS.

use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::config::Settings;
use async_trait::async_trait;
use prd_application::ports::llm_gateway::{GenerationError, GenerationRequest, LlmGateway};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

pub struct GeminiGateway {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiGateway {
    pub fn new(settings: &Settings) -> Result<Self, GenerationError> {
        if !settings.is_api_key_configured() {
            return Err(GenerationError::Auth(
                "GEMINI_API_KEY is not configured".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unavailable(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::from_generation_request(&request);
        debug!(model = %self.model, turns = request.history.len(), "Calling generateContent");

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "generateContent returned an error");
            return Err(map_status_error(status, &detail));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Unavailable(format!("Malformed API response: {e}")))?;

        parsed.into_text().ok_or(GenerationError::EmptyOutput)
    }
}

fn map_transport_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Unavailable(format!("Request failed: {error}"))
    }
}

fn map_status_error(status: StatusCode, detail: &str) -> GenerationError {
    let summary = first_line(detail);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GenerationError::Auth(format!("API rejected credentials ({status}): {summary}"))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GenerationError::Timeout,
        _ => GenerationError::Unavailable(format!("API error ({status}): {summary}")),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
