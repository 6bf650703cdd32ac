// src/services/gemini_client.rs
// DOCUMENTATION: Gemini generateContent API client
// PURPOSE: Send a prompt with the Google Search tool enabled and return the reply text

use crate::config::Config;
use crate::errors::PlacesError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// A text model that answers a prompt with free text
/// DOCUMENTATION: Seam between the search pipeline and the remote model
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Single attempt; every failure is reported as `AiServiceError`
    async fn generate(&self, prompt: &str) -> Result<String, PlacesError>;
}

/// Gemini API client
/// DOCUMENTATION: Handles authentication and generateContent calls
pub struct GeminiClient {
    /// HTTP client for making requests
    client: Client,
    /// Gemini API key
    api_key: String,
    /// Base URL, e.g. https://generativelanguage.googleapis.com/v1beta
    base_url: String,
    /// Model name, e.g. gemini-2.5-flash
    model: String,
    /// Sampling temperature
    temperature: f32,
}

/// Request body for generateContent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    pub generation_config: GenerationConfig,
}

/// One conversational turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A piece of a turn; only text parts matter here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Tool declaration; the search tool takes no options
#[derive(Debug, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
}

/// Response from generateContent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateContentRequest {
    /// Single user turn with Google Search grounding
    pub fn search_prompt(prompt: &str, temperature: f32) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig { temperature },
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    /// DOCUMENTATION: No candidate at all (e.g. blocked prompt) is a service error;
    /// a candidate without text yields an empty string
    pub fn reply_text(&self) -> Result<String, PlacesError> {
        let candidate = self.candidates.first().ok_or_else(|| {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            PlacesError::AiServiceError(format!("Empty model response: {}", reason))
        })?;

        if let Some(reason) = &candidate.finish_reason {
            if reason != "STOP" {
                log::warn!("Gemini candidate finished with reason {}", reason);
            }
        }

        Ok(candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

impl GeminiClient {
    /// Create client from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_api_base.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            temperature: config.gemini_temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, PlacesError> {
        let body = GenerateContentRequest::search_prompt(prompt, self.temperature);

        log::debug!(
            "Gemini generateContent: model={}, prompt_chars={}",
            self.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini API request failed: {}", e);
                PlacesError::AiServiceError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|env| format!("{} {}", env.error.status, env.error.message))
                .unwrap_or(body);
            log::error!("Gemini API error {}: {}", status, detail);
            return Err(PlacesError::AiServiceError(format!(
                "API error {}: {}",
                status, detail
            )));
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Gemini response envelope: {}", e);
            PlacesError::AiServiceError(format!("Parse error: {}", e))
        })?;

        let text = api_response.reply_text()?;
        log::info!("Gemini replied with {} characters", text.chars().count());
        Ok(text)
    }
}
