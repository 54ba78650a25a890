use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::{build_prompt, parse_subtasks, SuggestionRequest};
use crate::config::AiConfig;
use crate::error::AppError;

/// Thin client for a `generateContent`-style text generation API.
///
/// One request per call: no retries, no backoff. Failures surface as
/// `AppError::UpstreamError` (502) and a missing API key as
/// `AppError::ServiceUnavailable` (503).
#[derive(Clone)]
pub struct SuggestionClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for SuggestionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl SuggestionClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::InternalServerError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Asks the model for subtasks of the described task.
    pub async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, AppError> {
        let text = self.generate(&build_prompt(request)).await?;
        let subtasks = parse_subtasks(&text);
        if subtasks.is_empty() {
            return Err(AppError::UpstreamError(
                "AI service returned no suggestions".into(),
            ));
        }
        Ok(subtasks)
    }

    /// Sends `prompt` and returns the concatenated text of the first candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable("AI suggestions are not configured".into())
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        log::debug!("requesting suggestions from model {}", self.model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            log::warn!("AI service responded with {}: {}", status, detail);
            return Err(AppError::UpstreamError(format!(
                "AI service responded with status {}",
                status.as_u16()
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::UpstreamError(format!("AI service returned invalid JSON: {}", e))
        })?;
        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, AppError> {
    let missing = |what: &str| AppError::UpstreamError(format!("AI response missing {}", what));

    let candidate = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| missing("candidates"))?;
    let parts = candidate
        .content
        .ok_or_else(|| missing("content"))?
        .parts
        .filter(|p| !p.is_empty())
        .ok_or_else(|| missing("parts"))?;

    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        return Err(missing("text"));
    }
    Ok(text)
}
