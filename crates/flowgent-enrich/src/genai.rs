//! HTTP client for the generative-language text API.
//!
//! Sends a single-turn prompt to `models/{model}:generateContent` and returns
//! the first candidate's text. Only text generation is supported.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::EnrichmentError;
use crate::retry::retry_with_backoff;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Client for the generative-language API.
///
/// Use [`GenAiClient::new`] for production or [`GenAiClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct GenAiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for GenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenAiClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, EnrichmentError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`EnrichmentError::InvalidBaseUrl`] if `base_url` does
    /// not form a valid endpoint URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, EnrichmentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("flowgent/0.1 (lead-enrichment)")
            .build()?;

        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model.trim()
        );
        let endpoint = Url::parse(&raw).map_err(|e| EnrichmentError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::MissingApiKey`] when `GENAI_API_KEY` is not
    /// configured, or any error from [`GenAiClient::with_base_url`].
    pub fn from_app_config(config: &flowgent_core::AppConfig) -> Result<Self, EnrichmentError> {
        let api_key = config
            .genai_api_key
            .as_deref()
            .ok_or(EnrichmentError::MissingApiKey)?;
        Ok(Self::with_base_url(
            api_key,
            &config.genai_model,
            config.genai_request_timeout_secs,
            &config.genai_base_url,
        )?
        .with_retry(config.genai_max_retries, config.genai_retry_backoff_base_ms))
    }

    /// Enables retries on transient failures.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Sends `prompt` and returns the model's text answer.
    ///
    /// # Errors
    ///
    /// - [`EnrichmentError::Http`] on network failure.
    /// - [`EnrichmentError::RateLimited`] on HTTP 429 after retries.
    /// - [`EnrichmentError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`EnrichmentError::EmptyResponse`] when the response has no text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, EnrichmentError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.generate_once(prompt)
        })
        .await
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, EnrichmentError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0);
            return Err(EnrichmentError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(EnrichmentError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.path().to_owned(),
            });
        }

        let body: GenerateResponse = response.json().await?;
        first_text(body).ok_or(EnrichmentError::EmptyResponse)
    }
}

fn first_text(body: GenerateResponse) -> Option<String> {
    body.candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .find(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model_and_method() {
        let client = GenAiClient::with_base_url("k", "gemini-test", 5, "http://localhost:9/")
            .expect("client should build");
        assert_eq!(
            client.endpoint.as_str(),
            "http://localhost:9/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = GenAiClient::with_base_url("k", "m", 5, "not a url").unwrap_err();
        assert!(matches!(err, EnrichmentError::InvalidBaseUrl { .. }), "got {err:?}");
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = GenAiClient::with_base_url("super-secret", "m", 5, "http://localhost").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[test]
    fn first_text_skips_empty_parts() {
        let body: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "  " } ] } },
                { "content": { "parts": [ { "text": "72" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(first_text(body).as_deref(), Some("72"));
    }

    #[test]
    fn first_text_is_none_without_candidates() {
        let body: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(first_text(body).is_none());
    }
}
