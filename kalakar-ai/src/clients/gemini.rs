//! Gemini generative text client
//!
//! # API Reference
//! - Endpoint: `POST {gemini_endpoint}/models/{model}:generateContent?key=...`
//!
//! All generative calls share one process-wide `governor` quota so a burst
//! of listing or voice requests cannot exhaust the API key's limit.

use super::{post_json, ClientError, ResponseFormat, TextGenerator};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use tracing::debug;

const SERVICE: &str = "Gemini";

/// Gemini API client
pub struct GeminiClient {
    http: Client,
    url: String,
    model: String,
    api_key: String,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl GeminiClient {
    pub fn new(
        http: Client,
        endpoint: &str,
        model: &str,
        api_key: &str,
        requests_per_second: NonZeroU32,
    ) -> Self {
        Self {
            http,
            url: format!("{}/models/{}:generateContent", endpoint, model),
            model: model.to_string(),
            api_key: api_key.to_string(),
            rate_limiter: RateLimiter::direct(Quota::per_second(requests_per_second)),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, ClientError> {
        self.rate_limiter.until_ready().await;

        debug!(model = %self.model, prompt_chars = prompt.len(), ?format, "Generating content");

        let body = build_request(prompt, format);
        let response: GenerateResponse =
            post_json(&self.http, SERVICE, &self.url, &self.api_key, &body).await?;

        response.into_text()
    }
}

/// Build a `generateContent` request body
pub fn build_request(prompt: &str, format: ResponseFormat) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]
    });

    if format == ResponseFormat::Json {
        body["generationConfig"] = json!({ "responseMimeType": "application/json" });
    }

    body
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String, ClientError> {
        let feedback = self.prompt_feedback;
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ClientError::Empty(match feedback {
                Some(feedback) => format!("Gemini returned no text (feedback: {})", feedback),
                None => "Gemini returned no text".to_string(),
            }));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format_sets_mime_type() {
        let body = build_request("describe", ResponseFormat::Json);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "describe");

        let body = build_request("describe", ResponseFormat::Text);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_text_parts_concatenated() {
        let raw = json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}
            }]
        });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.into_text().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_blocked_prompt_is_empty_error() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert!(matches!(response.into_text(), Err(ClientError::Empty(_))));
    }

    #[test]
    fn test_url_includes_model() {
        let client = GeminiClient::new(
            Client::new(),
            "https://gen.test/v1beta",
            "gemini-1.5-flash",
            "key",
            NonZeroU32::new(10).unwrap(),
        );
        assert_eq!(client.url, "https://gen.test/v1beta/models/gemini-1.5-flash:generateContent");
    }
}
