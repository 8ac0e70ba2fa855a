//! Google Cloud Translation (v2) client

use super::{post_json, ClientError, Translator};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const SERVICE: &str = "Translate";

pub struct GoogleTranslateClient {
    http: Client,
    url: String,
    api_key: String,
}

impl GoogleTranslateClient {
    pub fn new(http: Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            http,
            url: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ClientError> {
        debug!(source, target, text_chars = text.len(), "Translating text");

        let body = build_request(text, source, target);
        let response: TranslateResponse =
            post_json(&self.http, SERVICE, &self.url, &self.api_key, &body).await?;

        response
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| ClientError::Empty("Translate returned no translations".to_string()))
    }
}

pub fn build_request(text: &str, source: &str, target: &str) -> Value {
    json!({
        "q": text,
        "source": source,
        "target": target,
        "format": "text"
    })
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslationList,
}

#[derive(Debug, Deserialize)]
struct TranslationList {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = build_request("Handmade vase", "en", "hi");
        assert_eq!(body["q"], "Handmade vase");
        assert_eq!(body["target"], "hi");
        assert_eq!(body["format"], "text");
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({"data": {"translations": [{"translatedText": "हस्तनिर्मित फूलदान"}]}});
        let response: TranslateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.data.translations[0].translated_text, "हस्तनिर्मित फूलदान");
    }
}
