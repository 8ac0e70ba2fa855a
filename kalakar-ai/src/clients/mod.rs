//! External AI service clients
//!
//! Each hosted capability sits behind an async trait so the pipeline can be
//! driven by fakes in tests. The production implementations are thin
//! `reqwest` wrappers over the Google REST APIs, one per file:
//!
//! - `vision`: image annotation (labels, objects, text, colors)
//! - `gemini`: generative text, rate-limited with `governor`
//! - `speech`: speech-to-text and text-to-speech
//! - `translate`: text translation
//!
//! Every client carries an explicit per-call timeout. Dropping a call's
//! future (e.g. when axum drops a disconnected request) cancels it.

pub mod gemini;
pub mod speech;
pub mod translate;
pub mod vision;

use crate::config::AiSettings;
use crate::models::{DetectedObject, DominantColor, ImageSource, ScoredLabel};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub use gemini::GeminiClient;
pub use speech::{GoogleSpeechClient, GoogleTtsClient};
pub use translate::GoogleTranslateClient;
pub use vision::GoogleVisionClient;

/// External client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Call exceeded its deadline
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Service answered with a non-success status
    #[error("{service} API returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response was well-formed but carried no result
    #[error("Empty response: {0}")]
    Empty(String),

    /// Client could not be constructed
    #[error("Client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The request URL is dropped; it carries the API key
    fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            ClientError::Timeout(format!("{} request: {}", service, err))
        } else if err.is_decode() {
            ClientError::Parse(format!("{} response: {}", service, err))
        } else {
            ClientError::Network(format!("{} request: {}", service, err))
        }
    }
}

/// Requested shape of generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form prose
    Text,
    /// JSON output (`responseMimeType: application/json`)
    Json,
}

/// Annotation of a single image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionAnnotation {
    pub labels: Vec<ScoredLabel>,
    pub objects: Vec<DetectedObject>,
    pub text: Vec<String>,
    pub colors: Vec<DominantColor>,
}

/// Image labeling capability
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Request labels, objects, text and dominant colors for one image
    async fn annotate(&self, image: &ImageSource) -> Result<VisionAnnotation, ClientError>;
}

/// Generative text capability
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt; returns the raw text
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, ClientError>;
}

/// Speech recognition capability
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio; returns an empty string when no speech is recognized
    async fn transcribe(&self, audio: &[u8], locale: &str) -> Result<String, ClientError>;
}

/// Speech synthesis capability
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize MP3 audio
    async fn synthesize(&self, text: &str, locale: &str, voice: &str) -> Result<Vec<u8>, ClientError>;
}

/// Translation capability
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ClientError>;
}

/// Dependency-injected bundle of every external client
///
/// Built once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct AiClients {
    pub vision: Arc<dyn VisionClient>,
    pub generator: Arc<dyn TextGenerator>,
    pub speech: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub translator: Arc<dyn Translator>,
}

impl AiClients {
    /// Build the production clients
    pub fn from_settings(settings: &AiSettings) -> Result<Self, ClientError> {
        let http = build_http_client(settings.request_timeout)?;

        Ok(Self {
            vision: Arc::new(GoogleVisionClient::new(
                http.clone(),
                &settings.vision_endpoint,
                &settings.google_api_key,
            )),
            generator: Arc::new(GeminiClient::new(
                http.clone(),
                &settings.gemini_endpoint,
                &settings.gemini_model,
                &settings.gemini_api_key,
                settings.generation_rate,
            )),
            speech: Arc::new(GoogleSpeechClient::new(
                http.clone(),
                &settings.speech_endpoint,
                &settings.google_api_key,
            )),
            tts: Arc::new(GoogleTtsClient::new(
                http.clone(),
                &settings.tts_endpoint,
                &settings.google_api_key,
            )),
            translator: Arc::new(GoogleTranslateClient::new(
                http,
                &settings.translate_endpoint,
                &settings.google_api_key,
            )),
        })
    }
}

/// Shared HTTP client with the per-call timeout applied
pub fn build_http_client(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
        .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// POST a JSON body and decode a JSON response
///
/// Non-success statuses become `ClientError::Api` carrying the error body.
pub(crate) async fn post_json<B, T>(
    http: &Client,
    service: &'static str,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<T, ClientError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    debug!(service, url, "Sending API request");

    let response = http
        .post(url)
        .query(&[("key", api_key)])
        .json(body)
        .send()
        .await
        .map_err(|e| ClientError::from_reqwest(service, e))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            service,
            status: status.as_u16(),
            message,
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| ClientError::from_reqwest(service, e))?;

    debug!(service, bytes = text.len(), "API response received");

    serde_json::from_str(&text)
        .map_err(|e| ClientError::Parse(format!("{} response: {}", service, e)))
}
