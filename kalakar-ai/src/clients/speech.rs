//! Google Cloud Speech-to-Text and Text-to-Speech clients
//!
//! # API Reference
//! - Recognition: `POST {speech_endpoint}/speech:recognize?key=...`
//!   (WEBM_OPUS, 48 kHz, automatic punctuation, model `latest_long`)
//! - Synthesis: `POST {tts_endpoint}/text:synthesize?key=...`
//!   (MP3, neutral voice, speaking rate 0.9)

use super::{post_json, ClientError, SpeechToText, TextToSpeech};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const STT_SERVICE: &str = "Speech-to-Text";
const TTS_SERVICE: &str = "Text-to-Speech";

const SAMPLE_RATE_HERTZ: u32 = 48_000;
const SPEAKING_RATE: f32 = 0.9;

/// Speech-to-Text client
pub struct GoogleSpeechClient {
    http: Client,
    url: String,
    api_key: String,
}

impl GoogleSpeechClient {
    pub fn new(http: Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            http,
            url: format!("{}/speech:recognize", endpoint),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl SpeechToText for GoogleSpeechClient {
    async fn transcribe(&self, audio: &[u8], locale: &str) -> Result<String, ClientError> {
        debug!(locale, audio_bytes = audio.len(), "Transcribing audio");

        let body = build_recognize_request(audio, locale);
        let response: RecognizeResponse =
            post_json(&self.http, STT_SERVICE, &self.url, &self.api_key, &body).await?;

        Ok(response.transcript())
    }
}

/// Build a `speech:recognize` request body
pub fn build_recognize_request(audio: &[u8], locale: &str) -> Value {
    json!({
        "config": {
            "encoding": "WEBM_OPUS",
            "sampleRateHertz": SAMPLE_RATE_HERTZ,
            "languageCode": locale,
            "enableAutomaticPunctuation": true,
            "enableWordTimeOffsets": true,
            "model": "latest_long"
        },
        "audio": { "content": STANDARD.encode(audio) }
    })
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

impl RecognizeResponse {
    /// Join the top alternative of every result with spaces
    fn transcript(self) -> String {
        self.results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Text-to-Speech client
pub struct GoogleTtsClient {
    http: Client,
    url: String,
    api_key: String,
}

impl GoogleTtsClient {
    pub fn new(http: Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            http,
            url: format!("{}/text:synthesize", endpoint),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl TextToSpeech for GoogleTtsClient {
    async fn synthesize(&self, text: &str, locale: &str, voice: &str) -> Result<Vec<u8>, ClientError> {
        debug!(locale, voice, text_chars = text.len(), "Synthesizing speech");

        let body = build_synthesize_request(text, locale, voice);
        let response: SynthesizeResponse =
            post_json(&self.http, TTS_SERVICE, &self.url, &self.api_key, &body).await?;

        let encoded = response
            .audio_content
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ClientError::Empty("Text-to-Speech returned no audio".to_string()))?;

        STANDARD
            .decode(encoded)
            .map_err(|e| ClientError::Parse(format!("Text-to-Speech audio: {}", e)))
    }
}

/// Build a `text:synthesize` request body
pub fn build_synthesize_request(text: &str, locale: &str, voice: &str) -> Value {
    json!({
        "input": { "text": text },
        "voice": {
            "languageCode": locale,
            "name": voice,
            "ssmlGender": "NEUTRAL"
        },
        "audioConfig": {
            "audioEncoding": "MP3",
            "speakingRate": SPEAKING_RATE,
            "pitch": 0.0
        }
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}
