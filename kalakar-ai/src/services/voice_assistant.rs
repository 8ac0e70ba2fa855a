//! Voice Assistant
//!
//! Drives one voice interaction through its dialogue states:
//!
//! ```text
//! Received ──transcribe──▶ Transcribed ──interpret──▶ Interpreted ──speak──▶ Responded
//!     │
//!     └── no speech / STT unreachable ──▶ Failed
//! ```
//!
//! Interpretation never fails the turn: a failed generator call yields the
//! canned response with confidence 0.3, an unparsable reply the canned
//! response with confidence 0.5. A speech synthesis failure drops the audio
//! and returns the text alone.

use crate::clients::{AiClients, ResponseFormat, SpeechToText, TextGenerator, TextToSpeech};
use crate::error::{Degradation, VoiceError};
use crate::models::{DialogueContext, VoiceAction, VoiceRequest, VoiceTurn};
use crate::utils::json_block::{parse_block, BlockKind};
use kalakar_common::languages;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Confidence reported when the interpretation call itself failed
pub const CALL_FAILURE_CONFIDENCE: f32 = 0.3;

/// Confidence reported when the interpretation reply was unparsable
pub const PARSE_FAILURE_CONFIDENCE: f32 = 0.5;

/// Canned response for a language and context
///
/// English and Hindi carry their own texts; other languages use English.
pub fn fallback_response(context: DialogueContext, language: &str) -> &'static str {
    match (language, context) {
        ("hi", DialogueContext::ProductListing) => {
            "मैं आपकी उत्पाद सूची बनाने में मदद कर सकता हूं। कृपया अपनी कला का वर्णन करें।"
        }
        ("hi", DialogueContext::OrderManagement) => {
            "मैं आपके ऑर्डर के साथ मदद कर सकता हूं। आप क्या जानना चाहते हैं?"
        }
        ("hi", DialogueContext::CustomerSupport) => "आज मैं आपकी कैसे मदद कर सकता हूं?",
        ("hi", DialogueContext::General) => {
            "नमस्ते! मैं आपकी कारीगर बाज़ार में मदद करने के लिए यहां हूं।"
        }
        (_, DialogueContext::ProductListing) => {
            "I can help you create a product listing. Please describe your craft and I'll assist you."
        }
        (_, DialogueContext::OrderManagement) => {
            "I can help you with your orders. What would you like to know?"
        }
        (_, DialogueContext::CustomerSupport) => "How can I help you today?",
        (_, DialogueContext::General) => "Hello! I'm here to help you with the artisan marketplace.",
    }
}

/// Result of the interpretation step
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub text: String,
    pub actions: Vec<VoiceAction>,
    pub should_speak: bool,
    pub confidence: f32,
    /// True when `text` is the canned response
    pub degraded: bool,
}

impl Interpretation {
    fn fallback(context: DialogueContext, language: &str, confidence: f32) -> Self {
        Self {
            text: fallback_response(context, language).to_string(),
            actions: Vec::new(),
            should_speak: true,
            confidence,
            degraded: true,
        }
    }
}

/// Result of mapping a typed command to actions
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub actions: Vec<VoiceAction>,
    /// `CommandMapping` when mapping failed and `actions` is empty as a fallback
    pub degraded: Vec<Degradation>,
}

/// Dialogue states of one voice turn
#[derive(Debug)]
enum DialogueState {
    Received {
        audio: Vec<u8>,
    },
    Transcribed {
        transcript: String,
    },
    Interpreted {
        transcript: String,
        interpretation: Interpretation,
    },
    Responded(VoiceTurn),
    Failed(VoiceError),
}

impl DialogueState {
    fn name(&self) -> &'static str {
        match self {
            DialogueState::Received { .. } => "received",
            DialogueState::Transcribed { .. } => "transcribed",
            DialogueState::Interpreted { .. } => "interpreted",
            DialogueState::Responded(_) => "responded",
            DialogueState::Failed(_) => "failed",
        }
    }
}

pub struct VoiceAssistant {
    speech: Arc<dyn SpeechToText>,
    generator: Arc<dyn TextGenerator>,
    tts: Arc<dyn TextToSpeech>,
}

impl VoiceAssistant {
    pub fn new(clients: &AiClients) -> Self {
        Self {
            speech: Arc::clone(&clients.speech),
            generator: Arc::clone(&clients.generator),
            tts: Arc::clone(&clients.tts),
        }
    }

    /// Process one voice interaction
    pub async fn process(&self, request: VoiceRequest) -> Result<VoiceTurn, VoiceError> {
        let span = info_span!(
            "voice_turn",
            request_id = %Uuid::new_v4(),
            language = %request.language,
            context = request.context.as_str()
        );

        self.run_dialogue(request).instrument(span).await
    }

    async fn run_dialogue(&self, request: VoiceRequest) -> Result<VoiceTurn, VoiceError> {
        let VoiceRequest {
            audio,
            language,
            context,
        } = request;

        let mut state = DialogueState::Received { audio };

        loop {
            state = match state {
                DialogueState::Responded(turn) => return Ok(turn),
                DialogueState::Failed(err) => {
                    warn!(error = %err, "Voice turn failed");
                    return Err(err);
                }
                DialogueState::Received { audio } => match self.transcribe(&audio, &language).await {
                    Ok(transcript) => DialogueState::Transcribed { transcript },
                    Err(err) => DialogueState::Failed(err),
                },
                DialogueState::Transcribed { transcript } => {
                    let interpretation = self.interpret(&transcript, context, &language).await;
                    DialogueState::Interpreted {
                        transcript,
                        interpretation,
                    }
                }
                DialogueState::Interpreted {
                    transcript,
                    interpretation,
                } => DialogueState::Responded(self.respond(transcript, interpretation, &language).await),
            };

            debug!(state = state.name(), "Dialogue state advanced");
        }
    }

    /// Speech-to-text in the requested language
    async fn transcribe(&self, audio: &[u8], language: &str) -> Result<String, VoiceError> {
        let transcript = self
            .speech
            .transcribe(audio, languages::speech_locale(language))
            .await
            .map_err(|e| VoiceError::Transcription(e.to_string()))?;

        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(VoiceError::Transcription("no speech detected in audio".to_string()));
        }

        info!(transcript_chars = transcript.len(), "Speech transcribed");
        Ok(transcript.to_string())
    }

    /// Classify the transcript into response text and actions
    pub async fn interpret(&self, transcript: &str, context: DialogueContext, language: &str) -> Interpretation {
        let prompt = build_intent_prompt(transcript, context, language);

        let raw = match self.generator.generate(&prompt, ResponseFormat::Json).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Intent interpretation failed, using canned response");
                return Interpretation::fallback(context, language, CALL_FAILURE_CONFIDENCE);
            }
        };

        match parse_interpretation(&raw) {
            Some(interpretation) => {
                info!(
                    actions = interpretation.actions.len(),
                    confidence = interpretation.confidence,
                    should_speak = interpretation.should_speak,
                    "Intent interpreted"
                );
                interpretation
            }
            None => {
                warn!(response_chars = raw.len(), "Unparsable intent response, using canned response");
                Interpretation::fallback(context, language, PARSE_FAILURE_CONFIDENCE)
            }
        }
    }

    /// Attach spoken audio when requested
    async fn respond(&self, transcript: String, interpretation: Interpretation, language: &str) -> VoiceTurn {
        let mut degraded = Vec::new();
        if interpretation.degraded {
            degraded.push(Degradation::Interpretation);
        }

        let response_audio = if interpretation.should_speak {
            match self.synthesize(&interpretation.text, language).await {
                Ok(audio) => Some(audio),
                Err(e) => {
                    warn!(error = %e, "Speech synthesis failed, returning text only");
                    degraded.push(Degradation::SpeechSynthesis);
                    None
                }
            }
        } else {
            None
        };

        VoiceTurn {
            transcript,
            response_text: interpretation.text,
            response_audio,
            actions: interpretation.actions,
            confidence: interpretation.confidence,
            degraded,
        }
    }

    /// Synthesize speech in the voice mapped to `language`
    pub async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, VoiceError> {
        self.tts
            .synthesize(text, languages::speech_locale(language), languages::voice_name(language))
            .await
            .map_err(|e| VoiceError::Speech(e.to_string()))
    }

    /// Map a typed command to actions; empty on any failure
    pub async fn process_command(&self, command: &str, language: &str) -> CommandOutcome {
        let prompt = build_command_prompt(command, language);

        let raw = match self.generator.generate(&prompt, ResponseFormat::Json).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Command mapping failed, returning no actions");
                return CommandOutcome {
                    actions: Vec::new(),
                    degraded: vec![Degradation::CommandMapping],
                };
            }
        };

        match parse_block::<Value>(&raw, BlockKind::Array) {
            Ok(value) => {
                let actions = VoiceAction::list_from_generated(&value);
                info!(actions = actions.len(), "Voice command mapped");
                CommandOutcome {
                    actions,
                    degraded: Vec::new(),
                }
            }
            Err(e) => {
                warn!(error = %e, "Unparsable command response, returning no actions");
                CommandOutcome {
                    actions: Vec::new(),
                    degraded: vec![Degradation::CommandMapping],
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInterpretation {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    actions: Option<Value>,
    #[serde(default = "default_should_speak")]
    should_speak: bool,
    #[serde(default)]
    confidence: Option<f64>,
}

fn default_should_speak() -> bool {
    true
}

/// Parse the generator's interpretation; None when unusable
pub fn parse_interpretation(raw: &str) -> Option<Interpretation> {
    let parsed: RawInterpretation = parse_block(raw, BlockKind::Object).ok()?;
    let text = parsed.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;

    Some(Interpretation {
        text,
        actions: parsed
            .actions
            .as_ref()
            .map(VoiceAction::list_from_generated)
            .unwrap_or_default(),
        should_speak: parsed.should_speak,
        confidence: clamp_confidence(parsed.confidence.unwrap_or(PARSE_FAILURE_CONFIDENCE as f64)),
        degraded: false,
    })
}

fn clamp_confidence(value: f64) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0) as f32
    }
}

pub fn build_intent_prompt(transcript: &str, context: DialogueContext, language: &str) -> String {
    format!(
        r#"You are an AI assistant for an Indian artisan marketplace. Process the following user input and respond appropriately.

Context: {context}
User Input: "{transcript}"
Language: {language}

Based on the context, determine:
1. The appropriate response text
2. Any actions the user wants to perform
3. Whether the response should be spoken aloud
4. Confidence level (0-1)

Context-specific responses:
- product_listing: Help with creating product listings, suggest descriptions, pricing
- order_management: Help with order status, updates, tracking
- customer_support: General help, FAQ, troubleshooting
- general: General conversation, greetings, basic help

Available actions and their parameters:
- navigate: {{"path": "/page/path"}}
- create_listing: {{"category": "optional category"}}
- update_order: {{"orderId": "order id", "status": "new status"}}
- search: {{"query": "search terms"}}
- help: {{"topic": "optional topic"}}

Respond only with JSON:
{{
  "text": "response text in the user's language",
  "actions": [{{"type": "navigate|create_listing|update_order|search|help", "parameters": {{}}}}],
  "shouldSpeak": true,
  "confidence": 0.0
}}

Be helpful, culturally appropriate, and speak in the user's preferred language."#,
        context = context.as_str(),
    )
}

pub fn build_command_prompt(command: &str, language: &str) -> String {
    format!(
        r#"Analyze this voice command and determine what actions the user wants to perform.

Command: "{command}"
Language: {language}

Available actions:
- navigate: Navigate to a specific page/section. Parameters: {{"path": "/page/path"}}
- create_listing: Create a new product listing. Parameters: {{"category": "optional category"}}
- update_order: Update order status or details. Parameters: {{"orderId": "order id", "status": "new status"}}
- search: Search for products or information. Parameters: {{"query": "search terms"}}
- help: Get help or support. Parameters: {{"topic": "optional topic"}}

Respond only with a JSON array of actions:
[
  {{
    "type": "action_type",
    "parameters": {{"key": "value"}}
  }}
]"#
    )
}
