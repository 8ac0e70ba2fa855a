//! Voice assistant endpoints
//!
//! - `POST /voice/process` - audio turn: transcript, reply, optional speech, actions
//! - `POST /voice/command` - typed command to actions
//! - `GET /voice/languages` - supported languages (public)
//! - `POST /voice/synthesize` - text to MP3 data URL

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use kalakar_common::{Language, SUPPORTED_LANGUAGES};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{json_body, language_or_default, required_field};
use crate::error::{ApiError, ApiResult};
use crate::models::{DialogueContext, Directive, VoiceAction, VoiceRequest};
use crate::utils::data_url::{decode_audio, encode_mp3_data_url};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<VoiceAction>,
    pub confidence: f32,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub actions: Vec<VoiceAction>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: &'static [Language],
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub audio: String,
}

/// POST /voice/process
pub async fn process_voice(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> ApiResult<Json<ProcessResponse>> {
    let request = json_body(payload)?;
    let audio = required_field(request.audio, "audio")?;
    let audio = decode_audio(&audio)
        .map_err(|e| ApiError::BadRequest(format!("Audio is not valid base64: {}", e)))?;

    let voice_request = VoiceRequest {
        audio,
        language: language_or_default(request.language),
        context: DialogueContext::from_tag(request.context.as_deref()),
    };

    let turn = match state.voice.process(voice_request).await {
        Ok(turn) => turn,
        Err(e) => {
            return Err(state.fail("Failed to process voice request", e).await);
        }
    };

    let directives = state.dispatcher.collect_directives(&turn.actions);

    info!(
        confidence = turn.confidence,
        actions = turn.actions.len(),
        spoken = turn.response_audio.is_some(),
        "Voice request processed"
    );

    Ok(Json(ProcessResponse {
        text: turn.response_text,
        audio: turn.response_audio.as_deref().map(encode_mp3_data_url),
        actions: turn.actions,
        confidence: turn.confidence,
        directives,
    }))
}

/// POST /voice/command
pub async fn process_command(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> ApiResult<Json<CommandResponse>> {
    let request = json_body(payload)?;
    let command = required_field(request.command, "command")?;
    let language = language_or_default(request.language);

    let outcome = state.voice.process_command(&command, &language).await;
    let directives = state.dispatcher.collect_directives(&outcome.actions);

    Ok(Json(CommandResponse {
        actions: outcome.actions,
        directives,
    }))
}

/// GET /voice/languages
pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: SUPPORTED_LANGUAGES,
    })
}

/// POST /voice/synthesize
pub async fn synthesize(
    State(state): State<AppState>,
    payload: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> ApiResult<Json<SynthesizeResponse>> {
    let request = json_body(payload)?;
    let text = required_field(request.text, "text")?;
    let language = language_or_default(request.language);

    match state.voice.synthesize(&text, &language).await {
        Ok(audio) => Ok(Json(SynthesizeResponse {
            audio: encode_mp3_data_url(&audio),
        })),
        Err(e) => {
            Err(state.fail("Failed to synthesize text", e).await)
        }
    }
}

/// Build voice routes
pub fn voice_routes() -> Router<AppState> {
    Router::new()
        .route("/voice/process", post(process_voice))
        .route("/voice/command", post(process_command))
        .route("/voice/languages", get(list_languages))
        .route("/voice/synthesize", post(synthesize))
}
