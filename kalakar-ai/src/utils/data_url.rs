//! Base64 audio payloads with optional `data:` URL headers

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Strip a `data:<mime>;base64,` header if present
pub fn strip_data_url_header(payload: &str) -> &str {
    let trimmed = payload.trim();
    if trimmed.starts_with("data:") {
        if let Some(idx) = trimmed.find(";base64,") {
            return &trimmed[idx + ";base64,".len()..];
        }
    }
    trimmed
}

/// Whether the payload is a base64 audio data URL
pub fn is_audio_data_url(payload: &str) -> bool {
    let trimmed = payload.trim_start();
    trimmed.starts_with("data:audio/") && trimmed.contains(";base64,")
}

/// Decode base64 audio, accepting an optional data-URL header
pub fn decode_audio(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(strip_data_url_header(payload))
}

/// Encode MP3 bytes as a data URL
pub fn encode_mp3_data_url(audio: &[u8]) -> String {
    format!("data:audio/mp3;base64,{}", STANDARD.encode(audio))
}
