//! Voice assistant data model

use crate::error::Degradation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Conversation context declared by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueContext {
    ProductListing,
    OrderManagement,
    CustomerSupport,
    #[default]
    General,
}

impl DialogueContext {
    /// Wire tag used in prompts and requests
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueContext::ProductListing => "product_listing",
            DialogueContext::OrderManagement => "order_management",
            DialogueContext::CustomerSupport => "customer_support",
            DialogueContext::General => "general",
        }
    }

    /// Parse a context tag; unknown or missing tags map to `General`
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("product_listing") => DialogueContext::ProductListing,
            Some("order_management") => DialogueContext::OrderManagement,
            Some("customer_support") => DialogueContext::CustomerSupport,
            _ => DialogueContext::General,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateParams {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateListingParams {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderParams {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpParams {
    #[serde(default)]
    pub topic: Option<String>,
}

/// Typed instruction emitted by the intent layer
///
/// Serializes as `{"type": "<kind>", "parameters": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "snake_case")]
pub enum VoiceAction {
    Navigate(NavigateParams),
    CreateListing(CreateListingParams),
    UpdateOrder(UpdateOrderParams),
    Search(SearchParams),
    Help(HelpParams),
}

impl VoiceAction {
    /// Wire tag of this action
    pub fn kind(&self) -> &'static str {
        match self {
            VoiceAction::Navigate(_) => "navigate",
            VoiceAction::CreateListing(_) => "create_listing",
            VoiceAction::UpdateOrder(_) => "update_order",
            VoiceAction::Search(_) => "search",
            VoiceAction::Help(_) => "help",
        }
    }

    /// Parse one generator-produced action
    ///
    /// Missing or null `parameters` is treated as `{}`. Unknown action types
    /// and malformed parameter records are logged and dropped.
    pub fn from_generated(value: &Value) -> Option<Self> {
        let Some(object) = value.as_object() else {
            warn!(value = %value, "Dropping non-object voice action");
            return None;
        };

        let mut normalized = object.clone();
        match normalized.get("parameters") {
            None | Some(Value::Null) => {
                normalized.insert("parameters".to_string(), Value::Object(Default::default()));
            }
            Some(_) => {}
        }

        match serde_json::from_value::<VoiceAction>(Value::Object(normalized)) {
            Ok(action) => Some(action),
            Err(e) => {
                warn!(
                    action_type = ?object.get("type"),
                    error = %e,
                    "Dropping unrecognized voice action"
                );
                None
            }
        }
    }

    /// Parse a generator-produced action list, keeping the recognized ones
    pub fn list_from_generated(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|items| items.iter().filter_map(Self::from_generated).collect())
            .unwrap_or_default()
    }
}

/// Client-facing effect produced by dispatching an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    Redirect { location: String },
    Speak { text: String },
}

/// Input to one voice interaction
#[derive(Debug, Clone)]
pub struct VoiceRequest {
    /// Decoded audio bytes (WEBM/Opus)
    pub audio: Vec<u8>,
    pub language: String,
    pub context: DialogueContext,
}

/// Outcome of one voice interaction
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTurn {
    pub transcript: String,
    pub response_text: String,
    /// Synthesized MP3 audio, present when the response should be spoken
    pub response_audio: Option<Vec<u8>>,
    pub actions: Vec<VoiceAction>,
    /// Clamped to 0.0-1.0
    pub confidence: f32,
    pub degraded: Vec<Degradation>,
}
