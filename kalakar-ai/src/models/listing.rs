//! Listing generation data model
//!
//! All types are request-scoped values: built once per request, returned in
//! the response, never persisted here.

use crate::error::Degradation;
use serde::{Deserialize, Serialize};

/// Image handed to the vision service
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Uploaded bytes with their MIME type
    Inline { mime_type: String, data: Vec<u8> },
    /// Publicly reachable image URI
    Uri(String),
}

/// Label with confidence score (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub description: String,
    pub score: f32,
}

/// Localized object with confidence score (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    pub score: f32,
}

/// Dominant color as `#rrggbb` with its pixel-fraction score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    pub color: String,
    pub score: f32,
}

impl DominantColor {
    /// Build from RGB components (0-255, clamped)
    pub fn from_rgb(red: f32, green: f32, blue: f32, score: f32) -> Self {
        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self {
            color: format!("#{:02x}{:02x}{:02x}", channel(red), channel(green), channel(blue)),
            score,
        }
    }
}

/// Normalized analysis of every image in a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysisResult {
    /// Deduplicated by description, highest score first
    pub labels: Vec<ScoredLabel>,
    /// Deduplicated by name, highest score first
    pub objects: Vec<DetectedObject>,
    /// Deduplicated, first-seen order
    pub detected_text: Vec<String>,
    /// Top 5 across all images
    pub dominant_colors: Vec<DominantColor>,
    pub inferred_craft_type: String,
    pub inferred_region: String,
}

/// Caller-supplied hints embedded in the synthesis prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingHints {
    pub category: Option<String>,
    pub materials: Option<Vec<String>>,
    pub techniques: Option<Vec<String>>,
}

/// Structured listing content before scoring and keyword enrichment
///
/// Invariant (checked by the synthesizer): every string is non-empty except
/// `cultural_significance`, and `materials`/`techniques` each hold at least
/// one entry. Set-valued fields hold no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub cultural_significance: String,
    pub materials: Vec<String>,
    pub techniques: Vec<String>,
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_price: Option<f64>,
}

/// Deterministic scores derived from analysis + draft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingScores {
    pub quality_score: f64,
    pub authenticity_score: f64,
}

/// Optional voice description attached to a listing request
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceInput {
    /// Recorded audio to transcribe
    Audio(Vec<u8>),
    /// Text that already is the transcript
    Transcript(String),
}

/// Input to one listing generation
#[derive(Debug, Clone)]
pub struct ListingRequest {
    pub images: Vec<ImageSource>,
    pub voice: Option<VoiceInput>,
    pub language: String,
    pub hints: ListingHints,
}

/// Output of one listing generation
#[derive(Debug, Clone)]
pub struct GeneratedListing {
    pub analysis: ImageAnalysisResult,
    pub draft: ListingDraft,
    pub scores: ListingScores,
    pub cultural_story: String,
    pub keywords: Vec<String>,
    /// Supplementary steps that fell back during this generation
    pub degraded: Vec<Degradation>,
}

/// POST /ai/generate-listing response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub title: String,
    pub description: String,
    pub cultural_significance: String,
    pub materials: Vec<String>,
    pub techniques: Vec<String>,
    pub category: String,
    pub subcategory: String,
    pub tags: Vec<String>,
    pub seo_keywords: Vec<String>,
    pub cultural_story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_price: Option<f64>,
    pub quality_score: f64,
    pub authenticity_score: f64,
}

impl From<GeneratedListing> for ListingResponse {
    fn from(listing: GeneratedListing) -> Self {
        let GeneratedListing {
            draft,
            scores,
            cultural_story,
            keywords,
            ..
        } = listing;

        Self {
            title: draft.title,
            description: draft.description,
            cultural_significance: draft.cultural_significance,
            materials: draft.materials,
            techniques: draft.techniques,
            category: draft.category,
            subcategory: draft.subcategory,
            tags: draft.tags,
            seo_keywords: keywords,
            cultural_story,
            suggested_price: draft.suggested_price,
            quality_score: scores.quality_score,
            authenticity_score: scores.authenticity_score,
        }
    }
}
