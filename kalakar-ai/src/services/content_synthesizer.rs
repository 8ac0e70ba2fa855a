//! Content Synthesizer
//!
//! Builds one structured prompt from the image analysis, optional voice
//! transcript and caller hints, asks the generator for JSON, and turns the
//! first balanced `{...}` block of the reply into a validated `ListingDraft`.
//! Any failure here is fatal for the listing.

use crate::clients::{ResponseFormat, TextGenerator};
use crate::error::ListingError;
use crate::models::{ImageAnalysisResult, ListingDraft, ListingHints};
use crate::utils::json_block::{parse_block, BlockKind};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum title length requested from the generator
pub const MAX_TITLE_CHARS: usize = 60;

pub struct ContentSynthesizer {
    generator: Arc<dyn TextGenerator>,
}

impl ContentSynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a listing draft
    pub async fn synthesize(
        &self,
        analysis: &ImageAnalysisResult,
        voice_text: Option<&str>,
        hints: &ListingHints,
        language: &str,
    ) -> Result<ListingDraft, ListingError> {
        let prompt = build_listing_prompt(analysis, voice_text, hints, language);

        let raw = self
            .generator
            .generate(&prompt, ResponseFormat::Json)
            .await
            .map_err(|e| ListingError::Synthesis(e.to_string()))?;

        debug!(response_chars = raw.len(), "Listing content generated");

        let draft = parse_listing_draft(&raw)?;
        info!(title = %draft.title, category = %draft.category, "Listing draft synthesized");
        Ok(draft)
    }
}

/// Build the listing generation prompt
pub fn build_listing_prompt(
    analysis: &ImageAnalysisResult,
    voice_text: Option<&str>,
    hints: &ListingHints,
    language: &str,
) -> String {
    let mut lines = vec![
        "Create a compelling product listing for an Indian artisan marketplace based on the following information.".to_string(),
        String::new(),
        "Image Analysis:".to_string(),
        format!("- Craft Type: {}", analysis.inferred_craft_type),
        format!("- Region: {}", analysis.inferred_region),
        format!(
            "- Detected Objects: {}",
            join_or_none(analysis.objects.iter().map(|o| o.name.as_str()))
        ),
        format!(
            "- Colors: {}",
            join_or_none(analysis.dominant_colors.iter().map(|c| c.color.as_str()))
        ),
        format!(
            "- Labels: {}",
            join_or_none(analysis.labels.iter().map(|l| l.description.as_str()))
        ),
    ];
    if !analysis.detected_text.is_empty() {
        lines.push(format!(
            "- Visible Text: {}",
            join_or_none(analysis.detected_text.iter().map(String::as_str))
        ));
    }
    lines.push(String::new());

    if let Some(voice) = voice_text.map(str::trim).filter(|v| !v.is_empty()) {
        lines.push(format!("Artisan's Voice Description: {}", voice));
        lines.push(String::new());
    }

    if hints.category.is_some() || hints.materials.is_some() || hints.techniques.is_some() {
        lines.push("Artisan-Provided Details:".to_string());
        if let Some(category) = &hints.category {
            lines.push(format!("- Category: {}", category));
        }
        if let Some(materials) = &hints.materials {
            lines.push(format!("- Materials: {}", join_or_none(materials.iter().map(String::as_str))));
        }
        if let Some(techniques) = &hints.techniques {
            lines.push(format!("- Techniques: {}", join_or_none(techniques.iter().map(String::as_str))));
        }
        lines.push(String::new());
    }

    lines.extend([
        "Requirements:".to_string(),
        format!("1. Create an engaging title (max {} characters)", MAX_TITLE_CHARS),
        "2. Write a detailed description highlighting cultural significance".to_string(),
        "3. Identify materials used".to_string(),
        "4. Identify traditional techniques".to_string(),
        "5. Suggest appropriate category and subcategory".to_string(),
        "6. Generate relevant tags".to_string(),
        "7. Suggest a fair price in INR".to_string(),
        "8. Emphasize authenticity and craftsmanship".to_string(),
        String::new(),
        format!("Language: {}", language),
        "Target Audience: International buyers interested in authentic Indian crafts".to_string(),
        String::new(),
        "Respond only with a JSON object of this structure:".to_string(),
        DRAFT_SCHEMA.to_string(),
    ]);

    lines.join("\n")
}

const DRAFT_SCHEMA: &str = r#"{
  "title": "string",
  "description": "string",
  "culturalSignificance": "string",
  "materials": ["string"],
  "techniques": ["string"],
  "category": "string",
  "subcategory": "string",
  "tags": ["string"],
  "suggestedPrice": number
}"#;

fn join_or_none<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

/// Generator output before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDraft {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    cultural_significance: Option<String>,
    #[serde(default)]
    materials: Vec<String>,
    #[serde(default)]
    techniques: Vec<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    suggested_price: Option<Value>,
}

/// Extract, parse and validate a listing draft from raw generator output
pub fn parse_listing_draft(raw: &str) -> Result<ListingDraft, ListingError> {
    let parsed: RawDraft = parse_block(raw, BlockKind::Object)
        .map_err(|e| ListingError::Synthesis(e.to_string()))?;

    let draft = ListingDraft {
        title: required(parsed.title, "title")?,
        description: required(parsed.description, "description")?,
        cultural_significance: parsed
            .cultural_significance
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        materials: non_empty_set(parsed.materials, "materials")?,
        techniques: non_empty_set(parsed.techniques, "techniques")?,
        category: required(parsed.category, "category")?,
        subcategory: required(parsed.subcategory, "subcategory")?,
        tags: unique_trimmed(parsed.tags),
        suggested_price: parsed.suggested_price.as_ref().and_then(price_value),
    };

    Ok(draft)
}

fn required(value: Option<String>, field: &str) -> Result<String, ListingError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ListingError::Synthesis(format!("missing or empty field '{}'", field)))
}

fn non_empty_set(values: Vec<String>, field: &str) -> Result<Vec<String>, ListingError> {
    let set = unique_trimmed(values);
    if set.is_empty() {
        return Err(ListingError::Synthesis(format!("field '{}' has no entries", field)));
    }
    Ok(set)
}

/// Trim, drop blanks, and drop case-insensitive duplicates keeping the first
fn unique_trimmed(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .collect()
}

/// Accept a positive number, or a string holding one
fn price_value(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('₹').trim().replace(',', "").parse().ok(),
        _ => None,
    }?;
    (price.is_finite() && price > 0.0).then_some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetectedObject, ScoredLabel};

    fn analysis() -> ImageAnalysisResult {
        ImageAnalysisResult {
            labels: vec![ScoredLabel {
                description: "Pottery".into(),
                score: 0.95,
            }],
            objects: vec![DetectedObject {
                name: "Vase".into(),
                score: 0.8,
            }],
            detected_text: vec![],
            dominant_colors: vec![],
            inferred_craft_type: "pottery".into(),
            inferred_region: "India".into(),
        }
    }

    const GOOD: &str = r#"Here is the listing you asked for:
```json
{
  "title": " Khurja Blue Pottery Vase ",
  "description": "A hand-thrown vase glazed in cobalt blue.",
  "culturalSignificance": "Khurja pottery dates back centuries.",
  "materials": ["Clay", "clay", "Cobalt Oxide"],
  "techniques": ["Wheel throwing", " "],
  "category": "Home Decor",
  "subcategory": "Vases",
  "tags": ["blue pottery", "vase", "Vase"],
  "suggestedPrice": 1450
}
```
Let me know if you need changes {or edits}."#;

    #[test]
    fn test_parse_valid_draft() {
        let draft = parse_listing_draft(GOOD).unwrap();
        assert_eq!(draft.title, "Khurja Blue Pottery Vase");
        assert_eq!(draft.materials, vec!["Clay".to_string(), "Cobalt Oxide".to_string()]);
        assert_eq!(draft.techniques, vec!["Wheel throwing".to_string()]);
        assert_eq!(draft.tags, vec!["blue pottery".to_string(), "vase".to_string()]);
        assert_eq!(draft.suggested_price, Some(1450.0));
    }

    #[test]
    fn test_missing_materials_is_synthesis_error() {
        let raw = r#"{"title": "Vase", "description": "d", "materials": [], "techniques": ["t"],
                      "category": "c", "subcategory": "s"}"#;
        assert!(matches!(parse_listing_draft(raw), Err(ListingError::Synthesis(_))));
    }

    #[test]
    fn test_missing_title_is_synthesis_error() {
        let raw = r#"{"description": "d", "materials": ["m"], "techniques": ["t"],
                      "category": "c", "subcategory": "s"}"#;
        let err = parse_listing_draft(raw).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_prose_only_is_synthesis_error() {
        assert!(matches!(
            parse_listing_draft("Sorry, I can't describe this product."),
            Err(ListingError::Synthesis(_))
        ));
    }

    #[test]
    fn test_price_variants() {
        assert_eq!(price_value(&serde_json::json!("₹1,200")), Some(1200.0));
        assert_eq!(price_value(&serde_json::json!(-5)), None);
        assert_eq!(price_value(&serde_json::json!("ask me")), None);
    }

    #[test]
    fn test_prompt_embeds_inputs() {
        let hints = ListingHints {
            category: Some("Home Decor".into()),
            materials: Some(vec!["terracotta".into()]),
            techniques: None,
        };
        let prompt = build_listing_prompt(&analysis(), Some("Made in my village"), &hints, "hi");
        assert!(prompt.contains("Craft Type: pottery"));
        assert!(prompt.contains("Detected Objects: Vase"));
        assert!(prompt.contains("Made in my village"));
        assert!(prompt.contains("- Materials: terracotta"));
        assert!(prompt.contains("Language: hi"));
        assert!(prompt.contains("max 60 characters"));
    }

    #[test]
    fn test_prompt_without_voice_or_hints() {
        let prompt = build_listing_prompt(&analysis(), None, &ListingHints::default(), "en");
        assert!(!prompt.contains("Voice Description"));
        assert!(!prompt.contains("Artisan-Provided Details"));
        assert!(prompt.contains("Colors: none"));
    }
}
