//! AI listing endpoints
//!
//! - `POST /ai/generate-listing` - multipart images (+ voice, hints) to scored listing
//! - `POST /ai/generate-story` - cultural story for a craft
//! - `POST /ai/analyze-images` - multipart images to image analysis
//! - `POST /ai/generate-keywords` - SEO keywords from listing fields
//! - `POST /ai/translate` - text translation
//!
//! Uploads: 1-5 files in the `images` field, each at most 10 MB and sniffed
//! as an image.

use axum::{
    extract::{multipart::Field, rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{json_body, language_or_default, required_field};
use crate::error::{ApiError, ApiResult};
use crate::models::{ImageAnalysisResult, ImageSource, ListingHints, ListingRequest, ListingResponse, VoiceInput};
use crate::services::image_analyzer::{DEFAULT_CRAFT_TYPE, DEFAULT_REGION};
use crate::services::keyword_generator::keywords_from_parts;
use crate::services::translation::Translation;
use crate::utils::data_url::{decode_audio, is_audio_data_url};
use crate::AppState;

/// Maximum images per request
pub const MAX_IMAGES: usize = 5;

/// Maximum size of one image
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Request body cap: every image at full size plus form overhead
const MAX_UPLOAD_BYTES: usize = MAX_IMAGES * MAX_IMAGE_BYTES + 1024 * 1024;

/// Parsed multipart form
#[derive(Debug, Default)]
struct ListingForm {
    images: Vec<ImageSource>,
    voice_description: Option<String>,
    language: Option<String>,
    hints: ListingHints,
}

async fn read_listing_form(mut multipart: Multipart) -> ApiResult<ListingForm> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                if form.images.len() == MAX_IMAGES {
                    return Err(ApiError::BadRequest(format!(
                        "At most {} images may be uploaded",
                        MAX_IMAGES
                    )));
                }
                form.images.push(read_image(field).await?);
            }
            "voiceDescription" => form.voice_description = non_blank(read_text(field).await?),
            "language" => form.language = non_blank(read_text(field).await?),
            "category" => form.hints.category = non_blank(read_text(field).await?),
            "materials" => form.hints.materials = parse_list(&read_text(field).await?, "materials")?,
            "techniques" => form.hints.techniques = parse_list(&read_text(field).await?, "techniques")?,
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

async fn read_image(field: Field<'_>) -> ApiResult<ImageSource> {
    let file_name = field.file_name().unwrap_or("image").to_string();
    let declared = field.content_type().map(str::to_string);

    if let Some(declared) = &declared {
        if !declared.starts_with("image/") {
            return Err(ApiError::BadRequest(format!(
                "Only image files are allowed ({} is {})",
                file_name, declared
            )));
        }
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", file_name, e)))?;

    if data.is_empty() {
        return Err(ApiError::BadRequest(format!("{} is empty", file_name)));
    }
    if data.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "{} exceeds the 10 MB image limit",
            file_name
        )));
    }

    let mime_type = match infer::get(&data) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind.mime_type().to_string(),
        _ => {
            return Err(ApiError::BadRequest(format!(
                "Only image files are allowed ({} is not an image)",
                file_name
            )))
        }
    };

    debug!(file = %file_name, mime = %mime_type, bytes = data.len(), "Image received");

    Ok(ImageSource::Inline {
        mime_type,
        data: data.to_vec(),
    })
}

async fn read_text(field: Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid form field: {}", e)))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a JSON-array form field; blank means absent
fn parse_list(raw: &str, field: &str) -> ApiResult<Option<Vec<String>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Vec<String>>(raw)
        .map(Some)
        .map_err(|_| ApiError::BadRequest(format!("'{}' must be a JSON array of strings", field)))
}

fn voice_input(description: String) -> ApiResult<VoiceInput> {
    if is_audio_data_url(&description) {
        let audio = decode_audio(&description)
            .map_err(|e| ApiError::BadRequest(format!("voiceDescription audio is not valid base64: {}", e)))?;
        Ok(VoiceInput::Audio(audio))
    } else {
        Ok(VoiceInput::Transcript(description))
    }
}

fn require_images(images: &[ImageSource]) -> ApiResult<()> {
    if images.is_empty() {
        return Err(ApiError::BadRequest("At least one image is required".to_string()));
    }
    Ok(())
}

/// POST /ai/generate-listing
pub async fn generate_listing(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ListingResponse>> {
    let form = read_listing_form(multipart).await?;
    require_images(&form.images)?;

    let request = ListingRequest {
        images: form.images,
        voice: form.voice_description.map(voice_input).transpose()?,
        language: language_or_default(form.language),
        hints: form.hints,
    };

    match state.listings.generate_listing(request).await {
        Ok(listing) => {
            info!(title = %listing.draft.title, "AI listing generated");
            Ok(Json(ListingResponse::from(listing)))
        }
        Err(e) => {
            Err(state.fail("Failed to generate AI listing", e).await)
        }
    }
}

/// POST /ai/analyze-images
pub async fn analyze_images(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ImageAnalysisResult>> {
    let form = read_listing_form(multipart).await?;
    require_images(&form.images)?;

    match state.listings.analyzer().analyze(&form.images).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            Err(state.fail("Failed to analyze images", e).await)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    #[serde(default)]
    pub craft_type: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    pub story: String,
}

/// POST /ai/generate-story
///
/// Always answers 200: a failed generation returns the fallback story.
pub async fn generate_story(
    State(state): State<AppState>,
    payload: Result<Json<StoryRequest>, JsonRejection>,
) -> ApiResult<Json<StoryResponse>> {
    let request = json_body(payload)?;
    let craft_type = required_field(request.craft_type, "craftType")?;
    let region = request
        .region
        .and_then(non_blank)
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let language = language_or_default(request.language);

    let story = state
        .listings
        .stories()
        .generate_story(&craft_type, &region, &language)
        .await;

    Ok(Json(StoryResponse { story: story.text }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    #[serde(default)]
    pub craft_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

/// POST /ai/generate-keywords
pub async fn generate_keywords(
    payload: Result<Json<KeywordsRequest>, JsonRejection>,
) -> ApiResult<Json<KeywordsResponse>> {
    let request = json_body(payload)?;
    let craft_type = request
        .craft_type
        .and_then(non_blank)
        .unwrap_or_else(|| DEFAULT_CRAFT_TYPE.to_string());
    let category = request.category.unwrap_or_default();

    debug!(
        title = request.title.as_deref().unwrap_or_default(),
        techniques = request.techniques.len(),
        description_chars = request.description.as_deref().map(str::len).unwrap_or(0),
        "Generating keywords"
    );

    Ok(Json(KeywordsResponse {
        keywords: keywords_from_parts(&craft_type, &category, &request.materials, &[]),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub source_language: Option<String>,
}

/// POST /ai/translate
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<Json<Translation>> {
    let request = json_body(payload)?;
    let text = required_field(request.text, "text")?;
    let target = required_field(request.target_language, "targetLanguage")?;

    match state
        .translation
        .translate(&text, &target, request.source_language.as_deref())
        .await
    {
        Ok(translation) => Ok(Json(translation)),
        Err(e) => {
            Err(state.fail("Failed to translate text", e).await)
        }
    }
}

/// Build AI routes
pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ai/generate-listing",
            post(generate_listing).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/ai/analyze-images",
            post(analyze_images).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/ai/generate-story", post(generate_story))
        .route("/ai/generate-keywords", post(generate_keywords))
        .route("/ai/translate", post(translate))
}
