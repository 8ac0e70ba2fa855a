//! Google Cloud Vision client
//!
//! # API Reference
//! - Endpoint: `POST {vision_endpoint}/images:annotate?key=...`
//! - Features: LABEL_DETECTION (10), OBJECT_LOCALIZATION (10),
//!   TEXT_DETECTION (5), IMAGE_PROPERTIES

use super::{post_json, ClientError, VisionAnnotation, VisionClient};
use crate::models::{DetectedObject, DominantColor, ImageSource, ScoredLabel};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const SERVICE: &str = "Vision";

const MAX_LABELS: u32 = 10;
const MAX_OBJECTS: u32 = 10;
const MAX_TEXT: u32 = 5;

/// Vision API client
pub struct GoogleVisionClient {
    http: Client,
    url: String,
    api_key: String,
}

impl GoogleVisionClient {
    pub fn new(http: Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            http,
            url: format!("{}/images:annotate", endpoint),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl VisionClient for GoogleVisionClient {
    async fn annotate(&self, image: &ImageSource) -> Result<VisionAnnotation, ClientError> {
        let body = build_request(image);
        let response: AnnotateResponse =
            post_json(&self.http, SERVICE, &self.url, &self.api_key, &body).await?;

        let annotation = response
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Empty("Vision returned no responses".to_string()))?;

        if let Some(error) = annotation.error {
            return Err(ClientError::Api {
                service: SERVICE,
                status: error.code.unwrap_or(500) as u16,
                message: error.message.unwrap_or_default(),
            });
        }

        let result = annotation.into_annotation();
        debug!(
            labels = result.labels.len(),
            objects = result.objects.len(),
            text = result.text.len(),
            colors = result.colors.len(),
            "Image annotated"
        );
        Ok(result)
    }
}

/// Build the `images:annotate` request body for one image
pub fn build_request(image: &ImageSource) -> Value {
    let image_json = match image {
        ImageSource::Inline { data, .. } => json!({ "content": STANDARD.encode(data) }),
        ImageSource::Uri(uri) => json!({ "source": { "imageUri": uri } }),
    };

    json!({
        "requests": [{
            "image": image_json,
            "features": [
                { "type": "LABEL_DETECTION", "maxResults": MAX_LABELS },
                { "type": "OBJECT_LOCALIZATION", "maxResults": MAX_OBJECTS },
                { "type": "TEXT_DETECTION", "maxResults": MAX_TEXT },
                { "type": "IMAGE_PROPERTIES" }
            ]
        }]
    })
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageAnnotation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageAnnotation {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    localized_object_annotations: Vec<ObjectAnnotation>,
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    image_properties_annotation: Option<ImageProperties>,
    #[serde(default)]
    error: Option<StatusBody>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct ObjectAnnotation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    #[serde(default)]
    dominant_colors: Option<ColorsAnnotation>,
}

#[derive(Debug, Deserialize)]
struct ColorsAnnotation {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
struct ColorInfo {
    #[serde(default)]
    color: Rgb,
    #[serde(default)]
    score: f32,
}

/// Channels are omitted by the API when zero
#[derive(Debug, Default, Deserialize)]
struct Rgb {
    #[serde(default)]
    red: f32,
    #[serde(default)]
    green: f32,
    #[serde(default)]
    blue: f32,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    code: Option<i32>,
    message: Option<String>,
}

impl ImageAnnotation {
    fn into_annotation(self) -> VisionAnnotation {
        VisionAnnotation {
            labels: self
                .label_annotations
                .into_iter()
                .filter(|l| !l.description.trim().is_empty())
                .map(|l| ScoredLabel {
                    description: l.description,
                    score: l.score,
                })
                .collect(),
            objects: self
                .localized_object_annotations
                .into_iter()
                .filter(|o| !o.name.trim().is_empty())
                .map(|o| DetectedObject {
                    name: o.name,
                    score: o.score,
                })
                .collect(),
            text: self
                .text_annotations
                .into_iter()
                .map(|t| t.description.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            colors: self
                .image_properties_annotation
                .and_then(|p| p.dominant_colors)
                .map(|d| {
                    d.colors
                        .into_iter()
                        .map(|c| DominantColor::from_rgb(c.color.red, c.color.green, c.color.blue, c.score))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_request_encodes_content() {
        let body = build_request(&ImageSource::Inline {
            mime_type: "image/png".into(),
            data: vec![0, 1, 2],
        });
        assert_eq!(body["requests"][0]["image"]["content"], "AAEC");
        assert_eq!(body["requests"][0]["features"][0]["maxResults"], 10);
        assert_eq!(body["requests"][0]["features"][2]["maxResults"], 5);
    }

    #[test]
    fn test_uri_request() {
        let body = build_request(&ImageSource::Uri("https://cdn.test/pot.jpg".into()));
        assert_eq!(
            body["requests"][0]["image"]["source"]["imageUri"],
            "https://cdn.test/pot.jpg"
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({
            "responses": [{
                "labelAnnotations": [
                    {"description": "Pottery", "score": 0.97},
                    {"description": "", "score": 0.5}
                ],
                "localizedObjectAnnotations": [{"name": "Vase", "score": 0.88}],
                "textAnnotations": [{"description": "Khurja\n"}],
                "imagePropertiesAnnotation": {
                    "dominantColors": {
                        "colors": [{"color": {"red": 200, "green": 100}, "score": 0.4}]
                    }
                }
            }]
        });
        let parsed: AnnotateResponse = serde_json::from_value(raw).unwrap();
        let annotation = parsed.responses.into_iter().next().unwrap().into_annotation();

        assert_eq!(annotation.labels.len(), 1);
        assert_eq!(annotation.labels[0].description, "Pottery");
        assert_eq!(annotation.objects[0].name, "Vase");
        assert_eq!(annotation.text, vec!["Khurja".to_string()]);
        assert_eq!(annotation.colors[0].color, "#c86400");
    }

    #[test]
    fn test_empty_annotation() {
        let parsed: AnnotateResponse = serde_json::from_value(json!({"responses": [{}]})).unwrap();
        let annotation = parsed.responses.into_iter().next().unwrap().into_annotation();
        assert_eq!(annotation, VisionAnnotation::default());
    }
}
