//! Image Analyzer
//!
//! Turns a set of product images into one normalized `ImageAnalysisResult`.
//!
//! # Pipeline
//! 1. Annotate every image concurrently (fan-out bounded by image count)
//! 2. Merge annotations:
//!    - labels deduplicated by description, highest score kept
//!    - objects deduplicated by name, highest score kept
//!    - detected text deduplicated, first-seen order
//!    - dominant colors: top 5 by score across all images
//! 3. Infer craft type from the merged labels and text
//! 4. Region: static `"India"`
//!
//! # Error Isolation
//! A failed image is logged and skipped. Analysis fails only when there are
//! no images, every image failed, or no label survived the merge.

use crate::clients::{VisionAnnotation, VisionClient};
use crate::error::ListingError;
use crate::models::{DetectedObject, DominantColor, ImageAnalysisResult, ImageSource, ScoredLabel};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Craft category returned when no keyword matches
pub const DEFAULT_CRAFT_TYPE: &str = "handicraft";

/// Region returned for every analysis
pub const DEFAULT_REGION: &str = "India";

/// Number of dominant colors kept after merging
pub const MAX_DOMINANT_COLORS: usize = 5;

/// Ordered craft keyword table; earlier categories win ties
pub const CRAFT_KEYWORDS: &[(&str, &[&str])] = &[
    ("pottery", &["pottery", "ceramic", "clay", "pot", "vase", "bowl", "plate"]),
    ("textile", &["fabric", "cloth", "sari", "shawl", "scarf", "embroidery", "weaving"]),
    ("jewelry", &["jewelry", "necklace", "bracelet", "ring", "earring", "pendant"]),
    ("woodwork", &["wood", "carving", "furniture", "sculpture", "handicraft"]),
    ("metalwork", &["metal", "brass", "copper", "silver", "gold", "jewelry"]),
    ("bamboo", &["bamboo", "basket", "mat", "handicraft"]),
    ("leather", &["leather", "bag", "wallet", "belt", "shoes"]),
    ("stone", &["stone", "sculpture", "carving", "statue"]),
];

/// Image Analyzer
pub struct ImageAnalyzer {
    vision: Arc<dyn VisionClient>,
}

impl ImageAnalyzer {
    pub fn new(vision: Arc<dyn VisionClient>) -> Self {
        Self { vision }
    }

    /// Analyze every image and merge the results
    pub async fn analyze(&self, images: &[ImageSource]) -> Result<ImageAnalysisResult, ListingError> {
        if images.is_empty() {
            return Err(ListingError::Analysis("no images provided".to_string()));
        }

        let futures = images.iter().enumerate().map(|(index, image)| {
            let vision = Arc::clone(&self.vision);
            async move {
                match vision.annotate(image).await {
                    Ok(annotation) => {
                        debug!(image = index, labels = annotation.labels.len(), "Image annotated");
                        Some(annotation)
                    }
                    Err(e) => {
                        warn!(image = index, error = %e, "Image annotation failed, skipping image");
                        None
                    }
                }
            }
        });

        let annotations: Vec<VisionAnnotation> = join_all(futures).await.into_iter().flatten().collect();

        if annotations.is_empty() {
            return Err(ListingError::Analysis(format!(
                "vision annotation failed for all {} image(s)",
                images.len()
            )));
        }

        let result = merge_annotations(annotations);
        if result.labels.is_empty() {
            return Err(ListingError::Analysis("no labels detected in any image".to_string()));
        }

        info!(
            images = images.len(),
            labels = result.labels.len(),
            objects = result.objects.len(),
            craft_type = %result.inferred_craft_type,
            "Image analysis complete"
        );

        Ok(result)
    }
}

/// Merge per-image annotations and infer craft type and region
pub fn merge_annotations(annotations: Vec<VisionAnnotation>) -> ImageAnalysisResult {
    let mut labels: Vec<ScoredLabel> = Vec::new();
    let mut objects: Vec<DetectedObject> = Vec::new();
    let mut detected_text: Vec<String> = Vec::new();
    let mut colors: Vec<DominantColor> = Vec::new();

    let mut label_index: HashMap<String, usize> = HashMap::new();
    let mut object_index: HashMap<String, usize> = HashMap::new();
    let mut seen_text: HashSet<String> = HashSet::new();

    for annotation in annotations {
        for label in annotation.labels {
            match label_index.get(&label.description) {
                Some(&i) => {
                    if label.score > labels[i].score {
                        labels[i].score = label.score;
                    }
                }
                None => {
                    label_index.insert(label.description.clone(), labels.len());
                    labels.push(label);
                }
            }
        }

        for object in annotation.objects {
            match object_index.get(&object.name) {
                Some(&i) => {
                    if object.score > objects[i].score {
                        objects[i].score = object.score;
                    }
                }
                None => {
                    object_index.insert(object.name.clone(), objects.len());
                    objects.push(object);
                }
            }
        }

        for text in annotation.text {
            if seen_text.insert(text.clone()) {
                detected_text.push(text);
            }
        }

        colors.extend(annotation.colors);
    }

    // Stable sorts: equal scores keep first-seen order
    labels.sort_by(|a, b| b.score.total_cmp(&a.score));
    objects.sort_by(|a, b| b.score.total_cmp(&a.score));
    colors.sort_by(|a, b| b.score.total_cmp(&a.score));
    colors.truncate(MAX_DOMINANT_COLORS);

    let inferred_craft_type = infer_craft_type(&labels, &detected_text).to_string();

    ImageAnalysisResult {
        labels,
        objects,
        detected_text,
        dominant_colors: colors,
        inferred_craft_type,
        inferred_region: DEFAULT_REGION.to_string(),
    }
}

/// Classify the craft from label descriptions and detected text
///
/// Each category scores one point per keyword found as a substring of the
/// combined lowercase text. The highest score wins, ties go to the earlier
/// category, and all-zero yields `"handicraft"`.
///
/// # Examples
///
/// ```
/// use kalakar_ai::models::ScoredLabel;
/// use kalakar_ai::services::image_analyzer::infer_craft_type;
///
/// let labels = vec![ScoredLabel { description: "Blue Pottery Vase".into(), score: 0.9 }];
/// assert_eq!(infer_craft_type(&labels, &[]), "pottery");
/// assert_eq!(infer_craft_type(&[], &[]), "handicraft");
/// ```
pub fn infer_craft_type(labels: &[ScoredLabel], detected_text: &[String]) -> &'static str {
    let combined = labels
        .iter()
        .map(|l| l.description.as_str())
        .chain(detected_text.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut best = DEFAULT_CRAFT_TYPE;
    let mut best_score = 0usize;

    for (craft, keywords) in CRAFT_KEYWORDS {
        let score = keywords.iter().filter(|k| combined.contains(*k)).count();
        if score > best_score {
            best_score = score;
            best = *craft;
        }
    }

    best
}
