//! Listing Scorer
//!
//! Computes the quality and authenticity scores attached to every generated
//! listing. Pure and deterministic: the same analysis and draft always yield
//! the same scores.
//!
//! # Scoring Algorithm
//! - **Quality** (base 0.5):
//!   - +0.1 when more than 5 labels were detected
//!   - +0.1 when more than 2 objects were detected
//!   - +0.1 when more than 2 dominant colors were found
//!   - +0.2 when any label mentions a craft indicator
//!     (handmade, traditional, artisan, craft)
//! - **Authenticity** (base 0.6):
//!   - +0.2 when any material mentions a traditional material
//!     (clay, silk, cotton, wood, metal, stone)
//!   - +0.2 when the cultural significance text exceeds 50 characters
//!
//! Both scores are capped at 1.0. Matching is case-insensitive substring
//! matching.
//!
//! # Example
//! ```rust,ignore
//! use kalakar_ai::validators::ListingScorer;
//!
//! let scores = ListingScorer::new().score(&analysis, &draft);
//! assert!(scores.quality_score <= 1.0);
//! ```

use crate::models::{ImageAnalysisResult, ListingDraft, ListingScores};
use tracing::debug;

/// Label fragments indicating hand-crafted work
pub const CRAFT_INDICATORS: &[&str] = &["handmade", "traditional", "artisan", "craft"];

/// Material fragments counted as traditional
pub const TRADITIONAL_MATERIALS: &[&str] = &["clay", "silk", "cotton", "wood", "metal", "stone"];

/// Listing Scorer
pub struct ListingScorer {
    /// Cultural significance longer than this earns the narrative bonus
    min_significance_chars: usize,
}

impl Default for ListingScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingScorer {
    pub fn new() -> Self {
        Self {
            min_significance_chars: 50,
        }
    }

    /// Score a draft against the analysis it was synthesized from
    pub fn score(&self, analysis: &ImageAnalysisResult, draft: &ListingDraft) -> ListingScores {
        let scores = ListingScores {
            quality_score: self.quality_score(analysis),
            authenticity_score: self.authenticity_score(draft),
        };

        debug!(
            quality = scores.quality_score,
            authenticity = scores.authenticity_score,
            "Listing scored"
        );

        scores
    }

    /// Image-signal quality (0.5-1.0)
    pub fn quality_score(&self, analysis: &ImageAnalysisResult) -> f64 {
        let mut score: f64 = 0.5;

        if analysis.labels.len() > 5 {
            score += 0.1;
        }
        if analysis.objects.len() > 2 {
            score += 0.1;
        }
        if analysis.dominant_colors.len() > 2 {
            score += 0.1;
        }
        if analysis
            .labels
            .iter()
            .any(|l| contains_any(&l.description, CRAFT_INDICATORS))
        {
            score += 0.2;
        }

        score.min(1.0)
    }

    /// Material and narrative authenticity (0.6-1.0)
    pub fn authenticity_score(&self, draft: &ListingDraft) -> f64 {
        let mut score: f64 = 0.6;

        if draft
            .materials
            .iter()
            .any(|m| contains_any(m, TRADITIONAL_MATERIALS))
        {
            score += 0.2;
        }
        if draft.cultural_significance.chars().count() > self.min_significance_chars {
            score += 0.2;
        }

        score.min(1.0)
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    let lower = text.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}
