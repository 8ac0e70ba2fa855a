//! Cultural Story Generator
//!
//! Best-effort narrative for a craft. Never fails: any generator error, or an
//! empty reply, yields `FALLBACK_STORY`.

use crate::clients::{ClientError, ResponseFormat, TextGenerator};
use std::sync::Arc;
use tracing::{debug, warn};

/// Story returned whenever generation fails
pub const FALLBACK_STORY: &str = "This beautiful craft represents the rich cultural heritage of India, passed down through generations of skilled artisans.";

/// Outcome of a story request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub text: String,
    /// True when `text` is the fallback
    pub degraded: bool,
}

pub struct CulturalStoryGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl CulturalStoryGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a story, substituting the fallback on failure
    pub async fn generate_story(&self, craft_type: &str, region: &str, language: &str) -> Story {
        match self.try_generate_story(craft_type, region, language).await {
            Ok(text) => Story { text, degraded: false },
            Err(e) => {
                warn!(craft_type, region, error = %e, "Cultural story generation failed, using fallback");
                Story {
                    text: FALLBACK_STORY.to_string(),
                    degraded: true,
                }
            }
        }
    }

    /// Generate a story, surfacing the failure
    pub async fn try_generate_story(
        &self,
        craft_type: &str,
        region: &str,
        language: &str,
    ) -> Result<String, ClientError> {
        let prompt = build_story_prompt(craft_type, region, language);
        let text = self.generator.generate(&prompt, ResponseFormat::Text).await?;
        let text = text.trim();

        if text.is_empty() {
            return Err(ClientError::Empty("story generator returned blank text".to_string()));
        }

        debug!(craft_type, story_chars = text.len(), "Cultural story generated");
        Ok(text.to_string())
    }
}

pub fn build_story_prompt(craft_type: &str, region: &str, language: &str) -> String {
    format!(
        "Create a compelling cultural story for a {craft_type} from {region}.\n\
         \n\
         The story should:\n\
         1. Highlight the cultural heritage and traditions\n\
         2. Explain the significance of this craft in Indian culture\n\
         3. Mention traditional techniques and materials\n\
         4. Connect to festivals, rituals, or daily life\n\
         5. Be engaging for international buyers\n\
         6. Be 2-3 paragraphs long\n\
         \n\
         Language: {language}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = build_story_prompt("textile", "Varanasi", "hi");
        assert!(prompt.starts_with("Create a compelling cultural story for a textile from Varanasi."));
        assert!(prompt.ends_with("Language: hi"));
    }
}
