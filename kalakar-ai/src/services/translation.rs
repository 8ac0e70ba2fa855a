//! Translation Service

use crate::clients::{ClientError, Translator};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Source language assumed when the caller names none
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
}

pub struct TranslationService {
    translator: Arc<dyn Translator>,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> Result<Translation, ClientError> {
        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE_LANGUAGE);

        if source == target {
            return Ok(Translation {
                original_text: text.to_string(),
                translated_text: text.to_string(),
                source_language: source.to_string(),
                target_language: target.to_string(),
            });
        }

        let translated_text = self.translator.translate(text, source, target).await?;
        info!(source, target, "Text translated");

        Ok(Translation {
            original_text: text.to_string(),
            translated_text,
            source_language: source.to_string(),
            target_language: target.to_string(),
        })
    }
}
