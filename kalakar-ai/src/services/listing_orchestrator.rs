//! Listing Orchestrator
//!
//! Sequences one listing generation:
//!
//! ```text
//! analyze images → transcribe voice (optional) → synthesize draft
//!   → cultural story (best-effort) → scores → keywords
//! ```
//!
//! Analysis, transcription and synthesis failures abort the listing. The
//! cultural story degrades to a fixed fallback and is recorded in
//! `GeneratedListing::degraded`.

use crate::clients::{AiClients, SpeechToText};
use crate::error::{Degradation, ListingError};
use crate::models::{GeneratedListing, ListingRequest, VoiceInput};
use crate::services::content_synthesizer::ContentSynthesizer;
use crate::services::cultural_story::CulturalStoryGenerator;
use crate::services::image_analyzer::ImageAnalyzer;
use crate::services::keyword_generator::generate_keywords;
use crate::validators::ListingScorer;
use kalakar_common::languages;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub struct ListingOrchestrator {
    analyzer: ImageAnalyzer,
    synthesizer: ContentSynthesizer,
    stories: CulturalStoryGenerator,
    scorer: ListingScorer,
    speech: Arc<dyn SpeechToText>,
}

impl ListingOrchestrator {
    pub fn new(clients: &AiClients) -> Self {
        Self {
            analyzer: ImageAnalyzer::new(Arc::clone(&clients.vision)),
            synthesizer: ContentSynthesizer::new(Arc::clone(&clients.generator)),
            stories: CulturalStoryGenerator::new(Arc::clone(&clients.generator)),
            scorer: ListingScorer::new(),
            speech: Arc::clone(&clients.speech),
        }
    }

    pub fn analyzer(&self) -> &ImageAnalyzer {
        &self.analyzer
    }

    pub fn stories(&self) -> &CulturalStoryGenerator {
        &self.stories
    }

    /// Generate a complete listing
    pub async fn generate_listing(&self, request: ListingRequest) -> Result<GeneratedListing, ListingError> {
        let span = info_span!(
            "generate_listing",
            request_id = %Uuid::new_v4(),
            images = request.images.len(),
            language = %request.language
        );

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: ListingRequest) -> Result<GeneratedListing, ListingError> {
        info!("Starting listing generation");

        let analysis = self.analyzer.analyze(&request.images).await?;

        let transcript = match request.voice {
            Some(voice) => Some(self.transcribe(voice, &request.language).await?),
            None => None,
        };

        let draft = self
            .synthesizer
            .synthesize(&analysis, transcript.as_deref(), &request.hints, &request.language)
            .await?;

        let mut degraded = Vec::new();
        let story = self
            .stories
            .generate_story(&analysis.inferred_craft_type, &analysis.inferred_region, &request.language)
            .await;
        if story.degraded {
            degraded.push(Degradation::CulturalStory);
        }

        let scores = self.scorer.score(&analysis, &draft);
        let keywords = generate_keywords(&draft, &analysis.inferred_craft_type);

        info!(
            title = %draft.title,
            quality = scores.quality_score,
            authenticity = scores.authenticity_score,
            keywords = keywords.len(),
            degraded = degraded.len(),
            "Listing generation complete"
        );

        Ok(GeneratedListing {
            analysis,
            draft,
            scores,
            cultural_story: story.text,
            keywords,
            degraded,
        })
    }

    /// Resolve the voice description to a transcript
    ///
    /// Text is used verbatim. Audio is transcribed in the request language;
    /// no recognizable speech is a transcription failure.
    async fn transcribe(&self, voice: VoiceInput, language: &str) -> Result<String, ListingError> {
        match voice {
            VoiceInput::Transcript(text) => Ok(text),
            VoiceInput::Audio(audio) => {
                let transcript = self
                    .speech
                    .transcribe(&audio, languages::speech_locale(language))
                    .await
                    .map_err(|e| ListingError::Transcription(e.to_string()))?;

                if transcript.trim().is_empty() {
                    return Err(ListingError::Transcription(
                        "no speech detected in voice description".to_string(),
                    ));
                }

                info!(transcript_chars = transcript.len(), "Voice description transcribed");
                Ok(transcript)
            }
        }
    }
}
