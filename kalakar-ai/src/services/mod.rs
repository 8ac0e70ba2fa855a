//! Listing and voice services
//!
//! # Listing pipeline
//! - **image_analyzer** - Vision fan-out, merge, craft classification
//! - **content_synthesizer** - Structured listing draft from the generator
//! - **cultural_story** - Best-effort craft narrative
//! - **keyword_generator** - Deterministic SEO keywords
//! - **listing_orchestrator** - Sequences the steps above
//!
//! # Voice
//! - **voice_assistant** - Dialogue state machine and command mapping
//! - **action_dispatcher** - Typed actions to client-side effects
//!
//! # Other
//! - **translation** - Hosted translation wrapper
//! - **trending** - Catalog trending score

pub mod action_dispatcher;
pub mod content_synthesizer;
pub mod cultural_story;
pub mod image_analyzer;
pub mod keyword_generator;
pub mod listing_orchestrator;
pub mod translation;
pub mod trending;
pub mod voice_assistant;

pub use action_dispatcher::{ActionDispatcher, ActionSink, DirectiveCollector, DispatchReport};
pub use content_synthesizer::ContentSynthesizer;
pub use cultural_story::{CulturalStoryGenerator, FALLBACK_STORY};
pub use image_analyzer::ImageAnalyzer;
pub use listing_orchestrator::ListingOrchestrator;
pub use translation::TranslationService;
pub use trending::{rank_trending, trending_score, TrendingItem};
pub use voice_assistant::VoiceAssistant;
