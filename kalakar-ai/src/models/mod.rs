//! Request-scoped data model for listing generation and the voice assistant

pub mod listing;
pub mod voice;

pub use listing::{
    DetectedObject, DominantColor, GeneratedListing, ImageAnalysisResult, ImageSource,
    ListingDraft, ListingHints, ListingRequest, ListingResponse, ListingScores, ScoredLabel,
    VoiceInput,
};
pub use voice::{
    CreateListingParams, DialogueContext, Directive, HelpParams, NavigateParams, SearchParams,
    UpdateOrderParams, VoiceAction, VoiceRequest, VoiceTurn,
};
