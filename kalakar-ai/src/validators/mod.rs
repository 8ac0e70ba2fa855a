//! Deterministic listing validators
//!
//! # Validators
//! 1. **listing_scorer** - Quality and authenticity scores

pub mod listing_scorer;

pub use listing_scorer::ListingScorer;
