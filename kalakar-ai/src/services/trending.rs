//! Trending score for catalog items
//!
//! ```text
//! score = 0.4 · recency + 0.3 · price + 0.3 · images
//!   recency = max(0, 30 − age_days) / 30
//!   price   = max(0, 1 − price / 10000)
//!   images  = min(1, image_count / 5)
//! ```
//!
//! `now` is always passed in so ranking is reproducible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const RECENCY_WINDOW_DAYS: f64 = 30.0;
const PRICE_CEILING: f64 = 10_000.0;
const IMAGE_TARGET: f64 = 5.0;

const RECENCY_WEIGHT: f64 = 0.4;
const PRICE_WEIGHT: f64 = 0.3;
const IMAGE_WEIGHT: f64 = 0.3;

/// Fields of a catalog item that feed the trending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub price: f64,
    pub image_count: u32,
}

/// Trending score in [0, 1]
pub fn trending_score(item: &TrendingItem, now: DateTime<Utc>) -> f64 {
    // Items dated in the future count as brand new
    let age_days = ((now - item.created_at).num_seconds().max(0) as f64) / 86_400.0;
    let recency = (RECENCY_WINDOW_DAYS - age_days).max(0.0) / RECENCY_WINDOW_DAYS;

    let price = if item.price.is_finite() {
        (1.0 - item.price.max(0.0) / PRICE_CEILING).max(0.0)
    } else {
        0.0
    };

    let images = (item.image_count as f64 / IMAGE_TARGET).min(1.0);

    (RECENCY_WEIGHT * recency + PRICE_WEIGHT * price + IMAGE_WEIGHT * images).clamp(0.0, 1.0)
}

/// Sort items by trending score, highest first; ties keep input order
pub fn rank_trending(items: Vec<TrendingItem>, now: DateTime<Utc>) -> Vec<(TrendingItem, f64)> {
    let mut scored: Vec<(TrendingItem, f64)> = items
        .into_iter()
        .map(|item| {
            let score = trending_score(&item, now);
            (item, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}
