//! SEO keyword generation
//!
//! Deterministic: base keywords, then craft type, category, materials and
//! tags, then regional keywords. Blank entries are skipped, the first
//! occurrence of a duplicate is kept, and the list is cut at 15.

use crate::models::ListingDraft;
use std::collections::HashSet;

/// Upper bound on generated keywords
pub const MAX_KEYWORDS: usize = 15;

pub const BASE_KEYWORDS: &[&str] = &["handmade", "artisan", "traditional", "indian craft"];

pub const REGIONAL_KEYWORDS: &[&str] = &[
    "india",
    "indian handicraft",
    "authentic",
    "cultural",
    "heritage",
];

/// Keywords for a synthesized draft
pub fn generate_keywords(draft: &ListingDraft, craft_type: &str) -> Vec<String> {
    keywords_from_parts(craft_type, &draft.category, &draft.materials, &draft.tags)
}

/// Keywords from individual listing fields
///
/// # Examples
///
/// ```
/// use kalakar_ai::services::keyword_generator::keywords_from_parts;
///
/// let keywords = keywords_from_parts("pottery", "Home Decor", &["clay".to_string()], &[]);
/// assert_eq!(&keywords[..6], ["handmade", "artisan", "traditional", "indian craft", "pottery", "Home Decor"]);
/// assert!(keywords.len() <= 15);
/// ```
pub fn keywords_from_parts(
    craft_type: &str,
    category: &str,
    materials: &[String],
    tags: &[String],
) -> Vec<String> {
    let candidates = BASE_KEYWORDS
        .iter()
        .copied()
        .chain([craft_type, category])
        .chain(materials.iter().map(String::as_str))
        .chain(tags.iter().map(String::as_str))
        .chain(REGIONAL_KEYWORDS.iter().copied());

    let mut seen = HashSet::new();
    candidates
        .map(str::trim)
        .filter(|k| !k.is_empty() && seen.insert(*k))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_order_and_dedupe() {
        let keywords = keywords_from_parts(
            "pottery",
            "Home Decor",
            &strings(&["clay", "handmade"]),
            &strings(&["vase", "india"]),
        );
        assert_eq!(
            keywords,
            strings(&[
                "handmade",
                "artisan",
                "traditional",
                "indian craft",
                "pottery",
                "Home Decor",
                "clay",
                "vase",
                "india",
                "indian handicraft",
                "authentic",
                "cultural",
                "heritage",
            ])
        );
    }

    #[test]
    fn test_truncated_to_fifteen() {
        let tags: Vec<String> = (0..20).map(|i| format!("tag{}", i)).collect();
        let keywords = keywords_from_parts("textile", "Sarees", &[], &tags);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords[14], "tag8");
    }

    #[test]
    fn test_blank_entries_skipped() {
        let keywords = keywords_from_parts("handicraft", "  ", &strings(&[""]), &[]);
        assert!(keywords.iter().all(|k| !k.trim().is_empty()));
        assert_eq!(keywords.len(), 10);
    }

    #[test]
    fn test_idempotent() {
        let materials = strings(&["brass", "copper"]);
        let first = keywords_from_parts("metalwork", "Lamps", &materials, &[]);
        let second = keywords_from_parts("metalwork", "Lamps", &materials, &[]);
        assert_eq!(first, second);
    }
}
