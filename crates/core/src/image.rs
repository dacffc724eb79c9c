//! Deterministic product image URLs.
//!
//! Two sources never need the network to decide a URL:
//!
//! - **Category images** - a fixed list of Unsplash photo IDs per category,
//!   picked by product position. These are the catalogue defaults.
//! - **Fallback images** - Lorem Picsum URLs seeded by a hash of the search
//!   query, used whenever the photo API is unreachable or returns nothing.

use crate::types::Category;

/// Fallback image host.
pub const FALLBACK_BASE_URL: &str = "https://picsum.photos/800/800";

/// Number of distinct fallback images before IDs wrap.
const FALLBACK_POOL_SIZE: u64 = 1000;

/// Size parameters appended to photo-API results.
pub const SEARCH_RESULT_SIZING: &str = "&w=800&h=800&fit=crop";

/// Unsplash photo IDs per category.
const fn category_photo_ids(category: Category) -> &'static [&'static str] {
    match category {
        Category::Protein => &[
            "1556909114-f6e7ad7d3136",
            "1571019613454-1cb2f99b2d8b",
            "1593111774240-d529f12cf4bb",
            "1576678907480-0329e4a878a3",
            "1556909114-f6e7ad7ad3136",
        ],
        Category::Vitamins => &[
            "1584308666744-24d5c474f2ae",
            "1550572017-edd951b55104",
            "1571019613454-1cb2f99b2d8b",
            "1556909114-f6e7ad7d3136",
            "1584308666744-24d5c474f2ae",
            "1550572017-edd951b55104",
        ],
        Category::PreWorkout => &[
            "1571019613454-1cb2f99b2d8b",
            "1556909114-f6e7ad7d3136",
            "1593111774240-d529f12cf4bb",
            "1576678907480-0329e4a878a3",
        ],
        Category::PostWorkout => &[
            "1571019613454-1cb2f99b2d8b",
            "1556909114-f6e7ad7d3136",
            "1593111774240-d529f12cf4bb",
        ],
        Category::WeightManagement => &[
            "1584308666744-24d5c474f2ae",
            "1550572017-edd951b55104",
            "1571019613454-1cb2f99b2d8b",
        ],
        Category::HealthWellness => &[
            "1550572017-edd951b55104",
            "1584308666744-24d5c474f2ae",
            "1571019613454-1cb2f99b2d8b",
            "1556909114-f6e7ad7d3136",
        ],
    }
}

/// Direct Unsplash image URL for the `index`-th product of a category.
///
/// Indexes past the end of the category's list wrap around.
#[must_use]
pub fn category_image_url(category: Category, index: usize) -> String {
    let ids = category_photo_ids(category);
    let photo_id = ids.get(index % ids.len()).copied().unwrap_or_default();
    format!("https://images.unsplash.com/photo-{photo_id}?w=600&h=600&fit=crop&q=90&auto=format")
}

/// 32-bit string hash (`h = h * 31 + unit` over UTF-16 code units, wrapping),
/// returned as its absolute value.
#[must_use]
pub fn hash_query(query: &str) -> u64 {
    let hash = query.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    i64::from(hash).unsigned_abs()
}

/// A single fallback image for `query`.
#[must_use]
pub fn fallback_image_url(query: &str) -> String {
    format!(
        "{FALLBACK_BASE_URL}?random={}",
        hash_query(query) % FALLBACK_POOL_SIZE
    )
}

/// `count` consecutive fallback images for `query`.
#[must_use]
pub fn fallback_image_urls(query: &str, count: usize) -> Vec<String> {
    let base = hash_query(query);
    (0..count as u64)
        .map(|i| format!("{FALLBACK_BASE_URL}?random={}", (base + i) % FALLBACK_POOL_SIZE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_query_matches_reference_values() {
        assert_eq!(hash_query(""), 0);
        assert_eq!(hash_query("a"), 97);
        assert_eq!(hash_query("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_hash_query_wraps_and_is_non_negative() {
        let long = "protein powder supplement ".repeat(40);
        let first = hash_query(&long);
        assert_eq!(first, hash_query(&long));
        assert!(first <= 1 << 31);
    }

    #[test]
    fn test_fallback_urls_are_consecutive() {
        let urls = fallback_image_urls("ab", 3);
        assert_eq!(
            urls,
            vec![
                "https://picsum.photos/800/800?random=105".to_string(),
                "https://picsum.photos/800/800?random=106".to_string(),
                "https://picsum.photos/800/800?random=107".to_string(),
            ]
        );
        assert_eq!(fallback_image_url("ab"), urls[0]);
    }

    #[test]
    fn test_category_image_wraps_index() {
        let first = category_image_url(Category::PostWorkout, 0);
        assert_eq!(first, category_image_url(Category::PostWorkout, 3));
        assert!(first.starts_with("https://images.unsplash.com/photo-1571019613454"));
    }
}
