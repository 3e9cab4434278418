//! Substring keyword ranking.
//!
//! A query is lower-cased and split on whitespace; tokens of
//! [`MIN_TOKEN_CHARS`] characters or fewer are dropped. Each perfume scores
//! the number of distinct tokens found anywhere in its lower-cased field blob
//! (plain substring containment, so "oud" matches "cloud"). Zero scores are
//! discarded, the rest are stably sorted by score descending and truncated.

use tracing::{debug, trace};

use scentvault_core::defaults::MIN_TOKEN_CHARS;
use scentvault_core::{CatalogItem, Perfume};

/// Distinct lower-cased query tokens longer than [`MIN_TOKEN_CHARS`], in
/// first-occurrence order.
pub fn query_tokens(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for raw in query.to_lowercase().split_whitespace() {
        if raw.chars().count() <= MIN_TOKEN_CHARS {
            continue;
        }
        if !tokens.iter().any(|t| t == raw) {
            tokens.push(raw.to_string());
        }
    }
    tokens
}

/// Number of `tokens` contained in the perfume's search blob.
pub fn score(perfume: &Perfume, tokens: &[String]) -> usize {
    let blob = perfume.search_blob();
    tokens.iter().filter(|t| blob.contains(t.as_str())).count()
}

/// Rank `candidates` against `query`, keeping at most `cap` matches.
///
/// Never falls back to returning the whole catalog: a query with no usable
/// token yields an empty result.
pub fn filter_catalog(query: &str, candidates: &[Perfume], cap: usize) -> Vec<Perfume> {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        debug!(
            subsystem = "search",
            component = "relevance",
            query = %query,
            "No usable query tokens"
        );
        return Vec::new();
    }

    let mut scored: Vec<(usize, &Perfume)> = candidates
        .iter()
        .filter_map(|p| {
            let s = score(p, &tokens);
            trace!(perfume_id = %p.id, score = s, "Scored entry");
            (s > 0).then_some((s, p))
        })
        .collect();

    // sort_by is stable: equal scores keep catalog order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let matched = scored.len();
    let ranked: Vec<Perfume> = scored
        .into_iter()
        .take(cap)
        .map(|(_, p)| p.clone())
        .collect();

    debug!(
        subsystem = "search",
        component = "relevance",
        op = "filter",
        token_count = tokens.len(),
        candidate_count = candidates.len(),
        matched,
        result_count = ranked.len(),
        "Relevance filter complete"
    );
    ranked
}

/// [`filter_catalog`] projected into the tool-facing shape.
pub fn filter_items(query: &str, candidates: &[Perfume], cap: usize) -> Vec<CatalogItem> {
    filter_catalog(query, candidates, cap)
        .iter()
        .map(CatalogItem::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentvault_db::test_fixtures::PerfumeBuilder;

    fn catalog() -> Vec<Perfume> {
        vec![
            PerfumeBuilder::new("1", "Sunset Oud")
                .number(1)
                .notes("Saffron", "Rose", "Oud, Amber")
                .family("Woody")
                .build(),
            PerfumeBuilder::new("2", "Ocean Breeze")
                .number(2)
                .notes("Sea Salt", "Lavender", "Musk")
                .description("Fresh ocean salt air")
                .family("Aquatic")
                .build(),
            PerfumeBuilder::new("3", "Vanilla Cloud")
                .number(3)
                .notes("Pear", "Vanilla", "Musk")
                .family("Gourmand")
                .build(),
            PerfumeBuilder::new("4", "Amber Night")
                .number(4)
                .notes("Bergamot", "Amber", "Vanilla")
                .family("Oriental")
                .build(),
        ]
    }

    fn names(ps: &[Perfume]) -> Vec<&str> {
        ps.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_query_tokens_drops_short_and_duplicate_tokens() {
        assert_eq!(query_tokens("Oud OUD is a  vanilla"), vec!["oud", "vanilla"]);
        assert!(query_tokens("ok no go").is_empty());
        assert!(query_tokens("   ").is_empty());
    }

    #[test]
    fn test_query_tokens_counts_characters_not_bytes() {
        // "été" is three characters but five bytes.
        assert_eq!(query_tokens("été"), vec!["été"]);
        assert!(query_tokens("é").is_empty());
    }

    #[test]
    fn test_all_short_tokens_return_empty_regardless_of_catalog() {
        assert!(filter_catalog("ok no go", &catalog(), 10).is_empty());
        assert!(filter_catalog("", &catalog(), 10).is_empty());
    }

    #[test]
    fn test_oud_please_matches_only_sunset_oud() {
        let catalog = vec![
            PerfumeBuilder::new("1", "Sunset Oud").build(),
            PerfumeBuilder::new("2", "Ocean Breeze")
                .description("ocean salt")
                .build(),
        ];
        let ranked = filter_catalog("oud please", &catalog, 10);
        assert_eq!(names(&ranked), vec!["Sunset Oud"]);
    }

    #[test]
    fn test_substring_containment_matches_inside_words() {
        // "oud" occurs inside "cloud".
        let ranked = filter_catalog("oud", &catalog(), 10);
        assert_eq!(names(&ranked), vec!["Sunset Oud", "Vanilla Cloud"]);
    }

    #[test]
    fn test_sorted_by_distinct_match_count() {
        let ranked = filter_catalog("vanilla amber musk", &catalog(), 10);
        // Amber Night: amber, vanilla (2). Vanilla Cloud: vanilla, musk (2).
        // Sunset Oud: amber (1). Ocean Breeze: musk (1).
        assert_eq!(
            names(&ranked),
            vec!["Vanilla Cloud", "Amber Night", "Sunset Oud", "Ocean Breeze"]
        );
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let ranked = filter_catalog("musk", &catalog(), 10);
        assert_eq!(names(&ranked), vec!["Ocean Breeze", "Vanilla Cloud"]);

        let mut reversed = catalog();
        reversed.reverse();
        let ranked = filter_catalog("musk", &reversed, 10);
        assert_eq!(names(&ranked), vec!["Vanilla Cloud", "Ocean Breeze"]);
    }

    #[test]
    fn test_repeated_token_counts_once() {
        let once = filter_catalog("musk", &catalog(), 10);
        let twice = filter_catalog("musk musk MUSK", &catalog(), 10);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_cap_truncates_silently() {
        let many: Vec<Perfume> = (0..25)
            .map(|i| {
                PerfumeBuilder::new(&i.to_string(), &format!("Musk {}", i))
                    .number(i)
                    .build()
            })
            .collect();
        assert_eq!(filter_catalog("musk", &many, 10).len(), 10);
        assert_eq!(filter_catalog("musk", &many, 5).len(), 5);
        assert_eq!(filter_catalog("musk", &many, 5)[0].name, "Musk 0");
    }

    #[test]
    fn test_every_result_contains_a_token() {
        let query = "woody fresh gourmand xyz";
        let tokens = query_tokens(query);
        for p in filter_catalog(query, &catalog(), 10) {
            let blob = p.search_blob();
            assert!(tokens.iter().any(|t| blob.contains(t.as_str())));
        }
    }

    #[test]
    fn test_matches_classification_fields() {
        let ranked = filter_catalog("unisex", &catalog(), 10);
        assert_eq!(ranked.len(), 4);
        assert!(filter_catalog("premium", &catalog(), 2).len() == 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let c = catalog();
        assert_eq!(
            filter_catalog("vanilla musk", &c, 10),
            filter_catalog("vanilla musk", &c, 10)
        );
    }

    #[test]
    fn test_filter_items_projects_tool_shape() {
        let items = filter_items("oud", &catalog(), 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Sunset Oud");
        assert_eq!(items[0].number, 1);
        assert_eq!(items[0].base_notes, "Oud, Amber");
    }
}
