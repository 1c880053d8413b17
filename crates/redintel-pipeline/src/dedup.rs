//! Cross-category merge into a unique post set.
//!
//! The same underlying post can arrive from several categories (or several
//! query terms). Merging folds per-category lists in category declaration
//! order: the first record seen for an id keeps every scalar field —
//! including `channel`, so channel attribution goes to the first successful
//! collection, never an average — while `category_tags` and
//! `mentioned_symbols` accumulate the union. Because the fold order is fixed
//! by declaration order rather than worker completion order, the merged set
//! is independent of arrival order.

use std::collections::BTreeMap;

use redintel_core::RawPost;

use crate::collector::CategoryOutcome;

/// Merges category outcomes into an id-keyed unique set.
///
/// Records with an empty `category_tags` set cannot appear: the collector
/// stamps every ingested post with its category before it reaches here.
#[must_use]
pub fn merge_outcomes(outcomes: &[CategoryOutcome]) -> BTreeMap<String, RawPost> {
    let mut merged: BTreeMap<String, RawPost> = BTreeMap::new();

    for outcome in outcomes {
        for post in &outcome.posts {
            match merged.get_mut(&post.id) {
                Some(existing) => {
                    existing
                        .category_tags
                        .extend(post.category_tags.iter().cloned());
                    existing
                        .mentioned_symbols
                        .extend(post.mentioned_symbols.iter().cloned());
                }
                None => {
                    merged.insert(post.id.clone(), post.clone());
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;

    fn post(id: &str, channel: &str, tag: &str) -> RawPost {
        RawPost {
            id: id.to_string(),
            channel: channel.to_string(),
            title: "title".to_string(),
            body: "body".to_string(),
            created_at: Utc::now(),
            upvotes: 100,
            upvote_ratio: Some(0.9),
            comment_count: 10,
            url: String::new(),
            category_tags: BTreeSet::from([tag.to_string()]),
            mentioned_symbols: BTreeSet::new(),
        }
    }

    fn outcome(name: &'static str, posts: Vec<RawPost>) -> CategoryOutcome {
        CategoryOutcome {
            name,
            posts,
            failed: false,
        }
    }

    #[test]
    fn same_id_across_categories_merges_to_one_record_with_tag_union() {
        let outcomes = vec![
            outcome("market", vec![post("t3_x", "wallstreetbets", "market")]),
            outcome("analysis", vec![post("t3_x", "securityanalysis", "analysis")]),
        ];
        let merged = merge_outcomes(&outcomes);
        assert_eq!(merged.len(), 1);
        let record = &merged["t3_x"];
        assert!(record.category_tags.contains("market"));
        assert!(record.category_tags.contains("analysis"));
    }

    #[test]
    fn first_category_in_declaration_order_wins_channel_attribution() {
        // The same post collected from a prestigious channel in one category
        // and a meme channel in another: the first collection's channel is
        // kept verbatim, never averaged.
        let outcomes = vec![
            outcome("analysis", vec![post("t3_x", "securityanalysis", "analysis")]),
            outcome("market", vec![post("t3_x", "wallstreetbets", "market")]),
        ];
        let merged = merge_outcomes(&outcomes);
        assert_eq!(merged["t3_x"].channel, "securityanalysis");

        // Swapping the outcome order swaps the attribution with it: the
        // winner is always the first fold position, not a property of the
        // channels themselves.
        let swapped = vec![
            outcome("market", vec![post("t3_x", "wallstreetbets", "market")]),
            outcome("analysis", vec![post("t3_x", "securityanalysis", "analysis")]),
        ];
        let merged = merge_outcomes(&swapped);
        assert_eq!(merged["t3_x"].channel, "wallstreetbets");
    }

    #[test]
    fn symbols_are_unioned() {
        let mut a = post("t3_x", "stocks", "market");
        a.mentioned_symbols.insert("TSLA".to_string());
        let mut b = post("t3_x", "investing", "trending");
        b.mentioned_symbols.insert("NVDA".to_string());

        let merged = merge_outcomes(&[outcome("market", vec![a]), outcome("trending", vec![b])]);
        let record = &merged["t3_x"];
        assert!(record.mentioned_symbols.contains("TSLA"));
        assert!(record.mentioned_symbols.contains("NVDA"));
    }

    #[test]
    fn duplicate_within_one_category_collapses() {
        let outcomes = vec![outcome(
            "market",
            vec![post("t3_x", "stocks", "market"), post("t3_x", "stocks", "market")],
        )];
        let merged = merge_outcomes(&outcomes);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn distinct_ids_stay_distinct() {
        let outcomes = vec![outcome(
            "market",
            vec![post("t3_a", "stocks", "market"), post("t3_b", "stocks", "market")],
        )];
        assert_eq!(merge_outcomes(&outcomes).len(), 2);
    }
}
