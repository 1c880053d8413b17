//! Run summary aggregation.
//!
//! One pass over the scored set sorted by (created_at desc, id asc). Symbol
//! tie-breaks use first-seen order within that sorted walk, so the summary is
//! a pure function of the set's contents.

use std::collections::BTreeMap;

use redintel_core::{RunSummary, ScoredPost, SymbolCount};

/// Cap on `top_symbols` in the summary.
pub const TOP_SYMBOLS_LIMIT: usize = 10;

/// Builds the run summary. A post counts once per category tag; categories
/// with no posts are absent from the maps rather than present with zeros.
/// An empty set yields `total_posts == 0` and empty maps.
#[must_use]
pub fn summarize(posts: &[ScoredPost]) -> RunSummary {
    let mut ordered: Vec<&ScoredPost> = posts.iter().collect();
    ordered.sort_by(|a, b| {
        b.post
            .created_at
            .cmp(&a.post.created_at)
            .then_with(|| a.post.id.cmp(&b.post.id))
    });

    let mut counts_by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut credibility_sums: BTreeMap<String, f64> = BTreeMap::new();
    let mut symbol_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut symbol_first_seen: Vec<&str> = Vec::new();

    for scored in &ordered {
        for tag in &scored.post.category_tags {
            *counts_by_category.entry(tag.clone()).or_insert(0) += 1;
            *credibility_sums.entry(tag.clone()).or_insert(0.0) += scored.credibility_score;
        }
        for symbol in &scored.post.mentioned_symbols {
            let entry = symbol_counts.entry(symbol.as_str()).or_insert(0);
            if *entry == 0 {
                symbol_first_seen.push(symbol.as_str());
            }
            *entry += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let average_credibility_by_category: BTreeMap<String, f64> = credibility_sums
        .into_iter()
        .map(|(category, sum)| {
            let count = counts_by_category[&category] as f64;
            (category, sum / count)
        })
        .collect();

    // Stable sort over first-seen order keeps ties deterministic.
    let mut top_symbols: Vec<SymbolCount> = symbol_first_seen
        .into_iter()
        .map(|symbol| SymbolCount {
            symbol: symbol.to_string(),
            mentions: symbol_counts[symbol],
        })
        .collect();
    top_symbols.sort_by_key(|s| std::cmp::Reverse(s.mentions));
    top_symbols.truncate(TOP_SYMBOLS_LIMIT);

    RunSummary {
        total_posts: posts.len(),
        counts_by_category,
        average_credibility_by_category,
        top_symbols,
        failed_categories: std::collections::BTreeSet::new(),
    }
}
