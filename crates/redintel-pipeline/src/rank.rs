//! Ordering and insight views over the scored set.
//!
//! The total order is `composite_rank_score` descending, then `created_at`
//! descending, then `id` ascending. The id tie-break makes the order total,
//! so two runs over the same inputs always rank identically. Views clone the
//! shared scored values; nothing here mutates the full set.

use std::cmp::Ordering;

use redintel_core::ScoredPost;

/// Cap on the top-insights view.
pub const TOP_INSIGHTS_LIMIT: usize = 30;

/// Cap on the high-credibility view.
pub const HIGH_CREDIBILITY_LIMIT: usize = 10;

/// The ranking total order.
#[must_use]
pub fn rank_order(a: &ScoredPost, b: &ScoredPost) -> Ordering {
    b.composite_rank_score
        .total_cmp(&a.composite_rank_score)
        .then_with(|| b.post.created_at.cmp(&a.post.created_at))
        .then_with(|| a.post.id.cmp(&b.post.id))
}

/// Sorts the full set into rank order, in place.
pub fn sort_ranked(posts: &mut [ScoredPost]) {
    posts.sort_by(rank_order);
}

/// The `limit` highest-ranked posts.
#[must_use]
pub fn top_insights(posts: &[ScoredPost], limit: usize) -> Vec<ScoredPost> {
    let mut ranked: Vec<ScoredPost> = posts.to_vec();
    sort_ranked(&mut ranked);
    ranked.truncate(limit);
    ranked
}

/// Posts whose credibility strictly exceeds `threshold`, in rank order,
/// capped at [`HIGH_CREDIBILITY_LIMIT`].
#[must_use]
pub fn high_credibility_insights(posts: &[ScoredPost], threshold: f64) -> Vec<ScoredPost> {
    let mut ranked: Vec<ScoredPost> = posts
        .iter()
        .filter(|p| p.credibility_score > threshold)
        .cloned()
        .collect();
    sort_ranked(&mut ranked);
    ranked.truncate(HIGH_CREDIBILITY_LIMIT);
    ranked
}
