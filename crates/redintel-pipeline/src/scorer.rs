//! Weighted composite credibility scoring.
//!
//! Pure function of the post, the scoring instant, the prestige table, and
//! the requested horizon. The same inputs always produce the same scores, so
//! re-scoring a run is idempotent.

use chrono::{DateTime, Utc};
use redintel_core::{CredibilityTable, RawPost, ScoreBreakdown, ScoredPost, TimeHorizon};

const WEIGHT_CHANNEL_PRESTIGE: f64 = 0.35;
const WEIGHT_ENGAGEMENT: f64 = 0.25;
const WEIGHT_COMMENT_ENGAGEMENT: f64 = 0.20;
const WEIGHT_UPVOTE_RATIO: f64 = 0.15;
const WEIGHT_CONTENT_RECENCY: f64 = 0.05;

/// Upvote count treated as the ceiling of the log engagement curve.
const ENGAGEMENT_REFERENCE_UPVOTES: f64 = 50_000.0;

/// Neutral stand-in when the source omitted the upvote ratio.
const NEUTRAL_UPVOTE_RATIO: f64 = 0.5;

/// Scores one post against the prestige table.
///
/// Every sub-score lands in [0, 10] before weighting, and the weighted
/// composite is clamped to the same range. `composite_rank_score` blends
/// credibility with raw engagement magnitude for ordering only.
#[must_use]
pub fn score_post(
    post: RawPost,
    now: DateTime<Utc>,
    table: &CredibilityTable,
    horizon: TimeHorizon,
) -> ScoredPost {
    let breakdown = ScoreBreakdown {
        channel_prestige: table.prestige(&post.channel),
        engagement: engagement_score(post.upvotes),
        comment_engagement: comment_engagement_score(post.upvotes, post.comment_count),
        upvote_ratio: post.upvote_ratio.unwrap_or(NEUTRAL_UPVOTE_RATIO) * 10.0,
        content_recency: content_recency_score(&post, now, horizon),
    };

    let credibility_score = (breakdown.channel_prestige * WEIGHT_CHANNEL_PRESTIGE
        + breakdown.engagement * WEIGHT_ENGAGEMENT
        + breakdown.comment_engagement * WEIGHT_COMMENT_ENGAGEMENT
        + breakdown.upvote_ratio * WEIGHT_UPVOTE_RATIO
        + breakdown.content_recency * WEIGHT_CONTENT_RECENCY)
        .clamp(0.0, 10.0);

    let composite_rank_score = rank_blend(credibility_score, post.upvotes, post.comment_count);

    ScoredPost {
        post,
        credibility_score,
        score_breakdown: breakdown,
        composite_rank_score,
    }
}

/// Log curve with diminishing returns, saturating at the reference ceiling.
#[allow(clippy::cast_precision_loss)]
fn engagement_score(upvotes: u64) -> f64 {
    let curve = 10.0 * (1.0 + upvotes as f64).ln() / (1.0 + ENGAGEMENT_REFERENCE_UPVOTES).ln();
    curve.min(10.0)
}

/// Comments-per-upvote bands. A healthy discussion ratio (5%–50%) scores
/// top marks; trivially low or comment-swamped ratios score lower.
#[allow(clippy::cast_precision_loss)]
fn comment_engagement_score(upvotes: u64, comments: u64) -> f64 {
    if comments == 0 {
        return 0.0;
    }
    let ratio = comments as f64 / upvotes.max(1) as f64;
    if (0.05..=0.5).contains(&ratio) {
        10.0
    } else if (0.01..=1.0).contains(&ratio) {
        7.0
    } else {
        4.0
    }
}

/// Up to 6 points for content depth, up to 4 for freshness within the horizon.
#[allow(clippy::cast_precision_loss)]
fn content_recency_score(post: &RawPost, now: DateTime<Utc>, horizon: TimeHorizon) -> f64 {
    let length = post.title.len() + post.body.len();
    let depth = if length >= 2000 {
        6.0
    } else if length >= 500 {
        4.5
    } else if length >= 100 {
        3.0
    } else {
        1.5
    };

    let window_secs = horizon.window().num_seconds().max(1) as f64;
    let age_secs = (now - post.created_at).num_seconds().max(0) as f64;
    let freshness = 4.0 * (1.0 - (age_secs / window_secs).min(1.0));

    depth + freshness
}

/// Blend for ranking: 70% credibility, 30% raw engagement magnitude lifted to
/// the 0–10 scale and saturating at 100 interactions.
#[allow(clippy::cast_precision_loss)]
fn rank_blend(credibility: f64, upvotes: u64, comments: u64) -> f64 {
    let magnitude = upvotes as f64 + 2.0 * comments as f64;
    credibility * 0.7 + (magnitude / 100.0).min(1.0) * 10.0 * 0.3
}
