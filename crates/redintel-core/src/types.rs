//! Domain model for one collection run.
//!
//! `RawPost` and `ScoredPost` live only for the duration of a run; nothing in
//! this crate persists them. The CLI serializes the final [`RunResult`] to a
//! JSON artifact.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ConfigError;

/// Default credibility threshold for the high-credibility view.
pub const DEFAULT_CREDIBILITY_THRESHOLD: f64 = 6.0;

/// Default per-query result cap.
pub const DEFAULT_MAX_RESULTS_PER_QUERY: usize = 30;

/// Recency window bounding which posts are eligible for collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Day,
    Week,
    Month,
}

impl TimeHorizon {
    /// The Reddit `t=` search parameter for this horizon.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeHorizon::Day => "day",
            TimeHorizon::Week => "week",
            TimeHorizon::Month => "month",
        }
    }

    /// The wall-clock window covered by this horizon.
    ///
    /// A post whose `created_at` falls before `now - window()` is outside the
    /// horizon even if the source returned it.
    #[must_use]
    pub fn window(self) -> Duration {
        match self {
            TimeHorizon::Day => Duration::hours(24),
            TimeHorizon::Week => Duration::days(7),
            TimeHorizon::Month => Duration::days(30),
        }
    }
}

impl std::fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeHorizon {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(TimeHorizon::Day),
            "week" => Ok(TimeHorizon::Week),
            "month" => Ok(TimeHorizon::Month),
            other => Err(ConfigError::Validation(format!(
                "invalid time horizon '{other}'; expected day, week, or month"
            ))),
        }
    }
}

/// One discussion item as returned by the source, normalized.
///
/// Scalar fields are fixed at normalization. `category_tags` is stamped by
/// the collector with the category whose query found the post and unioned by
/// the deduplicator; records are never otherwise mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    /// Stable identifier, unique per origin post (Reddit fullname, e.g. `t3_abc123`).
    pub id: String,
    /// Source channel (subreddit) the post was found in, lowercased.
    pub channel: String,
    pub title: String,
    /// Self-text body; may be empty for link posts.
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub upvotes: u64,
    /// Community agreement in [0.0, 1.0]. `None` when the source omitted it;
    /// scored as neutral 0.5.
    pub upvote_ratio: Option<f64>,
    pub comment_count: u64,
    pub url: String,
    /// Collection categories whose queries matched this post.
    pub category_tags: BTreeSet<String>,
    /// Ticker-like tokens extracted from title/body plus the query term.
    pub mentioned_symbols: BTreeSet<String>,
}

/// Per-factor sub-scores, each pre-normalized to [0, 10] before weighting.
///
/// Retained on every [`ScoredPost`] for auditability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub channel_prestige: f64,
    pub engagement: f64,
    pub comment_engagement: f64,
    pub upvote_ratio: f64,
    pub content_recency: f64,
}

/// A [`RawPost`] plus its composite credibility score.
///
/// Never mutated after creation; re-scoring produces a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    #[serde(flatten)]
    pub post: RawPost,
    /// Weighted composite in [0.0, 10.0]. The primary trust metric.
    pub credibility_score: f64,
    pub score_breakdown: ScoreBreakdown,
    /// Credibility blended with raw engagement magnitude. Ordering only —
    /// never persisted as the trust metric.
    pub composite_rank_score: f64,
}

/// (symbol, mention count) pair for the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCount {
    pub symbol: String,
    pub mentions: usize,
}

/// Aggregate statistics over a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunSummary {
    pub total_posts: usize,
    pub counts_by_category: BTreeMap<String, usize>,
    /// Mean credibility per category. Categories with zero posts are absent,
    /// not zero.
    pub average_credibility_by_category: BTreeMap<String, f64>,
    /// Descending by count, ties broken by first-seen order in the
    /// time-sorted post set. Length capped by the aggregator.
    pub top_symbols: Vec<SymbolCount>,
    /// Categories whose collection failed entirely. Non-empty means a
    /// degraded-but-usable result, not a hard failure.
    pub failed_categories: BTreeSet<String>,
}

/// Input contract for one collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRequest {
    /// Tickers or free-text keywords. Must be non-empty.
    pub target_terms: Vec<String>,
    pub time_horizon: TimeHorizon,
    pub max_results_per_query: usize,
    pub credibility_threshold: f64,
}

impl CollectionRequest {
    /// Build a request with the default result cap and threshold.
    #[must_use]
    pub fn new(target_terms: Vec<String>, time_horizon: TimeHorizon) -> Self {
        Self {
            target_terms,
            time_horizon,
            max_results_per_query: DEFAULT_MAX_RESULTS_PER_QUERY,
            credibility_threshold: DEFAULT_CREDIBILITY_THRESHOLD,
        }
    }

    /// Validate the request before any collection begins.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on empty/blank target terms, a
    /// zero result cap, or a negative or non-finite threshold. These are
    /// fatal; a run must not start with an invalid request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_terms.is_empty() || self.target_terms.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "target_terms must contain at least one non-blank term".to_string(),
            ));
        }
        if self.max_results_per_query == 0 {
            return Err(ConfigError::Validation(
                "max_results_per_query must be positive".to_string(),
            ));
        }
        if !self.credibility_threshold.is_finite() || self.credibility_threshold < 0.0 {
            return Err(ConfigError::Validation(format!(
                "credibility_threshold must be a finite value >= 0, got {}",
                self.credibility_threshold
            )));
        }
        Ok(())
    }
}

/// The structured result of one completed run, intended for serialization to
/// a persisted JSON artifact by an external writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub request: CollectionRequest,
    pub summary: RunSummary,
    pub top_insights: Vec<ScoredPost>,
    pub high_credibility_insights: Vec<ScoredPost>,
    /// The full deduplicated scored set, superset of both insight views.
    pub posts: Vec<ScoredPost>,
}
