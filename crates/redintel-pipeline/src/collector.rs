//! Concurrent per-category collection with partial-failure tolerance.
//!
//! One worker per category, run through a bounded `buffer_unordered` pool.
//! Workers share nothing except the source's internal rate gate; each appends
//! to its own result list, and the orchestrator reads the union after the
//! join. A category fails only when every one of its queries fails after
//! retries — one category's outcome never affects another's.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use redintel_core::{CollectionRequest, RawPost, SearchSource, TimeHorizon};

use crate::categories::CategoryDef;
use crate::retry::retry_with_backoff;

/// Collector tuning, derived from the application config.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub max_retries: u32,
    pub backoff_base_secs: u64,
    pub max_concurrent_categories: usize,
    /// Minimum combined title+body length; shorter posts are discarded at
    /// ingestion (content-depth gate).
    pub min_content_len: usize,
    /// Whole-run timeout budget. Workers still in flight at the deadline are
    /// abandoned and their categories recorded as failed.
    pub run_timeout: std::time::Duration,
}

/// Result of one category worker.
#[derive(Debug)]
pub struct CategoryOutcome {
    pub name: &'static str,
    pub posts: Vec<RawPost>,
    /// `true` when every query in the category failed. An empty-but-
    /// successful category is not a failure.
    pub failed: bool,
}

/// Runs all category workers and returns their outcomes in category
/// declaration order, regardless of completion order.
pub async fn collect_categories<S: SearchSource + Sync>(
    source: &S,
    categories: &'static [CategoryDef],
    request: &CollectionRequest,
    config: &CollectorConfig,
    now: DateTime<Utc>,
) -> Vec<CategoryOutcome> {
    let deadline = tokio::time::Instant::now() + config.run_timeout;

    let mut outcomes: Vec<(usize, CategoryOutcome)> = stream::iter(categories.iter().enumerate())
        .map(|(idx, category)| async move {
            let worker = collect_category(source, category, request, config, now);
            match tokio::time::timeout_at(deadline, worker).await {
                Ok(outcome) => (idx, outcome),
                Err(_) => {
                    tracing::warn!(
                        category = category.name,
                        "run deadline reached — abandoning in-flight category worker"
                    );
                    (
                        idx,
                        CategoryOutcome {
                            name: category.name,
                            posts: Vec::new(),
                            failed: true,
                        },
                    )
                }
            }
        })
        .buffer_unordered(config.max_concurrent_categories.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|(idx, _)| *idx);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

async fn collect_category<S: SearchSource + Sync>(
    source: &S,
    category: &CategoryDef,
    request: &CollectionRequest,
    config: &CollectorConfig,
    now: DateTime<Utc>,
) -> CategoryOutcome {
    let channels = category.channel_vec();
    let mut posts = Vec::new();
    let mut total_queries = 0usize;
    let mut failed_queries = 0usize;

    for term in &request.target_terms {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        total_queries += 1;
        let query = category.query(term);

        let result = retry_with_backoff(config.max_retries, config.backoff_base_secs, || {
            source.search(
                &channels,
                &query,
                category.sort,
                request.time_horizon,
                request.max_results_per_query,
            )
        })
        .await;

        match result {
            Ok(batch) => {
                let fetched = batch.len();
                let kept = ingest(batch, category.name, term, now, request.time_horizon, config);
                tracing::debug!(
                    category = category.name,
                    query = %query,
                    fetched,
                    kept = kept.len(),
                    "query completed"
                );
                posts.extend(kept);
            }
            Err(e) => {
                tracing::warn!(
                    category = category.name,
                    query = %query,
                    error = %e,
                    "query failed after retries"
                );
                failed_queries += 1;
            }
        }
    }

    let failed = total_queries > 0 && failed_queries == total_queries;
    if failed {
        tracing::warn!(
            category = category.name,
            queries = total_queries,
            "all queries failed — recording category as failed"
        );
    }

    CategoryOutcome {
        name: category.name,
        posts,
        failed,
    }
}

/// Applies the ingestion gates and stamps category/term provenance.
///
/// Discards posts whose combined title+body length is below the content
/// threshold and posts whose `created_at` falls outside the requested
/// horizon (the source does not perfectly honor its own horizon filter).
fn ingest(
    batch: Vec<RawPost>,
    category: &str,
    term: &str,
    now: DateTime<Utc>,
    horizon: TimeHorizon,
    config: &CollectorConfig,
) -> Vec<RawPost> {
    let cutoff = now - horizon.window();

    batch
        .into_iter()
        .filter_map(|mut post| {
            if post.title.len() + post.body.len() < config.min_content_len {
                tracing::debug!(id = %post.id, "dropping post below content-depth gate");
                return None;
            }
            if post.created_at < cutoff {
                tracing::debug!(
                    id = %post.id,
                    created_at = %post.created_at,
                    "dropping post outside time horizon"
                );
                return None;
            }
            post.category_tags.insert(category.to_string());
            if is_ticker_like(term) {
                post.mentioned_symbols.insert(term.to_uppercase());
            }
            Some(post)
        })
        .collect()
}

/// A target term counts as a ticker when it is 1–5 ASCII letters.
fn is_ticker_like(term: &str) -> bool {
    (1..=5).contains(&term.len()) && term.bytes().all(|b| b.is_ascii_alphabetic())
}
