//! Run orchestration: the stage state machine around one collection run.
//!
//! Stages always advance in the same order. Item- and category-level
//! failures are absorbed into the summary; the run only fails on an invalid
//! request or when every category fails.

use chrono::Utc;
use redintel_core::{
    AppConfig, CollectionRequest, CredibilityTable, RunResult, RunSummary, ScoredPost,
    SearchSource,
};
use uuid::Uuid;

use crate::aggregate::summarize;
use crate::categories::{default_categories, CategoryDef};
use crate::collector::{collect_categories, CollectorConfig};
use crate::dedup::merge_outcomes;
use crate::error::PipelineError;
use crate::rank::{high_credibility_insights, sort_ranked, top_insights, TOP_INSIGHTS_LIMIT};
use crate::scorer::score_post;

/// Pipeline stage marker, logged on each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Collecting,
    Deduplicating,
    Scoring,
    Ranking,
    Summarizing,
    Completed,
    Failed,
}

impl RunState {
    /// The stage that follows this one in a successful run.
    #[must_use]
    pub fn next(self) -> RunState {
        match self {
            RunState::Initialized => RunState::Collecting,
            RunState::Collecting => RunState::Deduplicating,
            RunState::Deduplicating => RunState::Scoring,
            RunState::Scoring => RunState::Ranking,
            RunState::Ranking => RunState::Summarizing,
            RunState::Summarizing | RunState::Completed => RunState::Completed,
            RunState::Failed => RunState::Failed,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Initialized => "initialized",
            RunState::Collecting => "collecting",
            RunState::Deduplicating => "deduplicating",
            RunState::Scoring => "scoring",
            RunState::Ranking => "ranking",
            RunState::Summarizing => "summarizing",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Pipeline tuning, independent of where the values came from.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub collector: CollectorConfig,
    pub top_insights_limit: usize,
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            collector: CollectorConfig {
                max_retries: config.max_retries,
                backoff_base_secs: config.backoff_base_secs,
                max_concurrent_categories: config.max_concurrent_categories,
                min_content_len: config.min_content_len,
                run_timeout: std::time::Duration::from_secs(config.run_timeout_secs),
            },
            top_insights_limit: TOP_INSIGHTS_LIMIT,
        }
    }
}

/// Drives one run end to end against a search source.
pub struct Orchestrator<S> {
    source: S,
    table: CredibilityTable,
    categories: &'static [CategoryDef],
    config: PipelineConfig,
}

impl<S: SearchSource + Sync> Orchestrator<S> {
    #[must_use]
    pub fn new(source: S, table: CredibilityTable, config: PipelineConfig) -> Self {
        Self {
            source,
            table,
            categories: default_categories(),
            config,
        }
    }

    /// Same as [`Orchestrator::new`] with a custom category set. Used by
    /// tests; production runs use the default categories.
    #[must_use]
    pub fn with_categories(
        source: S,
        table: CredibilityTable,
        categories: &'static [CategoryDef],
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            table,
            categories,
            config,
        }
    }

    /// The underlying search source.
    #[must_use]
    pub fn source_ref(&self) -> &S {
        &self.source
    }

    /// Executes one collection run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] when the request fails validation
    /// and [`PipelineError::AllCategoriesFailed`] when no category produced
    /// a usable result. Partial failure is not an error; failed categories
    /// are recorded in the summary.
    pub async fn run(&self, request: &CollectionRequest) -> Result<RunResult, PipelineError> {
        let run_id = Uuid::new_v4();
        let mut state = RunState::Initialized;
        tracing::info!(%run_id, %state, terms = ?request.target_terms, "run started");

        if let Err(e) = request.validate() {
            fail(run_id, state);
            tracing::error!(%run_id, error = %e, "request rejected");
            return Err(PipelineError::Config(e));
        }

        // One captured instant for horizon gating and recency scoring, so
        // every post in the run is scored against the same clock.
        let now = Utc::now();

        state = transition(run_id, state);
        let outcomes =
            collect_categories(&self.source, self.categories, request, &self.config.collector, now)
                .await;

        let failed_categories: std::collections::BTreeSet<String> = outcomes
            .iter()
            .filter(|o| o.failed)
            .map(|o| o.name.to_string())
            .collect();
        if failed_categories.len() == outcomes.len() && !outcomes.is_empty() {
            fail(run_id, state);
            tracing::error!(%run_id, total = outcomes.len(), "every category failed");
            return Err(PipelineError::AllCategoriesFailed {
                total: outcomes.len(),
            });
        }

        state = transition(run_id, state);
        let merged = merge_outcomes(&outcomes);
        tracing::info!(%run_id, unique_posts = merged.len(), "merged category results");

        state = transition(run_id, state);
        let mut posts: Vec<ScoredPost> = merged
            .into_values()
            .map(|post| score_post(post, now, &self.table, request.time_horizon))
            .collect();

        state = transition(run_id, state);
        sort_ranked(&mut posts);
        let top = top_insights(&posts, self.config.top_insights_limit);
        let high = high_credibility_insights(&posts, request.credibility_threshold);

        state = transition(run_id, state);
        let summary = RunSummary {
            failed_categories,
            ..summarize(&posts)
        };

        state = transition(run_id, state);
        tracing::info!(
            %run_id,
            %state,
            total_posts = summary.total_posts,
            failed_categories = summary.failed_categories.len(),
            "run completed"
        );

        Ok(RunResult {
            run_id,
            generated_at: now,
            request: request.clone(),
            summary,
            top_insights: top,
            high_credibility_insights: high,
            posts,
        })
    }
}

fn transition(run_id: Uuid, state: RunState) -> RunState {
    let next = state.next();
    tracing::info!(%run_id, from = %state, to = %next, "stage transition");
    next
}

/// Logs the transition into the terminal failed state on a fatal condition.
fn fail(run_id: Uuid, state: RunState) {
    tracing::error!(%run_id, from = %state, to = %RunState::Failed, "stage transition");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_advance_in_fixed_order() {
        let order = [
            RunState::Initialized,
            RunState::Collecting,
            RunState::Deduplicating,
            RunState::Scoring,
            RunState::Ranking,
            RunState::Summarizing,
            RunState::Completed,
        ];
        for pair in order.windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
        }
    }

    #[test]
    fn terminal_states_are_absorbing() {
        assert_eq!(RunState::Completed.next(), RunState::Completed);
        assert_eq!(RunState::Failed.next(), RunState::Failed);
    }

    #[test]
    fn state_display_is_lowercase() {
        assert_eq!(RunState::Deduplicating.to_string(), "deduplicating");
    }
}
