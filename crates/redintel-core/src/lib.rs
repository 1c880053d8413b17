//! Core domain types and configuration for redintel.
//!
//! Holds the data model shared by the Reddit source client and the
//! collection/scoring pipeline: posts, scores, run summaries, the channel
//! credibility table, and the env-driven application configuration.

pub mod app_config;
pub mod config;
pub mod credibility;
pub mod error;
pub mod source;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use credibility::{CredibilityTable, UNKNOWN_CHANNEL_PRESTIGE};
pub use error::ConfigError;
pub use source::{SearchSource, SourceError};
pub use types::{
    CollectionRequest, RawPost, RunResult, RunSummary, ScoreBreakdown, ScoredPost, SymbolCount,
    TimeHorizon, DEFAULT_CREDIBILITY_THRESHOLD, DEFAULT_MAX_RESULTS_PER_QUERY,
};
