//! Collection/scoring/ranking pipeline for redintel.
//!
//! One run fans queries out across topical collection categories, merges and
//! deduplicates the results, computes a composite credibility score per post,
//! and produces ranked insight views plus run-level aggregate statistics.
//! Report generation consumes the result through [`prompt`]; everything past
//! that (LLM calls, persistence) lives outside this crate.

pub mod aggregate;
pub mod categories;
pub mod collector;
pub mod dedup;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod rank;
pub mod retry;
pub mod scorer;

pub use categories::{default_categories, CategoryDef};
pub use collector::{CategoryOutcome, CollectorConfig};
pub use error::PipelineError;
pub use orchestrator::{Orchestrator, PipelineConfig, RunState};
pub use prompt::{market_analysis_prompt, risk_assessment_prompt};
pub use scorer::score_post;
