use redintel_core::ConfigError;
use thiserror::Error;

/// Run-level failures. Item-level and category-level failures are absorbed
/// into the run summary; only these two conditions abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid collection request: {0}")]
    Config(#[from] ConfigError),

    #[error("all {total} collection categories failed")]
    AllCategoriesFailed { total: usize },
}
