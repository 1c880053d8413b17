use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use redintel_analysis::{AnalysisProvider, ChatCompletionsProvider};
use redintel_core::{
    AppConfig, CollectionRequest, CredibilityTable, RunResult, TimeHorizon,
    DEFAULT_CREDIBILITY_THRESHOLD, DEFAULT_MAX_RESULTS_PER_QUERY,
};
use redintel_pipeline::{
    market_analysis_prompt, risk_assessment_prompt, Orchestrator, PipelineConfig,
};
use redintel_reddit::RedditClient;
use tracing_subscriber::EnvFilter;

const REPORT_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Parser)]
#[command(name = "redintel")]
#[command(about = "Reddit market intelligence collection and scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect, score, and rank discussion for the given target terms.
    Run {
        /// Ticker or keyword to collect for; repeatable.
        #[arg(long = "term", required = true)]
        terms: Vec<String>,

        /// Collection window: day, week, or month.
        #[arg(long, default_value = "week")]
        horizon: String,

        /// Per-query result cap.
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS_PER_QUERY)]
        max_results: usize,

        /// Credibility threshold for the high-credibility view.
        #[arg(long, default_value_t = DEFAULT_CREDIBILITY_THRESHOLD)]
        threshold: f64,

        /// Size of the top-insights view.
        #[arg(long, default_value_t = 30)]
        top: usize,

        /// Where to write the run artifact.
        #[arg(long, default_value = "out/run.json")]
        out: PathBuf,

        /// Also generate market and risk reports through an LLM provider.
        #[arg(long)]
        report: bool,

        /// Which provider backs report generation.
        #[arg(long, value_enum, default_value_t = ProviderChoice::Deepseek)]
        provider: ProviderChoice,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderChoice {
    Deepseek,
    Qwen,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = redintel_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            terms,
            horizon,
            max_results,
            threshold,
            top,
            out,
            report,
            provider,
        } => {
            let horizon: TimeHorizon = horizon.parse()?;
            let request = CollectionRequest {
                target_terms: terms,
                time_horizon: horizon,
                max_results_per_query: max_results,
                credibility_threshold: threshold,
            };

            let table = match &config.channels_path {
                Some(path) => CredibilityTable::load(path)?,
                None => CredibilityTable::builtin(),
            };

            let client = RedditClient::connect(&config).await?;
            let mut pipeline_config = PipelineConfig::from_app_config(&config);
            pipeline_config.top_insights_limit = top;
            let orchestrator = Orchestrator::new(client, table, pipeline_config);

            let result = orchestrator.run(&request).await?;
            if !result.summary.failed_categories.is_empty() {
                tracing::warn!(
                    failed = ?result.summary.failed_categories,
                    "run completed with failed categories; results are partial"
                );
            }

            write_artifact(&out, &result)?;
            println!(
                "run {} complete: {} posts, {} top insights, {} high-credibility -> {}",
                result.run_id,
                result.summary.total_posts,
                result.top_insights.len(),
                result.high_credibility_insights.len(),
                out.display()
            );

            if report {
                generate_reports(&config, provider, &result, &out).await?;
            }
        }
    }

    Ok(())
}

fn write_artifact(out: &Path, result: &RunResult) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

/// Generates the market and risk reports next to the artifact. Report
/// failures degrade to a warning; the run artifact is already on disk.
async fn generate_reports(
    config: &AppConfig,
    choice: ProviderChoice,
    result: &RunResult,
    artifact: &Path,
) -> anyhow::Result<()> {
    let provider = match choice {
        ProviderChoice::Deepseek => {
            let key = config
                .deepseek_api_key
                .clone()
                .context("DEEPSEEK_API_KEY is required for --provider deepseek")?;
            ChatCompletionsProvider::deepseek(key, config.http_timeout_secs)?
        }
        ProviderChoice::Qwen => {
            let key = config
                .qwen_api_key
                .clone()
                .context("QWEN_API_KEY is required for --provider qwen")?;
            ChatCompletionsProvider::qwen(key, config.http_timeout_secs)?
        }
    };

    let reports = [
        ("market", market_analysis_prompt(result)),
        ("risk", risk_assessment_prompt(result)),
    ];
    for (kind, prompt) in reports {
        match provider.generate(&prompt, REPORT_MAX_TOKENS).await {
            Ok(text) => {
                let path = report_path(artifact, kind);
                std::fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("{kind} report -> {}", path.display());
            }
            Err(e) => {
                tracing::warn!(report = kind, error = %e, "report generation failed; skipping");
            }
        }
    }
    Ok(())
}

fn report_path(artifact: &Path, kind: &str) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "run".to_string(), |s| s.to_string_lossy().into_owned());
    artifact.with_file_name(format!("{stem}.{kind}.md"))
}
