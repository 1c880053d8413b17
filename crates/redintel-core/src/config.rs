use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let reddit_client_id = require("REDINTEL_REDDIT_CLIENT_ID")?;
    let reddit_client_secret = require("REDINTEL_REDDIT_CLIENT_SECRET")?;
    let reddit_user_agent = or_default(
        "REDINTEL_REDDIT_USER_AGENT",
        "redintel/0.1 (market-intelligence)",
    );

    let channels_path = lookup("REDINTEL_CHANNELS_PATH").ok().map(PathBuf::from);
    let log_level = or_default("REDINTEL_LOG_LEVEL", "info");

    let http_timeout_secs = parse_u64("REDINTEL_HTTP_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("REDINTEL_MAX_RETRIES", "3")?;
    let backoff_base_secs = parse_u64("REDINTEL_BACKOFF_BASE_SECS", "1")?;
    let rate_interval_ms = parse_u64("REDINTEL_RATE_INTERVAL_MS", "1000")?;
    let max_concurrent_categories = parse_usize("REDINTEL_MAX_CONCURRENT_CATEGORIES", "4")?;
    let run_timeout_secs = parse_u64("REDINTEL_RUN_TIMEOUT_SECS", "300")?;
    let min_content_len = parse_usize("REDINTEL_MIN_CONTENT_LEN", "20")?;

    let deepseek_api_key = lookup("DEEPSEEK_API_KEY").ok();
    let qwen_api_key = lookup("QWEN_API_KEY").ok();

    Ok(AppConfig {
        reddit_client_id,
        reddit_client_secret,
        reddit_user_agent,
        channels_path,
        log_level,
        http_timeout_secs,
        max_retries,
        backoff_base_secs,
        rate_interval_ms,
        max_concurrent_categories,
        run_timeout_secs,
        min_content_len,
        deepseek_api_key,
        qwen_api_key,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
