use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    /// Optional YAML file overriding the built-in channel prestige table.
    pub channels_path: Option<PathBuf>,
    pub log_level: String,
    pub http_timeout_secs: u64,
    /// Retry attempts after the first failure for transient source errors.
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff: `base * 2^attempt`.
    pub backoff_base_secs: u64,
    /// Minimum spacing between outbound source calls, shared across all
    /// concurrent category workers.
    pub rate_interval_ms: u64,
    pub max_concurrent_categories: usize,
    /// Timeout budget for a whole pipeline run.
    pub run_timeout_secs: u64,
    /// Minimum combined title+body length for a post to enter the pipeline.
    pub min_content_len: usize,
    pub deepseek_api_key: Option<String>,
    pub qwen_api_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("reddit_client_id", &"[redacted]")
            .field("reddit_client_secret", &"[redacted]")
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("channels_path", &self.channels_path)
            .field("log_level", &self.log_level)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .field("rate_interval_ms", &self.rate_interval_ms)
            .field("max_concurrent_categories", &self.max_concurrent_categories)
            .field("run_timeout_secs", &self.run_timeout_secs)
            .field("min_content_len", &self.min_content_len)
            .field(
                "deepseek_api_key",
                &self.deepseek_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "qwen_api_key",
                &self.qwen_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
