//! OpenAI-compatible chat-completions client.
//!
//! DeepSeek and Qwen (DashScope compatible mode) expose the same request and
//! response shape; the providers differ only in base URL, model name, and
//! API key. One client type covers both.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, AnalysisProvider};

pub const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com";
pub const QWEN_API_BASE: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

const DEEPSEEK_MODEL: &str = "deepseek-chat";
const QWEN_MODEL: &str = "qwen-plus";

const SYSTEM_PROMPT: &str = "You are an expert financial analyst analyzing \
    Reddit sentiment and discussions for market intelligence.";

/// Sampling temperature for report generation. Low, for consistent output.
const TEMPERATURE: f64 = 0.3;

/// Chat-completions client for one vendor endpoint.
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// DeepSeek-backed provider.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] when the HTTP client cannot be built.
    pub fn deepseek(api_key: String, timeout_secs: u64) -> Result<Self, AnalysisError> {
        Self::new(DEEPSEEK_API_BASE.to_string(), DEEPSEEK_MODEL, api_key, timeout_secs)
    }

    /// Qwen-backed provider via DashScope's OpenAI-compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] when the HTTP client cannot be built.
    pub fn qwen(api_key: String, timeout_secs: u64) -> Result<Self, AnalysisError> {
        Self::new(QWEN_API_BASE.to_string(), QWEN_MODEL, api_key, timeout_secs)
    }

    /// Provider against an arbitrary compatible endpoint. Tests point this
    /// at a local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] when the HTTP client cannot be built.
    pub fn new(
        api_base: String,
        model: &str,
        api_key: String,
        timeout_secs: u64,
    ) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Http {
                context: format!("building HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_base,
            model: model.to_string(),
            api_key,
        })
    }
}

impl AnalysisProvider for ChatCompletionsProvider {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Http {
                context: format!("POST {url}: {e}"),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnalysisError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AnalysisError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(AnalysisError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| AnalysisError::Malformed {
            reason: format!("decoding completion: {e}"),
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AnalysisError::Malformed {
                reason: "completion carried no choices".to_string(),
            })?;

        tracing::debug!(model = %self.model, chars = content.len(), "completion received");
        Ok(content)
    }
}
