//! OAuth2 client-credentials Reddit search client.

use std::sync::Arc;
use std::time::Duration;

use redintel_core::{AppConfig, RawPost, SearchSource, SourceError, TimeHorizon};

use crate::normalize::normalize_post;
use crate::rate_gate::RateGate;
use crate::wire::{Listing, TokenResponse};

const AUTH_BASE: &str = "https://www.reddit.com";
const API_BASE: &str = "https://oauth.reddit.com";

/// Reddit API client holding a valid access token and the shared rate gate.
///
/// Every search call passes through the gate before going out, so concurrent
/// pipeline workers sharing one client never together exceed the configured
/// call rate.
#[derive(Debug)]
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    user_agent: String,
    api_base: String,
    gate: Arc<RateGate>,
}

impl RedditClient {
    /// Create a client by exchanging client credentials for a token against
    /// the production Reddit endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Auth`] if the credentials are rejected, or the
    /// corresponding [`SourceError`] variant for network and payload failures.
    pub async fn connect(config: &AppConfig) -> Result<Self, SourceError> {
        Self::connect_to(AUTH_BASE, API_BASE, config).await
    }

    /// Like [`Self::connect`], with explicit auth/API base URLs. Used by
    /// tests to point at a stub server.
    ///
    /// # Errors
    ///
    /// Same as [`Self::connect`].
    pub async fn connect_to(
        auth_base: &str,
        api_base: &str,
        config: &AppConfig,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SourceError::Http {
                context: format!("failed to build HTTP client: {e}"),
            })?;

        let token = Self::fetch_token(
            &client,
            auth_base,
            &config.reddit_client_id,
            &config.reddit_client_secret,
            &config.reddit_user_agent,
        )
        .await?;

        Ok(Self {
            client,
            token,
            user_agent: config.reddit_user_agent.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
            gate: Arc::new(RateGate::new(Duration::from_millis(config.rate_interval_ms))),
        })
    }

    async fn fetch_token(
        client: &reqwest::Client,
        auth_base: &str,
        client_id: &str,
        client_secret: &str,
        user_agent: &str,
    ) -> Result<String, SourceError> {
        let url = format!("{}/api/v1/access_token", auth_base.trim_end_matches('/'));
        let response = client
            .post(&url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| SourceError::Http {
                context: format!("token exchange: {e}"),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| SourceError::Malformed {
            context: "token exchange response".to_string(),
            reason: e.to_string(),
        })?;

        Ok(token.access_token)
    }
}

impl SearchSource for RedditClient {
    /// Searches the joined channel set (`/r/a+b+c/search`) with
    /// `restrict_sr=true` and the horizon's `t=` filter.
    ///
    /// Malformed individual items are dropped with a debug log; the query
    /// only fails when the request or the listing wrapper itself fails.
    async fn search(
        &self,
        channels: &[String],
        query: &str,
        sort: &str,
        horizon: TimeHorizon,
        limit: usize,
    ) -> Result<Vec<RawPost>, SourceError> {
        self.gate.acquire().await;

        let joined = channels.join("+");
        let url = format!("{}/r/{joined}/search", self.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("q", query),
                ("restrict_sr", "true"),
                ("sort", sort),
                ("t", horizon.as_str()),
                ("limit", &limit.to_string()),
                ("raw_json", "1"),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Http {
                context: format!("search request to r/{joined}: {e}"),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(SourceError::RateLimited { retry_after_secs });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Http {
            context: format!("reading search response body: {e}"),
        })?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| SourceError::Malformed {
                context: format!("search listing from r/{joined}"),
                reason: e.to_string(),
            })?;

        let mut posts = Vec::with_capacity(listing.data.children.len());
        for child in listing.data.children {
            match normalize_post(child.data) {
                Ok(post) => posts.push(post),
                Err(reason) => {
                    tracing::debug!(channels = %joined, reason, "dropping malformed listing item");
                }
            }
        }

        tracing::debug!(
            channels = %joined,
            query,
            sort,
            horizon = %horizon,
            count = posts.len(),
            "search returned posts"
        );

        Ok(posts)
    }
}
