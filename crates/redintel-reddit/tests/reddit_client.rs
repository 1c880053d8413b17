//! Integration tests for `RedditClient` against a wiremock stub.
//!
//! Covers the token exchange, the search happy path (including dropping a
//! malformed listing item), and every error classification the search call
//! can produce. No real network traffic is made.

use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use redintel_core::{AppConfig, SearchSource, SourceError, TimeHorizon};
use redintel_reddit::RedditClient;

fn test_config() -> AppConfig {
    AppConfig {
        reddit_client_id: "test-id".to_string(),
        reddit_client_secret: "test-secret".to_string(),
        reddit_user_agent: "redintel-test/0.1".to_string(),
        channels_path: None,
        log_level: "info".to_string(),
        http_timeout_secs: 5,
        max_retries: 0,
        backoff_base_secs: 0,
        // No pacing in tests: assertions should not wait on the gate.
        rate_interval_ms: 0,
        max_concurrent_categories: 4,
        run_timeout_secs: 30,
        min_content_len: 20,
        deepseek_api_key: None,
        qwen_api_key: None,
    }
}

async fn mount_token_exchange(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(basic_auth("test-id", "test-secret"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&json!({"access_token": "test-token"})),
        )
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> RedditClient {
    RedditClient::connect_to(&server.uri(), &server.uri(), &test_config())
        .await
        .expect("failed to connect test RedditClient")
}

fn listing_item(id: &str, title: &str) -> serde_json::Value {
    json!({
        "data": {
            "name": id,
            "subreddit": "investing",
            "title": title,
            "selftext": "Some body text discussing the market.",
            "created_utc": 1_724_630_000.0,
            "score": 42,
            "upvote_ratio": 0.88,
            "num_comments": 7,
            "permalink": format!("/r/investing/comments/{id}/x/")
        }
    })
}

#[tokio::test]
async fn connect_fails_with_auth_error_on_rejected_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = RedditClient::connect_to(&server.uri(), &server.uri(), &test_config()).await;
    assert!(
        matches!(result, Err(SourceError::Auth { status: 401 })),
        "expected Auth(401), got: {result:?}"
    );
}

#[tokio::test]
async fn connect_fails_with_malformed_on_bad_token_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = RedditClient::connect_to(&server.uri(), &server.uri(), &test_config()).await;
    assert!(
        matches!(result, Err(SourceError::Malformed { .. })),
        "expected Malformed, got: {result:?}"
    );
}

#[tokio::test]
async fn search_returns_normalized_posts() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/investing+stocks/search"))
        .and(query_param("q", "TSLA"))
        .and(query_param("restrict_sr", "true"))
        .and(query_param("t", "week"))
        .and(query_param("sort", "hot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": {
                "children": [
                    listing_item("t3_one", "TSLA quarterly delivery discussion"),
                    listing_item("t3_two", "Margin outlook for TSLA"),
                ],
                "after": null
            }
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let channels = vec!["investing".to_string(), "stocks".to_string()];
    let posts = client
        .search(&channels, "TSLA", "hot", TimeHorizon::Week, 25)
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, "t3_one");
    assert_eq!(posts[0].channel, "investing");
    assert_eq!(posts[0].upvotes, 42);
    assert!(posts[0].mentioned_symbols.contains("TSLA"));
}

#[tokio::test]
async fn search_drops_malformed_items_and_keeps_the_rest() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/investing/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": {
                "children": [
                    listing_item("t3_good", "A valid post about NVDA"),
                    // No title and no created_utc: dropped at normalization.
                    {"data": {"name": "t3_bad", "subreddit": "investing"}},
                ],
                "after": null
            }
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let channels = vec!["investing".to_string()];
    let posts = client
        .search(&channels, "NVDA", "relevance", TimeHorizon::Day, 25)
        .await
        .unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "t3_good");
}

#[tokio::test]
async fn search_classifies_429_as_rate_limited_with_retry_after() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/stocks/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let channels = vec!["stocks".to_string()];
    let result = client
        .search(&channels, "NVDA", "hot", TimeHorizon::Day, 25)
        .await;

    assert!(
        matches!(
            result,
            Err(SourceError::RateLimited {
                retry_after_secs: 17
            })
        ),
        "expected RateLimited(17), got: {result:?}"
    );
}

#[tokio::test]
async fn search_classifies_403_as_auth() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/stocks/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let channels = vec!["stocks".to_string()];
    let result = client
        .search(&channels, "NVDA", "hot", TimeHorizon::Day, 25)
        .await;

    assert!(
        matches!(result, Err(SourceError::Auth { status: 403 })),
        "expected Auth(403), got: {result:?}"
    );
}

#[tokio::test]
async fn search_classifies_500_as_unexpected_status() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/stocks/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let channels = vec!["stocks".to_string()];
    let result = client
        .search(&channels, "NVDA", "hot", TimeHorizon::Day, 25)
        .await;

    assert!(
        matches!(result, Err(SourceError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn search_classifies_bad_listing_body_as_malformed() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/stocks/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let channels = vec!["stocks".to_string()];
    let result = client
        .search(&channels, "NVDA", "hot", TimeHorizon::Day, 25)
        .await;

    assert!(
        matches!(result, Err(SourceError::Malformed { .. })),
        "expected Malformed, got: {result:?}"
    );
}

#[tokio::test]
async fn search_sends_bearer_token_and_user_agent() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/stocks/search"))
        .and(wiremock::matchers::header(
            "Authorization",
            "Bearer test-token",
        ))
        .and(wiremock::matchers::header(
            "User-Agent",
            "redintel-test/0.1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": {"children": [], "after": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let channels = vec!["stocks".to_string()];
    let posts = client
        .search(&channels, "SPY", "top", TimeHorizon::Month, 10)
        .await
        .unwrap();
    assert!(posts.is_empty());
}
