//! Reddit listing payload types for the search endpoint.
//!
//! Observed shape from `oauth.reddit.com/r/<subs>/search`:
//!
//! - The listing wrapper is `{"data": {"children": [{"data": {...}}], "after": ...}}`.
//! - `name` is the stable fullname (`t3_<id>`); `id` is the bare id. We prefer
//!   `name` and fall back to `id`.
//! - `selftext` is `""` (not null) for link posts, but older mirrors have been
//!   seen omitting it — every field except the wrapper itself is `Option` and
//!   item-level validation happens in `normalize`.
//! - `created_utc` arrives as a float epoch (`1724630000.0`).
//! - `upvote_ratio` is only present on some listing endpoints; missing means
//!   "unknown", not zero.
//! - `score` can be negative for heavily downvoted posts; we floor at zero in
//!   normalization.

use serde::Deserialize;

/// Top-level search listing wrapper.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Child {
    pub data: PostPayload,
}

/// One post item as Reddit returns it; all fields lenient.
#[derive(Debug, Default, Deserialize)]
pub struct PostPayload {
    pub name: Option<String>,
    pub id: Option<String>,
    pub subreddit: Option<String>,
    pub title: Option<String>,
    pub selftext: Option<String>,
    pub created_utc: Option<f64>,
    pub score: Option<i64>,
    pub upvote_ratio: Option<f64>,
    pub num_comments: Option<i64>,
    pub permalink: Option<String>,
    pub url: Option<String>,
}

/// OAuth token response from the client-credentials exchange.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
