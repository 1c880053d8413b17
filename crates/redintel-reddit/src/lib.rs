//! Reddit search client for redintel.
//!
//! Exchanges client credentials for an OAuth token, searches subreddit sets
//! through `oauth.reddit.com`, and normalizes listing payloads into
//! [`redintel_core::RawPost`] records. All outbound calls pass through a
//! single shared [`RateGate`] so concurrent pipeline workers never exceed the
//! configured call rate together.

pub mod client;
pub mod normalize;
pub mod rate_gate;
pub mod wire;

pub use client::RedditClient;
pub use normalize::normalize_post;
pub use rate_gate::RateGate;
