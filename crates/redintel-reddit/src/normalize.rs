//! Normalization from Reddit wire payloads to [`RawPost`] records.
//!
//! A payload item missing its identity, title, or timestamp is unusable for
//! scoring; [`normalize_post`] rejects it with a reason and the caller drops
//! that single item and continues — one malformed item never fails a query.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use redintel_core::RawPost;
use regex::Regex;

use crate::wire::PostPayload;

/// Uppercase tokens that look like tickers but never are.
const SYMBOL_STOPLIST: &[&str] = &[
    "A", "I", "AI", "ALL", "AM", "AND", "ANY", "ARE", "ATH", "BE", "BIG", "BUY", "CALL", "CEO",
    "CFO", "CPI", "DD", "DOW", "EDIT", "EOD", "EPS", "ETF", "EU", "FED", "FOR", "FROM", "GDP",
    "HAS", "HOLD", "IMO", "IPO", "IS", "IT", "LOL", "NEW", "NOT", "NOW", "ON", "OR", "PE", "PUT",
    "SEC", "SELL", "SO", "THE", "TLDR", "TO", "UP", "US", "USA", "USD", "WSB", "YOLO",
];

/// Normalizes one listing item into a [`RawPost`].
///
/// `category_tags` starts empty; the collector stamps the category whose
/// query found the post.
///
/// # Errors
///
/// Returns a human-readable reason when the item lacks an id, a title, or a
/// creation timestamp.
pub fn normalize_post(payload: PostPayload) -> Result<RawPost, String> {
    let id = payload
        .name
        .or(payload.id)
        .filter(|s| !s.is_empty())
        .ok_or("missing post id")?;
    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or("missing title")?;
    let created_at = payload
        .created_utc
        .and_then(epoch_to_datetime)
        .ok_or("missing or invalid created_utc")?;

    let channel = payload.subreddit.unwrap_or_default().to_lowercase();
    let body = payload.selftext.unwrap_or_default();

    // Negative scores exist on brigaded posts; the scorer expects a
    // non-negative count.
    let upvotes = u64::try_from(payload.score.unwrap_or(0).max(0)).unwrap_or(0);
    let comment_count = u64::try_from(payload.num_comments.unwrap_or(0).max(0)).unwrap_or(0);

    let upvote_ratio = payload.upvote_ratio.filter(|r| (0.0..=1.0).contains(r));

    let url = payload
        .permalink
        .map(|p| format!("https://reddit.com{p}"))
        .or(payload.url)
        .unwrap_or_default();

    let mentioned_symbols = extract_symbols(&format!("{title} {body}"));

    Ok(RawPost {
        id,
        channel,
        title,
        body,
        created_at,
        upvotes,
        upvote_ratio,
        comment_count,
        url,
        category_tags: BTreeSet::new(),
        mentioned_symbols,
    })
}

/// Extracts ticker-like tokens: `$TSLA` style cashtags (any case) and bare
/// uppercase 2–5 letter words not on the stoplist.
#[must_use]
pub fn extract_symbols(text: &str) -> BTreeSet<String> {
    let cashtag = Regex::new(r"\$([A-Za-z]{1,5})\b").expect("valid cashtag regex");
    let bare = Regex::new(r"\b([A-Z]{2,5})\b").expect("valid bare-symbol regex");

    let mut symbols = BTreeSet::new();
    for cap in cashtag.captures_iter(text) {
        symbols.insert(cap[1].to_uppercase());
    }
    for cap in bare.captures_iter(text) {
        let token = &cap[1];
        if !SYMBOL_STOPLIST.contains(&token) {
            symbols.insert(token.to_string());
        }
    }
    symbols
}

fn epoch_to_datetime(epoch: f64) -> Option<DateTime<Utc>> {
    if !epoch.is_finite() || epoch <= 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    DateTime::from_timestamp(epoch as i64, 0)
}
