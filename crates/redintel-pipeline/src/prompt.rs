//! Prompt rendering for the analysis providers.
//!
//! Pure string building over a completed [`RunResult`]; the same result
//! always renders the same prompt text.

use std::fmt::Write as _;

use redintel_core::{RunResult, ScoredPost};

/// How many insight lines each prompt carries.
const PROMPT_INSIGHT_LIMIT: usize = 15;

/// Renders the market-analysis prompt from a completed run.
#[must_use]
pub fn market_analysis_prompt(result: &RunResult) -> String {
    let mut prompt = String::new();
    let terms = result.request.target_terms.join(", ");
    let _ = writeln!(
        prompt,
        "Analyze the following Reddit market discussion collected for: {terms}"
    );
    let _ = writeln!(
        prompt,
        "Time horizon: {} | Posts analyzed: {} | Failed categories: {}",
        result.request.time_horizon,
        result.summary.total_posts,
        if result.summary.failed_categories.is_empty() {
            "none".to_string()
        } else {
            result
                .summary
                .failed_categories
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        }
    );

    if !result.summary.top_symbols.is_empty() {
        let symbols: Vec<String> = result
            .summary
            .top_symbols
            .iter()
            .map(|s| format!("{} ({})", s.symbol, s.mentions))
            .collect();
        let _ = writeln!(prompt, "Most mentioned symbols: {}", symbols.join(", "));
    }

    let _ = writeln!(prompt, "\nTop insights by composite rank:");
    render_insights(&mut prompt, &result.top_insights);

    let _ = writeln!(
        prompt,
        "\nProvide: 1) overall market sentiment, 2) key themes and catalysts, \
         3) notable symbol-specific signals, 4) how credible the discussion \
         appears overall. Be specific and cite the insight lines you draw from."
    );
    prompt
}

/// Renders the risk-assessment prompt, built from the high-credibility view.
#[must_use]
pub fn risk_assessment_prompt(result: &RunResult) -> String {
    let mut prompt = String::new();
    let terms = result.request.target_terms.join(", ");
    let _ = writeln!(
        prompt,
        "Assess investment risks surfaced in high-credibility Reddit discussion for: {terms}"
    );
    let _ = writeln!(
        prompt,
        "Credibility threshold: {:.1} | Qualifying posts: {}",
        result.request.credibility_threshold,
        result.high_credibility_insights.len()
    );

    let _ = writeln!(prompt, "\nHigh-credibility insights:");
    if result.high_credibility_insights.is_empty() {
        let _ = writeln!(
            prompt,
            "(none exceeded the threshold; fall back to the top-ranked set)"
        );
        render_insights(&mut prompt, &result.top_insights);
    } else {
        render_insights(&mut prompt, &result.high_credibility_insights);
    }

    let _ = writeln!(
        prompt,
        "\nProvide: 1) concrete downside risks with likelihood, 2) crowd \
         positioning or sentiment extremes, 3) what would invalidate the \
         prevailing thesis. Flag anything that reads as coordinated promotion."
    );
    prompt
}

fn render_insights(out: &mut String, insights: &[ScoredPost]) {
    for scored in insights.iter().take(PROMPT_INSIGHT_LIMIT) {
        let _ = writeln!(
            out,
            "- Source: r/{} | Credibility: {:.2} | Upvotes: {} | Comments: {}",
            scored.post.channel,
            scored.credibility_score,
            scored.post.upvotes,
            scored.post.comment_count
        );
        let _ = writeln!(out, "  {}", scored.post.title);
        if !scored.post.body.is_empty() {
            let _ = writeln!(out, "  {}", truncate(&scored.post.body, 280));
        }
    }
}

/// Truncates at a char boundary and appends an ellipsis.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use redintel_core::{
        CollectionRequest, RawPost, RunSummary, ScoreBreakdown, SymbolCount, TimeHorizon,
    };
    use uuid::Uuid;

    use super::*;

    fn scored(id: &str, channel: &str, cred: f64) -> ScoredPost {
        ScoredPost {
            post: RawPost {
                id: id.to_string(),
                channel: channel.to_string(),
                title: format!("Discussion {id}"),
                body: "Body text with enough substance to render.".to_string(),
                created_at: Utc::now(),
                upvotes: 120,
                upvote_ratio: Some(0.9),
                comment_count: 30,
                url: String::new(),
                category_tags: BTreeSet::new(),
                mentioned_symbols: BTreeSet::new(),
            },
            credibility_score: cred,
            score_breakdown: ScoreBreakdown {
                channel_prestige: 0.0,
                engagement: 0.0,
                comment_engagement: 0.0,
                upvote_ratio: 0.0,
                content_recency: 0.0,
            },
            composite_rank_score: cred,
        }
    }

    fn result(high: Vec<ScoredPost>) -> RunResult {
        RunResult {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            request: CollectionRequest::new(vec!["TSLA".to_string()], TimeHorizon::Week),
            summary: RunSummary {
                total_posts: 2,
                top_symbols: vec![SymbolCount {
                    symbol: "TSLA".to_string(),
                    mentions: 5,
                }],
                ..RunSummary::default()
            },
            top_insights: vec![scored("t3_a", "securityanalysis", 8.2)],
            high_credibility_insights: high,
            posts: Vec::new(),
        }
    }

    #[test]
    fn market_prompt_carries_terms_symbols_and_insight_lines() {
        let prompt = market_analysis_prompt(&result(vec![]));
        assert!(prompt.contains("TSLA"));
        assert!(prompt.contains("TSLA (5)"));
        assert!(prompt.contains("Source: r/securityanalysis | Credibility: 8.20"));
        assert!(prompt.contains("Time horizon: week"));
    }

    #[test]
    fn risk_prompt_uses_high_credibility_view() {
        let prompt = risk_assessment_prompt(&result(vec![scored("t3_hc", "economics", 7.5)]));
        assert!(prompt.contains("Source: r/economics | Credibility: 7.50"));
        assert!(prompt.contains("Qualifying posts: 1"));
    }

    #[test]
    fn risk_prompt_falls_back_when_nothing_qualifies() {
        let prompt = risk_assessment_prompt(&result(vec![]));
        assert!(prompt.contains("none exceeded the threshold"));
        assert!(prompt.contains("r/securityanalysis"));
    }

    #[test]
    fn prompts_are_deterministic() {
        let r = result(vec![scored("t3_hc", "economics", 7.5)]);
        assert_eq!(market_analysis_prompt(&r), market_analysis_prompt(&r));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 280), "short");
        let long = "é".repeat(300);
        let cut = truncate(&long, 280);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 283);
    }
}
