//! Collection category definitions.
//!
//! Each category pairs a set of channels with a query shape and a source
//! sort order. Declaration order is load-bearing: the deduplicator folds
//! category results in this order, which fixes channel attribution for posts
//! found by more than one category regardless of worker completion order.

/// One topical source group queried during collection.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDef {
    pub name: &'static str,
    pub channels: &'static [&'static str],
    /// Source-specific sort hint for this category's queries.
    pub sort: &'static str,
    /// Appended to the target term when building the query, e.g. `analysis`.
    pub query_suffix: Option<&'static str>,
}

impl CategoryDef {
    /// Builds the search query for one target term.
    #[must_use]
    pub fn query(&self, term: &str) -> String {
        match self.query_suffix {
            Some(suffix) => format!("{term} {suffix}"),
            None => term.to_string(),
        }
    }

    /// Channel set as owned strings for the search capability.
    #[must_use]
    pub fn channel_vec(&self) -> Vec<String> {
        self.channels.iter().map(|c| (*c).to_string()).collect()
    }
}

/// The default category set, in fixed declaration order.
///
/// `market` leans on high-traffic trading channels sorted by `hot`;
/// `political` pulls policy discussion sorted by `top`; `analysis` targets
/// long-form channels with a narrowed `<term> analysis` query; `trending`
/// sweeps the broad market channel set.
#[must_use]
pub fn default_categories() -> &'static [CategoryDef] {
    &[
        CategoryDef {
            name: "market",
            channels: &[
                "wallstreetbets",
                "stocks",
                "superstonk",
                "investing",
                "valueinvesting",
            ],
            sort: "hot",
            query_suffix: None,
        },
        CategoryDef {
            name: "political",
            channels: &[
                "politics",
                "economics",
                "geopolitics",
                "worldnews",
                "business",
            ],
            sort: "top",
            query_suffix: None,
        },
        CategoryDef {
            name: "analysis",
            channels: &[
                "securityanalysis",
                "valueinvesting",
                "investing",
                "economics",
                "finance",
                "stockmarket",
            ],
            sort: "relevance",
            query_suffix: Some("analysis"),
        },
        CategoryDef {
            name: "trending",
            channels: &[
                "investing",
                "stocks",
                "securityanalysis",
                "valueinvesting",
                "stockmarket",
                "economics",
                "business",
                "finance",
                "wallstreetbets",
                "cryptocurrency",
                "superstonk",
                "economy",
            ],
            sort: "relevance",
            query_suffix: None,
        },
    ]
}
