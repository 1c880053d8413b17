//! Channel prestige weights for credibility scoring.
//!
//! Maps a channel (subreddit, lowercased) to a prestige weight in [0, 10].
//! A built-in table covers the channels the default collection categories
//! query; an optional YAML file can override or extend it. Channels absent
//! from the table score the low [`UNKNOWN_CHANNEL_PRESTIGE`] baseline.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Prestige for channels not present in the table.
pub const UNKNOWN_CHANNEL_PRESTIGE: f64 = 3.0;

/// Built-in prestige weights, keyed by lowercase channel name.
///
/// Heavier weights for channels oriented toward long-form analysis, lighter
/// ones for meme-heavy venues.
const BUILTIN_WEIGHTS: &[(&str, f64)] = &[
    ("securityanalysis", 9.5),
    ("valueinvesting", 9.0),
    ("economics", 8.5),
    ("investing", 8.0),
    ("finance", 8.0),
    ("stockmarket", 7.0),
    ("geopolitics", 6.5),
    ("business", 6.5),
    ("stocks", 6.5),
    ("politics", 6.0),
    ("worldnews", 6.0),
    ("economy", 5.5),
    ("market_news", 5.0),
    ("stocks_news", 5.0),
    ("cryptocurrency", 4.5),
    ("wallstreetbets", 4.0),
    ("superstonk", 3.5),
];

/// One channel entry in the YAML override file.
#[derive(Debug, Deserialize)]
struct ChannelEntry {
    name: String,
    prestige: f64,
}

#[derive(Debug, Deserialize)]
struct ChannelsFile {
    channels: Vec<ChannelEntry>,
}

/// Immutable channel → prestige mapping.
#[derive(Debug, Clone)]
pub struct CredibilityTable {
    weights: BTreeMap<String, f64>,
}

impl CredibilityTable {
    /// The built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        let weights = BUILTIN_WEIGHTS
            .iter()
            .map(|&(name, w)| (name.to_string(), w))
            .collect();
        Self { weights }
    }

    /// Built-in table with overrides loaded from a YAML file.
    ///
    /// File entries win over built-in weights; new channels are added.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, contains a
    /// blank channel name, a duplicate name, or a prestige outside [0, 10].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ChannelsFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: ChannelsFile = serde_yaml::from_str(&content)?;

        let mut table = Self::builtin();
        let mut seen = HashSet::new();
        for entry in file.channels {
            let name = entry.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(ConfigError::Validation(
                    "channel name must be non-empty".to_string(),
                ));
            }
            if !(0.0..=10.0).contains(&entry.prestige) {
                return Err(ConfigError::Validation(format!(
                    "channel '{name}' has prestige {} outside [0, 10]",
                    entry.prestige
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate channel entry: '{name}'"
                )));
            }
            table.weights.insert(name, entry.prestige);
        }
        Ok(table)
    }

    /// Prestige weight for `channel` (case-insensitive), or the unknown
    /// baseline when the channel is not in the table.
    #[must_use]
    pub fn prestige(&self, channel: &str) -> f64 {
        self.weights
            .get(&channel.to_lowercase())
            .copied()
            .unwrap_or(UNKNOWN_CHANNEL_PRESTIGE)
    }
}

impl Default for CredibilityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_yaml(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "redintel-channels-{}-{}.yaml",
            std::process::id(),
            content.len()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn builtin_weights_are_in_range() {
        let table = CredibilityTable::builtin();
        for &(name, _) in BUILTIN_WEIGHTS {
            let w = table.prestige(name);
            assert!((0.0..=10.0).contains(&w), "{name} weight {w} out of range");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = CredibilityTable::builtin();
        assert!((table.prestige("SecurityAnalysis") - 9.5).abs() < f64::EPSILON);
        assert!((table.prestige("WALLSTREETBETS") - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_channel_defaults_to_baseline() {
        let table = CredibilityTable::builtin();
        assert!((table.prestige("some_obscure_sub") - UNKNOWN_CHANNEL_PRESTIGE).abs() < f64::EPSILON);
    }

    #[test]
    fn load_overrides_builtin_weight() {
        let path = write_temp_yaml("channels:\n  - name: wallstreetbets\n    prestige: 1.5\n");
        let table = CredibilityTable::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!((table.prestige("wallstreetbets") - 1.5).abs() < f64::EPSILON);
        // Untouched builtin entries survive.
        assert!((table.prestige("investing") - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn load_rejects_out_of_range_prestige() {
        let path = write_temp_yaml("channels:\n  - name: stocks\n    prestige: 11.0\n");
        let err = CredibilityTable::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("outside [0, 10]"));
    }

    #[test]
    fn load_rejects_duplicate_channel() {
        let path = write_temp_yaml(
            "channels:\n  - name: stocks\n    prestige: 5.0\n  - name: Stocks\n    prestige: 6.0\n",
        );
        let err = CredibilityTable::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("duplicate channel"));
    }

    #[test]
    fn load_rejects_blank_name() {
        let path = write_temp_yaml("channels:\n  - name: '  '\n    prestige: 5.0\n");
        let err = CredibilityTable::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = CredibilityTable::load(Path::new("/nonexistent/channels.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ChannelsFileIo { .. }));
    }
}
