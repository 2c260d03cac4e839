//! Raw tokenizer configuration as handed over by an external loader.
//!
//! The shapes here mirror the JSON exported by Python tokenizers: a flat
//! `{ "vocab": {...}, "merges": [...] }` object, or a Hugging Face `tokenizer.json` whose
//! `model` section carries the same two tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bpe::DEFAULT_MAX_MERGE_PASSES;
use super::vocab::TokenId;

/// Output length used when neither the caller nor the configuration picks one.
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// Errors raised while turning a raw configuration into a usable tokenizer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tokenizer configuration is missing a vocabulary table")]
    MissingVocab,
    #[error("tokenizer configuration is missing a merge list")]
    MissingMerges,
    #[error("failed to parse tokenizer configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to compile word splitting pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Unvalidated vocabulary and merge list, exactly as deserialized.
///
/// Both tables are optional at this level so that their absence surfaces as a
/// [`ConfigError`] at construction time rather than as an opaque parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// Maps token strings to their integer ids.
    #[serde(default)]
    pub vocab: Option<HashMap<String, TokenId>>,
    /// Ordered merge rules; earlier entries merge first.
    #[serde(default)]
    pub merges: Option<Vec<MergeEntry>>,
    /// Fixed output length requested by the configuration, if any.
    #[serde(default, alias = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct HfTokenizerJson {
    model: RawConfig,
    #[serde(default)]
    truncation: Option<HfTruncation>,
}

#[derive(Debug, Deserialize)]
struct HfTruncation {
    max_length: usize,
}

impl RawConfig {
    /// Builds a configuration from already-split merge pairs.
    pub fn from_parts<I, L, R>(vocab: HashMap<String, TokenId>, merges: I) -> Self
    where
        I: IntoIterator<Item = (L, R)>,
        L: Into<String>,
        R: Into<String>,
    {
        let merges = merges
            .into_iter()
            .map(|(left, right)| MergeEntry::pair(left, right))
            .collect();
        RawConfig {
            vocab: Some(vocab),
            merges: Some(merges),
            max_length: None,
        }
    }

    /// Parses either the flat schema or a Hugging Face `tokenizer.json` document.
    ///
    /// For the Hugging Face shape, `truncation.max_length` (when set) becomes the
    /// configuration's `max_length`.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(data)?;
        if value.get("model").is_some_and(serde_json::Value::is_object) {
            let HfTokenizerJson { model, truncation } = serde_json::from_value(value)?;
            return Ok(RawConfig {
                max_length: model
                    .max_length
                    .or(truncation.map(|truncation| truncation.max_length)),
                ..model
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// One entry of the merge list in either of its serialized forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MergeEntry {
    /// `["left", "right"]`
    Pair(Vec<String>),
    /// `"left right"`
    Joined(String),
    /// Anything else; always skipped.
    Other(serde_json::Value),
}

impl MergeEntry {
    pub fn pair(left: impl Into<String>, right: impl Into<String>) -> Self {
        MergeEntry::Pair(vec![left.into(), right.into()])
    }

    pub fn joined(raw: impl Into<String>) -> Self {
        MergeEntry::Joined(raw.into())
    }

    /// Normalizes the entry into `(left, right)`.
    ///
    /// Returns `None` unless the entry holds exactly two non-empty pieces.
    pub fn into_pair(self) -> Option<(String, String)> {
        match self {
            MergeEntry::Pair(parts) => {
                let [left, right]: [String; 2] = parts.try_into().ok()?;
                (!left.is_empty() && !right.is_empty()).then_some((left, right))
            }
            MergeEntry::Joined(raw) => {
                let mut pieces = raw.split_whitespace();
                let left = pieces.next()?;
                let right = pieces.next()?;
                if pieces.next().is_some() {
                    return None;
                }
                Some((left.to_string(), right.to_string()))
            }
            MergeEntry::Other(_) => None,
        }
    }
}

/// Tunables that are not part of the vocabulary/merge data itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Length of every encoded sequence unless a call overrides it.
    pub max_length: usize,
    /// Upper bound on committed merges per word.
    pub max_merge_passes: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        TokenizerOptions {
            max_length: DEFAULT_MAX_LENGTH,
            max_merge_passes: DEFAULT_MAX_MERGE_PASSES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_entries_normalize_from_both_forms() {
        assert_eq!(
            MergeEntry::pair("Ġ", "t").into_pair(),
            Some(("Ġ".to_string(), "t".to_string()))
        );
        assert_eq!(
            MergeEntry::joined("Ġ t").into_pair(),
            Some(("Ġ".to_string(), "t".to_string()))
        );
        assert_eq!(
            MergeEntry::joined("  h\te ").into_pair(),
            Some(("h".to_string(), "e".to_string()))
        );
    }

    #[test]
    fn malformed_merge_entries_do_not_normalize() {
        let raw = json!(["abc", "a b c", ["a"], ["a", "b", "c"], ["", "b"], 7, null]);
        let entries: Vec<MergeEntry> =
            serde_json::from_value(raw).expect("entries should deserialize");
        for entry in entries {
            assert_eq!(entry.clone().into_pair(), None, "{entry:?}");
        }
    }

    #[test]
    fn flat_schema_reads_camel_case_max_length() {
        let config = RawConfig::from_json_str(
            r#"{"vocab": {"a": 0}, "merges": ["a a"], "maxLength": 16}"#,
        )
        .expect("flat config");
        assert_eq!(config.max_length, Some(16));
        assert_eq!(config.merges.map(|m| m.len()), Some(1));
    }

    #[test]
    fn hugging_face_schema_reads_model_section() {
        let doc = json!({
            "version": "1.0",
            "truncation": { "max_length": 64, "strategy": "LongestFirst" },
            "model": {
                "type": "BPE",
                "dropout": null,
                "vocab": { "<s>": 0, "a": 4 },
                "merges": [["a", "a"]]
            }
        });
        let config = RawConfig::from_json_str(&doc.to_string()).expect("hf config");
        assert_eq!(config.vocab.as_ref().map(|v| v.len()), Some(2));
        assert_eq!(config.max_length, Some(64));
    }

    #[test]
    fn missing_tables_deserialize_as_none() {
        let config = RawConfig::from_json_str("{}").expect("empty object");
        assert!(config.vocab.is_none());
        assert!(config.merges.is_none());
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = RawConfig::from_json_str("{\"vocab\": ").expect_err("truncated json");
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
