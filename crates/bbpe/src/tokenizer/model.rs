//! High-level RoBERTa-style tokenizer backed by byte-level BPE.
//!
//! A [`Tokenizer`] owns the immutable vocabulary and merge table built from a
//! [`RawConfig`]. Encoding splits text on whitespace, runs each word through the
//! byte-level encoder and the merge engine, and shapes the resulting ids into a
//! fixed-length CLS … SEP PAD… sequence. Encoding never fails: anything the vocabulary
//! cannot represent becomes the UNK id.

use regex::Regex;

use super::bpe::{MergeEngine, MergeTrace, NoopTrace};
use super::byte_level::{ByteLevelEncoder, Word};
use super::config::{ConfigError, RawConfig, TokenizerOptions};
use super::merges::MergeTable;
use super::piece::TokenPiece;
use super::sequence::{self, Encoding};
use super::vocab::{TokenId, Vocabulary};

/// Words are maximal runs of non-whitespace characters.
const WORD_PATTERN: &str = r"\S+";

/// Runtime tokenizer; cheap to share across threads by reference.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    vocab: Vocabulary,
    merges: MergeTable,
    options: TokenizerOptions,
    /// Compiled word splitter applied before byte-level encoding.
    pattern: Regex,
}

impl Tokenizer {
    /// Builds a tokenizer with default options, honouring `config.max_length` if set.
    pub fn from_config(config: RawConfig) -> Result<Self, ConfigError> {
        Self::with_options(config, TokenizerOptions::default())
    }

    /// Builds a tokenizer from a raw configuration and explicit options.
    ///
    /// A `max_length` carried by the configuration takes precedence over
    /// `options.max_length`.
    pub fn with_options(
        config: RawConfig,
        mut options: TokenizerOptions,
    ) -> Result<Self, ConfigError> {
        let RawConfig {
            vocab,
            merges,
            max_length,
        } = config;

        let vocab = vocab.ok_or(ConfigError::MissingVocab)?;
        let merges = merges.ok_or(ConfigError::MissingMerges)?;
        if let Some(max_length) = max_length {
            options.max_length = max_length;
        }

        let vocab = Vocabulary::new(vocab);
        let merges = MergeTable::from_entries(merges);
        if merges.skipped() > 0 {
            tracing::warn!(
                skipped = merges.skipped(),
                "ignored merge entries that do not hold exactly two pieces"
            );
        }
        let pattern = Regex::new(WORD_PATTERN)?;

        let special = vocab.special_ids();
        tracing::debug!(
            vocab_size = vocab.len(),
            merges = merges.len(),
            cls = special.cls,
            sep = special.sep,
            pad = special.pad,
            unk = special.unk,
            max_length = options.max_length,
            "built byte-level BPE tokenizer"
        );

        Ok(Tokenizer {
            vocab,
            merges,
            options,
            pattern,
        })
    }

    /// Parses a JSON configuration string and builds a tokenizer from it.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        Self::from_config(RawConfig::from_json_str(data)?)
    }

    /// Encodes `text` into exactly `options().max_length` ids.
    pub fn encode(&self, text: &str) -> Vec<TokenId> {
        self.encode_with_max_length(text, self.options.max_length)
    }

    /// Encodes `text` into exactly `max_length` ids.
    pub fn encode_with_max_length(&self, text: &str, max_length: usize) -> Vec<TokenId> {
        self.encode_traced(text, max_length, &mut NoopTrace)
    }

    /// Same as [`encode_with_max_length`](Self::encode_with_max_length), reporting every
    /// committed merge to `trace` in the order it happens.
    pub fn encode_traced(
        &self,
        text: &str,
        max_length: usize,
        trace: &mut dyn MergeTrace,
    ) -> Vec<TokenId> {
        sequence::assemble(self.content_ids(text, trace), self.vocab.special_ids(), max_length).ids
    }

    /// Encodes `text` and returns the ids together with the matching attention mask.
    ///
    /// `None` uses the configured default length.
    pub fn encode_with_mask(&self, text: &str, max_length: Option<usize>) -> Encoding {
        let max_length = max_length.unwrap_or(self.options.max_length);
        sequence::assemble(
            self.content_ids(text, &mut NoopTrace),
            self.vocab.special_ids(),
            max_length,
        )
    }

    /// Encodes each text independently at the default length, preserving order.
    pub fn encode_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<TokenId>> {
        texts
            .iter()
            .map(|text| self.encode(text.as_ref()))
            .collect()
    }

    /// Returns the merged sub-word pieces of `text`, without special tokens or padding.
    pub fn tokenize(&self, text: &str) -> Vec<TokenPiece> {
        let engine = self.engine();
        let encoder = ByteLevelEncoder::new(&self.vocab);
        self.words(text)
            .flat_map(|word| engine.apply(encoder.encode_word(word)))
            .collect()
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn merges(&self) -> &MergeTable {
        &self.merges
    }

    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    fn engine(&self) -> MergeEngine<'_> {
        MergeEngine::new(&self.merges, &self.vocab).with_max_passes(self.options.max_merge_passes)
    }

    fn words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Word<'a>> + 'a {
        self.pattern
            .find_iter(text)
            .enumerate()
            .map(|(idx, mat)| Word::new(mat.as_str(), idx == 0))
    }

    fn content_ids(&self, text: &str, trace: &mut dyn MergeTrace) -> Vec<TokenId> {
        let engine = self.engine();
        let encoder = ByteLevelEncoder::new(&self.vocab);
        let mut ids = Vec::new();
        for word in self.words(text) {
            let pieces = engine.apply_traced(encoder.encode_word(word), trace);
            ids.extend(engine.resolve(&pieces));
        }
        ids
    }
}

impl std::str::FromStr for Tokenizer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}
