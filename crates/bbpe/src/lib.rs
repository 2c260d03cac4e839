//! Byte-level BPE tokenization for RoBERTa/GPT-2 style vocabularies.
//!
//! The crate turns raw text into a fixed-length sequence of token ids framed by
//! CLS/SEP and right-padded with PAD, reproducing the ids a reference byte-level BPE
//! tokenizer emits for the same vocabulary and merge table.

mod env;
pub mod tokenizer;

pub use tokenizer::{
    ConfigError, Encoding, MergeEntry, MergeStep, MergeTrace, RawConfig, TokenId, TokenPiece,
    Tokenizer, TokenizerOptions,
};
