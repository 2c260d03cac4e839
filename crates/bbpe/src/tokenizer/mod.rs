//! Building blocks for RoBERTa-style byte-level BPE tokenization.
//!
//! The pipeline runs leaves first: a [`Vocabulary`] and [`MergeTable`] are built once from
//! a [`RawConfig`], the [`ByteLevelEncoder`] turns each whitespace-delimited word into its
//! initial byte pieces, the [`MergeEngine`] collapses them by merge rank, and the sequence
//! assembler frames the resulting ids with CLS/SEP and pads them to a fixed length.

pub mod bpe;
pub mod byte_level;
pub mod config;
pub mod merges;
pub mod model;
pub mod piece;
pub mod sequence;
pub mod vocab;

pub use bpe::{MergeEngine, MergeStep, MergeTrace, NoopTrace, DEFAULT_MAX_MERGE_PASSES};
pub use byte_level::{byte_to_glyph, ByteLevelEncoder, Word, WORD_BOUNDARY_MARKER};
pub use config::{ConfigError, MergeEntry, RawConfig, TokenizerOptions, DEFAULT_MAX_LENGTH};
pub use merges::{MergeRule, MergeTable};
pub use model::Tokenizer;
pub use piece::TokenPiece;
pub use sequence::Encoding;
pub use vocab::{SpecialIds, TokenId, Vocabulary};
