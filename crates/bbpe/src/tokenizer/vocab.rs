//! Immutable token-string ↔ id mapping with resolved special token ids.

use std::collections::HashMap;

use super::piece::TokenPiece;

/// Token id as consumed by the model.
pub type TokenId = u32;

pub const CLS_TOKEN: &str = "<s>";
pub const SEP_TOKEN: &str = "</s>";
pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";

// Fallback ids used when the vocabulary lacks the corresponding token string.
pub const DEFAULT_CLS_ID: TokenId = 0;
pub const DEFAULT_PAD_ID: TokenId = 1;
pub const DEFAULT_SEP_ID: TokenId = 2;
pub const DEFAULT_UNK_ID: TokenId = 3;

/// Ids of the four special tokens framing every encoded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialIds {
    pub cls: TokenId,
    pub sep: TokenId,
    pub pad: TokenId,
    pub unk: TokenId,
}

/// Forward and reverse vocabulary tables.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Forward mapping from token string to id.
    encoder: HashMap<TokenPiece, TokenId>,
    /// Reverse mapping from id to token string.
    decoder: HashMap<TokenId, TokenPiece>,
    special: SpecialIds,
}

impl Vocabulary {
    /// Builds both directions of the mapping and resolves the special token ids.
    ///
    /// When two strings share an id, the reverse table keeps the lexicographically smaller
    /// one so that reverse lookups do not depend on hash iteration order.
    pub fn new(table: HashMap<String, TokenId>) -> Self {
        let mut encoder = HashMap::with_capacity(table.len());
        let mut decoder: HashMap<TokenId, TokenPiece> = HashMap::with_capacity(table.len());
        for (token, id) in table {
            let piece = TokenPiece::from(token);
            decoder
                .entry(id)
                .and_modify(|existing| {
                    if piece < *existing {
                        *existing = piece.clone();
                    }
                })
                .or_insert_with(|| piece.clone());
            encoder.insert(piece, id);
        }

        let resolve =
            |token: &str, default: TokenId| encoder.get(token).copied().unwrap_or(default);
        let special = SpecialIds {
            cls: resolve(CLS_TOKEN, DEFAULT_CLS_ID),
            sep: resolve(SEP_TOKEN, DEFAULT_SEP_ID),
            pad: resolve(PAD_TOKEN, DEFAULT_PAD_ID),
            unk: resolve(UNK_TOKEN, DEFAULT_UNK_ID),
        };

        Vocabulary {
            encoder,
            decoder,
            special,
        }
    }

    pub fn lookup(&self, token: &str) -> Option<TokenId> {
        self.encoder.get(token).copied()
    }

    pub fn reverse_lookup(&self, id: TokenId) -> Option<&TokenPiece> {
        self.decoder.get(&id)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.encoder.contains_key(token)
    }

    /// Returns the vocabulary's own shared copy of `token`, if present.
    pub fn piece(&self, token: &str) -> Option<&TokenPiece> {
        self.encoder.get_key_value(token).map(|(piece, _)| piece)
    }

    /// Interns `token` against the vocabulary, allocating only when it is not resident.
    pub fn intern(&self, token: &str) -> TokenPiece {
        self.piece(token)
            .cloned()
            .unwrap_or_else(|| TokenPiece::from(token))
    }

    /// Resolves a piece to its id, falling back to the UNK id.
    pub fn resolve(&self, token: &str) -> TokenId {
        self.lookup(token).unwrap_or(self.special.unk)
    }

    pub fn special_ids(&self) -> SpecialIds {
        self.special
    }

    pub fn cls_id(&self) -> TokenId {
        self.special.cls
    }

    pub fn sep_id(&self) -> TokenId {
        self.special.sep
    }

    pub fn pad_id(&self) -> TokenId {
        self.special.pad
    }

    pub fn unk_id(&self) -> TokenId {
        self.special.unk
    }

    /// Number of distinct token strings.
    pub fn len(&self) -> usize {
        self.encoder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoder.is_empty()
    }
}
