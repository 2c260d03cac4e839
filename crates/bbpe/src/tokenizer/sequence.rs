//! Framing and fixed-length shaping of encoded id sequences.

use serde::{Deserialize, Serialize};

use super::vocab::{SpecialIds, TokenId};

/// A fixed-length encoded sequence together with its attention mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoding {
    pub ids: Vec<TokenId>,
    /// `1` for positions carrying CLS, content or SEP; `0` for padding.
    pub attention_mask: Vec<u8>,
}

impl Encoding {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of positions before padding starts.
    pub fn attended(&self) -> usize {
        self.attention_mask.iter().filter(|&&bit| bit == 1).count()
    }
}

/// Wraps `content` in CLS/SEP and forces the result to exactly `max_length` ids.
///
/// Overlong sequences keep their first `max_length - 1` ids and end with SEP; short ones
/// are right-padded with PAD.
pub(crate) fn assemble(content: Vec<TokenId>, special: SpecialIds, max_length: usize) -> Encoding {
    let mut ids = Vec::with_capacity(max_length.max(content.len() + 2));
    ids.push(special.cls);
    ids.extend(content);
    ids.push(special.sep);

    if ids.len() > max_length {
        ids.truncate(max_length.saturating_sub(1));
        if max_length > 0 {
            ids.push(special.sep);
        }
    }

    let attended = ids.len();
    ids.resize(max_length, special.pad);
    let mut attention_mask = vec![1u8; attended];
    attention_mask.resize(max_length, 0);

    Encoding {
        ids,
        attention_mask,
    }
}
