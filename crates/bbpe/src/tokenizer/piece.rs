//! Interned token strings shared between the vocabulary and in-flight token sequences.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A single token string: one byte glyph, a merged sub-word, or a whole word.
///
/// Pieces are reference counted so that sequences produced during encoding can share the
/// allocation owned by the [`Vocabulary`](super::Vocabulary) instead of copying strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPiece(Arc<str>);

impl TokenPiece {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        TokenPiece(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concatenates two pieces into a fresh owned string.
    pub fn joined(&self, right: &TokenPiece) -> String {
        let mut merged = String::with_capacity(self.0.len() + right.0.len());
        merged.push_str(&self.0);
        merged.push_str(&right.0);
        merged
    }
}

impl Deref for TokenPiece {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TokenPiece {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TokenPiece {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenPiece {
    fn from(text: &str) -> Self {
        TokenPiece(Arc::from(text))
    }
}

impl From<String> for TokenPiece {
    fn from(text: String) -> Self {
        TokenPiece(Arc::from(text))
    }
}

impl PartialEq<str> for TokenPiece {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TokenPiece {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::TokenPiece;
    use std::collections::HashMap;

    #[test]
    fn borrowed_lookup_matches_owned_key() {
        let mut map = HashMap::new();
        map.insert(TokenPiece::from("Ġlow"), 7u32);
        assert_eq!(map.get("Ġlow"), Some(&7));
        assert_eq!(map.get("low"), None);
    }

    #[test]
    fn joined_concatenates_in_order() {
        let left = TokenPiece::from("lo");
        let right = TokenPiece::from("w");
        assert_eq!(left.joined(&right), "low");
    }
}
