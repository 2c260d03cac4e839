//! Ordered merge rules and the rank lookup that drives the BPE loop.

use std::collections::HashMap;

use super::config::MergeEntry;
use super::piece::TokenPiece;

/// A learned merge of two adjacent pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRule {
    pub left: TokenPiece,
    pub right: TokenPiece,
}

/// Merge rules in priority order; a rule's rank is its index.
#[derive(Debug, Clone, Default)]
pub struct MergeTable {
    rules: Vec<MergeRule>,
    /// `left -> right -> rank`, keyed by the first occurrence of each pair.
    ranks: HashMap<TokenPiece, HashMap<TokenPiece, usize>>,
    skipped: usize,
}

impl MergeTable {
    /// Builds the table from raw entries, skipping any that do not hold exactly two pieces.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = MergeEntry>,
    {
        let mut table = MergeTable::default();
        for entry in entries {
            match entry.clone().into_pair() {
                Some((left, right)) => table.push(left, right),
                None => {
                    tracing::trace!(?entry, "skipping malformed merge entry");
                    table.skipped += 1;
                }
            }
        }
        table
    }

    /// Builds the table from already-split pairs.
    pub fn from_pairs<I, L, R>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, R)>,
        L: Into<String>,
        R: Into<String>,
    {
        let mut table = MergeTable::default();
        for (left, right) in pairs {
            table.push(left.into(), right.into());
        }
        table
    }

    fn push(&mut self, left: String, right: String) {
        let rank = self.rules.len();
        let left = TokenPiece::from(left);
        let right = TokenPiece::from(right);
        self.ranks
            .entry(left.clone())
            .or_default()
            .entry(right.clone())
            .or_insert(rank);
        self.rules.push(MergeRule { left, right });
    }

    /// Returns the priority of merging `left` followed by `right`, if the pair is known.
    ///
    /// Smaller ranks merge earlier. When a pair is listed more than once the earliest
    /// listing wins.
    pub fn rank_of(&self, left: &str, right: &str) -> Option<usize> {
        self.ranks.get(left)?.get(right).copied()
    }

    pub fn get(&self, rank: usize) -> Option<&MergeRule> {
        self.rules.get(rank)
    }

    /// Iterates rules in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MergeRule)> + '_ {
        self.rules.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of raw entries dropped during construction.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
