//! Rank-driven BPE merge loop over a single word's pieces.

use super::merges::MergeTable;
use super::piece::TokenPiece;
use super::vocab::{TokenId, Vocabulary};
use crate::env;

/// Upper bound on committed merges per word before the loop gives up and returns what it
/// has.
pub const DEFAULT_MAX_MERGE_PASSES: usize = 1000;

/// One committed merge, reported to a [`MergeTrace`].
#[derive(Debug, Clone, Copy)]
pub struct MergeStep<'a> {
    /// Zero-based index of the merge within the current word.
    pub pass: usize,
    /// Rank of the applied rule.
    pub rank: usize,
    /// Index of the left piece before the merge.
    pub position: usize,
    pub left: &'a TokenPiece,
    pub right: &'a TokenPiece,
    pub merged: &'a TokenPiece,
}

/// Observer invoked after every committed merge.
pub trait MergeTrace {
    fn on_merge(&mut self, step: &MergeStep<'_>);
}

/// Trace hook that ignores every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl MergeTrace for NoopTrace {
    fn on_merge(&mut self, _step: &MergeStep<'_>) {}
}

impl<F> MergeTrace for F
where
    F: FnMut(&MergeStep<'_>),
{
    fn on_merge(&mut self, step: &MergeStep<'_>) {
        self(step)
    }
}

struct Candidate {
    rank: usize,
    position: usize,
    merged: TokenPiece,
}

/// Applies merge rules to a piece sequence until no vocabulary-resident merge remains.
#[derive(Debug, Clone, Copy)]
pub struct MergeEngine<'a> {
    merges: &'a MergeTable,
    vocab: &'a Vocabulary,
    max_passes: usize,
}

impl<'a> MergeEngine<'a> {
    pub fn new(merges: &'a MergeTable, vocab: &'a Vocabulary) -> Self {
        MergeEngine {
            merges,
            vocab,
            max_passes: DEFAULT_MAX_MERGE_PASSES,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn apply(&self, pieces: Vec<TokenPiece>) -> Vec<TokenPiece> {
        self.apply_traced(pieces, &mut NoopTrace)
    }

    /// Merges `pieces` in rank order, reporting each committed merge to `trace`.
    ///
    /// Every iteration commits the lowest-ranked adjacent pair whose concatenation is in
    /// the vocabulary, taking the leftmost occurrence on ties, and then re-evaluates the
    /// whole sequence from rank zero. If the pass limit is reached the partially merged
    /// sequence is returned as is.
    pub fn apply_traced(
        &self,
        mut pieces: Vec<TokenPiece>,
        trace: &mut dyn MergeTrace,
    ) -> Vec<TokenPiece> {
        let log_merges = env::trace_merges_enabled();
        for pass in 0..self.max_passes {
            let Some(Candidate {
                rank,
                position,
                merged,
            }) = self.best_candidate(&pieces)
            else {
                return pieces;
            };

            let right = pieces.remove(position + 1);
            let left = std::mem::replace(&mut pieces[position], merged);
            let step = MergeStep {
                pass,
                rank,
                position,
                left: &left,
                right: &right,
                merged: &pieces[position],
            };
            if log_merges {
                tracing::trace!(
                    pass,
                    rank,
                    position,
                    left = %left,
                    right = %right,
                    merged = %step.merged,
                    "bpe merge"
                );
            }
            trace.on_merge(&step);
        }

        if self.best_candidate(&pieces).is_some() {
            tracing::warn!(
                max_passes = self.max_passes,
                remaining = pieces.len(),
                "bpe merge pass limit reached; returning partially merged word"
            );
        }
        pieces
    }

    fn best_candidate(&self, pieces: &[TokenPiece]) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (position, pair) in pieces.windows(2).enumerate() {
            let Some(rank) = self.merges.rank_of(&pair[0], &pair[1]) else {
                continue;
            };
            if best.as_ref().is_some_and(|current| current.rank <= rank) {
                continue;
            }
            let Some(merged) = self.vocab.piece(&pair[0].joined(&pair[1])) else {
                continue;
            };
            best = Some(Candidate {
                rank,
                position,
                merged: merged.clone(),
            });
        }
        best
    }

    /// Maps pieces to ids, substituting the UNK id for anything outside the vocabulary.
    pub fn resolve(&self, pieces: &[TokenPiece]) -> Vec<TokenId> {
        pieces
            .iter()
            .map(|piece| self.vocab.resolve(piece))
            .collect()
    }
}
