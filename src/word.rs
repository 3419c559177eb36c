//! Merge loop over a sequence of atomic tokens.

use std::cmp::Ordering;

use compact_str::CompactString;
use rand::Rng;

use crate::merges::MergeTable;

/// A sequence of tokens being merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Word {
    pub tokens: Vec<CompactString>,
}

/// An adjacent pair occurrence that survived dropout and is in the merge table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MergeCandidate {
    pub rank: usize,
    pub pos: usize,
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // lowest rank first, leftmost position on ties
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.pos.cmp(&other.pos))
    }
}

impl Word {
    #[inline]
    pub fn new(tokens: Vec<CompactString>) -> Self {
        Self { tokens }
    }

    #[inline]
    pub fn pairs(&self) -> impl Iterator<Item = (&CompactString, &CompactString)> + '_ {
        self.tokens.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Every pair occurrence eligible for merging in this pass, left to right.
    ///
    /// With `dropout > 0` each occurrence is kept only if a uniform draw exceeds `dropout`,
    /// independently of other occurrences of the same pair.
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        table: &MergeTable,
        dropout: f64,
        rng: &mut R,
    ) -> Vec<MergeCandidate> {
        self.pairs()
            .enumerate()
            .filter_map(|(pos, (a, b))| {
                let rank = table.rank(a, b)?;
                if dropout == 0.0 || rng.gen::<f64>() > dropout {
                    Some(MergeCandidate { rank, pos })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Merge the pairs starting at `positions` (ascending).
    ///
    /// A position inside a span consumed earlier in the same pass is skipped:
    /// `x x x` merged at [0, 1] becomes `xx x`.
    pub fn merge_at(&mut self, positions: &[usize]) {
        let n = self.tokens.len();
        let mut out: Vec<CompactString> = Vec::with_capacity(n);
        let mut i = 0;
        for &j in positions {
            if j < i || j + 1 >= n {
                continue;
            }
            out.extend_from_slice(&self.tokens[i..j]);
            let mut merged = self.tokens[j].clone();
            merged.push_str(&self.tokens[j + 1]);
            out.push(merged);
            i = j + 2; // skip both halves
        }
        out.extend_from_slice(&self.tokens[i..]);
        self.tokens = out;
    }

    /// Run one merge pass. Returns false when no candidate was found.
    pub fn merge_step<R: Rng + ?Sized>(
        &mut self,
        table: &MergeTable,
        dropout: f64,
        rng: &mut R,
    ) -> bool {
        let candidates = self.candidates(table, dropout, rng);
        let Some(best) = candidates.iter().min().copied() else {
            return false;
        };
        // ranks are unique per pair, so equal rank means the same pair value
        let positions: Vec<usize> = candidates
            .iter()
            .filter(|c| c.rank == best.rank)
            .map(|c| c.pos)
            .collect();
        self.merge_at(&positions);
        true
    }
}

/// Apply learned merges to atomic tokens until no eligible pair remains.
///
/// Deterministic when `dropout == 0`; `rng` is only drawn from otherwise.
pub fn apply_merges<R: Rng + ?Sized>(
    tokens: Vec<CompactString>,
    table: &MergeTable,
    dropout: f64,
    rng: &mut R,
) -> Vec<CompactString> {
    let mut word = Word::new(tokens);
    while word.tokens.len() > 1 {
        if !word.merge_step(table, dropout, rng) {
            break;
        }
    }
    word.tokens
}
