//! SMILES pair encoding: atom-level split followed by learned merges.

use compact_str::CompactString;
use rand::Rng;

use crate::atomwise::AtomSplitter;
use crate::merges::MergeTable;
use crate::word::apply_merges;

/// Segments a SMILES span into merged subword tokens.
///
/// `dropout == 0` is standard BPE; `dropout == 1` never merges, leaving the atomic split.
#[derive(Clone, Debug, Default)]
pub struct SmilesBpe {
    splitter: AtomSplitter,
    merges: MergeTable,
    dropout: f64,
}

impl SmilesBpe {
    pub fn new(splitter: AtomSplitter, merges: MergeTable, dropout: f64) -> Self {
        Self {
            splitter,
            merges,
            dropout,
        }
    }

    pub fn splitter(&self) -> &AtomSplitter {
        &self.splitter
    }

    pub fn merges(&self) -> &MergeTable {
        &self.merges
    }

    pub fn dropout(&self) -> f64 {
        self.dropout
    }

    /// Split `smiles` into atoms and merge them.
    ///
    /// A one-character input is returned as-is without splitting, even if the
    /// character is outside the atom grammar.
    pub fn segment<R: Rng + ?Sized>(&self, smiles: &str, rng: &mut R) -> Vec<CompactString> {
        let mut chars = smiles.chars();
        if chars.next().is_some() && chars.next().is_none() {
            return vec![CompactString::from(smiles)];
        }
        let atoms = self.splitter.split(smiles);
        apply_merges(atoms, &self.merges, self.dropout, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strs(tokens: &[CompactString]) -> Vec<&str> {
        tokens.iter().map(|t| t.as_str()).collect()
    }

    fn aspirin_bpe(dropout: f64) -> SmilesBpe {
        let merges = MergeTable::parse("c c\ncc cc\n( =\n(= O\n(=O )\nC (=O)\n", -1).unwrap();
        SmilesBpe::new(AtomSplitter::new(), merges, dropout)
    }

    #[test]
    fn test_single_char_bypass() {
        let bpe = aspirin_bpe(0.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(strs(&bpe.segment("C", &mut rng)), vec!["C"]);
        // out-of-grammar single characters survive the bypass
        assert_eq!(strs(&bpe.segment("X", &mut rng)), vec!["X"]);
        assert_eq!(strs(&bpe.segment("é", &mut rng)), vec!["é"]);

        let full_dropout = aspirin_bpe(1.0);
        assert_eq!(strs(&full_dropout.segment("c", &mut rng)), vec!["c"]);
    }

    #[test]
    fn test_aspirin_golden() {
        let bpe = aspirin_bpe(0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let out = bpe.segment("CC(=O)Oc1ccccc1C(=O)O", &mut rng);
        assert_eq!(
            strs(&out),
            vec!["C", "C(=O)", "O", "c", "1", "cccc", "c", "1", "C(=O)", "O"]
        );
    }

    #[test]
    fn test_deterministic_without_dropout() {
        let bpe = aspirin_bpe(0.0);
        let first = bpe.segment("CC(=O)Oc1ccccc1C(=O)O", &mut StdRng::seed_from_u64(1));
        for seed in 2..10 {
            let again = bpe.segment("CC(=O)Oc1ccccc1C(=O)O", &mut StdRng::seed_from_u64(seed));
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_full_dropout_returns_atoms() {
        let bpe = aspirin_bpe(1.0);
        let mut rng = StdRng::seed_from_u64(3);
        let out = bpe.segment("CC(=O)O", &mut rng);
        assert_eq!(strs(&out), vec!["C", "C", "(", "=", "O", ")", "O"]);
    }

    #[test]
    fn test_dropout_preserves_characters() {
        let bpe = aspirin_bpe(0.4);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = bpe.segment("CC(=O)Oc1ccccc1C(=O)O", &mut rng);
            let joined: String = out.iter().map(|t| t.as_str()).collect();
            assert_eq!(joined, "CC(=O)Oc1ccccc1C(=O)O");
        }
    }

    #[test]
    fn test_empty_input() {
        let bpe = aspirin_bpe(0.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(bpe.segment("", &mut rng).is_empty());
    }
}
