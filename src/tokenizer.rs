//! The public tokenizer: control tags, SMILES pair encoding and a growable vocabulary.

use std::path::Path;

use compact_str::CompactString;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::atomwise::AtomSplitter;
use crate::bpe::SmilesBpe;
use crate::config::TokenizerConfig;
use crate::constants::{
    BOS_TOKEN, BOS_TOKEN_ID, CLS_TOKEN, CLS_TOKEN_ID, EOS_TOKEN, EOS_TOKEN_ID, PAD_TOKEN,
    PAD_TOKEN_ID, RESERVED_TOKENS, SEP_TOKEN, SEP_TOKEN_ID, UNK_TOKEN, UNK_TOKEN_ID,
};
use crate::error::Result;
use crate::merges::MergeTable;
use crate::tags::TagScanner;
use crate::vocabulary::Vocabulary;

/// Tokenizer for molecule strings with embedded control tags.
///
/// Encoding registers every unseen token in the vocabulary before mapping
/// tokens to ids, so repeated calls with new input grow the vocabulary until
/// it reaches capacity; later unseen tokens encode as `<unk>`. A frozen
/// tokenizer never grows.
#[derive(Clone, Debug)]
pub struct MoltxTokenizer {
    scanner: TagScanner,
    vocab: Vocabulary,
    rng: StdRng,
}

impl MoltxTokenizer {
    /// Build a tokenizer from a validated config and a merge table.
    pub fn new(config: &TokenizerConfig, merges: MergeTable) -> Result<Self> {
        config.validate()?;
        let splitter = match &config.exclusive_bracket_tokens {
            Some(exclusive) => AtomSplitter::with_exclusive(exclusive),
            None => AtomSplitter::new(),
        };
        let bpe = SmilesBpe::new(splitter, merges, config.dropout);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            scanner: TagScanner::new(bpe),
            vocab: Vocabulary::new(config.capacity, config.frozen)?,
            rng,
        })
    }

    /// Build a tokenizer whose merges come from a codes file, honouring
    /// `config.merge_table_limit`.
    pub fn with_merge_codes<P: AsRef<Path>>(config: &TokenizerConfig, codes: P) -> Result<Self> {
        let merges = MergeTable::load(codes, config.merge_table_limit)?;
        Self::new(config, merges)
    }

    /// Build a frozen tokenizer from a codes file and a dumped vocabulary.
    pub fn from_files<P, Q>(config: &TokenizerConfig, codes: P, vocab: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let config = TokenizerConfig {
            frozen: true,
            ..config.clone()
        };
        let mut tokenizer = Self::with_merge_codes(&config, codes)?;
        tokenizer.vocab.load(vocab)?;
        Ok(tokenizer)
    }

    /// Tokenize with a caller-supplied random source. Does not touch the vocabulary.
    pub fn tokenize_with_rng<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Vec<CompactString> {
        self.scanner.tokenize(text, rng)
    }

    /// Tokenize without registering the tokens.
    pub fn tokenize_pure(&mut self, text: &str) -> Vec<CompactString> {
        self.scanner.tokenize(text, &mut self.rng)
    }

    /// Tokenize and register the tokens, returning the tokens instead of ids.
    pub fn tokenize(&mut self, text: &str) -> Vec<CompactString> {
        let tokens = self.scanner.tokenize(text, &mut self.rng);
        self.vocab.register_observed(&tokens);
        tokens
    }

    /// Register unseen tokens (unless frozen). Returns how many were added.
    pub fn register_observed<S: AsRef<str>>(&mut self, tokens: &[S]) -> usize {
        self.vocab.register_observed(tokens)
    }

    /// Tokenize `text`, register unseen tokens, and map every token to its id.
    pub fn encode_to_ids(&mut self, text: &str) -> Vec<u32> {
        let tokens = self.tokenize(text);
        self.ids_of(&tokens)
    }

    /// Encode many strings.
    ///
    /// Segmentation runs in parallel, each string with its own random source
    /// drawn from this tokenizer's; registration then happens in input order.
    pub fn encode_batch<S: AsRef<str> + Sync>(&mut self, texts: &[S]) -> Vec<Vec<u32>> {
        let seeds: Vec<u64> = texts.iter().map(|_| self.rng.gen()).collect();
        let scanner = &self.scanner;
        let segmented: Vec<Vec<CompactString>> = texts
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(text, &seed)| {
                let mut rng = StdRng::seed_from_u64(seed);
                scanner.tokenize(text.as_ref(), &mut rng)
            })
            .collect();

        let mut encoded = Vec::with_capacity(segmented.len());
        for tokens in segmented {
            self.vocab.register_observed(&tokens);
            encoded.push(self.ids_of(&tokens));
        }
        encoded
    }

    fn ids_of(&self, tokens: &[CompactString]) -> Vec<u32> {
        tokens.iter().map(|t| self.vocab.id_of(t)).collect()
    }

    /// Concatenate the tokens for `ids`. Fails on an id outside the vocabulary.
    pub fn decode_from_ids(&self, ids: &[u32]) -> Result<String> {
        self.vocab.decode(ids)
    }

    /// Decode multiple id sequences in parallel.
    pub fn decode_batch(&self, ids_list: &[Vec<u32>]) -> Result<Vec<String>> {
        ids_list
            .par_iter()
            .map(|ids| self.vocab.decode(ids))
            .collect()
    }

    pub fn id_of(&self, token: &str) -> u32 {
        self.vocab.id_of(token)
    }

    pub fn token_of(&self, id: u32) -> Result<&str> {
        self.vocab.token_of(id)
    }

    pub fn dumps(&self) -> Result<String> {
        self.vocab.dumps()
    }

    pub fn loads(&mut self, json: &str) -> Result<usize> {
        self.vocab.loads(json)
    }

    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.vocab.dump(path)
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.vocab.load(path)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn merges(&self) -> &MergeTable {
        self.scanner.bpe().merges()
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    pub fn pad(&self) -> &'static str {
        PAD_TOKEN
    }

    pub fn unk(&self) -> &'static str {
        UNK_TOKEN
    }

    pub fn bos(&self) -> &'static str {
        BOS_TOKEN
    }

    pub fn eos(&self) -> &'static str {
        EOS_TOKEN
    }

    pub fn sep(&self) -> &'static str {
        SEP_TOKEN
    }

    pub fn cls(&self) -> &'static str {
        CLS_TOKEN
    }

    /// `(pad, unk, bos, eos, sep, cls)`, in id order.
    pub fn reserved(&self) -> [&'static str; 6] {
        RESERVED_TOKENS
    }

    pub fn pad_id(&self) -> u32 {
        PAD_TOKEN_ID
    }

    pub fn unk_id(&self) -> u32 {
        UNK_TOKEN_ID
    }

    pub fn bos_id(&self) -> u32 {
        BOS_TOKEN_ID
    }

    pub fn eos_id(&self) -> u32 {
        EOS_TOKEN_ID
    }

    pub fn sep_id(&self) -> u32 {
        SEP_TOKEN_ID
    }

    pub fn cls_id(&self) -> u32 {
        CLS_TOKEN_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ATOMIC_DROPOUT;
    use std::io::Write;

    const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";
    const CODES: &str = "c c\ncc cc\n( =\n(= O\n(=O )\nC (=O)\n";

    fn tokenizer(config: TokenizerConfig) -> MoltxTokenizer {
        MoltxTokenizer::new(&config, MergeTable::parse(CODES, -1).unwrap()).unwrap()
    }

    fn strs(tokens: &[CompactString]) -> Vec<&str> {
        tokens.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_encode_registers_then_maps() {
        let mut tkz = tokenizer(TokenizerConfig::default());
        let ids = tkz.encode_to_ids("<bos>CC<eos>");
        // "C" "C" has no merge, both map to the first new id
        assert_eq!(ids, vec![BOS_TOKEN_ID, 6, 6, EOS_TOKEN_ID]);
        assert_eq!(tkz.len(), 7);
    }

    #[test]
    fn test_warm_round_trip() {
        let mut tkz = tokenizer(TokenizerConfig::default());
        let text = "<bos>CC(=O)Oc1ccccc1C(=O)O<sep>c1ccccc1<eos>";
        let ids = tkz.encode_to_ids(text);
        assert!(!ids.contains(&UNK_TOKEN_ID));
        assert_eq!(tkz.decode_from_ids(&ids).unwrap(), text);
    }

    #[test]
    fn test_round_trip_drops_out_of_grammar_chars() {
        let mut tkz = tokenizer(TokenizerConfig::default());
        let ids = tkz.encode_to_ids("CC X O");
        assert_eq!(tkz.decode_from_ids(&ids).unwrap(), "CCO");
    }

    #[test]
    fn test_tokenize_pure_does_not_grow() {
        let mut tkz = tokenizer(TokenizerConfig::default());
        let tokens = tkz.tokenize_pure(ASPIRIN);
        assert_eq!(
            strs(&tokens),
            vec!["C", "C(=O)", "O", "c", "1", "cccc", "c", "1", "C(=O)", "O"]
        );
        assert_eq!(tkz.len(), 6);
        tkz.tokenize(ASPIRIN);
        assert_eq!(tkz.len(), 12);
    }

    #[test]
    fn test_capacity_degrades_to_unk() {
        let config = TokenizerConfig::builder().capacity(8).build().unwrap();
        let mut tkz = tokenizer(config);
        let ids = tkz.encode_to_ids("CNO");
        assert_eq!(ids, vec![6, 7, UNK_TOKEN_ID]);
        assert_eq!(tkz.len(), 8);
        // later occurrences of the same token stay unknown
        assert_eq!(tkz.encode_to_ids("O"), vec![UNK_TOKEN_ID]);
        assert_eq!(tkz.len(), 8);
    }

    #[test]
    fn test_frozen_encodes_unknown_as_unk() {
        let config = TokenizerConfig::builder().frozen(true).build().unwrap();
        let mut tkz = tokenizer(config);
        assert_eq!(tkz.encode_to_ids("<bos>C"), vec![BOS_TOKEN_ID, UNK_TOKEN_ID]);
        assert_eq!(tkz.len(), 6);
    }

    #[test]
    fn test_decode_out_of_range_fails() {
        let tkz = tokenizer(TokenizerConfig::default());
        assert!(tkz.decode_from_ids(&[0, 42]).is_err());
        assert_eq!(tkz.decode_from_ids(&[2, 3]).unwrap(), "<bos><eos>");
    }

    #[test]
    fn test_exclusive_brackets_become_unk() {
        let config = TokenizerConfig::builder()
            .exclusive_bracket_tokens(["[nH]"])
            .build()
            .unwrap();
        let mut tkz = tokenizer(config);
        let tokens = tkz.tokenize("[nH][Na+]");
        assert_eq!(strs(&tokens), vec!["[nH]", "<unk>"]);
        assert_eq!(tkz.encode_to_ids("[Na+]"), vec![UNK_TOKEN_ID]);
    }

    #[test]
    fn test_batch_matches_sequential_without_dropout() {
        let texts = ["<bos>CCO<eos>", ASPIRIN, "c1ccccc1", "C"];
        let mut batch = tokenizer(TokenizerConfig::default());
        let mut sequential = tokenizer(TokenizerConfig::default());

        let batch_ids = batch.encode_batch(&texts[..]);
        let sequential_ids: Vec<Vec<u32>> = texts.iter().map(|t| sequential.encode_to_ids(t)).collect();
        assert_eq!(batch_ids, sequential_ids);
        assert_eq!(batch.dumps().unwrap(), sequential.dumps().unwrap());

        let decoded = batch.decode_batch(&batch_ids).unwrap();
        assert_eq!(decoded[1], ASPIRIN);
    }

    #[test]
    fn test_seeded_dropout_reproducible() {
        let config = TokenizerConfig::builder().dropout(0.5).seed(11).build().unwrap();
        let mut a = tokenizer(config.clone());
        let mut b = tokenizer(config);
        for _ in 0..4 {
            assert_eq!(a.tokenize_pure(ASPIRIN), b.tokenize_pure(ASPIRIN));
        }
    }

    #[test]
    fn test_reserved_accessors() {
        let tkz = tokenizer(TokenizerConfig::default());
        assert_eq!(
            tkz.reserved(),
            [tkz.pad(), tkz.unk(), tkz.bos(), tkz.eos(), tkz.sep(), tkz.cls()]
        );
        for (id, token) in tkz.reserved().iter().enumerate() {
            assert_eq!(tkz.id_of(token), id as u32);
            assert_eq!(tkz.token_of(id as u32).unwrap(), *token);
        }
        assert_eq!(tkz.unk_id(), 1);
        assert_eq!(tkz.cls_id(), 5);
    }

    #[test]
    fn test_from_files_is_frozen_and_hydrated() {
        let dir = tempfile::tempdir().unwrap();
        let codes_path = dir.path().join("spe_smiles.txt");
        let vocab_path = dir.path().join("tks_smiles.json");
        std::fs::File::create(&codes_path)
            .unwrap()
            .write_all(CODES.as_bytes())
            .unwrap();

        let mut warm = MoltxTokenizer::with_merge_codes(&TokenizerConfig::default(), &codes_path).unwrap();
        let ids = warm.encode_to_ids(ASPIRIN);
        warm.dump(&vocab_path).unwrap();

        let mut cold =
            MoltxTokenizer::from_files(&TokenizerConfig::default(), &codes_path, &vocab_path).unwrap();
        assert!(cold.vocabulary().is_frozen());
        assert_eq!(cold.encode_to_ids(ASPIRIN), ids);
        assert_eq!(cold.encode_to_ids("N"), vec![UNK_TOKEN_ID]);
        assert_eq!(cold.len(), warm.len());
    }

    #[test]
    fn test_atomic_dropout_yields_atom_tokens() {
        let config = TokenizerConfig::builder()
            .dropout(ATOMIC_DROPOUT)
            .seed(7)
            .build()
            .unwrap();
        let mut tkz = tokenizer(config);
        let expected = AtomSplitter::new().split(ASPIRIN);
        for _ in 0..5 {
            assert_eq!(tkz.tokenize_pure(ASPIRIN), expected);
        }
        assert_eq!(
            strs(&tkz.tokenize_pure("<bos>cccc<eos>")),
            vec!["<bos>", "c", "c", "c", "c", "<eos>"]
        );
    }

    #[test]
    fn test_merge_table_limit_applies_to_codes_file() {
        let dir = tempfile::tempdir().unwrap();
        let codes_path = dir.path().join("spe_smiles.txt");
        std::fs::write(&codes_path, CODES).unwrap();

        let config = TokenizerConfig::builder().merge_table_limit(1).build().unwrap();
        let mut tkz = MoltxTokenizer::with_merge_codes(&config, &codes_path).unwrap();
        assert_eq!(tkz.merges().len(), 1);
        assert_eq!(strs(&tkz.tokenize_pure("cccc")), vec!["cc", "cc"]);
    }
}
