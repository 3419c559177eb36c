//! SMILES tokenization with atom-level BPE, merge dropout and a growable vocabulary.
//!
//! Text is scanned for `<\w{3}>` control tags (kept verbatim); the SMILES between
//! tags is split into atoms (`Br`, `Cl`, bracket atoms, bonds, ring closures, ...)
//! and merged with a learned, ranked merge table. Tokens are mapped to ids by a
//! capacity-bounded [`Vocabulary`] that registers unseen tokens while encoding.
//!
//! ```
//! use moltx_tokenizer::{MergeTable, MoltxTokenizer, TokenizerConfig};
//!
//! let merges = MergeTable::parse("c c\ncc cc\n", -1).unwrap();
//! let mut tkz = MoltxTokenizer::new(&TokenizerConfig::default(), merges).unwrap();
//! let ids = tkz.encode_to_ids("<bos>c1ccccc1<eos>");
//! assert_eq!(tkz.decode_from_ids(&ids).unwrap(), "<bos>c1ccccc1<eos>");
//! ```

pub mod atomwise;
pub mod bpe;
pub mod config;
pub mod constants;
pub mod error;
pub mod merges;
pub mod numeric;
#[cfg(feature = "python")]
mod python;
pub mod serialization;
pub mod tags;
pub mod tokenizer;
pub mod vocabulary;
mod word;

pub use atomwise::AtomSplitter;
pub use bpe::SmilesBpe;
pub use config::{TokenizerConfig, TokenizerConfigBuilder};
pub use constants::{
    BOS_TOKEN, CLS_TOKEN, EOS_TOKEN, PAD_TOKEN, RESERVED_TOKENS, SEP_TOKEN, UNK_TOKEN,
};
pub use error::{MoltxError, Result};
pub use merges::MergeTable;
pub use numeric::NumericalTokenizer;
pub use serialization::VocabularyFile;
pub use tags::TagScanner;
pub use tokenizer::MoltxTokenizer;
pub use vocabulary::Vocabulary;
pub use word::apply_merges;
