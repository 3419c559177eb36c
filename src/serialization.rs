//! JSON persistence for vocabularies: `{"tokens": [...]}`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MoltxError, Result};
use crate::vocabulary::Vocabulary;

/// On-disk form of a vocabulary: tokens in id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyFile {
    pub tokens: Vec<String>,
}

impl From<&Vocabulary> for VocabularyFile {
    fn from(vocab: &Vocabulary) -> Self {
        Self {
            tokens: vocab.tokens().map(str::to_owned).collect(),
        }
    }
}

impl Vocabulary {
    pub fn dumps(&self) -> Result<String> {
        Ok(serde_json::to_string(&VocabularyFile::from(self))?)
    }

    /// Append the tokens of a dumped vocabulary; see [`Vocabulary::load_tokens`].
    ///
    /// Parsing happens before anything is registered, so invalid JSON leaves
    /// the vocabulary untouched.
    pub fn loads(&mut self, json: &str) -> Result<usize> {
        let file: VocabularyFile = serde_json::from_str(json)?;
        Ok(self.load_tokens(&file.tokens))
    }

    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.dumps()?;
        fs::write(path, json).map_err(|e| MoltxError::io(e, path))?;
        log::info!("Saved {} tokens to {:?}", self.len(), path);
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| MoltxError::io(e, path))?;
        self.loads(&json)
    }
}
