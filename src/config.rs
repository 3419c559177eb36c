//! Constructor-time configuration for [`crate::MoltxTokenizer`].

use serde::{Deserialize, Serialize};

use crate::constants::{ALL_MERGES, DEFAULT_CAPACITY, NUM_RESERVED_TOKENS};
use crate::error::{MoltxError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Maximum vocabulary size, reserved tokens included.
    pub capacity: usize,
    /// Disables vocabulary growth during encoding.
    pub frozen: bool,
    /// Merge dropout probability in `[0, 1]`; 0 is standard BPE.
    pub dropout: f64,
    /// Number of merge codes to read; `-1` reads all of them.
    pub merge_table_limit: i64,
    /// Bracketed atoms to keep; others become `<unk>`. `None` keeps every bracket.
    pub exclusive_bracket_tokens: Option<Vec<String>>,
    /// Seed for the dropout random source; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl TokenizerConfig {
    #[must_use]
    pub fn builder() -> TokenizerConfigBuilder {
        TokenizerConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity < NUM_RESERVED_TOKENS {
            return Err(MoltxError::InvalidConfig(format!(
                "capacity ({}) must be at least the {} reserved tokens",
                self.capacity, NUM_RESERVED_TOKENS
            )));
        }
        if !(0.0..=1.0).contains(&self.dropout) {
            return Err(MoltxError::InvalidConfig(format!(
                "dropout ({}) must be within [0, 1]",
                self.dropout
            )));
        }
        Ok(())
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            frozen: false,
            dropout: 0.0,
            merge_table_limit: ALL_MERGES,
            exclusive_bracket_tokens: None,
            seed: None,
        }
    }
}

/// Builder for [`TokenizerConfig`].
#[derive(Debug, Default, Clone)]
pub struct TokenizerConfigBuilder {
    cfg: TokenizerConfig,
}

impl TokenizerConfigBuilder {
    #[must_use]
    pub fn capacity(mut self, value: usize) -> Self {
        self.cfg.capacity = value;
        self
    }

    #[must_use]
    pub fn frozen(mut self, value: bool) -> Self {
        self.cfg.frozen = value;
        self
    }

    #[must_use]
    pub fn dropout(mut self, value: f64) -> Self {
        self.cfg.dropout = value;
        self
    }

    #[must_use]
    pub fn merge_table_limit(mut self, value: i64) -> Self {
        self.cfg.merge_table_limit = value;
        self
    }

    #[must_use]
    pub fn exclusive_bracket_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.exclusive_bracket_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn seed(mut self, value: u64) -> Self {
        self.cfg.seed = Some(value);
        self
    }

    /// Finalises the builder, returning a validated [`TokenizerConfig`].
    pub fn build(self) -> Result<TokenizerConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TokenizerConfig::default();
        assert_eq!(cfg.capacity, 512);
        assert!(!cfg.frozen);
        assert_eq!(cfg.dropout, 0.0);
        assert_eq!(cfg.merge_table_limit, -1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder_validates() {
        assert!(TokenizerConfig::builder().dropout(1.5).build().is_err());
        assert!(TokenizerConfig::builder().dropout(-0.1).build().is_err());
        assert!(TokenizerConfig::builder().capacity(3).build().is_err());
        let cfg = TokenizerConfig::builder()
            .capacity(64)
            .dropout(1.0)
            .seed(9)
            .exclusive_bracket_tokens(["[nH]"])
            .build()
            .unwrap();
        assert_eq!(cfg.capacity, 64);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.exclusive_bracket_tokens, Some(vec!["[nH]".to_string()]));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: TokenizerConfig = serde_json::from_str(r#"{"capacity": 128, "dropout": 0.1}"#).unwrap();
        assert_eq!(cfg.capacity, 128);
        assert_eq!(cfg.merge_table_limit, -1);
        assert!(cfg.seed.is_none());
    }
}
