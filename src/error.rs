//! Error type shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = MoltxError> = std::result::Result<T, E>;

/// Failures raised while loading merge codes, decoding ids, or touching the filesystem.
///
/// Unknown tokens, a full vocabulary, and characters outside the SMILES grammar
/// are deliberately not errors.
#[derive(Debug, Error)]
pub enum MoltxError {
    /// A merge codes line did not contain exactly two tokens.
    #[error("Invalid BPE code at line: {line} (expected 2 tokens, found {fields})")]
    MalformedMerge {
        /// Zero-based line index in the codes source.
        line: usize,
        /// Number of whitespace-separated fields found on the line.
        fields: usize,
    },
    /// A token id outside the current vocabulary was passed to a decode.
    #[error("Unknown token id: {id} (vocabulary size is {size})")]
    IdOutOfRange { id: u32, size: usize },
    /// Tokenizer configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Filesystem IO error with the path involved.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    /// JSON serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MoltxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl MoltxError {
    /// Wrap an IO error together with the path that produced it.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_merge_message_names_line() {
        let err = MoltxError::MalformedMerge { line: 3, fields: 1 };
        assert!(err.to_string().contains("line: 3"));
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err: MoltxError = json_err.into();
        assert!(matches!(err, MoltxError::Serialization(_)));
    }
}
