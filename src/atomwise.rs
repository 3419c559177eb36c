//! Atom-level splitting of SMILES strings.

use std::sync::OnceLock;

use ahash::AHashSet;
use compact_str::CompactString;
use fancy_regex::Regex;

use crate::constants::{SMILES_ATOM_PATTERN, UNK_TOKEN};

/// Compiled SMILES atom pattern, shared by every splitter in the process.
pub(crate) fn smiles_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SMILES_ATOM_PATTERN).expect("Invalid SMILES pattern"))
}

/// Tokenize a SMILES string into atom-level tokens.
///
/// Handles multi-character atoms (Br, Cl), bracket atoms ([C@@H], [N+]), ring closures,
/// bonds, and stereochemistry markers. Characters that no alternative matches are
/// skipped without error.
pub(crate) fn atomwise_tokenize(smiles: &str, pattern: &Regex) -> Vec<CompactString> {
    let mut tokens = Vec::new();
    for m in pattern.find_iter(smiles).flatten() {
        tokens.push(CompactString::from(m.as_str()));
    }
    tokens
}

/// Splits SMILES into atomic tokens, optionally collapsing bracketed groups
/// that are not whitelisted into `<unk>`.
#[derive(Clone, Debug, Default)]
pub struct AtomSplitter {
    exclusive: Option<AHashSet<CompactString>>,
}

impl AtomSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the given bracketed groups, e.g. `["[C@@H]", "[nH]"]`.
    ///
    /// An empty list behaves like no whitelist at all.
    pub fn with_exclusive<I, S>(exclusive: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: AHashSet<CompactString> = exclusive
            .into_iter()
            .map(|s| CompactString::from(s.as_ref()))
            .collect();
        Self {
            exclusive: (!set.is_empty()).then_some(set),
        }
    }

    pub fn exclusive(&self) -> Option<&AHashSet<CompactString>> {
        self.exclusive.as_ref()
    }

    pub fn split(&self, smiles: &str) -> Vec<CompactString> {
        let mut tokens = atomwise_tokenize(smiles, smiles_pattern());
        if let Some(exclusive) = &self.exclusive {
            for token in tokens.iter_mut() {
                if token.starts_with('[') && !exclusive.contains(token.as_str()) {
                    *token = CompactString::from(UNK_TOKEN);
                }
            }
        }
        tokens
    }
}
