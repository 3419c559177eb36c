//! Capacity-bounded token vocabulary that grows as tokens are observed.

use std::ops::{Deref, DerefMut};

use ahash::AHashMap;
use compact_str::CompactString;

use crate::constants::{DEFAULT_CAPACITY, NUM_RESERVED_TOKENS, RESERVED_TOKENS, UNK_TOKEN_ID};
use crate::error::{MoltxError, Result};

/// Ordered mapping between tokens and stable ids.
///
/// Reserved tokens occupy ids 0-5. New tokens get the next id when observed,
/// unless the vocabulary is frozen or already holds `capacity` tokens. Ids are
/// never reassigned or reclaimed.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    token_to_id: AHashMap<CompactString, u32>,
    id_to_token: Vec<CompactString>,
    capacity: usize,
    frozen: bool,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::with_reserved(DEFAULT_CAPACITY, false)
    }
}

impl Vocabulary {
    /// Create a vocabulary holding only the reserved tokens.
    pub fn new(capacity: usize, frozen: bool) -> Result<Self> {
        if capacity < NUM_RESERVED_TOKENS {
            return Err(MoltxError::InvalidConfig(format!(
                "capacity ({}) must be at least the {} reserved tokens",
                capacity, NUM_RESERVED_TOKENS
            )));
        }
        Ok(Self::with_reserved(capacity, frozen))
    }

    fn with_reserved(capacity: usize, frozen: bool) -> Self {
        let mut vocab = Self {
            token_to_id: AHashMap::with_capacity(capacity),
            id_to_token: Vec::with_capacity(capacity),
            capacity,
            frozen,
        };
        // reserved ids don't depend on the freeze flag
        vocab.thaw().insert_new(RESERVED_TOKENS);
        vocab
    }

    /// Register every unseen token in order.
    ///
    /// No-op when frozen. Stops silently at capacity; tokens that did not fit
    /// resolve to `<unk>` on lookup. Returns how many tokens were added.
    pub fn register_observed<I, S>(&mut self, tokens: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.frozen {
            return 0;
        }
        self.insert_new(tokens)
    }

    fn insert_new<I, S>(&mut self, tokens: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for token in tokens {
            let token = token.as_ref();
            if self.token_to_id.contains_key(token) {
                continue;
            }
            if self.id_to_token.len() >= self.capacity {
                log::debug!(
                    "Vocabulary full at {} tokens, not registering {:?}",
                    self.capacity,
                    token
                );
                break;
            }
            let id = self.id_to_token.len() as u32;
            let token = CompactString::from(token);
            self.token_to_id.insert(token.clone(), id);
            self.id_to_token.push(token);
            added += 1;
        }
        added
    }

    /// Append tokens from a previously dumped vocabulary, even when frozen.
    ///
    /// The freeze flag is restored afterwards; capacity still applies.
    pub fn load_tokens<I, S>(&mut self, tokens: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.thaw().insert_new(tokens);
        log::info!(
            "Loaded vocabulary: {} new tokens, {} total (capacity {})",
            added,
            self.len(),
            self.capacity
        );
        added
    }

    /// Suspend the freeze flag until the returned guard is dropped.
    fn thaw(&mut self) -> Thawed<'_> {
        let frozen = std::mem::replace(&mut self.frozen, false);
        Thawed {
            vocab: self,
            frozen,
        }
    }

    /// Id of `token`, or the `<unk>` id if it was never registered.
    #[inline]
    pub fn id_of(&self, token: &str) -> u32 {
        self.token_to_id.get(token).copied().unwrap_or(UNK_TOKEN_ID)
    }

    /// Token for `id`.
    pub fn token_of(&self, id: u32) -> Result<&str> {
        self.id_to_token
            .get(id as usize)
            .map(|t| t.as_str())
            .ok_or(MoltxError::IdOutOfRange {
                id,
                size: self.id_to_token.len(),
            })
    }

    /// Concatenate the tokens for `ids` without separators.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        let mut result = String::new();
        for &id in ids {
            result.push_str(self.token_of(id)?);
        }
        Ok(result)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Tokens in id order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.id_to_token.iter().map(|t| t.as_str())
    }

    /// Return the vocabulary as a list of (token_string, token_id) tuples
    pub fn get_vocabulary(&self) -> Vec<(String, u32)> {
        self.id_to_token
            .iter()
            .enumerate()
            .map(|(id, token)| (token.to_string(), id as u32))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    /// Never true in practice: reserved tokens are always present.
    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_full(&self) -> bool {
        self.id_to_token.len() >= self.capacity
    }
}

/// Scoped override of [`Vocabulary::frozen`]; restores the flag on drop.
struct Thawed<'a> {
    vocab: &'a mut Vocabulary,
    frozen: bool,
}

impl Deref for Thawed<'_> {
    type Target = Vocabulary;

    fn deref(&self) -> &Vocabulary {
        &*self.vocab
    }
}

impl DerefMut for Thawed<'_> {
    fn deref_mut(&mut self) -> &mut Vocabulary {
        &mut *self.vocab
    }
}

impl Drop for Thawed<'_> {
    fn drop(&mut self) {
        self.vocab.frozen = self.frozen;
    }
}
