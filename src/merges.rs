//! Ordered merge rules loaded from a SMILES pair encoding codes file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use compact_str::CompactString;

use crate::error::{MoltxError, Result};

/// Learned merges keyed by pair, valued by rank (0 merges first).
///
/// Ranks are nested by left token so lookups borrow `&str` keys.
/// Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct MergeTable {
    ranks: AHashMap<CompactString, AHashMap<CompactString, usize>>,
    len: usize,
}

impl MergeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pairs in priority order.
    ///
    /// If a pair is listed twice the later line's rank replaces the earlier one.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<CompactString>,
        B: Into<CompactString>,
    {
        let mut ranks: AHashMap<CompactString, AHashMap<CompactString, usize>> = AHashMap::new();
        let mut len = 0;
        for (rank, (left, right)) in pairs.into_iter().enumerate() {
            if ranks
                .entry(left.into())
                .or_default()
                .insert(right.into(), rank)
                .is_none()
            {
                len += 1;
            }
        }
        Self { ranks, len }
    }

    /// Parse codes text: one merge per line, `token1 token2`.
    ///
    /// Each line is trimmed and split on single spaces, so a doubled space or a
    /// tab separator is a malformed line.
    /// `limit` keeps only the first K lines; `-1` (or any negative value) keeps all.
    /// Lines beyond the limit are not validated.
    pub fn parse(codes: &str, limit: i64) -> Result<Self> {
        Self::from_lines(codes.lines().map(|l| Ok(l.to_owned())), limit)
    }

    /// Load a codes file from disk.
    pub fn load<P: AsRef<Path>>(path: P, limit: i64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MoltxError::io(e, path))?;
        let reader = BufReader::new(file);
        let table = Self::from_lines(
            reader.lines().map(|l| l.map_err(|e| MoltxError::io(e, path))),
            limit,
        )?;
        log::info!("Loaded {} merges from {:?}", table.len(), path);
        Ok(table)
    }

    fn from_lines<I>(lines: I, limit: i64) -> Result<Self>
    where
        I: Iterator<Item = Result<String>>,
    {
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut pairs: Vec<(CompactString, CompactString)> = Vec::new();

        for (n, line) in lines.take(take).enumerate() {
            let line = line?;
            let parts: Vec<&str> = line.trim().split(' ').collect();
            if parts.len() != 2 {
                return Err(MoltxError::MalformedMerge {
                    line: n,
                    fields: parts.len(),
                });
            }
            pairs.push((CompactString::from(parts[0]), CompactString::from(parts[1])));
        }

        log::debug!("Parsed {} merge codes", pairs.len());
        Ok(Self::from_pairs(pairs))
    }

    /// Rank of `(left, right)`, if it is a learned merge.
    #[inline]
    pub fn rank(&self, left: &str, right: &str) -> Option<usize> {
        self.ranks.get(left)?.get(right).copied()
    }

    pub fn contains(&self, left: &str, right: &str) -> bool {
        self.rank(left, right).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Merge rules as (left, right, merged) string tuples, in rank order.
    pub fn get_merges(&self) -> Vec<(String, String, String)> {
        let mut sorted: Vec<_> = self
            .ranks
            .iter()
            .flat_map(|(left, rights)| rights.iter().map(move |(right, &rank)| (left, right, rank)))
            .collect();
        sorted.sort_by_key(|&(_, _, rank)| rank);
        sorted
            .into_iter()
            .map(|(left, right, _)| {
                (
                    left.to_string(),
                    right.to_string(),
                    format!("{}{}", left, right),
                )
            })
            .collect()
    }
}
