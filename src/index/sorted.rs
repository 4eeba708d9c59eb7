//! Sorted-array index
//!
//! Keeps one `(key, offset)` pair per key in ascending key order. Locating a
//! key (for lookups, duplicate checks and insert positions alike) is a single
//! binary search; inserting a new key shifts the tail of the vector.

use crate::error::Result;
use crate::log::AppendLog;

use super::{IndexKind, KeyIndex};

#[derive(Debug, Default)]
pub struct SortedIndex {
    entries: Vec<(String, u64)>,
}

impl SortedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Ok(i)` if `key` is at position `i`, `Err(i)` if it would be inserted there
    fn search(&self, key: &str) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.as_str().cmp(key))
    }

    /// Offset currently recorded for `key`
    pub fn get(&self, key: &str) -> Option<u64> {
        self.search(key).ok().map(|i| self.entries[i].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.search(key).is_ok()
    }

    /// Indexed keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Indexed pairs in ascending key order
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }
}

impl KeyIndex for SortedIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Sorted
    }

    fn lookup(&self, _log: &AppendLog, key: &str) -> Result<Option<u64>> {
        Ok(self.get(key))
    }

    fn note(&mut self, key: &str, offset: u64) {
        match self.search(key) {
            Ok(i) => self.entries[i].1 = offset,
            Err(i) => self.entries.insert(i, (key.to_string(), offset)),
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
