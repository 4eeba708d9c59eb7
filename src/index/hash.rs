//! Hash index: key → offset of the latest entry.

use std::collections::HashMap;

use crate::error::Result;
use crate::log::AppendLog;

use super::{IndexKind, KeyIndex};

#[derive(Debug, Default)]
pub struct HashIndex {
    offsets: HashMap<String, u64>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset currently recorded for `key`
    pub fn get(&self, key: &str) -> Option<u64> {
        self.offsets.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.offsets.contains_key(key)
    }
}

impl KeyIndex for HashIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Hash
    }

    fn lookup(&self, _log: &AppendLog, key: &str) -> Result<Option<u64>> {
        Ok(self.get(key))
    }

    fn note(&mut self, key: &str, offset: u64) {
        match self.offsets.get_mut(key) {
            Some(existing) => *existing = offset,
            None => {
                self.offsets.insert(key.to_string(), offset);
            }
        }
    }

    fn clear(&mut self) {
        self.offsets.clear();
    }

    fn len(&self) -> usize {
        self.offsets.len()
    }
}
