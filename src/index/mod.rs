//! Index Module
//!
//! Interchangeable strategies for resolving a key to the offset of its
//! latest log entry.
//!
//! | Strategy | Structure              | Insert check | Lookup    |
//! |----------|------------------------|--------------|-----------|
//! | Scan     | none                   | O(n) scan    | O(n) scan |
//! | Hash     | `HashMap<key, offset>` | O(1)         | O(1)      |
//! | Sorted   | `Vec<(key, offset)>`   | O(log n)     | O(log n)  |
//!
//! Hash and Sorted are authoritative once built: they are never re-checked
//! against the file. Anything that changes the file behind a store's back
//! must be followed by `rebuild`.

mod hash;
mod scan;
mod sorted;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use tracing::debug;

use crate::error::{FlatError, Result};
use crate::log::AppendLog;
use crate::record;

pub use hash::HashIndex;
pub use scan::ScanIndex;
pub use sorted::SortedIndex;

/// Contract shared by every lookup strategy
pub trait KeyIndex: Send {
    /// Which strategy this is
    fn kind(&self) -> IndexKind;

    /// Offset of the latest entry for `key`, if any
    fn lookup(&self, log: &AppendLog, key: &str) -> Result<Option<u64>>;

    /// Record that the latest entry for `key` now lives at `offset`
    fn note(&mut self, key: &str, offset: u64);

    /// Forget every key
    fn clear(&mut self);

    /// Number of keys held in memory
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear and replay the whole log; later entries win.
    ///
    /// Returns the number of log entries replayed.
    fn rebuild(&mut self, log: &AppendLog) -> Result<usize> {
        self.clear();

        let mut replayed = 0;
        for entry in log.scan()? {
            let (offset, line) = entry?;
            let key = record::decode_key(&line)?;
            self.note(key, offset);
            replayed += 1;
        }

        debug!(kind = %self.kind(), replayed, keys = self.len(), "index rebuilt");
        Ok(replayed)
    }
}

/// Available index strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum IndexKind {
    /// No index; every lookup scans the log
    Scan,

    /// Hash map from key to latest offset
    Hash,

    /// Sorted array of (key, offset), binary searched
    Sorted,
}

impl IndexKind {
    /// All strategies, in increasing order of sophistication
    pub const ALL: [IndexKind; 3] = [IndexKind::Scan, IndexKind::Hash, IndexKind::Sorted];

    /// Create an empty index of this kind
    pub fn build(self) -> Box<dyn KeyIndex> {
        match self {
            IndexKind::Scan => Box::new(ScanIndex::new()),
            IndexKind::Hash => Box::new(HashIndex::new()),
            IndexKind::Sorted => Box::new(SortedIndex::new()),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::Scan => "scan",
            IndexKind::Hash => "hash",
            IndexKind::Sorted => "sorted",
        };
        f.pad(name)
    }
}

impl FromStr for IndexKind {
    type Err = FlatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scan" => Ok(IndexKind::Scan),
            "hash" => Ok(IndexKind::Hash),
            "sorted" => Ok(IndexKind::Sorted),
            other => Err(FlatError::Config(format!("unknown index kind: {other}"))),
        }
    }
}
