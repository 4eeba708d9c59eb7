//! Full-scan "index": no structure at all, every lookup walks the log.
//! Slow, but it reads the file as it is, which makes it the reference
//! the other strategies are tested against.

use crate::error::Result;
use crate::log::AppendLog;
use crate::record;

use super::{IndexKind, KeyIndex};

#[derive(Debug, Default)]
pub struct ScanIndex;

impl ScanIndex {
    pub fn new() -> Self {
        Self
    }
}

impl KeyIndex for ScanIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Scan
    }

    fn lookup(&self, log: &AppendLog, key: &str) -> Result<Option<u64>> {
        let mut latest = None;
        for entry in log.scan()? {
            let (offset, line) = entry?;
            if record::decode_key(&line)? == key {
                latest = Some(offset);
            }
        }
        Ok(latest)
    }

    fn note(&mut self, _key: &str, _offset: u64) {}

    fn clear(&mut self) {}

    fn len(&self) -> usize {
        0
    }

    fn rebuild(&mut self, _log: &AppendLog) -> Result<usize> {
        Ok(0)
    }
}
