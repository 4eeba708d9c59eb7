//! Log Recovery
//!
//! Detects, and optionally repairs, a record file whose last append was cut
//! short. Complete lines are never removed, even when they fail to decode.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::record;

use super::NEWLINE;

/// Handles recovery of a partially written log
pub struct LogRecovery;

/// Result of a verify or recover pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Complete lines that decode to a key
    pub entries_recovered: u64,

    /// Complete lines that do not decode
    pub entries_malformed: u64,

    /// Length of the file up to and including the last newline
    pub valid_len: u64,

    /// Bytes after the last newline (a partial append)
    pub tail_bytes: u64,

    /// Whether the partial tail was cut off
    pub was_truncated: bool,
}

impl RecoveryResult {
    /// True when the file ends with an incomplete line
    pub fn has_partial_tail(&self) -> bool {
        self.tail_bytes > 0 && !self.was_truncated
    }
}

impl LogRecovery {
    /// Recover a log file in place
    ///
    /// This will:
    /// 1. Walk every complete line, counting decodable and malformed ones
    /// 2. Truncate an incomplete final line, if any
    ///
    /// A missing file is treated as an empty log.
    pub fn recover(path: &Path) -> Result<RecoveryResult> {
        let mut result = Self::verify(path)?;

        if result.tail_bytes > 0 {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(result.valid_len)?;
            file.sync_all()?;
            result.was_truncated = true;

            warn!(
                path = %path.display(),
                valid_len = result.valid_len,
                tail_bytes = result.tail_bytes,
                "truncated incomplete trailing record"
            );
        }

        if result.entries_recovered > 0 || result.entries_malformed > 0 {
            info!(
                path = %path.display(),
                recovered = result.entries_recovered,
                malformed = result.entries_malformed,
                "log recovery finished"
            );
        }

        Ok(result)
    }

    /// Inspect a log file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(RecoveryResult::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut result = RecoveryResult::default();
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader.read_until(NEWLINE, &mut buf)?;
            if read == 0 {
                break;
            }
            if buf.last() != Some(&NEWLINE) {
                result.tail_bytes = read as u64;
                break;
            }
            result.valid_len += read as u64;

            let decodes = std::str::from_utf8(&buf)
                .ok()
                .map(|line| record::decode_key(line).is_ok())
                .unwrap_or(false);

            if decodes {
                result.entries_recovered += 1;
            } else {
                result.entries_malformed += 1;
            }
        }

        Ok(result)
    }
}
