//! Log Scanner
//!
//! Sequential iteration over every line of the log.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{FlatError, Result};

use super::NEWLINE;

/// Iterator over `(offset, line)` pairs in file order
///
/// A missing file scans as empty. An incomplete final line is reported
/// once as `MalformedRecord`, after which the scanner is exhausted.
pub struct LogScanner {
    reader: Option<BufReader<File>>,
    /// Offset of the next line
    offset: u64,
    buf: Vec<u8>,
}

impl LogScanner {
    /// Open a scanner positioned at offset 0
    pub fn open(path: &Path) -> Result<Self> {
        let reader = match File::open(path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            reader,
            offset: 0,
            buf: Vec::new(),
        })
    }

    /// Offset the next line would start at
    pub fn position(&self) -> u64 {
        self.offset
    }
}

impl Iterator for LogScanner {
    type Item = Result<(u64, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        self.buf.clear();
        let read = match reader.read_until(NEWLINE, &mut self.buf) {
            Ok(0) => {
                self.reader = None;
                return None;
            }
            Ok(n) => n,
            Err(e) => {
                self.reader = None;
                return Some(Err(FlatError::Io(e)));
            }
        };

        let offset = self.offset;
        self.offset += read as u64;

        if self.buf.last() != Some(&NEWLINE) {
            self.reader = None;
            return Some(Err(FlatError::MalformedRecord(format!(
                "incomplete line at offset {} ({} bytes)",
                offset, read
            ))));
        }
        self.buf.pop();

        match String::from_utf8(std::mem::take(&mut self.buf)) {
            Ok(line) => Some(Ok((offset, line))),
            Err(_) => Some(Err(FlatError::MalformedRecord(format!(
                "line at offset {} is not valid UTF-8",
                offset
            )))),
        }
    }
}
