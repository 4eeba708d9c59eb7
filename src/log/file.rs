//! Append Log file
//!
//! Handles appending, positional reads, rewrites and reset of the record file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::SyncStrategy;
use crate::error::{FlatError, Result};

use super::{LogScanner, NEWLINE};

/// Append-only flat file of newline-terminated lines
pub struct AppendLog {
    /// Backing file path
    path: PathBuf,

    /// Append handle, opened on first append
    file: Option<File>,

    /// Current file length in bytes (offset of the next append)
    len: u64,

    /// When to fsync
    sync_strategy: SyncStrategy,

    /// Appends since the last fsync
    uncommitted: usize,
}

impl AppendLog {
    /// Bind a log to `path` without creating the file
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            file: None,
            len,
            sync_strategy,
            uncommitted: 0,
        })
    }

    /// Append a line and return the offset of its first byte
    pub fn append(&mut self, line: &str) -> Result<u64> {
        if line.as_bytes().contains(&NEWLINE) {
            return Err(FlatError::MalformedRecord(format!(
                "line to append contains a newline: {:?}",
                line
            )));
        }

        let mut file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?,
        };

        // O_APPEND writes land at the real end of file, which may have moved
        let offset = file.metadata()?.len();

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(NEWLINE);
        file.write_all(&buf)?;
        self.file = Some(file);

        self.len = offset + buf.len() as u64;
        self.uncommitted += 1;

        let should_sync = match self.sync_strategy {
            SyncStrategy::OsBuffered => false,
            SyncStrategy::EveryWrite => true,
            SyncStrategy::EveryNEntries { count } => self.uncommitted >= count,
        };
        if should_sync {
            self.sync()?;
        }

        trace!(offset, bytes = buf.len(), "log append");
        Ok(offset)
    }

    /// Read the single line starting at `offset` (newline stripped)
    pub fn read_at(&self, offset: u64) -> Result<String> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FlatError::NotFound(format!(
                    "log {} does not exist",
                    self.path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let file_len = file.metadata()?.len();
        if offset >= file_len {
            return Err(FlatError::NotFound(format!(
                "offset {} is beyond end of log ({} bytes)",
                offset, file_len
            )));
        }

        // A record starts at 0 or right after a newline
        if offset > 0 {
            file.seek(SeekFrom::Start(offset - 1))?;
            let mut prev = [0u8; 1];
            file.read_exact(&mut prev)?;
            if prev[0] != NEWLINE {
                return Err(FlatError::MalformedRecord(format!(
                    "offset {} is not at a record boundary",
                    offset
                )));
            }
        } else {
            file.seek(SeekFrom::Start(0))?;
        }

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        reader.read_until(NEWLINE, &mut buf)?;

        if buf.last() != Some(&NEWLINE) {
            return Err(FlatError::MalformedRecord(format!(
                "incomplete line at offset {}",
                offset
            )));
        }
        buf.pop();

        String::from_utf8(buf).map_err(|_| {
            FlatError::MalformedRecord(format!("line at offset {} is not valid UTF-8", offset))
        })
    }

    /// Iterate over every (offset, line) pair from the start of the file
    pub fn scan(&self) -> Result<LogScanner> {
        LogScanner::open(&self.path)
    }

    /// Replace the whole file with `lines`
    ///
    /// Writes a sibling temp file, syncs it, then renames it over the log.
    /// Every previously handed-out offset is invalid afterwards. On failure
    /// the temp file is removed and the log is left as it was.
    pub fn rewrite<I, S>(&mut self, lines: I) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tmp_path = self.rewrite_path();

        let (written, count) = match Self::write_lines(&tmp_path, lines) {
            Ok(totals) => totals,
            Err(e) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(e);
            }
        };

        // Drop the append handle before the inode it points at is replaced
        self.file = None;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        self.len = written;
        self.uncommitted = 0;

        debug!(path = %self.path.display(), lines = count, bytes = written, "log rewritten");
        Ok(written)
    }

    /// Write `lines` to a fresh file at `path` and fsync it
    fn write_lines<I, S>(path: &Path, lines: I) -> Result<(u64, usize)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        let mut written = 0u64;
        let mut count = 0usize;

        for line in lines {
            let line = line.as_ref();
            if line.as_bytes().contains(&NEWLINE) {
                return Err(FlatError::MalformedRecord(format!(
                    "line to rewrite contains a newline: {:?}",
                    line
                )));
            }
            writer.write_all(line.as_bytes())?;
            writer.write_all(&[NEWLINE])?;
            written += line.len() as u64 + 1;
            count += 1;
        }

        let file = writer
            .into_inner()
            .map_err(|e| FlatError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok((written, count))
    }

    /// Delete the backing file; later operations see an empty log
    pub fn reset(&mut self) -> Result<()> {
        self.file = None;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.len = 0;
        self.uncommitted = 0;

        debug!(path = %self.path.display(), "log reset");
        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.sync_data()?;
        }
        self.uncommitted = 0;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Length of the log in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the backing file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends not yet fsynced
    pub fn uncommitted_count(&self) -> usize {
        self.uncommitted
    }

    fn rewrite_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".rewrite");
        self.path.with_file_name(name)
    }
}
