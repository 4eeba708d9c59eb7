//! Store Module
//!
//! The record store that composes the append log with one index strategy.
//!
//! ## Responsibilities
//! - Encode records before anything touches the file
//! - Enforce the configured write policy
//! - Keep the index in step with the log (incrementally or by rebuild)
//! - Repair a partially written tail on open

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::config::{Config, TailPolicy, WritePolicy};
use crate::error::{FlatError, Result};
use crate::index::{IndexKind, KeyIndex};
use crate::log::{AppendLog, LogRecovery};
use crate::record::{self, Record, Student};

/// An append-only record store
///
/// ## Concurrency Model
///
/// Every operation takes the single `inner` lock, so an append and the index
/// update that follows it are never interleaved with another thread's. The
/// store is `Send + Sync` and can be shared through an `Arc`. Two stores (or
/// processes) on the same file are not coordinated; call `rebuild` on one
/// after the other has written.
pub struct RecordStore {
    /// Store configuration
    config: Config,

    /// Log and index, always mutated together
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    log: AppendLog,
    index: Box<dyn KeyIndex>,
}

impl RecordStore {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the parent directory
    /// 2. Apply the tail policy to a partially written last line
    /// 3. Build the configured index from the log
    pub fn open(config: Config) -> Result<Self> {
        let index = config.index_kind.build();
        Self::with_index(config, index)
    }

    /// Open a store around a caller-supplied index
    ///
    /// `config.index_kind` is ignored; the index reports its own kind.
    pub fn with_index(config: Config, mut index: Box<dyn KeyIndex>) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        match config.tail_policy {
            TailPolicy::Truncate => {
                LogRecovery::recover(&config.path)?;
            }
            TailPolicy::Reject => {
                let report = LogRecovery::verify(&config.path)?;
                if report.has_partial_tail() {
                    return Err(FlatError::MalformedRecord(format!(
                        "{} ends with {} bytes of an incomplete record",
                        config.path.display(),
                        report.tail_bytes
                    )));
                }
            }
        }

        let log = AppendLog::open(&config.path, config.sync_strategy)?;
        let replayed = index.rebuild(&log)?;

        info!(
            path = %config.path.display(),
            index = %index.kind(),
            policy = %config.write_policy,
            replayed,
            "store opened"
        );

        Ok(Self {
            config,
            inner: Mutex::new(StoreInner { log, index }),
        })
    }

    /// Open with a path and index kind (convenience method)
    ///
    /// Uses default config otherwise
    pub fn open_path(path: &Path, index_kind: IndexKind) -> Result<Self> {
        let config = Config::builder()
            .path(path)
            .index_kind(index_kind)
            .build();
        Self::open(config)
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Insert a new record
    ///
    /// Under `Strict`, fails with `DuplicateKey` if the index already knows
    /// the key and leaves the file untouched. Under `Versioned`, appends a new
    /// version.
    pub fn insert<S: AsRef<str>>(&self, key: &str, fields: &[S]) -> Result<()> {
        self.insert_record(&Self::make_record(key, fields))
    }

    /// Insert a prebuilt record
    pub fn insert_record(&self, record: &Record) -> Result<()> {
        let line = record::encode(record)?;

        let mut inner = self.inner.lock();
        let StoreInner { log, index } = &mut *inner;

        if self.config.write_policy == WritePolicy::Strict
            && index.lookup(log, &record.key)?.is_some()
        {
            return Err(FlatError::DuplicateKey(record.key.clone()));
        }

        let offset = log.append(&line)?;
        index.note(&record.key, offset);

        trace!(key_len = record.key.len(), offset, "store insert");
        Ok(())
    }

    /// Insert a student row
    pub fn insert_student(&self, student: &Student) -> Result<()> {
        self.insert_record(&Record::from(student))
    }

    /// Read the latest record for `key`
    pub fn read(&self, key: &str) -> Result<Record> {
        let inner = self.inner.lock();

        let offset = inner
            .index
            .lookup(&inner.log, key)?
            .ok_or_else(|| FlatError::NotFound(key.to_string()))?;

        let line = inner.log.read_at(offset)?;
        let record = record::decode(&line)?;

        if record.key != key {
            return Err(FlatError::MalformedRecord(format!(
                "index maps {:?} to offset {} which holds {:?}",
                key, offset, record.key
            )));
        }

        trace!(key_len = key.len(), offset, "store read");
        Ok(record)
    }

    /// Read the latest student row for `full_name`
    pub fn read_student(&self, full_name: &str) -> Result<Student> {
        Student::try_from(self.read(full_name)?)
    }

    /// Replace the value of an existing key
    ///
    /// Fails with `NotFound` if the key is unknown. Under `Versioned` a new
    /// entry is appended; under `Strict` the file is rewritten with the
    /// key's entry replaced in place and the index is rebuilt.
    pub fn update<S: AsRef<str>>(&self, key: &str, fields: &[S]) -> Result<()> {
        self.update_record(&Self::make_record(key, fields))
    }

    /// Update with a prebuilt record
    pub fn update_record(&self, record: &Record) -> Result<()> {
        let line = record::encode(record)?;

        let mut inner = self.inner.lock();
        let StoreInner { log, index } = &mut *inner;

        if index.lookup(log, &record.key)?.is_none() {
            return Err(FlatError::NotFound(record.key.clone()));
        }

        match self.config.write_policy {
            WritePolicy::Versioned => {
                let offset = log.append(&line)?;
                index.note(&record.key, offset);
                trace!(key_len = record.key.len(), offset, "store update (append)");
            }
            WritePolicy::Strict => {
                let mut lines = Vec::new();
                let mut replaced = false;
                for entry in log.scan()? {
                    let (_, existing) = entry?;
                    if record::decode_key(&existing)? != record.key {
                        lines.push(existing);
                    } else if !replaced {
                        lines.push(line.clone());
                        replaced = true;
                    }
                }

                // The index pointed at a key the file no longer holds
                if !replaced {
                    index.rebuild(log)?;
                    return Err(FlatError::NotFound(record.key.clone()));
                }

                log.rewrite(&lines)?;
                index.rebuild(log)?;
                debug!(key_len = record.key.len(), lines = lines.len(), "store update (rewrite)");
            }
        }

        Ok(())
    }

    /// Update a student row
    pub fn update_student(&self, student: &Student) -> Result<()> {
        self.update_record(&Record::from(student))
    }

    /// Whether `key` currently resolves to a record
    pub fn contains(&self, key: &str) -> Result<bool> {
        let inner = self.inner.lock();
        Ok(inner.index.lookup(&inner.log, key)?.is_some())
    }

    /// Delete the file and clear the index
    pub fn reset(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.log.reset()?;
        inner.index.clear();
        Ok(())
    }

    /// Rebuild the index from the file
    ///
    /// Needed after the file was changed by anything other than this store.
    pub fn rebuild(&self) -> Result<usize> {
        let mut inner = self.inner.lock();
        let StoreInner { log, index } = &mut *inner;
        index.rebuild(log)
    }

    // =========================================================================
    // Bulk Reads
    // =========================================================================

    /// Every entry in the file with its offset, oldest first
    pub fn entries(&self) -> Result<Vec<(u64, Record)>> {
        let inner = self.inner.lock();
        let mut entries = Vec::new();
        for entry in inner.log.scan()? {
            let (offset, line) = entry?;
            entries.push((offset, record::decode(&line)?));
        }
        Ok(entries)
    }

    /// The current value of every key, ordered by first appearance
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut records: Vec<Record> = Vec::new();

        for (_, record) in self.entries()? {
            match positions.get(&record.key) {
                Some(&i) => records[i] = record,
                None => {
                    positions.insert(record.key.clone(), records.len());
                    records.push(record);
                }
            }
        }
        Ok(records)
    }

    /// Sync the file and consume the store
    pub fn close(self) -> Result<()> {
        let mut inner = self.inner.into_inner();
        inner.log.sync()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the record file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the index strategy in use
    pub fn index_kind(&self) -> IndexKind {
        self.inner.lock().index.kind()
    }

    /// Get the write policy
    pub fn write_policy(&self) -> WritePolicy {
        self.config.write_policy
    }

    /// Get the file length in bytes
    pub fn log_len(&self) -> u64 {
        self.inner.lock().log.len()
    }

    /// Number of keys held by the in-memory index (0 for full scan)
    pub fn index_len(&self) -> usize {
        self.inner.lock().index.len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn make_record<S: AsRef<str>>(key: &str, fields: &[S]) -> Record {
        Record::new(key, fields.iter().map(|f| f.as_ref()))
    }
}
