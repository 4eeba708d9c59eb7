//! Configuration for FlatKV
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::{FlatError, Result};
use crate::index::IndexKind;

/// Main configuration for a FlatKV store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the flat record file. The file is created on first append;
    /// its parent directory is created when the store opens.
    pub path: PathBuf,

    /// How often appends are fsynced
    pub sync_strategy: SyncStrategy,

    /// What to do with an incomplete trailing line found on open
    pub tail_policy: TailPolicy,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Lookup strategy used by the store
    pub index_kind: IndexKind,

    /// Duplicate/update policy, fixed for the lifetime of the store
    pub write_policy: WritePolicy,
}

/// Sync strategy: how often to fsync the record file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Leave buffering to the OS (write only, never fsync)
    OsBuffered,

    /// fsync after every append (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced appends
    EveryNEntries { count: usize },
}

/// Duplicate-key and update semantics of a store.
///
/// One policy is chosen per store and applies to every index variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WritePolicy {
    /// Inserting an existing key fails with `DuplicateKey`; updates rewrite
    /// the file, replacing the key's entry in place.
    Strict,

    /// Every insert and update appends a new entry; reads resolve the
    /// most recent one.
    Versioned,
}

/// Handling of a partially written final line found when a store opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TailPolicy {
    /// Truncate the file back to the last complete line
    Truncate,

    /// Refuse to open with `MalformedRecord`
    Reject,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./flatkv_data/records.db"),
            sync_strategy: SyncStrategy::OsBuffered,
            tail_policy: TailPolicy::Truncate,
            index_kind: IndexKind::Hash,
            write_policy: WritePolicy::Strict,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check values that can't be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if let SyncStrategy::EveryNEntries { count: 0 } = self.sync_strategy {
            return Err(FlatError::Config(
                "EveryNEntries sync count must be at least 1".to_string(),
            ));
        }
        if self.path.as_os_str().is_empty() {
            return Err(FlatError::Config("store path is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the record file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the tail policy applied on open
    pub fn tail_policy(mut self, policy: TailPolicy) -> Self {
        self.config.tail_policy = policy;
        self
    }

    /// Set the index strategy
    pub fn index_kind(mut self, kind: IndexKind) -> Self {
        self.config.index_kind = kind;
        self
    }

    /// Set the write policy
    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.config.write_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

// =============================================================================
// String Conversions
// =============================================================================

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::Strict => f.write_str("strict"),
            WritePolicy::Versioned => f.write_str("versioned"),
        }
    }
}

impl FromStr for WritePolicy {
    type Err = FlatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(WritePolicy::Strict),
            "versioned" => Ok(WritePolicy::Versioned),
            other => Err(FlatError::Config(format!("unknown write policy: {other}"))),
        }
    }
}

impl fmt::Display for TailPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailPolicy::Truncate => f.write_str("truncate"),
            TailPolicy::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for TailPolicy {
    type Err = FlatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "truncate" => Ok(TailPolicy::Truncate),
            "reject" => Ok(TailPolicy::Reject),
            other => Err(FlatError::Config(format!("unknown tail policy: {other}"))),
        }
    }
}
