//! # FlatKV
//!
//! A small embedded record store with:
//! - An append-only flat text file, one record per line
//! - Three interchangeable lookup strategies: full scan, hash, sorted array
//! - Last-write-wins reads and an explicit duplicate/update policy
//! - Repair of a partially written final record on open
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RecordStore                           │
//! │           insert / read / update / reset / rebuild          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  (one Mutex around log + index)
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │ Record Codec│          │     KeyIndex     │
//!   │ (one line)  │          │ scan|hash|sorted │
//!   └──────┬──────┘          └────────┬─────────┘
//!          │                          │ key → offset
//!          ▼                          ▼
//!   ┌─────────────────────────────────────────┐
//!   │               Append Log                │
//!   │   append → offset, scan, read_at(offset)│
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use flatkv::{Config, IndexKind, RecordStore};
//!
//! let config = Config::builder()
//!     .path("students.db")
//!     .index_kind(IndexKind::Sorted)
//!     .build();
//! let store = RecordStore::open(config)?;
//!
//! store.insert("Alice Smith", &["2020-01-01", "90", "ok"])?;
//! let record = store.read("Alice Smith")?;
//! assert_eq!(record.fields, vec!["2020-01-01", "90", "ok"]);
//! # Ok::<(), flatkv::FlatError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod log;
pub mod index;
pub mod store;
pub mod workload;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlatError, Result};
pub use config::{Config, SyncStrategy, TailPolicy, WritePolicy};
pub use index::{IndexKind, KeyIndex};
pub use record::{Record, Student};
pub use store::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FlatKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
