//! Append Log Module
//!
//! Byte-offset-addressable flat file backing a store.
//!
//! ## Responsibilities
//! - Append encoded records and hand back their starting offsets
//! - Restartable full scans in file order
//! - Positional reads of a single line
//! - Detect and repair a partially written final line
//!
//! ## File Format
//! ```text
//! offset 0   ┌──────────────────────────────────────┐
//!            │ 11;16;Alice Smith;2020-01-01;90;ok\n │
//! offset 35  ├──────────────────────────────────────┤
//!            │ 7;14;Bob Lee;2021-03-02;71;\n        │
//!            ├──────────────────────────────────────┤
//!            │ ...                                  │
//!            └──────────────────────────────────────┘
//! ```
//! UTF-8, one record per line, no header, version tag or checksum.

mod file;
mod recovery;
mod scanner;

pub use file::AppendLog;
pub use recovery::{LogRecovery, RecoveryResult};
pub use scanner::LogScanner;

/// Line terminator
pub const NEWLINE: u8 = b'\n';
