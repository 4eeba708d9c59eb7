//! Tests for Log Recovery
//!
//! These tests verify:
//! - Verify on missing, empty and clean files
//! - Detection and truncation of a partial final line
//! - Malformed complete lines are counted but kept
//! - Tail policy applied when a store opens

use std::fs;
use std::path::PathBuf;

use flatkv::log::{LogRecovery, RecoveryResult};
use flatkv::{Config, FlatError, IndexKind, RecordStore, TailPolicy};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("records.db");
    (temp_dir, path)
}

const CLEAN: &str = "1;1;a;x\n1;1;b;y\n";

// =============================================================================
// Verify Tests
// =============================================================================

#[test]
fn test_verify_missing_file() {
    let (_temp, path) = setup_temp_path();

    let result = LogRecovery::verify(&path).unwrap();

    assert_eq!(result, RecoveryResult::default());
    assert!(!path.exists());
}

#[test]
fn test_verify_empty_file() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "").unwrap();

    let result = LogRecovery::verify(&path).unwrap();

    assert_eq!(result.entries_recovered, 0);
    assert_eq!(result.tail_bytes, 0);
}

#[test]
fn test_verify_clean_file() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, CLEAN).unwrap();

    let result = LogRecovery::verify(&path).unwrap();

    assert_eq!(result.entries_recovered, 2);
    assert_eq!(result.entries_malformed, 0);
    assert_eq!(result.valid_len, CLEAN.len() as u64);
    assert_eq!(result.tail_bytes, 0);
    assert!(!result.has_partial_tail());
}

#[test]
fn test_verify_does_not_modify() {
    let (_temp, path) = setup_temp_path();
    let content = format!("{CLEAN}1;1;c;");
    fs::write(&path, &content).unwrap();

    let result = LogRecovery::verify(&path).unwrap();

    assert_eq!(result.tail_bytes, 6);
    assert!(result.has_partial_tail());
    assert!(!result.was_truncated);
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_verify_tail_measured_from_bytes_read() {
    let (_temp, path) = setup_temp_path();
    // Tail longer than the reader's buffer, and a file that is nothing but tail
    let long_tail = "x".repeat(20_000);
    fs::write(&path, format!("{CLEAN}{long_tail}")).unwrap();

    let result = LogRecovery::verify(&path).unwrap();
    assert_eq!(result.valid_len, CLEAN.len() as u64);
    assert_eq!(result.tail_bytes, 20_000);

    fs::write(&path, "1;1;a").unwrap();
    let result = LogRecovery::verify(&path).unwrap();
    assert_eq!(result.valid_len, 0);
    assert_eq!(result.tail_bytes, 5);
    assert_eq!(result.entries_recovered, 0);
}

#[test]
fn test_verify_counts_malformed_lines() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "1;1;a;x\ngarbage\n9;0;short\n1;1;b;y\n").unwrap();

    let result = LogRecovery::verify(&path).unwrap();

    assert_eq!(result.entries_recovered, 2);
    assert_eq!(result.entries_malformed, 2);
    assert_eq!(result.tail_bytes, 0);
}

// =============================================================================
// Recover Tests
// =============================================================================

#[test]
fn test_recover_truncates_partial_tail() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, format!("{CLEAN}11;16;Alice Sm")).unwrap();

    let result = LogRecovery::recover(&path).unwrap();

    assert!(result.was_truncated);
    assert!(!result.has_partial_tail());
    assert_eq!(result.entries_recovered, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), CLEAN);
}

#[test]
fn test_recover_clean_file_untouched() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, CLEAN).unwrap();

    let result = LogRecovery::recover(&path).unwrap();

    assert!(!result.was_truncated);
    assert_eq!(fs::read_to_string(&path).unwrap(), CLEAN);
}

#[test]
fn test_recover_keeps_malformed_complete_lines() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "garbage\n1;1;a;x\npartial").unwrap();

    let result = LogRecovery::recover(&path).unwrap();

    assert_eq!(result.entries_malformed, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "garbage\n1;1;a;x\n");
}

#[test]
fn test_recover_file_with_only_partial_line() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "no newline at all").unwrap();

    let result = LogRecovery::recover(&path).unwrap();

    assert!(result.was_truncated);
    assert_eq!(result.valid_len, 0);
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

// =============================================================================
// Tail Policy Tests
// =============================================================================

#[test]
fn test_store_open_truncates_by_default() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, format!("{CLEAN}1;1;c;")).unwrap();

    let store = RecordStore::open_path(&path, IndexKind::Hash).unwrap();

    assert_eq!(store.log_len(), CLEAN.len() as u64);
    assert_eq!(store.read("b").unwrap().fields, vec!["y"]);
    assert!(store.read("c").unwrap_err().is_not_found());

    // New appends land on a clean line boundary
    store.insert("c", &["z"]).unwrap();
    assert_eq!(store.read("c").unwrap().fields, vec!["z"]);
}

#[test]
fn test_store_open_reject_policy() {
    let (_temp, path) = setup_temp_path();
    let content = format!("{CLEAN}1;1;c;");
    fs::write(&path, &content).unwrap();

    let config = Config::builder()
        .path(&path)
        .tail_policy(TailPolicy::Reject)
        .build();
    let result = RecordStore::open(config);

    assert!(matches!(result, Err(FlatError::MalformedRecord(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_store_open_reject_policy_clean_file() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, CLEAN).unwrap();

    let config = Config::builder()
        .path(&path)
        .tail_policy(TailPolicy::Reject)
        .build();
    let store = RecordStore::open(config).unwrap();

    assert_eq!(store.read("a").unwrap().fields, vec!["x"]);
}

#[test]
fn test_store_open_fails_on_malformed_line() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "1;1;a;x\ngarbage\n").unwrap();

    let result = RecordStore::open_path(&path, IndexKind::Sorted);
    assert!(matches!(result, Err(FlatError::MalformedRecord(_))));
}
