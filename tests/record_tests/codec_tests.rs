//! Tests for the record codec
//!
//! These tests verify:
//! - Line layout and declared lengths
//! - Encode/decode round trips
//! - Rejection of reserved characters at encode time
//! - Malformed lines fail distinctly from "not found"

use flatkv::record::{decode, decode_key, encode, Record};
use flatkv::FlatError;

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_student_line() {
    let record = Record::new("Alice Smith", ["2020-01-01", "90", "ok"]);
    let line = encode(&record).unwrap();

    assert_eq!(line, "11;16;Alice Smith;2020-01-01;90;ok");
    assert!(!line.ends_with('\n'));
}

#[test]
fn test_encode_single_field() {
    let record = Record::new("k", ["value"]);
    assert_eq!(encode(&record).unwrap(), "1;5;k;value");
}

#[test]
fn test_encode_empty_key() {
    let record = Record::new("", ["x"]);
    let line = encode(&record).unwrap();

    assert_eq!(line, "0;1;;x");
    assert_eq!(decode(&line).unwrap(), record);
}

#[test]
fn test_encode_rejects_separator_in_key() {
    let record = Record::new("Smith; Alice", ["2020-01-01"]);
    assert!(matches!(encode(&record), Err(FlatError::MalformedRecord(_))));
}

#[test]
fn test_encode_rejects_separator_in_field() {
    let record = Record::new("Alice", ["2020-01-01", "90", "good; keeps trying"]);
    assert!(matches!(encode(&record), Err(FlatError::MalformedRecord(_))));
}

#[test]
fn test_encode_rejects_newlines() {
    assert!(encode(&Record::new("a\nb", ["x"])).is_err());
    assert!(encode(&Record::new("a", ["x\r"])).is_err());
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_varied_records() {
    let records = vec![
        Record::new("Alice Smith", ["2020-01-01", "90", "ok"]),
        Record::new("Zoë Ångström", ["1999-12-31", "72.5", "naïve café"]),
        Record::new("empty comment", ["2020-01-01", "0", ""]),
        Record::new("no fields", Vec::<String>::new()),
        Record::new("one blank", [""]),
        Record::new("many", ["a", "b", "c", "d", "e", "f", "g"]),
        Record::new("spaces ", ["  leading", "trailing  "]),
    ];

    for record in records {
        let line = encode(&record).unwrap();
        assert_eq!(decode(&line).unwrap(), record, "line {:?}", line);
    }
}

#[test]
fn test_decode_accepts_trailing_newline() {
    let record = Record::new("key", ["a", "b"]);
    let line = format!("{}\n", encode(&record).unwrap());
    assert_eq!(decode(&line).unwrap(), record);
}

#[test]
fn test_decode_key_matches_full_decode() {
    let record = Record::new("Bob Lee", ["2021-03-02", "71", ""]);
    let line = encode(&record).unwrap();
    assert_eq!(decode_key(&line).unwrap(), "Bob Lee");
}

// =============================================================================
// Malformed Line Tests
// =============================================================================

#[test]
fn test_decode_too_few_fields() {
    for line in ["", "5", "5;3"] {
        let err = decode(line).unwrap_err();
        assert!(err.is_malformed(), "line {:?} gave {:?}", line, err);
        assert!(!err.is_not_found());
    }
}

#[test]
fn test_decode_non_numeric_lengths() {
    assert!(decode("five;1;hello;x").unwrap_err().is_malformed());
    assert!(decode("5;one;hello;x").unwrap_err().is_malformed());
}

#[test]
fn test_decode_key_length_mismatch() {
    assert!(decode("4;1;hello;x").unwrap_err().is_malformed());
    assert!(decode_key("4;1;hello;x").unwrap_err().is_malformed());
}

#[test]
fn test_decode_payload_length_mismatch() {
    assert!(decode("5;9;hello;x").unwrap_err().is_malformed());
}

#[test]
fn test_decode_extra_separator_in_payload_is_caught_by_length() {
    // A payload written without escaping by another tool
    let line = "5;5;hello;a;b;c";
    let record = decode(line).unwrap();
    assert_eq!(record.fields, vec!["a", "b", "c"]);

    let lying = "5;4;hello;a;b;c";
    assert!(decode(lying).unwrap_err().is_malformed());
}
