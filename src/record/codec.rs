//! Record codec
//!
//! Encoding and decoding of records to and from a single text line.
//! The trailing newline belongs to the log, not to the codec.

use crate::error::{FlatError, Result};

use super::Record;

/// Field separator
pub const SEPARATOR: char = ';';

/// Field separator as a string, for joining
pub const SEPARATOR_STR: &str = ";";

/// key_len, payload_len and key
pub const MIN_PARTS: usize = 3;

// =============================================================================
// Validation
// =============================================================================

fn check_text(what: &str, text: &str) -> Result<()> {
    if let Some(c) = text.chars().find(|c| *c == SEPARATOR || *c == '\n' || *c == '\r') {
        return Err(FlatError::MalformedRecord(format!(
            "{} {:?} contains reserved character {:?}",
            what, text, c
        )));
    }
    Ok(())
}

/// Reject keys that would break field boundaries
pub fn validate_key(key: &str) -> Result<()> {
    check_text("key", key)
}

/// Reject fields that would break field boundaries
pub fn validate_fields<S: AsRef<str>>(fields: &[S]) -> Result<()> {
    for field in fields {
        check_text("field", field.as_ref())?;
    }
    Ok(())
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a record as one line (without the terminating newline)
pub fn encode(record: &Record) -> Result<String> {
    validate_key(&record.key)?;
    validate_fields(&record.fields)?;

    let payload = record.payload();
    let key_len = record.key.chars().count();
    let payload_len = payload.chars().count();

    let mut line = format!("{key_len}{SEPARATOR}{payload_len}{SEPARATOR}{}", record.key);
    if !record.fields.is_empty() {
        line.push(SEPARATOR);
        line.push_str(&payload);
    }
    Ok(line)
}

// =============================================================================
// Decoding
// =============================================================================

fn parse_len(line: &str, what: &str, raw: &str) -> Result<usize> {
    raw.parse::<usize>().map_err(|_| {
        FlatError::MalformedRecord(format!("invalid {} {:?} in line {:?}", what, raw, line))
    })
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

/// Split into (key_len, payload_len, key, rest)
fn split_header(line: &str) -> Result<(usize, usize, &str, Option<&str>)> {
    let mut parts = line.splitn(MIN_PARTS + 1, SEPARATOR);

    let (Some(raw_key_len), Some(raw_payload_len), Some(key)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(FlatError::MalformedRecord(format!(
            "expected at least {} fields in line {:?}",
            MIN_PARTS, line
        )));
    };

    let key_len = parse_len(line, "key length", raw_key_len)?;
    let payload_len = parse_len(line, "payload length", raw_payload_len)?;

    if key.chars().count() != key_len {
        return Err(FlatError::MalformedRecord(format!(
            "declared key length {} does not match key {:?}",
            key_len, key
        )));
    }

    Ok((key_len, payload_len, key, parts.next()))
}

/// Decode a full record from one line
pub fn decode(line: &str) -> Result<Record> {
    let line = strip_newline(line);
    let (_, payload_len, key, rest) = split_header(line)?;

    let payload = rest.unwrap_or("");
    if payload.chars().count() != payload_len {
        return Err(FlatError::MalformedRecord(format!(
            "declared payload length {} does not match payload of key {:?}",
            payload_len, key
        )));
    }

    let fields = match rest {
        Some(payload) => payload.split(SEPARATOR).map(str::to_string).collect(),
        None => Vec::new(),
    };

    Ok(Record {
        key: key.to_string(),
        fields,
    })
}

/// Decode only the key of a line, skipping the payload
pub fn decode_key(line: &str) -> Result<&str> {
    let (_, _, key, _) = split_header(strip_newline(line))?;
    Ok(key)
}
