//! Record Module
//!
//! The logical unit stored by FlatKV and its one-line text encoding.
//!
//! ## Line Format
//! ```text
//! ┌────────────┬───┬─────────────┬───┬───────┬───┬─────────┬───┬─────┬───┬─────────┐
//! │ key_len    │ ; │ payload_len │ ; │  key  │ ; │ field_1 │ ; │ ... │ ; │ field_n │ \n
//! └────────────┴───┴─────────────┴───┴───────┴───┴─────────┴───┴─────┴───┴─────────┘
//! ```
//! - `key_len`: decimal character count of `key`
//! - `payload_len`: decimal character count of the `;`-joined fields
//! - A record without fields is written as `key_len;0;key`

mod codec;
mod student;

pub use codec::{
    decode, decode_key, encode, validate_fields, validate_key, MIN_PARTS, SEPARATOR,
    SEPARATOR_STR,
};
pub use student::Student;

/// A key plus an ordered tuple of value fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Logical identity of the record
    pub key: String,

    /// Payload fields in the order they were written
    pub fields: Vec<String>,
}

impl Record {
    /// Build a record from anything string-like
    pub fn new<K, I, F>(key: K, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            key: key.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Fields joined with the separator, as stored after the key
    pub fn payload(&self) -> String {
        self.fields.join(SEPARATOR_STR)
    }
}
