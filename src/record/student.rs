//! Typed view of the student records the harnesses store:
//! `full_name` is the key, followed by enrollment date, mark and comment.

use std::fmt;

use crate::error::{FlatError, Result};

use super::Record;

/// A student row
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub full_name: String,
    pub enrollment_date: String,
    pub mark: f64,
    pub comment: String,
}

impl Student {
    pub fn new(
        full_name: impl Into<String>,
        enrollment_date: impl Into<String>,
        mark: f64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            enrollment_date: enrollment_date.into(),
            mark,
            comment: comment.into(),
        }
    }

    /// Payload fields in storage order
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.enrollment_date.clone(),
            self.mark.to_string(),
            self.comment.clone(),
        ]
    }
}

impl From<&Student> for Record {
    fn from(student: &Student) -> Self {
        Record {
            key: student.full_name.clone(),
            fields: student.fields(),
        }
    }
}

impl From<Student> for Record {
    fn from(student: Student) -> Self {
        Record::from(&student)
    }
}

impl TryFrom<Record> for Student {
    type Error = FlatError;

    fn try_from(record: Record) -> Result<Self> {
        let [enrollment_date, mark, comment]: [String; 3] =
            record.fields.try_into().map_err(|fields: Vec<String>| {
                FlatError::MalformedRecord(format!(
                    "student {:?} has {} fields, expected 3",
                    record.key,
                    fields.len()
                ))
            })?;

        let mark = mark.parse::<f64>().map_err(|_| {
            FlatError::MalformedRecord(format!(
                "student {:?} has non-numeric mark {:?}",
                record.key, mark
            ))
        })?;

        Ok(Student {
            full_name: record.key,
            enrollment_date,
            mark,
            comment,
        })
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (enrolled {}, mark {}): {}",
            self.full_name, self.enrollment_date, self.mark, self.comment
        )
    }
}
