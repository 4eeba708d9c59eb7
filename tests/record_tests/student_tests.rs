//! Tests for the Student view
//!
//! These tests verify:
//! - Conversion between Student and Record
//! - Validation of field count and mark

use flatkv::{FlatError, Record, Student};

#[test]
fn test_student_to_record() {
    let student = Student::new("Alice Smith", "2020-01-01", 90.0, "ok");
    let record = Record::from(&student);

    assert_eq!(record.key, "Alice Smith");
    assert_eq!(record.fields, vec!["2020-01-01", "90", "ok"]);
}

#[test]
fn test_fractional_mark_kept() {
    let student = Student::new("Full Name", "2022-07-30", 92.3, "Comment 1");
    let record = Record::from(&student);

    assert_eq!(record.fields[1], "92.3");
    assert_eq!(Student::try_from(record).unwrap(), student);
}

#[test]
fn test_record_to_student() {
    let record = Record::new("Bob Lee", ["2021-03-02", "71", "late"]);
    let student = Student::try_from(record).unwrap();

    assert_eq!(student.full_name, "Bob Lee");
    assert_eq!(student.enrollment_date, "2021-03-02");
    assert_eq!(student.mark, 71.0);
    assert_eq!(student.comment, "late");
}

#[test]
fn test_wrong_field_count() {
    let record = Record::new("Bob Lee", ["2021-03-02", "71"]);
    assert!(matches!(
        Student::try_from(record),
        Err(FlatError::MalformedRecord(_))
    ));
}

#[test]
fn test_non_numeric_mark() {
    let record = Record::new("Bob Lee", ["2021-03-02", "A+", "great"]);
    assert!(matches!(
        Student::try_from(record),
        Err(FlatError::MalformedRecord(_))
    ));
}

#[test]
fn test_display() {
    let student = Student::new("Alice Smith", "2020-01-01", 90.0, "ok");
    assert_eq!(student.to_string(), "Alice Smith (enrolled 2020-01-01, mark 90): ok");
}
