//! Equality matching of records against constraints
//!
//! Constraints are typed through the target field before matching, so a
//! string constraint compares text and an integer constraint compares
//! numbers. No other coercion happens.

use crate::errors::{OrmError, OrmResult};
use crate::record::{Record, Value};
use crate::schema::Schema;

/// A single `field == value` constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Field name
    pub field: String,
    /// Expected value
    pub value: Value,
}

impl Constraint {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Evaluates constraints against records
pub struct RecordMatcher;

impl RecordMatcher {
    /// Checks constraints against a schema and coerces their values.
    ///
    /// # Errors
    ///
    /// `Validation` for unknown fields or values the field type rejects.
    pub fn prepare(schema: &Schema, constraints: &[Constraint]) -> OrmResult<Vec<Constraint>> {
        constraints
            .iter()
            .map(|c| {
                let field = schema.field(&c.field).ok_or_else(|| {
                    OrmError::validation(
                        &c.field,
                        format!("not declared in schema '{}'", schema.name()),
                    )
                })?;
                Ok(Constraint {
                    field: c.field.clone(),
                    value: field.validate(c.value.clone())?,
                })
            })
            .collect()
    }

    /// Checks if a record matches all constraints
    pub fn matches(record: &Record, constraints: &[Constraint]) -> bool {
        // All constraints must match (AND semantics)
        constraints.iter().all(|c| Self::matches_constraint(record, c))
    }

    fn matches_constraint(record: &Record, constraint: &Constraint) -> bool {
        match record.get(&constraint.field) {
            Ok(actual) => *actual == constraint.value,
            // Unset without default = no match
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use std::sync::Arc;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder("User")
                .field(FieldDef::int("id").primary_key())
                .field(FieldDef::string("username"))
                .field(FieldDef::int("age"))
                .build()
                .unwrap(),
        )
    }

    fn record(id: i64, name: &str, age: i64) -> Record {
        Record::new(schema())
            .with("id", id)
            .unwrap()
            .with("username", name)
            .unwrap()
            .with("age", age)
            .unwrap()
    }

    #[test]
    fn test_equality_match() {
        let r = record(1, "Alice", 30);
        assert!(RecordMatcher::matches(&r, &[Constraint::new("username", "Alice")]));
        assert!(!RecordMatcher::matches(&r, &[Constraint::new("username", "Bob")]));
    }

    #[test]
    fn test_multiple_constraints_and() {
        let r = record(1, "Alice", 30);
        assert!(RecordMatcher::matches(
            &r,
            &[Constraint::new("username", "Alice"), Constraint::new("age", 30)]
        ));
        assert!(!RecordMatcher::matches(
            &r,
            &[Constraint::new("username", "Alice"), Constraint::new("age", 31)]
        ));
    }

    #[test]
    fn test_empty_constraints_match_all() {
        assert!(RecordMatcher::matches(&record(1, "Alice", 30), &[]));
    }

    #[test]
    fn test_unset_field_no_match() {
        let r = Record::new(schema()).with("id", 1).unwrap();
        assert!(!RecordMatcher::matches(&r, &[Constraint::new("age", 30)]));
    }

    #[test]
    fn test_prepare_coerces_string_constraint() {
        let prepared = RecordMatcher::prepare(&schema(), &[Constraint::new("username", 42)]).unwrap();
        assert_eq!(prepared[0].value, Value::from("42"));

        let r = record(1, "42", 30);
        assert!(RecordMatcher::matches(&r, &prepared));
    }

    #[test]
    fn test_prepare_rejects_text_for_int() {
        let err = RecordMatcher::prepare(&schema(), &[Constraint::new("age", "30")]).unwrap_err();
        assert_eq!(err.code(), "ORM_VALIDATION_FAILED");
    }

    #[test]
    fn test_prepare_rejects_unknown_field() {
        assert!(RecordMatcher::prepare(&schema(), &[Constraint::new("email", "x")]).is_err());
    }
}
