//! Record instances bound to a schema

use std::sync::Arc;

use crate::codec::Block;
use crate::errors::{OrmError, OrmResult};
use crate::schema::Schema;

use super::value::Value;

/// A schema-conformant set of field values.
///
/// Every assignment goes through the owning field's validation. The primary
/// key, once set, cannot change.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    /// Indexed by field position in the schema
    values: Vec<Option<Value>>,
}

impl Record {
    /// Creates an empty record of the given type
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = vec![None; schema.fields().len()];
        Self { schema, values }
    }

    /// Builder-style assignment
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.set(field, value)?;
        Ok(self)
    }

    /// The record type
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Assigns a value after validating it against the field declaration.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the field is unknown, the value does not fit
    /// the field type, or the primary key would change.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> OrmResult<()> {
        let pos = self.position(field)?;
        let def = &self.schema.fields()[pos];
        let value = def.validate(value.into())?;

        if pos == self.schema.primary_key_index() {
            if let Some(current) = &self.values[pos] {
                if *current != value {
                    return Err(OrmError::validation(
                        field,
                        format!("primary key is immutable once assigned (is {})", current),
                    ));
                }
            }
        }

        self.values[pos] = Some(value);
        Ok(())
    }

    /// Assigns a value given as text, parsing it by the field type
    pub fn set_text(&mut self, field: &str, raw: &str) -> OrmResult<()> {
        let pos = self.position(field)?;
        let value = self.schema.fields()[pos]
            .parse(raw)
            .map_err(|reason| OrmError::validation(field, reason))?;
        self.set(field, value)
    }

    /// Reads a field, falling back to its default.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the field is unknown or unset without default.
    pub fn get(&self, field: &str) -> OrmResult<&Value> {
        let pos = self.position(field)?;
        self.values[pos]
            .as_ref()
            .or(self.schema.fields()[pos].default.as_ref())
            .ok_or_else(|| OrmError::validation(field, "read before being set"))
    }

    /// Reads an integer field
    pub fn get_int(&self, field: &str) -> OrmResult<i64> {
        let value = self.get(field)?;
        value
            .as_int()
            .ok_or_else(|| OrmError::validation(field, format!("is {}, not int", value.type_name())))
    }

    /// Reads a string field
    pub fn get_str(&self, field: &str) -> OrmResult<&str> {
        let value = self.get(field)?;
        value
            .as_str()
            .ok_or_else(|| OrmError::validation(field, format!("is {}, not string", value.type_name())))
    }

    /// True if the field holds an explicitly assigned value
    pub fn is_set(&self, field: &str) -> bool {
        self.schema
            .position(field)
            .map_or(false, |pos| self.values[pos].is_some())
    }

    /// The primary-key value, if assigned
    pub fn primary_key(&self) -> Option<&Value> {
        self.values[self.schema.primary_key_index()].as_ref()
    }

    /// Assigned by the store when saving a record without a key
    pub(crate) fn assign_primary_key(&mut self, key: Value) {
        let pos = self.schema.primary_key_index();
        debug_assert!(self.values[pos].is_none());
        self.values[pos] = Some(key);
    }

    /// Serializes to a block in schema field order.
    ///
    /// Unset fields take their default; unset fields without default are
    /// omitted.
    pub fn to_block(&self) -> Block {
        let fields = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter_map(|(def, value)| {
                value
                    .as_ref()
                    .or(def.default.as_ref())
                    .map(|v| (def.name.clone(), def.serialize(v)))
            })
            .collect();

        Block::new(self.schema.name(), fields)
    }

    /// Rebuilds a record from a stored block.
    ///
    /// # Errors
    ///
    /// Returns `FileCorrupted` for fields not in the schema, values that do not
    /// parse as the declared type, or a block without primary key.
    pub fn from_block(schema: &Arc<Schema>, block: &Block) -> OrmResult<Self> {
        let mut record = Self::new(Arc::clone(schema));

        for (name, raw) in block.fields() {
            let pos = schema.position(name).ok_or_else(|| {
                OrmError::corrupted_at(
                    block.line(),
                    format!("unknown field '{}' for schema '{}'", name, schema.name()),
                )
            })?;
            let value = schema.fields()[pos].parse(raw).map_err(|reason| {
                OrmError::corrupted_at(block.line(), format!("field '{}': {}", name, reason))
            })?;
            record.values[pos] = Some(value);
        }

        if record.primary_key().is_none() {
            return Err(OrmError::corrupted_at(
                block.line(),
                format!(
                    "block of '{}' has no primary key '{}'",
                    schema.name(),
                    schema.primary_key().name
                ),
            ));
        }

        Ok(record)
    }

    fn position(&self, field: &str) -> OrmResult<usize> {
        self.schema.position(field).ok_or_else(|| {
            OrmError::validation(
                field,
                format!("not declared in schema '{}'", self.schema.name()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    fn user_schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder("User")
                .field(FieldDef::int("id").primary_key())
                .field(FieldDef::string("username"))
                .field(FieldDef::int("age").with_default(18))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_set_and_get() {
        let mut user = Record::new(user_schema());
        user.set("username", "Maria").unwrap();
        user.set("age", 20).unwrap();
        assert_eq!(user.get_str("username").unwrap(), "Maria");
        assert_eq!(user.get_int("age").unwrap(), 20);
    }

    #[test]
    fn test_int_field_rejects_text() {
        let mut user = Record::new(user_schema());
        let err = user.set("age", "twenty").unwrap_err();
        assert!(matches!(err, OrmError::Validation { ref field, .. } if field == "age"));
        assert!(!user.is_set("age"));
    }

    #[test]
    fn test_string_field_coerces_int() {
        let user = Record::new(user_schema()).with("username", 7).unwrap();
        assert_eq!(user.get_str("username").unwrap(), "7");
    }

    #[test]
    fn test_unknown_field_is_validation_error() {
        let mut user = Record::new(user_schema());
        assert!(matches!(
            user.set("email", "a@b"),
            Err(OrmError::Validation { .. })
        ));
    }

    #[test]
    fn test_unset_field_without_default() {
        let user = Record::new(user_schema());
        let err = user.get("username").unwrap_err();
        assert_eq!(err.code(), "ORM_VALIDATION_FAILED");
    }

    #[test]
    fn test_unset_field_uses_default() {
        let user = Record::new(user_schema());
        assert_eq!(user.get_int("age").unwrap(), 18);
        assert!(!user.is_set("age"));
    }

    #[test]
    fn test_primary_key_is_immutable() {
        let mut user = Record::new(user_schema()).with("id", 3).unwrap();
        user.set("id", 3).unwrap();
        assert!(user.set("id", 4).is_err());
        assert_eq!(user.primary_key(), Some(&Value::Int(3)));
    }

    #[test]
    fn test_set_text_parses_by_type() {
        let mut user = Record::new(user_schema());
        user.set_text("age", "33").unwrap();
        assert_eq!(user.get_int("age").unwrap(), 33);
        assert!(user.set_text("age", "old").is_err());
    }

    #[test]
    fn test_block_conversion() {
        let schema = user_schema();
        let user = Record::new(Arc::clone(&schema))
            .with("id", 1)
            .unwrap()
            .with("username", "Ivan")
            .unwrap();

        let block = user.to_block();
        assert_eq!(block.schema(), "User");
        assert_eq!(
            block.fields(),
            &[
                ("id".to_string(), "1".to_string()),
                ("username".to_string(), "Ivan".to_string()),
                ("age".to_string(), "18".to_string()),
            ]
        );

        let back = Record::from_block(&schema, &block).unwrap();
        assert_eq!(back.get_int("id").unwrap(), 1);
        assert_eq!(back.get_str("username").unwrap(), "Ivan");
        assert_eq!(back.get_int("age").unwrap(), 18);
    }

    #[test]
    fn test_from_block_rejects_unknown_field() {
        let schema = user_schema();
        let block = Block::new(
            "User",
            vec![
                ("id".into(), "1".into()),
                ("email".into(), "x@y".into()),
            ],
        );
        let err = Record::from_block(&schema, &block).unwrap_err();
        assert_eq!(err.code(), "ORM_FILE_CORRUPTED");
    }

    #[test]
    fn test_from_block_rejects_non_numeric_int() {
        let schema = user_schema();
        let block = Block::new(
            "User",
            vec![("id".into(), "1".into()), ("age".into(), "abc".into())],
        );
        assert!(matches!(
            Record::from_block(&schema, &block),
            Err(OrmError::FileCorrupted { .. })
        ));
    }

    #[test]
    fn test_from_block_requires_primary_key() {
        let schema = user_schema();
        let block = Block::new("User", vec![("username".into(), "Petro".into())]);
        assert!(Record::from_block(&schema, &block).is_err());
    }
}
