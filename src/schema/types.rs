//! Schema type definitions
//!
//! Supported field types:
//! - int: 64-bit signed integer
//! - string: UTF-8 string
//!
//! A schema is an ordered list of fields with exactly one primary key.
//! Field order is the serialization order.

use serde::{Deserialize, Serialize};

use crate::errors::{OrmError, OrmResult};
use crate::record::Value;

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 64-bit signed integer
    Int,
    /// UTF-8 string
    String,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::String => "string",
        }
    }
}

/// Typed field declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, unique within its schema
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether this field identifies the record
    #[serde(default, skip_serializing_if = "is_false")]
    pub primary_key: bool,
    /// Value returned when the field is read unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FieldDef {
    /// Create an integer field
    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Int,
            primary_key: false,
            default: None,
        }
    }

    /// Create a string field
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::String,
            primary_key: false,
            default: None,
        }
    }

    /// Mark this field as the primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Attach a default value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Validates and coerces an assigned value.
    ///
    /// Integer fields reject anything but integers. String fields accept any
    /// value and store its text form.
    pub fn validate(&self, value: Value) -> OrmResult<Value> {
        match (self.field_type, value) {
            (FieldType::Int, Value::Int(n)) => Ok(Value::Int(n)),
            (FieldType::Int, other) => Err(OrmError::validation(
                &self.name,
                format!("expected int, got {} '{}'", other.type_name(), other),
            )),
            (FieldType::String, Value::Str(s)) => Ok(Value::Str(s)),
            (FieldType::String, other) => Ok(Value::Str(other.to_string())),
        }
    }

    /// Parses stored or user-supplied text into the declared type.
    ///
    /// Returns the failure reason; callers decide which error kind it maps to.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        match self.field_type {
            FieldType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("'{}' is not a valid int", raw)),
            FieldType::String => Ok(Value::Str(raw.to_string())),
        }
    }

    /// Returns the literal textual form of a value of this field
    pub fn serialize(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Declarative form of a schema, as found in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Record type name
    pub name: String,
    /// Ordered fields
    pub fields: Vec<FieldDef>,
}

impl SchemaDef {
    /// Builds and validates the schema
    pub fn build(&self) -> OrmResult<Schema> {
        self.fields
            .iter()
            .cloned()
            .fold(Schema::builder(&self.name), SchemaBuilder::field)
            .build()
    }
}

/// Immutable record type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDef>,
    primary_key: usize,
}

impl Schema {
    /// Start declaring a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Record type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of a field in declaration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// The primary-key field
    pub fn primary_key(&self) -> &FieldDef {
        &self.fields[self.primary_key]
    }

    /// Position of the primary-key field
    pub fn primary_key_index(&self) -> usize {
        self.primary_key
    }

    /// Converts back to the declarative form
    pub fn to_def(&self) -> SchemaDef {
        SchemaDef {
            name: self.name.clone(),
            fields: self.fields.clone(),
        }
    }
}

/// Builder producing a validated [`Schema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Append a field
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the declaration.
    ///
    /// Rejects: invalid names, duplicate fields, zero or several primary
    /// keys, defaults on the primary key and defaults of the wrong type.
    pub fn build(self) -> OrmResult<Schema> {
        if !is_identifier(&self.name) {
            return Err(OrmError::invalid_schema(
                &self.name,
                "name must be non-empty and use only ASCII letters, digits and '_'",
            ));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if !is_identifier(&field.name) {
                return Err(OrmError::invalid_schema(
                    &self.name,
                    format!("invalid field name '{}'", field.name),
                ));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(OrmError::invalid_schema(
                    &self.name,
                    format!("duplicate field '{}'", field.name),
                ));
            }
            if let Some(default) = &field.default {
                if field.primary_key {
                    return Err(OrmError::invalid_schema(
                        &self.name,
                        format!("primary key '{}' cannot have a default", field.name),
                    ));
                }
                let matches = match field.field_type {
                    FieldType::Int => default.as_int().is_some(),
                    FieldType::String => default.as_str().is_some(),
                };
                if !matches {
                    return Err(OrmError::invalid_schema(
                        &self.name,
                        format!(
                            "default for '{}' must be {}",
                            field.name,
                            field.field_type.type_name()
                        ),
                    ));
                }
            }
        }

        let keys: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key)
            .map(|(i, _)| i)
            .collect();

        match keys.as_slice() {
            [pk] => Ok(Schema {
                primary_key: *pk,
                name: self.name,
                fields: self.fields,
            }),
            [] => Err(OrmError::invalid_schema(&self.name, "no primary key declared")),
            _ => Err(OrmError::invalid_schema(
                &self.name,
                "exactly one primary key is allowed",
            )),
        }
    }
}

/// ASCII letters, digits and '_', non-empty
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
