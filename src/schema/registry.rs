//! Process-wide schema registry
//!
//! Populated once per record type at startup and read many times afterwards.
//! The registry is passed explicitly (`Arc<SchemaRegistry>`) to storage and
//! query components instead of living in a global.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::types::Schema;
use crate::errors::{OrmError, OrmResult};

/// Registry of record types indexed by name
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record type.
    ///
    /// Registering an identical schema twice returns the existing entry.
    /// Registering the same name with different fields fails.
    pub fn register(&self, schema: Schema) -> OrmResult<Arc<Schema>> {
        let mut schemas = self
            .schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = schemas.get(schema.name()) {
            if **existing == schema {
                return Ok(Arc::clone(existing));
            }
            return Err(OrmError::SchemaConflict(schema.name().to_string()));
        }

        let schema = Arc::new(schema);
        schemas.insert(schema.name().to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Gets a schema by name
    pub fn lookup(&self, name: &str) -> OrmResult<Arc<Schema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| OrmError::SchemaNotFound(name.to_string()))
    }

    /// Checks if a schema is registered
    pub fn contains(&self, name: &str) -> bool {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
