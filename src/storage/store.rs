//! Record store over one backing file
//!
//! - Full-file parse on every read
//! - Full-file overwrite on every save
//! - Upsert keyed by primary key, file order preserved
//! - Blocks of other record types are carried through untouched

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::file::TextFile;
use crate::codec::{self, Block};
use crate::errors::{OrmError, OrmResult};
use crate::record::{Record, Value};
use crate::schema::{FieldType, Schema, SchemaRegistry};

/// Persists records of registered schemas into one text file.
///
/// Saves through the same store are serialized: the read-merge-write sequence
/// holds an async mutex, so concurrent `save` calls on one store never lose
/// updates. Separate stores (or processes) over the same file are not
/// coordinated and can overwrite each other's changes.
#[derive(Debug)]
pub struct RecordStore {
    file: TextFile,
    registry: Arc<SchemaRegistry>,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            file: TextFile::new(path),
            registry,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The schema registry this store validates against
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Creates an empty backing file if none exists.
    ///
    /// Returns true if the file was created.
    pub async fn initialize(&self) -> OrmResult<bool> {
        self.file.create_if_missing().await
    }

    /// Reads every record of `schema_name`, in file order.
    ///
    /// # Errors
    ///
    /// - `SchemaNotFound` if the type is not registered
    /// - `FileNotFound` if the backing file does not exist
    /// - `FileCorrupted` if any block fails to decode, or a block of this
    ///   type fails validation
    pub async fn read_all(&self, schema_name: &str) -> OrmResult<Vec<Record>> {
        let schema = self.registry.lookup(schema_name)?;
        let text = self.file.read().await?;
        codec::decode_records(&text, &schema)
    }

    /// Inserts or replaces a record, keyed by its primary key.
    ///
    /// An absent backing file counts as an empty store. A record without a
    /// primary key gets `max(existing) + 1`, or 1 for the first record of its
    /// type; only integer keys can be assigned.
    ///
    /// Returns the record as stored, primary key included.
    pub async fn save(&self, mut record: Record) -> OrmResult<Record> {
        let schema = self.registered_schema(&record)?;

        let _guard = self.write_lock.lock().await;

        let text = self.file.read_or_empty().await?;
        let mut blocks = codec::decode(&text)?;

        let existing: Vec<(usize, Record)> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.schema() == schema.name())
            .map(|(i, block)| Record::from_block(&schema, block).map(|r| (i, r)))
            .collect::<OrmResult<_>>()?;

        if record.primary_key().is_none() {
            let key = next_key(&schema, &existing)?;
            record.assign_primary_key(key);
        }

        let key = record.primary_key().cloned();
        let block: Block = record.to_block();
        match existing.iter().find(|(_, r)| r.primary_key().cloned() == key) {
            Some((i, _)) => blocks[*i] = block,
            None => blocks.push(block),
        }

        self.file.write(&codec::encode_blocks(&blocks)).await?;
        Ok(record)
    }

    /// The registered schema for a record, which must match the record's own
    fn registered_schema(&self, record: &Record) -> OrmResult<Arc<Schema>> {
        let schema = self.registry.lookup(record.schema().name())?;
        if *schema != **record.schema() {
            return Err(OrmError::SchemaConflict(schema.name().to_string()));
        }
        Ok(schema)
    }
}

fn next_key(schema: &Schema, existing: &[(usize, Record)]) -> OrmResult<Value> {
    let pk = schema.primary_key();
    match pk.field_type {
        FieldType::Int => {
            let max = existing
                .iter()
                .filter_map(|(_, r)| r.primary_key().and_then(Value::as_int))
                .max()
                .unwrap_or(0);
            max.checked_add(1).map(Value::Int).ok_or_else(|| {
                OrmError::validation(&pk.name, "no primary key left after i64::MAX")
            })
        }
        FieldType::String => Err(OrmError::validation(
            &pk.name,
            "string primary key must be set before save",
        )),
    }
}
