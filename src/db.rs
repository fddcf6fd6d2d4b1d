//! Database facade
//!
//! Ties a registry, a record store and a results file together. This is the
//! entry point most callers need:
//!
//! ```ignore
//! let db = Database::from_config(&config)?;
//! db.initialize().await?;
//! let user = db.new_record("User")?.with("username", "Ivan")?.with("age", 20)?;
//! let saved = db.save(user).await?;
//! let twenty = db.objects("User").and("age", 20).await?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, ConfigResult};
use crate::errors::OrmResult;
use crate::query::{Constraint, FilterSpec};
use crate::record::{Record, Value};
use crate::schema::{Schema, SchemaRegistry};
use crate::storage::{RecordStore, TextFile};

/// A backing store plus its query results file
#[derive(Debug, Clone)]
pub struct Database {
    store: Arc<RecordStore>,
    results: PathBuf,
}

impl Database {
    pub fn new(
        database: impl Into<PathBuf>,
        results: impl Into<PathBuf>,
        registry: Arc<SchemaRegistry>,
    ) -> Self {
        Self {
            store: Arc::new(RecordStore::new(database, registry)),
            results: results.into(),
        }
    }

    /// Opens the database described by a loaded configuration
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self::new(
            config.database.clone(),
            config.results.clone(),
            config.registry()?,
        ))
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        self.store.registry()
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Backing store path
    pub fn database_path(&self) -> &Path {
        self.store.path()
    }

    /// Query results path
    pub fn results_path(&self) -> &Path {
        &self.results
    }

    /// Looks up a registered schema
    pub fn schema(&self, name: &str) -> OrmResult<Arc<Schema>> {
        self.registry().lookup(name)
    }

    /// An empty record of a registered type
    pub fn new_record(&self, schema_name: &str) -> OrmResult<Record> {
        self.schema(schema_name).map(Record::new)
    }

    /// Creates the backing file if missing
    pub async fn initialize(&self) -> OrmResult<bool> {
        self.store.initialize().await
    }

    /// Inserts or replaces a record
    pub async fn save(&self, record: Record) -> OrmResult<Record> {
        self.store.save(record).await
    }

    /// Every stored record of one type, in file order
    pub async fn read_all(&self, schema_name: &str) -> OrmResult<Vec<Record>> {
        self.store.read_all(schema_name).await
    }

    /// Builds a deferred query. Nothing is read until it is awaited.
    pub fn filter<I, K, V>(&self, schema_name: &str, constraints: I) -> FilterSpec
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let constraints = constraints
            .into_iter()
            .map(|(field, value)| Constraint::new(field, value))
            .collect();
        FilterSpec::new(
            Arc::clone(&self.store),
            TextFile::new(&self.results),
            schema_name,
            constraints,
        )
    }

    /// A deferred query with no constraints yet
    pub fn objects(&self, schema_name: &str) -> FilterSpec {
        FilterSpec::new(
            Arc::clone(&self.store),
            TextFile::new(&self.results),
            schema_name,
            Vec::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(tmp: &TempDir) -> Database {
        let config = Config::default();
        Database::new(
            tmp.path().join("students.txt"),
            tmp.path().join("result.txt"),
            config.registry().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_save_and_filter() {
        let tmp = TempDir::new().unwrap();
        let db = open(&tmp);
        db.initialize().await.unwrap();

        for (name, age) in [("Andriy", 20), ("Ivan", 25), ("Maria", 20)] {
            let user = db
                .new_record("User")
                .unwrap()
                .with("username", name)
                .unwrap()
                .with("age", age)
                .unwrap();
            db.save(user).await.unwrap();
        }

        let found = db.filter("User", [("age", 20)]).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|r| r.get_int("id").unwrap()).collect();
        assert_eq!(ids, [1, 3]);
        assert!(db.results_path().exists());
    }

    #[tokio::test]
    async fn test_objects_chain() {
        let tmp = TempDir::new().unwrap();
        let db = open(&tmp);
        let user = db
            .new_record("User")
            .unwrap()
            .with("username", "Oksana")
            .unwrap()
            .with("age", 20)
            .unwrap();
        db.save(user).await.unwrap();

        let spec = db.objects("User").and("username", "Oksana").and("age", 20);
        assert_eq!(spec.constraints().len(), 2);
        assert_eq!((&spec).await.unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_schema() {
        let tmp = TempDir::new().unwrap();
        let db = open(&tmp);
        assert_eq!(db.new_record("Ghost").unwrap_err().code(), "ORM_SCHEMA_NOT_FOUND");
    }
}
