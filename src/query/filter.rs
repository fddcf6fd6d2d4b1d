//! Deferred filter specifications
//!
//! Building a `FilterSpec` touches nothing on disk. All work happens on the
//! first await, which reads the store, applies the constraints and writes the
//! matches to the results file.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::matcher::{Constraint, RecordMatcher};
use crate::codec;
use crate::errors::{OrmError, OrmResult};
use crate::record::{Record, Value};
use crate::storage::{RecordStore, TextFile};

/// Future returned by awaiting a filter specification
pub type FilterFuture<'a> = Pin<Box<dyn Future<Output = OrmResult<Vec<Record>>> + Send + 'a>>;

/// A single-use equality query over one record type.
///
/// Await it by reference (`(&spec).await`) or by value (`spec.await`). A
/// second await of the same specification fails with `AlreadyResolved`, even
/// if the first one failed.
#[derive(Debug)]
pub struct FilterSpec {
    store: Arc<RecordStore>,
    results: TextFile,
    schema: String,
    constraints: Vec<Constraint>,
    resolved: AtomicBool,
}

impl FilterSpec {
    pub(crate) fn new(
        store: Arc<RecordStore>,
        results: TextFile,
        schema: impl Into<String>,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            store,
            results,
            schema: schema.into(),
            constraints,
            resolved: AtomicBool::new(false),
        }
    }

    /// Adds an equality constraint
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.push(Constraint::new(field, value));
        self
    }

    /// Target record type
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Where matches are written on resolution
    pub fn results_path(&self) -> &std::path::Path {
        self.results.path()
    }

    /// True once the specification has been awaited
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }

    /// Runs the query.
    ///
    /// # Errors
    ///
    /// - `AlreadyResolved` on any call after the first
    /// - `SchemaNotFound`, `FileNotFound`, `FileCorrupted` from the store
    /// - `Validation` for constraints the schema rejects
    pub async fn resolve(&self) -> OrmResult<Vec<Record>> {
        if self.resolved.swap(true, Ordering::SeqCst) {
            return Err(OrmError::AlreadyResolved(self.schema.clone()));
        }

        let schema = self.store.registry().lookup(&self.schema)?;
        let constraints = RecordMatcher::prepare(&schema, &self.constraints)?;

        let matches: Vec<Record> = self
            .store
            .read_all(&self.schema)
            .await?
            .into_iter()
            .filter(|record| RecordMatcher::matches(record, &constraints))
            .collect();

        self.results.write(&codec::encode(&matches)).await?;
        Ok(matches)
    }
}

impl<'a> IntoFuture for &'a FilterSpec {
    type Output = OrmResult<Vec<Record>>;
    type IntoFuture = FilterFuture<'a>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.resolve())
    }
}

impl IntoFuture for FilterSpec {
    type Output = OrmResult<Vec<Record>>;
    type IntoFuture = FilterFuture<'static>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.resolve().await })
    }
}
