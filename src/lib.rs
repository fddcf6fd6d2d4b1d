//! flatorm - typed records over a flat structured-text file
//!
//! Subsystems:
//! - `codec`: block grammar, encoder and decoder
//! - `schema`: field descriptors, schemas and the registry
//! - `record`: validated record instances
//! - `storage`: async whole-file persistence with upsert
//! - `query`: lazy, single-use equality filters
//! - `db`: facade tying the above together
//! - `observability`: JSON logging and the `logged` interceptor
//! - `config` and `cli`: the `flatorm` binary

pub mod cli;
pub mod codec;
pub mod config;
pub mod db;
pub mod errors;
pub mod observability;
pub mod query;
pub mod record;
pub mod schema;
pub mod storage;

pub use config::{Config, ConfigError};
pub use db::Database;
pub use errors::{OrmError, OrmResult};
pub use query::{Constraint, FilterSpec};
pub use record::{Record, Value};
pub use schema::{FieldDef, FieldType, Schema, SchemaDef, SchemaRegistry};
pub use storage::RecordStore;
