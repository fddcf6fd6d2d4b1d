//! Schema subsystem for flatorm
//!
//! A schema declares a record type: its ordered, typed fields and the single
//! primary-key field. Schemas are built once, registered once and never
//! mutated afterwards.
//!
//! # Design Principles
//!
//! - Explicit builder, no declaration hooks
//! - Validation on every assignment
//! - Integer fields are never coerced from text on assignment
//! - Registry is injected, not global

mod registry;
mod types;

pub use registry::SchemaRegistry;
pub use types::{FieldDef, FieldType, Schema, SchemaBuilder, SchemaDef};

pub(crate) use types::is_identifier;
