//! Lazy Query Engine for flatorm
//!
//! A filter call builds a `FilterSpec` describing an equality query. Nothing
//! is read until the specification is awaited.
//!
//! # Design Principles
//!
//! - No I/O before the await
//! - Single use: a specification resolves at most once
//! - Matches keep file order and are written to the results file, never back
//!   into the primary store
//! - Constraints are AND-ed; an empty set matches every record

mod filter;
mod matcher;

pub use filter::{FilterFuture, FilterSpec};
pub use matcher::{Constraint, RecordMatcher};
