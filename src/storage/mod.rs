//! Record Storage subsystem for flatorm
//!
//! The backing file holds the canonical persistent state of all records, as
//! blocks of the structured-text codec in file order.
//!
//! # Design Principles
//!
//! - Whole-document granularity: every read parses the full file, every
//!   write rewrites it
//! - File handles are scoped to a single call
//! - Suspension points are exactly the file open/read/write boundaries
//! - Corruption is reported, never repaired
//!
//! # Known limitation
//!
//! No cross-process locking and no atomic replace. An interrupted write can
//! leave the file truncated.

mod file;
mod store;

pub use file::TextFile;
pub use store::RecordStore;
