//! Structured-text codec
//!
//! Records are stored as indentation-based blocks, one per record:
//!
//! ```text
//! User:
//!   id: 1
//!   username: Andriy
//!   age: 20
//! ```
//!
//! # Guarantees
//!
//! - Fields are written in schema order
//! - Strings are quoted only when ambiguous (see [`quoting`])
//! - `decode(encode(records))` yields field-equal records in the same order
//! - Empty input decodes to no blocks
//! - Blank lines and trailing whitespace are ignored

mod block;
mod decoder;
mod encoder;
pub mod quoting;

pub use block::Block;
pub use decoder::{decode, decode_records};
pub use encoder::{encode, encode_blocks};
