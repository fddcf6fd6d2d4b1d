//! Record instances and their scalar values

mod record;
mod value;

pub use record::Record;
pub use value::Value;
