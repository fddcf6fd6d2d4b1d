//! Observability subsystem for flatorm
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - The `logged` interceptor used at the boundary of core operations
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging failures never fail the operation being observed
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use flatorm::observability::{Logger, LogTarget};
//!
//! Logger::init(LogTarget::File("file_operations.log".into()));
//! Logger::info("FILE_READ", &[("path", "students.txt")]);
//! ```

mod logged;
mod logger;

pub use logged::{logged, logged_sync, LogMode};
pub use logger::{LogTarget, Logger, Severity};
