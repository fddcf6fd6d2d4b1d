//! Error taxonomy for flatorm
//!
//! Error codes:
//! - ORM_FILE_NOT_FOUND
//! - ORM_FILE_CORRUPTED
//! - ORM_VALIDATION_FAILED
//! - ORM_SCHEMA_NOT_FOUND
//! - ORM_SCHEMA_CONFLICT
//! - ORM_INVALID_SCHEMA
//! - ORM_ALREADY_RESOLVED
//! - ORM_IO_ERROR
//!
//! Every error is raised to the immediate caller. Nothing is retried and a
//! corrupted file is never repaired in place.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for all core operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Core error type
#[derive(Debug, Error)]
pub enum OrmError {
    /// Backing or results file missing where an empty store is not a valid reading
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Text violates the block grammar, or a stored value cannot be coerced
    #[error("File corrupted: {reason}{}", line_suffix(.line))]
    FileCorrupted {
        /// 1-based line number, when known
        line: Option<usize>,
        reason: String,
    },

    /// Assignment violates a field type, or a required field was read unset
    #[error("Validation failed for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Record type was never registered
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    /// Record type re-registered with different fields
    #[error("Schema '{0}' is already registered with different fields")]
    SchemaConflict(String),

    /// Schema declaration itself is malformed
    #[error("Invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },

    /// Filter specification awaited more than once
    #[error("Filter specification for '{0}' has already been resolved")]
    AlreadyResolved(String),

    /// Any other I/O failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (line {})", n),
        None => String::new(),
    }
}

impl OrmError {
    /// Create a corruption error tied to a line of the input
    pub fn corrupted_at(line: usize, reason: impl Into<String>) -> Self {
        Self::FileCorrupted {
            line: Some(line),
            reason: reason.into(),
        }
    }

    /// Create a corruption error without position information
    pub fn corrupted(reason: impl Into<String>) -> Self {
        Self::FileCorrupted {
            line: None,
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema declaration error
    pub fn invalid_schema(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    /// Map an I/O error on `path`, turning `NotFound` into `FileNotFound`
    /// and undecodable text into `FileCorrupted`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            io::ErrorKind::InvalidData => Self::corrupted(format!(
                "{} is not valid UTF-8 text",
                path.display()
            )),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "ORM_FILE_NOT_FOUND",
            Self::FileCorrupted { .. } => "ORM_FILE_CORRUPTED",
            Self::Validation { .. } => "ORM_VALIDATION_FAILED",
            Self::SchemaNotFound(_) => "ORM_SCHEMA_NOT_FOUND",
            Self::SchemaConflict(_) => "ORM_SCHEMA_CONFLICT",
            Self::InvalidSchema { .. } => "ORM_INVALID_SCHEMA",
            Self::AlreadyResolved(_) => "ORM_ALREADY_RESOLVED",
            Self::Io { .. } => "ORM_IO_ERROR",
        }
    }

    /// True for errors caused by the content of a file on disk
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Self::FileCorrupted { .. } | Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            OrmError::FileNotFound(PathBuf::from("x")).code(),
            "ORM_FILE_NOT_FOUND"
        );
        assert_eq!(OrmError::corrupted("bad").code(), "ORM_FILE_CORRUPTED");
        assert_eq!(
            OrmError::validation("age", "not an integer").code(),
            "ORM_VALIDATION_FAILED"
        );
        assert_eq!(
            OrmError::SchemaNotFound("User".into()).code(),
            "ORM_SCHEMA_NOT_FOUND"
        );
        assert_eq!(
            OrmError::AlreadyResolved("User".into()).code(),
            "ORM_ALREADY_RESOLVED"
        );
    }

    #[test]
    fn test_corruption_display_includes_line() {
        let err = OrmError::corrupted_at(7, "unknown field 'email'");
        let display = err.to_string();
        assert!(display.contains("unknown field 'email'"));
        assert!(display.contains("line 7"));
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = OrmError::from_io(
            Path::new("/tmp/missing.txt"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, OrmError::FileNotFound(_)));
    }

    #[test]
    fn test_from_io_maps_invalid_data_to_corruption() {
        let err = OrmError::from_io(
            Path::new("/tmp/binary.txt"),
            io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        );
        assert!(matches!(err, OrmError::FileCorrupted { .. }));
        assert!(err.is_storage_fault());
    }
}
