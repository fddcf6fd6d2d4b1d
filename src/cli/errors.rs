//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::errors::OrmError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, runtime startup)
    IoError,
    /// Bad command-line input
    UsageError,
    /// Core operation failed
    OperationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ORM_CLI_CONFIG_ERROR",
            Self::IoError => "ORM_CLI_IO_ERROR",
            Self::UsageError => "ORM_CLI_USAGE_ERROR",
            Self::OperationFailed => "ORM_CLI_OPERATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn usage_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::UsageError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<OrmError> for CliError {
    fn from(e: OrmError) -> Self {
        Self::new(
            CliErrorCode::OperationFailed,
            format!("[{}] {}", e.code(), e),
        )
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orm_error_keeps_code() {
        let err: CliError = OrmError::SchemaNotFound("Ghost".into()).into();
        assert_eq!(err.code_str(), "ORM_CLI_OPERATION_FAILED");
        assert!(err.message().contains("ORM_SCHEMA_NOT_FOUND"));
        assert!(err.to_string().starts_with("ORM_CLI_OPERATION_FAILED: "));
    }

    #[test]
    fn test_config_error() {
        let err: CliError = ConfigError::Invalid("bad".into()).into();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
