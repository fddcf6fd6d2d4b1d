//! Error-logging interception at the call boundary
//!
//! Wraps a core operation, leaves its result untouched and records failures
//! as `<OPERATION>_FAILED` events. The core itself never decides where errors
//! are written.
//!
//! # Usage
//!
//! ```ignore
//! let saved = logged("save", &LogMode::Console, db.save(user)).await?;
//! let schema = logged_sync("lookup", &mode, || registry.lookup("User"))?;
//! ```

use std::future::Future;
use std::path::PathBuf;

use super::logger::{Logger, Severity};
use crate::errors::{OrmError, OrmResult};

/// Destination for intercepted failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
    /// stderr
    Console,
    /// Appended to the given file
    File(PathBuf),
}

/// Awaits `operation_future` and logs its error, if any
pub async fn logged<T, F>(operation: &str, mode: &LogMode, operation_future: F) -> OrmResult<T>
where
    F: Future<Output = OrmResult<T>>,
{
    let result = operation_future.await;
    if let Err(ref err) = result {
        report(operation, mode, err);
    }
    result
}

/// Runs `f` and logs its error, if any
pub fn logged_sync<T, F>(operation: &str, mode: &LogMode, f: F) -> OrmResult<T>
where
    F: FnOnce() -> OrmResult<T>,
{
    let result = f();
    if let Err(ref err) = result {
        report(operation, mode, err);
    }
    result
}

fn report(operation: &str, mode: &LogMode, err: &OrmError) {
    let event = format!("{}_FAILED", operation.to_uppercase());
    let message = err.to_string();
    let fields = [("code", err.code()), ("error", message.as_str())];

    match mode {
        LogMode::Console => Logger::log_console(Severity::Error, &event, &fields),
        LogMode::File(path) => {
            if let Err(io_err) = Logger::append_to_file(path, Severity::Error, &event, &fields) {
                // Sink unavailable: fall back so the failure is not lost
                let sink = path.display().to_string();
                let reason = io_err.to_string();
                Logger::log_console(
                    Severity::Warn,
                    "LOG_SINK_FAILED",
                    &[("path", sink.as_str()), ("reason", reason.as_str())],
                );
                Logger::log_console(Severity::Error, &event, &fields);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ok_passes_through() {
        let value = logged("save", &LogMode::Console, async { Ok::<_, OrmError>(5) })
            .await
            .unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn test_error_is_returned_unchanged_and_written() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("errors.log");
        let mode = LogMode::File(log.clone());

        let result: OrmResult<()> = logged("filter", &mode, async {
            Err(OrmError::SchemaNotFound("Ghost".into()))
        })
        .await;
        assert!(matches!(result, Err(OrmError::SchemaNotFound(_))));

        let content = std::fs::read_to_string(&log).unwrap();
        let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(entry["event"], "FILTER_FAILED");
        assert_eq!(entry["severity"], "ERROR");
        assert_eq!(entry["code"], "ORM_SCHEMA_NOT_FOUND");
        assert!(entry["error"].as_str().unwrap().contains("Ghost"));
    }

    #[test]
    fn test_sync_variant() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("errors.log");
        let mode = LogMode::File(log.clone());

        assert_eq!(logged_sync("read", &mode, || Ok(1)).unwrap(), 1);
        assert!(!log.exists());

        let result: OrmResult<i32> =
            logged_sync("read", &mode, || Err(OrmError::corrupted("bad header")));
        assert!(result.is_err());
        assert!(std::fs::read_to_string(&log).unwrap().contains("READ_FAILED"));
    }
}
