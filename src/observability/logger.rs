//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then `ts`, then fields sorted by key
//! - Synchronous, no buffering
//! - Target chosen once per process: console or an appended file

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// stdout, with ERROR on stderr
    Console,
    /// Appended to a file
    File(PathBuf),
}

static TARGET: OnceLock<LogTarget> = OnceLock::new();
static CONSOLE: LogTarget = LogTarget::Console;

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Installs the process-wide target.
    ///
    /// Returns false if a target was already installed; the first one stays.
    pub fn init(target: LogTarget) -> bool {
        TARGET.set(target).is_ok()
    }

    /// The installed target, console if none
    pub fn target() -> &'static LogTarget {
        TARGET.get().unwrap_or(&CONSOLE)
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        match Self::target() {
            LogTarget::Console => Self::log_console(severity, event, fields),
            LogTarget::File(path) => {
                if Self::append_to_file(path, severity, event, fields).is_err() {
                    Self::log_console(severity, event, fields);
                }
            }
        }
    }

    /// Log to stdout, or stderr for ERROR
    pub fn log_console(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity >= Severity::Error {
            Self::log_to_writer(severity, event, fields, &mut io::stderr());
        } else {
            Self::log_to_writer(severity, event, fields, &mut io::stdout());
        }
    }

    /// Append one line to `path`, creating the file if needed
    pub fn append_to_file(
        path: &Path,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = format_line(severity, event, &now(), fields);
        file.write_all(line.as_bytes())
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let line = format_line(severity, event, &now(), fields);
        // Write atomically (one syscall)
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders one JSON line, newline included
pub(crate) fn format_line(
    severity: Severity,
    event: &str,
    ts: &str,
    fields: &[(&str, &str)],
) -> String {
    let mut output = String::with_capacity(256);

    output.push_str("{\"event\":\"");
    escape_json_string(&mut output, event);
    output.push_str("\",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push_str("\",\"ts\":\"");
    escape_json_string(&mut output, ts);
    output.push('"');

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push_str("}\n");
    output
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
