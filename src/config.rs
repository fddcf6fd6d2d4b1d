//! Configuration file handling
//!
//! The configuration is a JSON document naming the backing store, the
//! results file, an optional error log and the record types to register.
//! Every field has a default, so `{}` is a valid configuration.
//!
//! Relative paths are resolved against the directory holding the
//! configuration file, not the working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::OrmError;
use crate::observability::{LogMode, LogTarget};
use crate::schema::{FieldDef, SchemaDef, SchemaRegistry};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "ORM_CONFIG_READ",
            Self::Parse { .. } => "ORM_CONFIG_PARSE",
            Self::Write { .. } => "ORM_CONFIG_WRITE",
            Self::Invalid(_) => "ORM_CONFIG_INVALID",
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backing store file (default "students.txt")
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Query results file (default "result.txt")
    #[serde(default = "default_results")]
    pub results: PathBuf,

    /// Error and file-operation log; console when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Record types to register (default: User)
    #[serde(default = "default_schemas")]
    pub schemas: Vec<SchemaDef>,
}

fn default_database() -> PathBuf {
    PathBuf::from("students.txt")
}

fn default_results() -> PathBuf {
    PathBuf::from("result.txt")
}

fn default_schemas() -> Vec<SchemaDef> {
    vec![SchemaDef {
        name: "User".to_string(),
        fields: vec![
            FieldDef::int("id").primary_key(),
            FieldDef::string("username"),
            FieldDef::int("age"),
        ],
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            results: default_results(),
            log_file: None,
            schemas: default_schemas(),
        }
    }
}

impl Config {
    /// Loads, resolves and validates a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;

        Ok(config)
    }

    /// Writes the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json + "\n").map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates paths and schema declarations
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database path must not be empty".into()));
        }
        if self.results.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("results path must not be empty".into()));
        }
        if self.database == self.results {
            return Err(ConfigError::Invalid(format!(
                "database and results must be different files, both are '{}'",
                self.database.display()
            )));
        }
        if matches!(&self.log_file, Some(p) if p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("log_file must not be empty".into()));
        }

        // Registering every schema also catches duplicate names
        self.registry().map(|_| ())
    }

    /// Builds a registry holding every configured schema
    pub fn registry(&self) -> ConfigResult<Arc<SchemaRegistry>> {
        let registry = SchemaRegistry::new();
        for def in &self.schemas {
            def.build()
                .and_then(|schema| registry.register(schema))
                .map_err(|e| ConfigError::Invalid(schema_error(&def.name, e)))?;
        }
        Ok(Arc::new(registry))
    }

    /// Where intercepted failures are written
    pub fn log_mode(&self) -> LogMode {
        match &self.log_file {
            Some(path) => LogMode::File(path.clone()),
            None => LogMode::Console,
        }
    }

    /// Process-wide log target
    pub fn log_target(&self) -> LogTarget {
        match &self.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None => LogTarget::Console,
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() && !p.as_os_str().is_empty() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.database);
        resolve(&mut self.results);
        if let Some(log) = self.log_file.as_mut() {
            resolve(log);
        }
    }
}

fn schema_error(name: &str, err: OrmError) -> String {
    match err {
        OrmError::SchemaConflict(_) => format!("schema '{}' is declared twice", name),
        other => other.to_string(),
    }
}
