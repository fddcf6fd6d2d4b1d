//! Scoped async access to one text file
//!
//! Every call opens the file, does one full read or one full overwrite and
//! drops the handle before returning, on success and on error alike.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::errors::{OrmError, OrmResult};
use crate::observability::Logger;

/// A whole-document text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    path: PathBuf,
}

impl TextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full document.
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the file is absent, `FileCorrupted` if it is not
    /// UTF-8, `Io` otherwise.
    pub async fn read(&self) -> OrmResult<String> {
        let path = self.path.display().to_string();
        Logger::info("FILE_READ", &[("path", path.as_str())]);

        let mut file = File::open(&self.path)
            .await
            .map_err(|e| OrmError::from_io(&self.path, e))?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .await
            .map_err(|e| OrmError::from_io(&self.path, e))?;
        Ok(text)
    }

    /// Reads the full document, treating an absent file as empty
    pub async fn read_or_empty(&self) -> OrmResult<String> {
        match self.read().await {
            Err(OrmError::FileNotFound(_)) => Ok(String::new()),
            other => other,
        }
    }

    /// Overwrites the full document and syncs it to disk.
    ///
    /// Parent directories are created if missing. An interrupted write may
    /// leave the file truncated.
    pub async fn write(&self, text: &str) -> OrmResult<()> {
        let path = self.path.display().to_string();
        let bytes = text.len().to_string();
        Logger::info("FILE_WRITE", &[("bytes", bytes.as_str()), ("path", path.as_str())]);

        self.create_parent().await?;

        let mut file = File::create(&self.path)
            .await
            .map_err(|e| OrmError::from_io(&self.path, e))?;
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| OrmError::from_io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| OrmError::from_io(&self.path, e))?;
        file.sync_all()
            .await
            .map_err(|e| OrmError::from_io(&self.path, e))?;
        Ok(())
    }

    /// Creates an empty file if none exists.
    ///
    /// Returns true if the file was created.
    pub async fn create_if_missing(&self) -> OrmResult<bool> {
        self.create_parent().await?;

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(_) => {
                let path = self.path.display().to_string();
                Logger::info("FILE_CREATED", &[("path", path.as_str())]);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(OrmError::from_io(&self.path, e)),
        }
    }

    async fn create_parent(&self) -> OrmResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| OrmError::from_io(parent, e)),
            _ => Ok(()),
        }
    }
}
