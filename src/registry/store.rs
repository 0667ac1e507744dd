//! Durable route storage.
//!
//! # Responsibilities
//! - One JSON document per record id under the routes directory
//! - Enumerate all records, skipping foreign and corrupt files
//! - Load and update records by route path
//!
//! # Design Decisions
//! - Writes are whole-document overwrites with no locking (last write wins)
//! - A corrupt record is logged and skipped; it never aborts enumeration

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::fs;

use crate::observability::metrics;
use crate::registry::filename::{derive_record_id, is_record_file};
use crate::registry::record::{RouteDocument, RouteRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no route stored for path: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid record {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File-backed store of route records.
#[derive(Debug, Clone)]
pub struct RouteStore {
    dir: PathBuf,
}

impl RouteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the routes directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))
    }

    /// Location of the record for `path`.
    pub fn record_path(&self, path: &str) -> PathBuf {
        self.dir.join(derive_record_id(path))
    }

    /// Enumerate every readable record, sorted by record id.
    ///
    /// A missing directory yields no records. Files without the record
    /// suffix are ignored; unreadable or malformed records are logged and
    /// skipped.
    pub async fn list(&self) -> Result<Vec<RouteDocument>, StoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let path = entry.path();
            let is_record = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_record_file);
            if !is_record {
                continue;
            }
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(&path, e))?;
            if file_type.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            match read_document(&file).await {
                Ok(doc) => records.push(doc),
                Err(e) => {
                    tracing::warn!(
                        file = %file.display(),
                        error = %e,
                        "Skipping unreadable route record"
                    );
                    metrics::record_skipped("corrupt");
                }
            }
        }

        tracing::debug!(
            dir = %self.dir.display(),
            count = records.len(),
            "Enumerated route records"
        );
        Ok(records)
    }

    /// Persist a record, overwriting whatever shares its record id.
    ///
    /// Returns the file the record was written to.
    pub async fn save(&self, record: &RouteRecord) -> Result<PathBuf, StoreError> {
        self.save_document(&record.path, &RouteDocument::from(record))
            .await
    }

    async fn save_document(&self, path: &str, doc: &RouteDocument) -> Result<PathBuf, StoreError> {
        let file = self.record_path(path);
        let content = serde_json::to_string_pretty(doc).map_err(|e| StoreError::json(&file, e))?;
        fs::write(&file, content)
            .await
            .map_err(|e| StoreError::io(&file, e))?;

        tracing::debug!(path = %path, file = %file.display(), "Saved route record");
        Ok(file)
    }

    /// Load the record that `path` resolves to, if one exists.
    pub async fn load_by_path(&self, path: &str) -> Result<Option<RouteDocument>, StoreError> {
        let file = self.record_path(path);
        match read_document(&file).await {
            Ok(doc) => Ok(Some(doc)),
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the stored response for `path`, keeping every other field.
    pub async fn update(&self, path: &str, response: Value) -> Result<RouteDocument, StoreError> {
        let mut doc = self
            .load_by_path(path)
            .await?
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        doc.response = Some(response);
        self.save_document(path, &doc).await?;
        Ok(doc)
    }
}

async fn read_document(file: &Path) -> Result<RouteDocument, StoreError> {
    let content = fs::read_to_string(file)
        .await
        .map_err(|e| StoreError::io(file, e))?;
    serde_json::from_str(&content).map_err(|e| StoreError::json(file, e))
}
