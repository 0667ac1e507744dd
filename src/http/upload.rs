//! Scoped upload handling.
//!
//! An uploaded file is streamed into a temporary file that lives exactly as
//! long as its `ScopedUpload`. The file is removed when the value is dropped,
//! whichever branch the handler leaves through: success, rejection of an
//! unsupported type, or an error while reading.

use std::path::Path;

use axum::extract::multipart::Field;
use serde_json::Value;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::http::error::ApiError;

pub struct ScopedUpload {
    path: TempPath,
    file_name: Option<String>,
    content_type: Option<String>,
}

impl ScopedUpload {
    /// Stream a multipart file field into a new temp file under `dir`.
    pub async fn receive(mut field: Field<'_>, dir: &Path) -> Result<Self, ApiError> {
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let (file, path) = tempfile::Builder::new()
            .prefix("route-upload-")
            .tempfile_in(dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut size = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?
        {
            size += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!(
            file_name = ?file_name,
            content_type = ?content_type,
            size,
            temp = %path.display(),
            "Received upload"
        );

        Ok(Self {
            path,
            file_name,
            content_type,
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// True if the upload is named `*.json` or declared as `application/json`.
    pub fn is_json(&self) -> bool {
        let by_name = self
            .file_name
            .as_deref()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".json"));
        let by_type = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"));
        by_name || by_type
    }

    /// Parse the uploaded file as a JSON document.
    pub async fn read_json(&self) -> Result<Value, ApiError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&content)
            .map_err(|e| ApiError::validation(format!("uploaded file is not valid JSON: {e}")))
    }
}
