//! File I/O utilities.
//!
//! This module provides sync and async readers for OCR exports with proper
//! error handling, plus the file-extension based input format detection.

use crate::ocr::{OcrDocument, extract_pages_from_tsv};
use crate::{ReadflowError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized shape of an OCR export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Page → block → line → word hierarchy with normalized geometry.
    Json,
    /// Tesseract TSV with pixel coordinates.
    Tsv,
}

impl DocumentFormat {
    /// Pick the format from a file extension (`.json` or `.tsv`).
    ///
    /// # Errors
    ///
    /// Returns `ReadflowError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("tsv") => Ok(Self::Tsv),
            _ => Err(ReadflowError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Decode `content` into an [`OcrDocument`].
    pub fn parse(self, content: &str) -> Result<OcrDocument> {
        match self {
            Self::Json => OcrDocument::from_json_str(content),
            Self::Tsv => Ok(OcrDocument::new(extract_pages_from_tsv(content, 0.0)?)),
        }
    }
}

/// Read a file synchronously.
///
/// # Errors
///
/// Returns `ReadflowError::Io` for I/O errors (these always bubble up).
pub fn read_file_sync(path: impl AsRef<Path>) -> Result<String> {
    std::fs::read_to_string(path.as_ref()).map_err(ReadflowError::Io)
}

/// Read a file asynchronously.
///
/// # Errors
///
/// Returns `ReadflowError::Io` for I/O errors (these always bubble up).
#[cfg(feature = "tokio-runtime")]
pub async fn read_file_async(path: impl AsRef<Path>) -> Result<String> {
    tokio::fs::read_to_string(path.as_ref()).await.map_err(ReadflowError::Io)
}

/// Validate that a file exists.
///
/// # Errors
///
/// Returns `ReadflowError::Validation` if file doesn't exist.
pub fn validate_file_exists(path: impl AsRef<Path>) -> Result<()> {
    if !path.as_ref().exists() {
        return Err(ReadflowError::validation(format!(
            "File does not exist: {}",
            path.as_ref().display()
        )));
    }
    Ok(())
}

/// Load an OCR export from disk, detecting the format from the extension.
pub fn load_document(path: impl AsRef<Path>) -> Result<OcrDocument> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    validate_file_exists(path)?;
    let content = read_file_sync(path)?;
    format.parse(&content)
}
