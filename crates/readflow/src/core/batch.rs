//! Async batch linearization on the tokio runtime.
//!
//! Files are read with `tokio::fs` and laid out on the blocking pool, with at
//! most [`LayoutConfig::max_concurrent_documents`] documents in flight.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::config::LayoutConfig;
use super::io::{DocumentFormat, read_file_async};
use super::pipeline::linearize_document;
use crate::types::{BatchItemResult, LinearText};
use crate::{ReadflowError, Result};

/// Linearize one file without blocking the async runtime.
pub async fn linearize_file_async(path: impl AsRef<Path>, config: &LayoutConfig) -> Result<LinearText> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let content = read_file_async(path).await?;
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        let document = format.parse(&content)?;
        linearize_document(&document, &config)
    })
    .await
    .map_err(|e| ReadflowError::Other(format!("Layout task failed: {}", e)))?
}

/// Linearize many files concurrently.
///
/// Results are returned in input order. Parsing and format failures are
/// reported per file; I/O errors abort the whole batch.
///
/// # Errors
///
/// Returns `ReadflowError::Io` for the first unreadable file, or
/// `ReadflowError::Other` if a task panicked.
pub async fn batch_linearize_files(
    paths: Vec<impl AsRef<Path>>,
    config: &LayoutConfig,
) -> Result<Vec<BatchItemResult>> {
    if paths.is_empty() {
        return Ok(vec![]);
    }

    config.validate()?;
    let config = Arc::new(config.clone());

    let max_concurrent = config.max_concurrent_documents.unwrap_or_else(|| num_cpus::get() * 2);
    let semaphore = Arc::new(Semaphore::new(max_concurrent));

    let mut tasks = JoinSet::new();

    for (index, path) in paths.into_iter().enumerate() {
        let path_buf = path.as_ref().to_path_buf();
        let config_clone = Arc::clone(&config);
        let semaphore_clone = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let result = match semaphore_clone.acquire().await {
                Ok(_permit) => linearize_file_async(&path_buf, &config_clone).await,
                Err(e) => Err(ReadflowError::Other(format!("Batch semaphore closed: {}", e))),
            };
            (index, path_buf, result)
        });
    }

    let mut results: Vec<Option<BatchItemResult>> = vec![None; tasks.len()];

    while let Some(task_result) = tasks.join_next().await {
        match task_result {
            Ok((index, path, Ok(result))) => {
                results[index] = Some(BatchItemResult {
                    file_path: path.to_string_lossy().to_string(),
                    success: true,
                    result: Some(result),
                    error: None,
                });
            }
            Ok((index, path, Err(e))) => {
                if matches!(e, ReadflowError::Io(_)) {
                    return Err(e);
                }

                tracing::warn!("Failed to linearize {}: {}", path.display(), e);
                results[index] = Some(BatchItemResult {
                    file_path: path.to_string_lossy().to_string(),
                    success: false,
                    result: None,
                    error: Some(e.to_string()),
                });
            }
            Err(join_err) => {
                return Err(ReadflowError::Other(format!("Task panicked: {}", join_err)));
            }
        }
    }

    Ok(results.into_iter().flatten().collect())
}
