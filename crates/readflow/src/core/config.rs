//! Configuration loading and management.
//!
//! This module provides utilities for loading layout configuration from TOML,
//! YAML or JSON files and for discovering a `readflow.toml` in the project
//! hierarchy.

use crate::{ReadflowError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`LayoutConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "readflow.toml";

/// Granularity at which reading order is reconstructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Word-level columns, lines and tokens.
    #[default]
    Words,
    /// OCR blocks grouped into horizontal rows, read row by row.
    BlockRows,
    /// OCR blocks split into columns at wide gaps between block edges.
    BlockColumns,
}

/// How column boundaries are derived from the gaps between token centres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDetection {
    /// Split once, at the single widest gap above the threshold (at most two columns).
    #[default]
    LargestGap,
    /// Split at every gap above the threshold (any number of columns).
    AllGaps,
}

/// Layout reconstruction configuration.
///
/// # Example
///
/// ```rust
/// use readflow::core::config::{ColumnDetection, LayoutConfig};
///
/// let config = LayoutConfig::default();
/// assert_eq!(config.column_gap_threshold, 0.05);
/// assert_eq!(config.line_tolerance, 0.015);
/// assert_eq!(config.column_detection, ColumnDetection::LargestGap);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub strategy: LayoutStrategy,

    #[serde(default)]
    pub column_detection: ColumnDetection,

    /// Minimum gutter width, as a fraction of page width, that separates columns.
    #[serde(default = "default_column_gap_threshold")]
    pub column_gap_threshold: f64,

    /// Maximum distance, as a fraction of page height, between a token's `top`
    /// and the running average `top` of the line it joins.
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f64,

    /// Vertical tolerance for grouping blocks into rows (`block_rows` strategy).
    #[serde(default = "default_row_tolerance")]
    pub row_tolerance: f64,

    /// Words with a reported confidence below this value are dropped.
    #[serde(default)]
    pub min_confidence: f64,

    /// Prefix every column of a multi-column page with `=== COLUMN n ===`.
    #[serde(default)]
    pub label_columns: bool,

    /// Lay out the pages of one document on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Maximum documents processed at once by the async batch API (None = num_cpus * 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_documents: Option<usize>,
}

fn default_true() -> bool {
    true
}

fn default_column_gap_threshold() -> f64 {
    0.05
}

fn default_line_tolerance() -> f64 {
    0.015
}

fn default_row_tolerance() -> f64 {
    0.05
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: LayoutStrategy::default(),
            column_detection: ColumnDetection::default(),
            column_gap_threshold: default_column_gap_threshold(),
            line_tolerance: default_line_tolerance(),
            row_tolerance: default_row_tolerance(),
            min_confidence: 0.0,
            label_columns: false,
            parallel: true,
            max_concurrent_documents: None,
        }
    }
}

impl LayoutConfig {
    /// Check that all thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns `ReadflowError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("column_gap_threshold", self.column_gap_threshold),
            ("line_tolerance", self.line_tolerance),
            ("row_tolerance", self.row_tolerance),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(ReadflowError::validation(format!(
                    "{} must be between 0 and 1 (exclusive), got {}",
                    name, value
                )));
            }
        }

        if !self.min_confidence.is_finite() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ReadflowError::validation(format!(
                "min_confidence must be between 0 and 1, got {}",
                self.min_confidence
            )));
        }

        if self.max_concurrent_documents == Some(0) {
            return Err(ReadflowError::validation(
                "max_concurrent_documents must be at least 1",
            ));
        }

        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ReadflowError::Validation` if the file doesn't exist or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| ReadflowError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| ReadflowError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_json::from_str(&content)
            .map_err(|e| ReadflowError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, choosing the parser from the file extension.
    ///
    /// `.toml`, `.yaml`/`.yml` and `.json` are recognized.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ReadflowError::validation(format!(
                "Unsupported config file extension: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `readflow.toml` in current directory and parent directories.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(ReadflowError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("Using layout config {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ReadflowError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
