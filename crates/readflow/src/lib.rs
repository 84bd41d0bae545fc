//! Readflow - reading-order reconstruction for OCR output
//!
//! OCR engines report every word with a bounding box but say little about the
//! order a person would read them in. Concatenating words in emission order
//! interleaves the columns of multi-column pages. Readflow rebuilds the reading
//! order from geometry alone: it finds column gutters, groups words into
//! visual lines, and emits columns left to right and lines top to bottom.
//!
//! # Quick Start
//!
//! ```rust
//! use readflow::{DocumentFormat, LayoutConfig, linearize_str};
//!
//! # fn main() -> readflow::Result<()> {
//! let json = r#"{"pages": [{"blocks": [{"lines": [{"words": [
//!     {"value": "Name", "geometry": [[0.05, 0.10], [0.15, 0.12]]},
//!     {"value": "Resume", "geometry": [[0.55, 0.10], [0.70, 0.12]]}
//! ]}]}]}]}"#;
//!
//! let text = linearize_str(json, DocumentFormat::Json, &LayoutConfig::default())?;
//! assert_eq!(text.content, "Name\n\nResume");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **OCR model** (`ocr`): page → block → line → word input, JSON and Tesseract TSV
//! - **Layout** (`layout`): token index, column detection, line clustering, assembly
//! - **Core** (`core`): per-page pipeline, document joining, config, batching

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod layout;
pub mod ocr;
pub mod types;

pub use error::{ReadflowError, Result};
pub use types::*;

pub use core::config::{ColumnDetection, LayoutConfig, LayoutStrategy};
pub use core::io::DocumentFormat;
pub use core::pipeline::{linearize_document, linearize_file, linearize_files_batch, linearize_page, linearize_str};

#[cfg(feature = "tokio-runtime")]
pub use core::batch::{batch_linearize_files, linearize_file_async};

pub use ocr::{OcrDocument, OcrPage};
