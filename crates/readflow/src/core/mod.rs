//! Core linearization orchestration module.
//!
//! This module ties the layout stages together and provides the entry points
//! for strings, files and batches of files.
//!
//! # Architecture
//!
//! The core module is responsible for:
//! - **Entry Points**: `linearize_document()`, `linearize_str()` and `linearize_file()`
//! - **Pipeline**: Per-page strategy dispatch and page-order joining
//! - **Batching**: Rayon batch over files, plus a tokio batch behind `tokio-runtime`
//! - **Configuration**: Loading and validating layout configuration
//! - **I/O**: File reading, validation and input format detection
//!
//! # Example
//!
//! ```rust,no_run
//! use readflow::core::config::LayoutConfig;
//! use readflow::core::pipeline::linearize_file;
//!
//! # fn example() -> readflow::Result<()> {
//! let config = LayoutConfig::default();
//! let text = linearize_file("resume.json", &config)?;
//! println!("{}", text.content);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "tokio-runtime")]
pub mod batch;
pub mod config;
pub mod io;
pub mod pipeline;

#[cfg(feature = "tokio-runtime")]
pub use batch::{batch_linearize_files, linearize_file_async};
pub use config::{ColumnDetection, LayoutConfig, LayoutStrategy};
pub use io::{DocumentFormat, load_document};
pub use pipeline::{linearize_document, linearize_file, linearize_files_batch, linearize_page, linearize_str};
