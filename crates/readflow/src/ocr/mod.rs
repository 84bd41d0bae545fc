//! OCR input model.
//!
//! Recognition itself happens elsewhere; this module describes what an OCR
//! engine hands over: pages made of blocks, lines and words, each word with
//! its text and a box in normalized page coordinates.
//!
//! Two input shapes are supported:
//!
//! - **JSON export**: the page → block → line → word hierarchy with
//!   `geometry` corner pairs (or polygons), see [`OcrDocument::from_json_str`]
//! - **Tesseract TSV**: pixel boxes normalized against the page size row,
//!   see [`extract_pages_from_tsv`]
//!
//! # Example
//!
//! ```rust
//! use readflow::ocr::OcrDocument;
//!
//! # fn example() -> readflow::Result<()> {
//! let json = r#"{"pages": [{"blocks": [{"lines": [{"words": [
//!     {"value": "Hello", "geometry": [[0.1, 0.1], [0.2, 0.12]]}
//! ]}]}]}]}"#;
//! let doc = OcrDocument::from_json_str(json)?;
//! assert_eq!(doc.pages[0].word_count(), 1);
//! # Ok(())
//! # }
//! ```
pub mod tsv_parser;
pub mod types;

pub use tsv_parser::extract_pages_from_tsv;
pub use types::{Geometry, OcrBlock, OcrDocument, OcrLine, OcrPage, OcrWord};
