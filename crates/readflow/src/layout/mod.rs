//! Geometric reading-order reconstruction.
//!
//! The word-level path runs in four stages:
//!
//! 1. [`TokenIndex`] flattens a page into positioned tokens
//! 2. [`detect_columns`] finds column bands from gaps between token centres
//! 3. [`cluster_lines`] groups each column's tokens into visual lines
//! 4. [`assemble_page`] renders columns and lines as linear text
//!
//! [`blocks`] holds the coarser block-level alternatives.

pub mod assemble;
pub mod blocks;
pub mod columns;
pub mod lines;
pub mod tokens;

pub use assemble::assemble_page;
pub use blocks::{BlockIndex, PositionedBlock};
pub use columns::{assign_to_columns, detect_columns};
pub use lines::cluster_lines;
pub use tokens::TokenIndex;

use crate::core::config::LayoutConfig;
use crate::types::{ColumnLayout, Token};

/// Run column detection and line clustering over one page's tokens.
///
/// Returns one [`ColumnLayout`] per detected band, left to right.
pub fn layout_tokens(tokens: Vec<Token>, config: &LayoutConfig) -> Vec<ColumnLayout> {
    let bands = detect_columns(&tokens, config.column_detection, config.column_gap_threshold);
    let buckets = assign_to_columns(tokens, &bands);

    bands
        .into_iter()
        .zip(buckets)
        .map(|(band, column_tokens)| ColumnLayout {
            band,
            lines: cluster_lines(column_tokens, config.line_tolerance),
        })
        .collect()
}
