//! Page and document linearization.
//!
//! Each page is laid out independently of every other page, so a document is
//! processed by mapping [`linearize_page`] over its pages (on the rayon pool
//! when [`LayoutConfig::parallel`] is set) and joining the results in page
//! order.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use rayon::prelude::*;

use super::config::{LayoutConfig, LayoutStrategy};
use super::io::{DocumentFormat, load_document};
use crate::Result;
use crate::layout::blocks::{
    BlockIndex, assemble_block_columns, assemble_block_rows, detect_block_columns, order_block_columns,
    order_block_rows,
};
use crate::layout::{TokenIndex, assemble_page, layout_tokens};
use crate::ocr::{OcrDocument, OcrPage};
use crate::types::{BatchItemResult, LinearText, PageText};

/// Linearize a single page.
///
/// Never fails: words with malformed geometry are dropped and a page without
/// usable words yields empty content.
pub fn linearize_page(page: &OcrPage, page_index: usize, config: &LayoutConfig) -> PageText {
    let text = match config.strategy {
        LayoutStrategy::Words => linearize_words(page, page_index, config),
        LayoutStrategy::BlockRows => linearize_block_rows(page, page_index, config),
        LayoutStrategy::BlockColumns => linearize_block_columns(page, page_index, config),
    };

    tracing::debug!(
        page = page_index,
        columns = text.column_count,
        lines = text.line_count,
        tokens = text.token_count,
        dropped = text.dropped_tokens,
        "Page linearized"
    );

    text
}

fn linearize_words(page: &OcrPage, page_index: usize, config: &LayoutConfig) -> PageText {
    let index = TokenIndex::from_page(page, config.min_confidence);
    let token_count = index.len();
    let columns = layout_tokens(index.tokens, config);

    PageText {
        page_index,
        content: assemble_page(&columns, config.label_columns),
        column_count: columns.len(),
        line_count: columns.iter().map(|column| column.lines.len()).sum(),
        token_count,
        dropped_tokens: index.dropped,
    }
}

fn linearize_block_rows(page: &OcrPage, page_index: usize, config: &LayoutConfig) -> PageText {
    let index = BlockIndex::from_page(page, config.min_confidence);
    let (line_count, token_count) = (index.line_count(), index.word_count());
    let rows = order_block_rows(index.blocks, config.row_tolerance);

    PageText {
        page_index,
        content: assemble_block_rows(&rows),
        column_count: rows.len(),
        line_count,
        token_count,
        dropped_tokens: index.dropped,
    }
}

fn linearize_block_columns(page: &OcrPage, page_index: usize, config: &LayoutConfig) -> PageText {
    let index = BlockIndex::from_page(page, config.min_confidence);
    let (line_count, token_count) = (index.line_count(), index.word_count());
    let bands = detect_block_columns(&index.blocks, config.column_gap_threshold);
    let columns = order_block_columns(index.blocks, &bands);

    PageText {
        page_index,
        content: assemble_block_columns(&columns, config.label_columns),
        column_count: bands.len(),
        line_count,
        token_count,
        dropped_tokens: index.dropped,
    }
}

/// Lay out one page, turning a panic into an empty page so the rest of the
/// document still comes through.
fn linearize_page_isolated(page: &OcrPage, page_index: usize, config: &LayoutConfig) -> PageText {
    match catch_unwind(AssertUnwindSafe(|| linearize_page(page, page_index, config))) {
        Ok(text) => text,
        Err(_) => {
            tracing::error!("Layout of page {} panicked; emitting empty text for it", page_index);
            PageText::empty(page_index)
        }
    }
}

/// Linearize every page of a document and join them in page order.
///
/// # Errors
///
/// Returns `ReadflowError::Validation` when `config` is invalid. Layout itself
/// does not fail.
pub fn linearize_document(document: &OcrDocument, config: &LayoutConfig) -> Result<LinearText> {
    config.validate()?;

    let pages: Vec<PageText> = if config.parallel {
        document
            .pages
            .par_iter()
            .enumerate()
            .map(|(index, page)| linearize_page_isolated(page, index, config))
            .collect()
    } else {
        document
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| linearize_page_isolated(page, index, config))
            .collect()
    };

    tracing::debug!("Linearized {} pages", pages.len());
    Ok(LinearText::from_pages(pages))
}

/// Parse `content` in the given format and linearize it.
pub fn linearize_str(content: &str, format: DocumentFormat, config: &LayoutConfig) -> Result<LinearText> {
    let document = format.parse(content)?;
    linearize_document(&document, config)
}

/// Load an OCR export (`.json` or `.tsv`) and linearize it.
pub fn linearize_file(path: impl AsRef<Path>, config: &LayoutConfig) -> Result<LinearText> {
    let document = load_document(path.as_ref())?;
    linearize_document(&document, config)
}

/// Linearize many files on the rayon pool.
///
/// Failures are reported per file; results are in input order.
pub fn linearize_files_batch(paths: &[impl AsRef<Path> + Sync], config: &LayoutConfig) -> Vec<BatchItemResult> {
    // Pages of each file are laid out sequentially, files are the unit of parallelism.
    let file_config = LayoutConfig {
        parallel: false,
        ..config.clone()
    };

    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let file_path = path.to_string_lossy().to_string();
            match linearize_file(path, &file_config) {
                Ok(result) => BatchItemResult {
                    file_path,
                    success: true,
                    result: Some(result),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Failed to linearize {}: {}", file_path, e);
                    BatchItemResult {
                        file_path,
                        success: false,
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}
