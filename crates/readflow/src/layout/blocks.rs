//! Block-level reading order.
//!
//! Instead of re-deriving lines from single words, these strategies keep the
//! OCR engine's own blocks and lines and only decide the order in which blocks
//! are read. [`order_block_rows`] reads blocks row by row; [`order_block_columns`]
//! splits the page at wide gaps between block edges and reads column by column.

use super::assemble::join_columns;
use super::columns::{band_index_for, bands_from_boundaries};
use super::tokens::word_is_usable;
use crate::ocr::{OcrBlock, OcrPage};
use crate::types::{BLOCK_SEPARATOR, BoundingBox, ColumnBand};

/// An OCR block reduced to its text and extent.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedBlock {
    /// Block lines joined by single line breaks.
    pub text: String,
    pub bbox: BoundingBox,
    pub line_count: usize,
    pub word_count: usize,
}

/// Usable blocks of a page, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockIndex {
    pub blocks: Vec<PositionedBlock>,
    /// Words that did not make it into any block's text.
    pub dropped: usize,
}

impl BlockIndex {
    pub fn from_page(page: &OcrPage, min_confidence: f64) -> Self {
        let mut index = BlockIndex::default();
        for block in &page.blocks {
            let total_words: usize = block.lines.iter().map(|line| line.words.len()).sum();
            match positioned_block(block, min_confidence) {
                Some(positioned) => {
                    index.dropped += total_words - positioned.word_count;
                    index.blocks.push(positioned);
                }
                None => index.dropped += total_words,
            }
        }
        index
    }

    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|block| block.line_count).sum()
    }

    pub fn word_count(&self) -> usize {
        self.blocks.iter().map(|block| block.word_count).sum()
    }
}

/// The block's own geometry, or else the union of its usable word boxes.
fn positioned_block(block: &OcrBlock, min_confidence: f64) -> Option<PositionedBlock> {
    let mut lines = Vec::new();
    let mut word_count = 0;
    let mut words_box: Option<BoundingBox> = None;

    for line in &block.lines {
        let words: Vec<_> = line
            .words
            .iter()
            .filter(|word| word_is_usable(word, min_confidence))
            .collect();
        if words.is_empty() {
            continue;
        }

        for word in &words {
            if let Some(bbox) = word.geometry.bounding_box() {
                words_box = Some(words_box.map_or(bbox, |acc| acc.union(&bbox)));
            }
        }
        word_count += words.len();
        lines.push(words.iter().map(|word| word.value.trim()).collect::<Vec<_>>().join(" "));
    }

    if lines.is_empty() {
        return None;
    }

    let Some(bbox) = block.geometry.bounding_box().or(words_box) else {
        tracing::debug!("Dropping block without usable geometry: {:?}", lines.first());
        return None;
    };

    Some(PositionedBlock {
        line_count: lines.len(),
        text: lines.join("\n"),
        bbox,
        word_count,
    })
}

/// Group blocks into rows by their `top` and order them for reading.
///
/// A block joins the first existing row whose first block's `top` is within
/// `row_tolerance`. Rows are ordered by that first `top`, blocks inside a row by
/// `left`.
pub fn order_block_rows(blocks: Vec<PositionedBlock>, row_tolerance: f64) -> Vec<Vec<PositionedBlock>> {
    let mut rows: Vec<Vec<PositionedBlock>> = Vec::new();

    for block in blocks {
        let row = rows
            .iter_mut()
            .find(|row| (block.bbox.top - row[0].bbox.top).abs() <= row_tolerance);
        match row {
            Some(row) => row.push(block),
            None => rows.push(vec![block]),
        }
    }

    rows.sort_by(|a, b| a[0].bbox.top.total_cmp(&b[0].bbox.top));
    for row in &mut rows {
        row.sort_by(|a, b| a.bbox.left.total_cmp(&b.bbox.left));
    }

    rows
}

/// Rows separated by a blank line, blocks within a row by a line break.
pub fn assemble_block_rows(rows: &[Vec<PositionedBlock>]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|block| block.text.as_str()).collect::<Vec<_>>().join("\n"))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
        .trim()
        .to_string()
}

/// Split the page into column bands at gaps between block edges.
///
/// Blocks are visited by `left`; wherever the next block starts more than
/// `threshold` to the right of where the previous one ends, a boundary is
/// placed midway between them.
pub fn detect_block_columns(blocks: &[PositionedBlock], threshold: f64) -> Vec<ColumnBand> {
    let mut sorted: Vec<&BoundingBox> = blocks.iter().map(|block| &block.bbox).collect();
    sorted.sort_by(|a, b| a.left.total_cmp(&b.left));

    let mut boundaries = Vec::new();
    for pair in sorted.windows(2) {
        let gap = pair[1].left - pair[0].right;
        if gap > threshold {
            let boundary = (pair[0].right + pair[1].left) / 2.0;
            tracing::debug!(
                "Block gap {:.3} between {:.3} and {:.3}, boundary at {:.3}",
                gap,
                pair[0].right,
                pair[1].left,
                boundary
            );
            boundaries.push(boundary);
        }
    }

    bands_from_boundaries(&boundaries)
}

/// Bucket blocks by the band containing their centre, each bucket ordered by `top`.
pub fn order_block_columns(blocks: Vec<PositionedBlock>, bands: &[ColumnBand]) -> Vec<Vec<PositionedBlock>> {
    let mut columns: Vec<Vec<PositionedBlock>> = vec![Vec::new(); bands.len().max(1)];
    for block in blocks {
        let index = band_index_for(block.bbox.center_x(), bands);
        columns[index].push(block);
    }
    for column in &mut columns {
        column.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));
    }
    columns
}

/// Columns separated by a blank line, optionally labelled.
pub fn assemble_block_columns(columns: &[Vec<PositionedBlock>], label_columns: bool) -> String {
    join_columns(
        columns
            .iter()
            .map(|column| column.iter().map(|block| block.text.as_str()).collect::<Vec<_>>().join("\n")),
        label_columns,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{Geometry, OcrLine, OcrWord};

    fn block(lines: &[&str], left: f64, top: f64, right: f64, bottom: f64) -> OcrBlock {
        OcrBlock {
            geometry: Geometry::from_corners(left, top, right, bottom),
            lines: lines
                .iter()
                .map(|text| OcrLine {
                    geometry: Geometry::default(),
                    words: text
                        .split_whitespace()
                        .map(|w| OcrWord {
                            value: w.to_string(),
                            geometry: Geometry::default(),
                            confidence: None,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn positioned(text: &str, left: f64, top: f64, right: f64, bottom: f64) -> PositionedBlock {
        PositionedBlock {
            text: text.to_string(),
            bbox: BoundingBox::new(left, top, right, bottom).unwrap(),
            line_count: 1,
            word_count: 1,
        }
    }

    #[test]
    fn test_block_index_uses_block_geometry_and_lines() {
        let page = OcrPage {
            blocks: vec![block(&["Jane Doe", "Engineer"], 0.1, 0.1, 0.4, 0.2)],
            ..Default::default()
        };
        let index = BlockIndex::from_page(&page, 0.0);
        assert_eq!(index.blocks.len(), 1);
        assert_eq!(index.blocks[0].text, "Jane Doe\nEngineer");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.word_count(), 3);
        assert_eq!(index.dropped, 0);
    }

    #[test]
    fn test_block_geometry_falls_back_to_word_union() {
        let page = OcrPage {
            blocks: vec![OcrBlock {
                geometry: Geometry::default(),
                lines: vec![OcrLine {
                    geometry: Geometry::default(),
                    words: vec![
                        OcrWord {
                            value: "left".to_string(),
                            geometry: Geometry::from_corners(0.1, 0.2, 0.2, 0.22),
                            confidence: None,
                        },
                        OcrWord {
                            value: "right".to_string(),
                            geometry: Geometry::from_corners(0.3, 0.21, 0.4, 0.23),
                            confidence: None,
                        },
                    ],
                }],
            }],
            ..Default::default()
        };
        let index = BlockIndex::from_page(&page, 0.0);
        let bbox = index.blocks[0].bbox;
        assert_eq!((bbox.left, bbox.top, bbox.right, bbox.bottom), (0.1, 0.2, 0.4, 0.23));
    }

    #[test]
    fn test_block_without_any_geometry_dropped() {
        let mut orphan = block(&["floating words"], 0.1, 0.1, 0.2, 0.2);
        orphan.geometry = Geometry::default();
        let page = OcrPage {
            blocks: vec![orphan],
            ..Default::default()
        };
        let index = BlockIndex::from_page(&page, 0.0);
        assert!(index.blocks.is_empty());
        assert_eq!(index.dropped, 2);
    }

    #[test]
    fn test_block_rows_read_left_to_right_then_down() {
        let blocks = vec![
            positioned("Right header", 0.6, 0.11, 0.9, 0.15),
            positioned("Footer", 0.1, 0.8, 0.9, 0.85),
            positioned("Left header", 0.1, 0.10, 0.4, 0.15),
        ];
        let rows = order_block_rows(blocks, 0.05);
        assert_eq!(rows.len(), 2);
        assert_eq!(assemble_block_rows(&rows), "Left header\nRight header\n\nFooter");
    }

    #[test]
    fn test_block_columns_split_at_wide_gap() {
        let blocks = vec![
            positioned("Experience", 0.55, 0.1, 0.9, 0.2),
            positioned("Contact", 0.05, 0.3, 0.3, 0.4),
            positioned("Name", 0.05, 0.1, 0.3, 0.2),
            positioned("Education", 0.55, 0.3, 0.9, 0.4),
        ];
        let bands = detect_block_columns(&blocks, 0.05);
        assert_eq!(bands.len(), 2);
        assert!((bands[0].end - 0.425).abs() < 1e-9);

        let columns = order_block_columns(blocks, &bands);
        assert_eq!(
            assemble_block_columns(&columns, false),
            "Name\nContact\n\nExperience\nEducation"
        );
        assert_eq!(
            assemble_block_columns(&columns, true),
            "=== COLUMN 1 ===\nName\nContact\n\n=== COLUMN 2 ===\nExperience\nEducation"
        );
    }

    #[test]
    fn test_overlapping_blocks_single_column() {
        let blocks = vec![
            positioned("Wide", 0.1, 0.1, 0.9, 0.2),
            positioned("Narrow", 0.2, 0.3, 0.5, 0.4),
        ];
        let bands = detect_block_columns(&blocks, 0.05);
        assert_eq!(bands.len(), 1);
        let columns = order_block_columns(blocks, &bands);
        assert_eq!(assemble_block_columns(&columns, true), "Wide\nNarrow");
    }
}
