use indexmap::IndexMap;

use super::types::{Geometry, OcrBlock, OcrLine, OcrPage, OcrWord};
use crate::Result;
use crate::types::BoundingBox;

/// TSV parsing constants
pub const TSV_PAGE_LEVEL: u32 = 1;
pub const TSV_WORD_LEVEL: u32 = 5;
pub const TSV_STRUCTURE_FIELDS: usize = 11;
pub const TSV_MIN_FIELDS: usize = 12;

#[derive(Default)]
struct TsvPage {
    size: Option<(f64, f64)>,
    /// `(block_num, par_num)` -> `line_num` -> words, in first-appearance order.
    blocks: IndexMap<(u32, u32), IndexMap<u32, Vec<(OcrWord, BoundingBox)>>>,
}

/// Convert Tesseract TSV output into normalized OCR pages.
///
/// Level-1 rows carry the page size in pixels; level-5 rows are words whose
/// pixel boxes are normalized against that size. `min_confidence` uses
/// Tesseract's 0-100 scale, while the confidence stored on each word is
/// rescaled to `[0, 1]`.
pub fn extract_pages_from_tsv(tsv_data: &str, min_confidence: f64) -> Result<Vec<OcrPage>> {
    let mut pages: IndexMap<u32, TsvPage> = IndexMap::new();

    for (line_num, line) in tsv_data.lines().enumerate() {
        if line_num == 0 {
            continue;
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_STRUCTURE_FIELDS {
            continue;
        }

        let level = fields[0].trim().parse::<u32>().unwrap_or(0);
        let page_num = fields[1].trim().parse::<u32>().unwrap_or(1);

        if level == TSV_PAGE_LEVEL {
            let width = fields[8].trim().parse::<f64>().unwrap_or(0.0);
            let height = fields[9].trim().parse::<f64>().unwrap_or(0.0);
            if width > 0.0 && height > 0.0 {
                pages.entry(page_num).or_default().size = Some((width, height));
            }
            continue;
        }

        if level != TSV_WORD_LEVEL || fields.len() < TSV_MIN_FIELDS {
            continue;
        }

        let conf = fields[10].trim().parse::<f64>().unwrap_or(-1.0);
        if conf < min_confidence {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let page = pages.entry(page_num).or_default();
        let Some((page_width, page_height)) = page.size else {
            tracing::debug!("Skipping TSV word '{}' on page {} without a page size row", text, page_num);
            continue;
        };

        let parse_px = |idx: usize| fields[idx].trim().parse::<f64>().ok();
        let (Some(left), Some(top), Some(width), Some(height)) = (parse_px(6), parse_px(7), parse_px(8), parse_px(9))
        else {
            continue;
        };

        let Ok(bbox) = BoundingBox::new(
            left / page_width,
            top / page_height,
            (left + width) / page_width,
            (top + height) / page_height,
        ) else {
            tracing::debug!("Skipping TSV word '{}' with box outside the page", text);
            continue;
        };

        let block_num = fields[2].trim().parse::<u32>().unwrap_or(0);
        let par_num = fields[3].trim().parse::<u32>().unwrap_or(0);
        let line_no = fields[4].trim().parse::<u32>().unwrap_or(0);

        let word = OcrWord {
            value: text.to_string(),
            geometry: Geometry::from_bbox(&bbox),
            confidence: Some((conf / 100.0).clamp(0.0, 1.0)),
        };

        page.blocks
            .entry((block_num, par_num))
            .or_default()
            .entry(line_no)
            .or_default()
            .push((word, bbox));
    }

    pages.sort_keys();
    Ok(pages
        .into_iter()
        .map(|(page_num, page)| OcrPage {
            page_idx: Some(page_num.saturating_sub(1) as usize),
            dimensions: page.size.map(|(w, h)| (h as u32, w as u32)),
            blocks: page.blocks.into_values().map(build_block).collect(),
        })
        .collect())
}

fn build_block(lines: IndexMap<u32, Vec<(OcrWord, BoundingBox)>>) -> OcrBlock {
    let mut block_box: Option<BoundingBox> = None;
    let lines = lines
        .into_values()
        .map(|words| {
            let line_box = words.iter().map(|(_, bbox)| *bbox).reduce(|acc, b| acc.union(&b));
            if let Some(line_box) = line_box {
                block_box = Some(block_box.map_or(line_box, |acc| acc.union(&line_box)));
            }
            OcrLine {
                geometry: line_box.as_ref().map(Geometry::from_bbox).unwrap_or_default(),
                words: words.into_iter().map(|(word, _)| word).collect(),
            }
        })
        .collect();

    OcrBlock {
        geometry: block_box.as_ref().map(Geometry::from_bbox).unwrap_or_default(),
        lines,
    }
}
