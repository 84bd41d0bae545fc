use serde::{Deserialize, Serialize};

use crate::{ReadflowError, Result};

/// Separator placed between columns of one page and between pages of a document.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Axis-aligned rectangle in normalized page coordinates.
///
/// Every coordinate lies in `[0.0, 1.0]` relative to the page width (x) or
/// height (y), with `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    /// Build a box, rejecting non-finite, out-of-range or inverted coordinates.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        let bbox = Self {
            left,
            top,
            right,
            bottom,
        };
        if bbox.is_valid() {
            Ok(bbox)
        } else {
            Err(ReadflowError::validation(format!(
                "Malformed bounding box: left={} top={} right={} bottom={}",
                left, top, right, bottom
            )))
        }
    }

    pub fn is_valid(&self) -> bool {
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        in_range(self.left)
            && in_range(self.top)
            && in_range(self.right)
            && in_range(self.bottom)
            && self.left <= self.right
            && self.top <= self.bottom
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A recognized word positioned on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub bbox: BoundingBox,
}

impl Token {
    /// Returns `None` when the trimmed text is empty.
    pub fn new(text: &str, bbox: BoundingBox) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            bbox,
        })
    }

    pub fn center_x(&self) -> f64 {
        self.bbox.center_x()
    }

    pub fn center_y(&self) -> f64 {
        self.bbox.center_y()
    }
}

/// Half-open horizontal interval `[start, end)` of the page width.
///
/// Bands produced for one page partition `[0, 1]`; the rightmost band also
/// contains `x == 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnBand {
    /// Ordinal, 0 = leftmost.
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl ColumnBand {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && (x < self.end || (self.end >= 1.0 && x <= self.end))
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Tokens judged to sit on one visual line inside a column, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCluster {
    pub tokens: Vec<Token>,
    /// Running average of the member tokens' `top`.
    pub average_top: f64,
}

impl LineCluster {
    /// Token texts joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One column band together with its line clusters, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub band: ColumnBand,
    pub lines: Vec<LineCluster>,
}

impl ColumnLayout {
    /// Lines joined by single line breaks.
    pub fn text(&self) -> String {
        self.lines.iter().map(LineCluster::text).collect::<Vec<_>>().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Linear text for a single page plus layout diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    pub page_index: usize,
    pub content: String,
    /// Number of column bands (or block columns/rows, depending on strategy).
    pub column_count: usize,
    pub line_count: usize,
    pub token_count: usize,
    /// Words discarded for empty text, low confidence or malformed geometry.
    pub dropped_tokens: usize,
}

impl PageText {
    pub fn empty(page_index: usize) -> Self {
        Self {
            page_index,
            content: String::new(),
            column_count: 0,
            line_count: 0,
            token_count: 0,
            dropped_tokens: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Reading-order text for a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearText {
    /// Page strings joined by a blank line, in page order.
    pub content: String,
    pub pages: Vec<PageText>,
}

impl LinearText {
    /// Join page results in the order given.
    pub fn from_pages(pages: Vec<PageText>) -> Self {
        let content = pages
            .iter()
            .map(|page| page.content.as_str())
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);
        Self { content, pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Per-file outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub file_path: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<LinearText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
