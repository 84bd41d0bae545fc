use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::BoundingBox;
use crate::{ReadflowError, Result};

/// Polygon or corner pair in normalized page coordinates.
///
/// Two points are read as the top-left and bottom-right corners. Three or more
/// points (rotated-page exports) are reduced to their axis-aligned bounding box.
///
/// Deserialization never fails: a `null` geometry, a non-array, or a point with
/// a non-numeric coordinate yields a geometry whose [`Geometry::bounding_box`]
/// is `None`, so only the owning word is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Geometry(pub Vec<Vec<f64>>);

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let Value::Array(points) = Value::deserialize(deserializer)? else {
            return Ok(Self::default());
        };

        // An unreadable point becomes empty, which fails the `[x, y]` check later.
        let points = points
            .iter()
            .map(|point| match point {
                Value::Array(coords) => coords
                    .iter()
                    .map(Value::as_f64)
                    .collect::<Option<Vec<f64>>>()
                    .unwrap_or_default(),
                _ => Vec::new(),
            })
            .collect();
        Ok(Self(points))
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

impl Geometry {
    pub fn from_corners(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self(vec![vec![left, top], vec![right, bottom]])
    }

    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::from_corners(bbox.left, bbox.top, bbox.right, bbox.bottom)
    }

    /// Returns `None` for a missing corner, a point that is not an `[x, y]`
    /// pair, or a box that fails [`BoundingBox::is_valid`].
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let points = &self.0;
        if points.len() < 2 || points.iter().any(|p| p.len() != 2) {
            return None;
        }

        if points.len() == 2 {
            return BoundingBox::new(points[0][0], points[0][1], points[1][0], points[1][1]).ok();
        }

        let (mut left, mut top) = (f64::INFINITY, f64::INFINITY);
        let (mut right, mut bottom) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for point in points {
            left = left.min(point[0]);
            top = top.min(point[1]);
            right = right.max(point[0]);
            bottom = bottom.max(point[1]);
        }
        BoundingBox::new(left, top, right, bottom).ok()
    }
}

/// A recognized word as reported by the OCR engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default)]
    pub geometry: Geometry,
    /// Recognition confidence in `[0, 1]`, when the engine reports one.
    #[serde(default, deserialize_with = "lenient_confidence", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_default")]
    pub words: Vec<OcrWord>,
}

impl OcrLine {
    /// Non-blank word values joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|word| word.value.trim())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrBlock {
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lines: Vec<OcrLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_idx: Option<usize>,
    /// Source image size as `(height, width)` in pixels, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocks: Vec<OcrBlock>,
}

impl OcrPage {
    pub fn word_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|block| &block.lines)
            .map(|line| line.words.len())
            .sum()
    }
}

/// Page hierarchy exported by the OCR engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<OcrPage>,
}

impl OcrDocument {
    pub fn new(pages: Vec<OcrPage>) -> Self {
        Self { pages }
    }

    /// Parse a JSON export (`{"pages": [{"blocks": [{"lines": [{"words": [...]}]}]}]}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ReadflowError::parsing_with_source(format!("Invalid OCR export: {}", e), e))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
