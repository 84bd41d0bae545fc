//! Column boundary detection from the horizontal spread of token centres.
//!
//! A column gutter shows up as an unusually wide gap between consecutive
//! sorted `centerX` values. [`ColumnDetection::LargestGap`] splits once, at the
//! widest such gap; [`ColumnDetection::AllGaps`] splits at every gap wider
//! than the threshold.

use crate::core::config::ColumnDetection;
use crate::types::{ColumnBand, Token};

/// Decide the column bands of a page.
///
/// Always returns at least one band, and the bands partition `[0, 1]`.
pub fn detect_columns(tokens: &[Token], detection: ColumnDetection, threshold: f64) -> Vec<ColumnBand> {
    let mut centers: Vec<f64> = tokens.iter().map(Token::center_x).collect();
    centers.sort_by(f64::total_cmp);

    let boundaries: Vec<f64> = match detection {
        ColumnDetection::LargestGap => largest_gap_boundary(&centers, threshold).into_iter().collect(),
        ColumnDetection::AllGaps => all_gap_boundaries(&centers, threshold),
    };

    bands_from_boundaries(&boundaries)
}

/// Midpoint of the first widest gap, if that gap exceeds `threshold`.
fn largest_gap_boundary(sorted_centers: &[f64], threshold: f64) -> Option<f64> {
    if sorted_centers.len() < 2 {
        return None;
    }

    let mut max_gap = 0.0;
    let mut boundary = None;
    for pair in sorted_centers.windows(2) {
        let gap = pair[1] - pair[0];
        if gap > max_gap {
            max_gap = gap;
            boundary = Some((pair[0] + pair[1]) / 2.0);
        }
    }

    tracing::debug!("Largest centre gap is {:.3} at {:?}", max_gap, boundary);

    if max_gap > threshold { boundary } else { None }
}

fn all_gap_boundaries(sorted_centers: &[f64], threshold: f64) -> Vec<f64> {
    let boundaries: Vec<f64> = sorted_centers
        .windows(2)
        .filter(|pair| pair[1] - pair[0] > threshold)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect();

    tracing::debug!("Found {} centre gaps wider than {:.3}", boundaries.len(), threshold);
    boundaries
}

/// Turn interior split points into bands covering `[0, 1]`.
///
/// Boundaries outside `(0, 1)` and duplicates are ignored.
pub(crate) fn bands_from_boundaries(boundaries: &[f64]) -> Vec<ColumnBand> {
    let mut cuts: Vec<f64> = boundaries
        .iter()
        .copied()
        .filter(|b| b.is_finite() && *b > 0.0 && *b < 1.0)
        .collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    let mut edges = Vec::with_capacity(cuts.len() + 2);
    edges.push(0.0);
    edges.extend(cuts);
    edges.push(1.0);

    edges
        .windows(2)
        .enumerate()
        .map(|(index, edge)| ColumnBand {
            index,
            start: edge[0],
            end: edge[1],
        })
        .collect()
}

/// Index of the band containing `x`, falling back to the last band.
pub(crate) fn band_index_for(x: f64, bands: &[ColumnBand]) -> usize {
    bands
        .iter()
        .position(|band| band.contains(x))
        .unwrap_or_else(|| bands.len().saturating_sub(1))
}

/// Bucket tokens by the band containing their `centerX`.
///
/// The result has one entry per band, in band order; each token keeps its
/// relative emission order inside its bucket.
pub fn assign_to_columns(tokens: Vec<Token>, bands: &[ColumnBand]) -> Vec<Vec<Token>> {
    let mut columns: Vec<Vec<Token>> = vec![Vec::new(); bands.len().max(1)];
    for token in tokens {
        let index = band_index_for(token.center_x(), bands);
        columns[index].push(token);
    }
    columns
}
