//! Explicit-edge 1D and 2D histograms.
//!
//! Bin lookup is a binary search over the edge array; values on interior
//! edges belong to the right-hand bin and the final edge is inclusive,
//! so a sample exactly on the upper boundary is counted. Out-of-range
//! and non-finite samples are skipped, never errors.

use thiserror::Error;

/// Errors raised while building histograms.
#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("bin edges for {axis} must be finite, strictly increasing, and at least 2")]
    InvalidEdges { axis: String },
    #[error("coordinate arrays differ in length: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },
}

/// Validate a bin-edge array: at least 2 finite, strictly increasing edges.
pub fn validate_edges(edges: &[f64], axis: &str) -> Result<(), HistogramError> {
    if edges.len() < 2 {
        return Err(HistogramError::InvalidEdges { axis: axis.into() });
    }
    for pair in edges.windows(2) {
        if !pair[0].is_finite() || !pair[1].is_finite() || pair[1] <= pair[0] {
            return Err(HistogramError::InvalidEdges { axis: axis.into() });
        }
    }
    Ok(())
}

/// Bin index for a value, or None when out of range or non-finite.
///
/// Edges must be validated. The final edge is inclusive.
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }
    let last = edges.len() - 1;
    if value < edges[0] || value > edges[last] {
        return None;
    }
    if value == edges[last] {
        return Some(last - 1);
    }
    // partition_point returns the count of edges <= value.
    let idx = edges.partition_point(|e| *e <= value);
    Some(idx - 1)
}

/// Midpoints of each bin.
pub fn bin_centres(edges: &[f64]) -> Vec<f64> {
    edges
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

/// 1D histogram of counts over explicit edges.
pub fn histogram1d(values: &[f64], edges: &[f64]) -> Result<Vec<f64>, HistogramError> {
    validate_edges(edges, "histogram")?;
    let mut counts = vec![0.0; edges.len() - 1];
    for &v in values {
        if let Some(i) = bin_index(edges, v) {
            counts[i] += 1.0;
        }
    }
    Ok(counts)
}

/// Density-normalized 1D histogram: count / (N * bin width), where N is
/// the number of in-range samples, so the histogram integrates to 1.
///
/// All-zero counts stay zero rather than dividing by zero.
pub fn histogram1d_density(values: &[f64], edges: &[f64]) -> Result<Vec<f64>, HistogramError> {
    let counts = histogram1d(values, edges)?;
    let total: f64 = counts.iter().sum();
    if total == 0.0 {
        return Ok(counts);
    }
    Ok(counts
        .iter()
        .zip(edges.windows(2))
        .map(|(c, pair)| c / (total * (pair[1] - pair[0])))
        .collect())
}

/// 2D histogram of counts, row-major with shape (nx-1) * (ny-1).
///
/// A sample is counted only when both coordinates fall in range.
pub fn histogram2d(
    xs: &[f64],
    ys: &[f64],
    x_edges: &[f64],
    y_edges: &[f64],
) -> Result<Vec<f64>, HistogramError> {
    if xs.len() != ys.len() {
        return Err(HistogramError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }
    validate_edges(x_edges, "x")?;
    validate_edges(y_edges, "y")?;

    let ny = y_edges.len() - 1;
    let mut counts = vec![0.0; (x_edges.len() - 1) * ny];
    for (&x, &y) in xs.iter().zip(ys) {
        let (Some(i), Some(j)) = (bin_index(x_edges, x), bin_index(y_edges, y)) else {
            continue;
        };
        counts[i * ny + j] += 1.0;
    }
    Ok(counts)
}
