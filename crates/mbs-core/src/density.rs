//! Residence-normalized spatial density maps.
//!
//! Raw crossing counts over space mostly trace where the spacecraft
//! spent its time. Dividing each bin's event count by the trajectory's
//! residence count turns the map into an occurrence rate independent of
//! uneven coverage; bins the spacecraft never visited are NaN, not zero.
//! The grid axes are the along-track coordinate and the cylindrical
//! distance sqrt(y^2 + z^2) from the symmetry axis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mbs_common::{Error, Result, Trajectory};
use mbs_math::stats::histogram::{histogram2d, validate_edges, HistogramError};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A 2D map of values (or NaN) over explicit bin edges.
///
/// Values are row-major with shape `(x bins) x (y bins)`. After
/// [`build_density_map`] the finite cells sum to 1, making maps from
/// datasets with different total counts directly comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DensityMap {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub values: Vec<f64>,
}

impl DensityMap {
    /// Number of bins along x.
    pub fn nx(&self) -> usize {
        self.x_edges.len() - 1
    }

    /// Number of bins along y.
    pub fn ny(&self) -> usize {
        self.y_edges.len() - 1
    }

    /// Value at (x bin, y bin).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.ny() + j]
    }

    /// Sum over finite cells.
    pub fn finite_sum(&self) -> f64 {
        self.values.iter().filter(|v| v.is_finite()).sum()
    }

    /// Count of finite cells.
    pub fn finite_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Minimum and maximum over finite cells, for callers deciding a
    /// display scale. None when every cell is NaN.
    pub fn finite_min_max(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;
        for &v in &self.values {
            if v.is_finite() {
                seen = true;
                min = min.min(v);
                max = max.max(v);
            }
        }
        seen.then_some((min, max))
    }

    /// Largest finite |value|; the natural symmetric limit for
    /// rendering a difference map. None when every cell is NaN.
    pub fn max_abs_finite(&self) -> Option<f64> {
        self.finite_min_max().map(|(lo, hi)| lo.abs().max(hi.abs()))
    }
}

fn edge_error(err: HistogramError) -> Error {
    match err {
        HistogramError::InvalidEdges { axis } => Error::InvalidBinEdges { axis },
        HistogramError::LengthMismatch { x, y } => {
            Error::Validation(format!("coordinate arrays differ in length: {x} vs {y}"))
        }
    }
}

/// Occurrence-rate map in events per hour.
///
/// Bins every trajectory sample and every matched event position into
/// the grid, then divides event counts by residence counts where the
/// spacecraft actually spent time (NaN elsewhere) and scales by
/// `3600 / cadence_seconds` to express events per hour of residence.
pub fn occurrence_rate_map(
    trajectory: &Trajectory,
    event_positions: &[[f64; 3]],
    x_edges: &[f64],
    y_edges: &[f64],
    cadence_seconds: f64,
) -> Result<DensityMap> {
    validate_edges(x_edges, "x").map_err(edge_error)?;
    validate_edges(y_edges, "cylindrical radius").map_err(edge_error)?;
    if !cadence_seconds.is_finite() || cadence_seconds <= 0.0 {
        return Err(Error::Validation(format!(
            "cadence must be positive and finite, got {cadence_seconds}"
        )));
    }

    let traj_x: Vec<f64> = trajectory.samples().iter().map(|s| s.x).collect();
    let traj_cyl: Vec<f64> = trajectory
        .samples()
        .iter()
        .map(|s| s.cylindrical_radius())
        .collect();
    let residence = histogram2d(&traj_x, &traj_cyl, x_edges, y_edges).map_err(edge_error)?;

    let event_x: Vec<f64> = event_positions.iter().map(|p| p[0]).collect();
    let event_cyl: Vec<f64> = event_positions.iter().map(|p| p[1].hypot(p[2])).collect();
    let events = histogram2d(&event_x, &event_cyl, x_edges, y_edges).map_err(edge_error)?;

    let per_hour = SECONDS_PER_HOUR / cadence_seconds;
    let values: Vec<f64> = events
        .iter()
        .zip(&residence)
        .map(|(&e, &r)| if r != 0.0 { e / r * per_hour } else { f64::NAN })
        .collect();

    debug!(
        bins = values.len(),
        covered = values.iter().filter(|v| v.is_finite()).count(),
        "built occurrence rate map"
    );

    Ok(DensityMap {
        x_edges: x_edges.to_vec(),
        y_edges: y_edges.to_vec(),
        values,
    })
}

/// Residence-normalized density map whose finite cells sum to 1.
///
/// With no events in range every covered cell stays 0.0 (uncovered
/// cells NaN) and the normalization step is skipped; the map remains
/// well-defined rather than collapsing to all-NaN.
pub fn build_density_map(
    trajectory: &Trajectory,
    event_positions: &[[f64; 3]],
    x_edges: &[f64],
    y_edges: &[f64],
    cadence_seconds: f64,
) -> Result<DensityMap> {
    let mut map = occurrence_rate_map(
        trajectory,
        event_positions,
        x_edges,
        y_edges,
        cadence_seconds,
    )?;
    let total = map.finite_sum();
    if total > 0.0 {
        for v in &mut map.values {
            *v /= total;
        }
    }
    Ok(map)
}
