//! Crossing rates as a function of heliocentric distance.
//!
//! Event and reference-interval timestamps are mapped to heliocentric
//! distance by a caller-supplied ephemeris closure, binned into
//! density-normalized histograms over shared distance edges, and the
//! per-bin ratio event/reference is correlated against bin-centre
//! distance. Bins where the reference density is zero or non-finite are
//! excluded before the correlation, never divided through.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mbs_common::{Error, Result};
use mbs_math::stats::histogram::{bin_centres, histogram1d_density, HistogramError};
use mbs_math::pearson;

/// Pearson correlation between crossing-rate ratio and distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrelationResult {
    /// Coefficient in [-1, 1].
    pub coefficient: f64,
    /// Two-sided p-value in [0, 1].
    pub p_value: f64,
    /// Usable distance bins after exclusion.
    pub n_bins: usize,
}

/// Per-bin densities and rate ratios over heliocentric distance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DistanceRateProfile {
    /// Bin-centre distances, AU.
    pub centres_au: Vec<f64>,
    /// Event density per bin: count / (N * bin width).
    pub event_density: Vec<f64>,
    /// Reference density per bin.
    pub reference_density: Vec<f64>,
    /// event_density / reference_density, NaN where the reference is
    /// zero or non-finite.
    pub ratio: Vec<f64>,
}

impl DistanceRateProfile {
    /// Correlate the rate ratio with distance over usable bins.
    ///
    /// Bins with a non-finite ratio are excluded before the correlation;
    /// fewer than 2 surviving bins is an error, not a NaN coefficient.
    pub fn correlation(&self) -> Result<CorrelationResult> {
        let mut xs = Vec::with_capacity(self.centres_au.len());
        let mut ys = Vec::with_capacity(self.centres_au.len());
        for (&centre, &ratio) in self.centres_au.iter().zip(&self.ratio) {
            if ratio.is_finite() {
                xs.push(centre);
                ys.push(ratio);
            }
        }

        if xs.len() < 2 {
            return Err(Error::InsufficientData {
                n: xs.len(),
                min: 2,
            });
        }

        let c = pearson(&xs, &ys)
            .map_err(|e| Error::Validation(e.to_string()))?;
        Ok(CorrelationResult {
            coefficient: c.coefficient,
            p_value: c.p_value,
            n_bins: c.n,
        })
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

/// Build the per-bin density and ratio profile for one event series
/// against a reference series.
///
/// `distance_au` maps a timestamp to heliocentric distance; it is the
/// ephemeris collaborator's job and is passed in as a closure.
pub fn rate_profile<F>(
    event_times: &[DateTime<Utc>],
    reference_times: &[DateTime<Utc>],
    distance_au: F,
    distance_edges_au: &[f64],
) -> Result<DistanceRateProfile>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    let event_distances: Vec<f64> = event_times.iter().map(|&t| distance_au(t)).collect();
    let reference_distances: Vec<f64> =
        reference_times.iter().map(|&t| distance_au(t)).collect();

    let event_density =
        histogram1d_density(&event_distances, distance_edges_au).map_err(edge_error)?;
    let reference_density =
        histogram1d_density(&reference_distances, distance_edges_au).map_err(edge_error)?;

    let ratio: Vec<f64> = event_density
        .iter()
        .zip(&reference_density)
        .map(|(&e, &r)| {
            if r.is_finite() && r > 0.0 {
                e / r
            } else {
                f64::NAN
            }
        })
        .collect();

    debug!(
        bins = ratio.len(),
        usable = ratio.iter().filter(|v| v.is_finite()).count(),
        "built heliocentric rate profile"
    );

    Ok(DistanceRateProfile {
        centres_au: bin_centres(distance_edges_au),
        event_density,
        reference_density,
        ratio,
    })
}

/// Profile one event series against the reference and correlate the
/// ratio with distance in a single call.
pub fn correlate_rate_with_distance<F>(
    event_times: &[DateTime<Utc>],
    reference_times: &[DateTime<Utc>],
    distance_au: F,
    distance_edges_au: &[f64],
) -> Result<CorrelationResult>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    rate_profile(event_times, reference_times, distance_au, distance_edges_au)?.correlation()
}
