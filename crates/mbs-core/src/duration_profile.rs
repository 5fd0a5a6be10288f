//! Crossing-interval durations as a function of heliocentric distance.
//!
//! Interval lists from some sources contain negative-duration entries
//! (artifacts of list construction); those are dropped. Remaining
//! durations are grouped by the heliocentric distance of the interval
//! midpoint and summarized per bin with box-plot statistics.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mbs_common::{CrossingInterval, Error, Result};
use mbs_math::five_number_summary;
use mbs_math::stats::histogram::{bin_centres, bin_index, validate_edges, HistogramError};

/// Duration statistics for one heliocentric-distance bin.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DurationBinSummary {
    /// Bin-centre distance, AU.
    pub centre_au: f64,
    /// Intervals whose midpoint distance fell in this bin.
    pub count: usize,
    /// Minimum duration, seconds. None for an empty bin.
    pub min_seconds: Option<f64>,
    /// Lower quartile, seconds.
    pub q1_seconds: Option<f64>,
    /// Median duration, seconds.
    pub median_seconds: Option<f64>,
    /// Upper quartile, seconds.
    pub q3_seconds: Option<f64>,
    /// Maximum duration, seconds.
    pub max_seconds: Option<f64>,
}

/// Group interval durations by heliocentric distance and summarize each
/// bin.
///
/// `distance_au` maps the interval midpoint to heliocentric distance.
/// Intervals with non-positive durations are dropped before grouping;
/// midpoints falling outside the edges are skipped.
pub fn duration_profile<F>(
    intervals: &[CrossingInterval],
    distance_au: F,
    distance_edges_au: &[f64],
) -> Result<Vec<DurationBinSummary>>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    validate_edges(distance_edges_au, "heliocentric distance").map_err(|err| match err {
        HistogramError::InvalidEdges { axis } => Error::InvalidBinEdges { axis },
        other => Error::Validation(other.to_string()),
    })?;

    let n_bins = distance_edges_au.len() - 1;
    let mut grouped: Vec<Vec<f64>> = vec![Vec::new(); n_bins];
    for interval in intervals {
        let duration = interval.duration_seconds();
        if duration <= 0.0 {
            continue;
        }
        let distance = distance_au(interval.midpoint());
        if let Some(bin) = bin_index(distance_edges_au, distance) {
            grouped[bin].push(duration);
        }
    }

    let centres = bin_centres(distance_edges_au);
    Ok(grouped
        .into_iter()
        .zip(centres)
        .map(|(durations, centre_au)| {
            let summary = five_number_summary(&durations);
            DurationBinSummary {
                centre_au,
                count: durations.len(),
                min_seconds: summary.map(|s| s.min),
                q1_seconds: summary.map(|s| s.q1),
                median_seconds: summary.map(|s| s.median),
                q3_seconds: summary.map(|s| s.q3),
                max_seconds: summary.map(|s| s.max),
            }
        })
        .collect())
}
