//! Batch drivers over both boundary types.
//!
//! A survey run builds the same products for bow-shock and magnetopause
//! crossings. One boundary failing (say, too few usable bins for the
//! magnetopause ratio) must not cost the caller the other boundary's
//! result, so these drivers collect partial results with per-item error
//! status instead of failing whole.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mbs_common::{BatchOutcome, BoundaryKind, Event, Trajectory};
use mbs_config::DurationModelConfig;

use crate::align::AlignedEvent;
use crate::density::{build_density_map, DensityMap};
use crate::duration_model::{fit_duration_confidence, DurationConfidenceFit};
use crate::heliocentric::{correlate_rate_with_distance, CorrelationResult};

const BOUNDARIES: [BoundaryKind; 2] = [BoundaryKind::BowShock, BoundaryKind::Magnetopause];

/// A density map labeled with its boundary type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BoundaryDensity {
    pub boundary: BoundaryKind,
    pub map: DensityMap,
}

/// A rate correlation labeled with its boundary type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct BoundaryCorrelation {
    pub boundary: BoundaryKind,
    pub correlation: CorrelationResult,
}

/// A duration-confidence fit labeled with its boundary type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct BoundaryDurationFit {
    pub boundary: BoundaryKind,
    pub fit: DurationConfidenceFit,
}

/// Residence-normalized density maps per boundary type.
///
/// Every aligned event contributes to the map of its own boundary; a
/// boundary with no events still yields its all-zero covered map.
pub fn density_maps_by_boundary(
    trajectory: &Trajectory,
    aligned: &[AlignedEvent],
    x_edges: &[f64],
    y_edges: &[f64],
    cadence_seconds: f64,
) -> BatchOutcome<BoundaryDensity> {
    let mut outcome = BatchOutcome::new();
    for boundary in BOUNDARIES {
        let positions: Vec<[f64; 3]> = aligned
            .iter()
            .filter(|a| a.event.boundary == boundary)
            .map(|a| a.position())
            .collect();
        debug!(%boundary, events = positions.len(), "building boundary density map");
        let result = build_density_map(trajectory, &positions, x_edges, y_edges, cadence_seconds)
            .map(|map| BoundaryDensity { boundary, map });
        outcome.record(boundary.label(), result);
    }
    outcome
}

/// Heliocentric rate correlations per boundary type against a shared
/// reference series.
pub fn rate_correlations_by_boundary<F>(
    events: &[Event],
    reference_times: &[DateTime<Utc>],
    distance_au: F,
    distance_edges_au: &[f64],
) -> BatchOutcome<BoundaryCorrelation>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    let mut outcome = BatchOutcome::new();
    for boundary in BOUNDARIES {
        let times: Vec<DateTime<Utc>> = events
            .iter()
            .filter(|e| e.boundary == boundary)
            .map(|e| e.time)
            .collect();
        let result = correlate_rate_with_distance(
            &times,
            reference_times,
            &distance_au,
            distance_edges_au,
        )
        .map(|correlation| BoundaryCorrelation {
            boundary,
            correlation,
        });
        outcome.record(boundary.label(), result);
    }
    outcome
}

/// Duration-confidence fits per boundary type.
///
/// Observations are (boundary, duration seconds, confidence) triples.
/// A boundary whose dataset is too small or whose fit does not converge
/// is recorded as a failure while the other boundary's fit is returned.
pub fn duration_fits_by_boundary(
    observations: &[(BoundaryKind, f64, f64)],
    config: &DurationModelConfig,
) -> BatchOutcome<BoundaryDurationFit> {
    let mut outcome = BatchOutcome::new();
    for boundary in BOUNDARIES {
        let durations: Vec<f64> = observations
            .iter()
            .filter(|(b, _, _)| *b == boundary)
            .map(|(_, d, _)| *d)
            .collect();
        let confidences: Vec<f64> = observations
            .iter()
            .filter(|(b, _, _)| *b == boundary)
            .map(|(_, _, c)| *c)
            .collect();
        let result = fit_duration_confidence(&durations, &confidences, config)
            .map(|fit| BoundaryDurationFit { boundary, fit });
        outcome.record(boundary.label(), result);
    }
    outcome
}
