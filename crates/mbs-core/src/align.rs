//! Nearest-time alignment of crossing events onto the trajectory.
//!
//! Crossing lists carry timestamps only; positions come from joining
//! each event to the trajectory sample closest in time. The join is a
//! binary search into the time-ordered trajectory, so aligning m events
//! against n samples costs O((n + m) log n) rather than a linear scan
//! per event. Equidistant candidates resolve to the earlier sample.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use mbs_common::{Error, Event, Result, Trajectory, TrajectorySample};

/// An event joined to its nearest trajectory sample.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AlignedEvent {
    /// The input event.
    pub event: Event,
    /// Index of the matched sample in the trajectory.
    pub sample_index: usize,
    /// The matched sample.
    pub sample: TrajectorySample,
    /// Magnitude of the time gap between event and sample, seconds.
    pub gap_seconds: f64,
}

impl AlignedEvent {
    /// Position of the matched sample as [x, y, z].
    pub fn position(&self) -> [f64; 3] {
        self.sample.position()
    }
}

/// Index of the trajectory sample nearest in time to `time`.
///
/// Events before the first or after the last sample match the boundary
/// sample; no gap bound is applied here.
pub fn nearest_sample_index(trajectory: &Trajectory, time: DateTime<Utc>) -> usize {
    let samples = trajectory.samples();
    let idx = samples.partition_point(|s| s.time <= time);
    if idx == 0 {
        return 0;
    }
    if idx == samples.len() {
        return samples.len() - 1;
    }
    let gap_before = time - samples[idx - 1].time;
    let gap_after = samples[idx].time - time;
    // Equidistant: keep the earlier sample.
    if gap_before <= gap_after {
        idx - 1
    } else {
        idx
    }
}

/// Align every event to its nearest trajectory sample.
///
/// Events may arrive unordered; they are sorted internally and results
/// are returned in the input order. When `max_gap_seconds` is given the
/// bound is checked after matching, and the worst offender is reported
/// in the error; with no bound, an event far outside the trajectory's
/// span still matches the nearest boundary sample.
pub fn align_events(
    trajectory: &Trajectory,
    events: &[Event],
    max_gap_seconds: Option<f64>,
) -> Result<Vec<AlignedEvent>> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&i| events[i].time);

    let mut aligned: Vec<Option<AlignedEvent>> = vec![None; events.len()];
    for &i in &order {
        let event = events[i];
        let sample_index = nearest_sample_index(trajectory, event.time);
        let sample = trajectory.samples()[sample_index];
        let gap_seconds =
            (event.time - sample.time).num_milliseconds().abs() as f64 / 1_000.0;
        aligned[i] = Some(AlignedEvent {
            event,
            sample_index,
            sample,
            gap_seconds,
        });
    }
    let aligned: Vec<AlignedEvent> = aligned.into_iter().flatten().collect();

    if let Some(bound) = max_gap_seconds {
        let worst = aligned
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.gap_seconds.total_cmp(&b.1.gap_seconds));
        if let Some((index, event)) = worst {
            if event.gap_seconds > bound {
                return Err(Error::AlignmentGapExceeded {
                    index,
                    gap_seconds: event.gap_seconds,
                    max_gap_seconds: bound,
                });
            }
        }
    }

    debug!(events = aligned.len(), "aligned events to trajectory");
    Ok(aligned)
}
