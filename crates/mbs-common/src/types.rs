//! Domain types for boundary-crossing analysis.
//!
//! All positions are expressed in planet radii in a fixed, dipole-centred,
//! aberrated frame supplied by the ephemeris collaborator. Timestamps are
//! UTC. None of these types is mutated after construction.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which magnetospheric boundary an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Outer boundary where the oncoming plasma flow is shocked.
    BowShock,
    /// Inner boundary enclosing the planet's intrinsic field region.
    Magnetopause,
}

impl BoundaryKind {
    /// Short label matching the conventions of published crossing lists.
    pub fn label(&self) -> &'static str {
        match self {
            BoundaryKind::BowShock => "BS",
            BoundaryKind::Magnetopause => "MP",
        }
    }
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of travel through a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CrossingDirection {
    /// Moving toward the planet (e.g. solar wind into magnetosheath).
    Inbound,
    /// Moving away from the planet.
    Outbound,
}

/// Plasma region labels used when sampling around a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlasmaRegion {
    SolarWind,
    Magnetosheath,
    Magnetosphere,
}

impl std::fmt::Display for PlasmaRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlasmaRegion::SolarWind => write!(f, "solar_wind"),
            PlasmaRegion::Magnetosheath => write!(f, "magnetosheath"),
            PlasmaRegion::Magnetosphere => write!(f, "magnetosphere"),
        }
    }
}

/// One sample of the spacecraft trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrajectorySample {
    /// Sample timestamp (UTC).
    pub time: DateTime<Utc>,
    /// Along-track coordinate, planet radii.
    pub x: f64,
    /// Planet radii.
    pub y: f64,
    /// Planet radii.
    pub z: f64,
}

impl TrajectorySample {
    /// Distance from the x symmetry axis: sqrt(y^2 + z^2).
    pub fn cylindrical_radius(&self) -> f64 {
        self.y.hypot(self.z)
    }

    /// Position as an [x, y, z] triple.
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// A time-ordered spacecraft trajectory.
///
/// Construction validates ordering once so every downstream binary search
/// can rely on it. Sampling cadence is carried by configuration, not by
/// the trajectory itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<TrajectorySample>", into = "Vec<TrajectorySample>")]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl TryFrom<Vec<TrajectorySample>> for Trajectory {
    type Error = Error;

    fn try_from(samples: Vec<TrajectorySample>) -> Result<Self> {
        Trajectory::new(samples)
    }
}

impl From<Trajectory> for Vec<TrajectorySample> {
    fn from(trajectory: Trajectory) -> Self {
        trajectory.samples
    }
}

impl Trajectory {
    /// Build a trajectory from samples, requiring non-empty input ordered
    /// ascending by timestamp.
    pub fn new(samples: Vec<TrajectorySample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::Validation("trajectory must not be empty".into()));
        }
        for pair in samples.windows(2) {
            if pair[1].time < pair[0].time {
                return Err(Error::Validation(format!(
                    "trajectory timestamps must be ascending ({} follows {})",
                    pair[1].time, pair[0].time
                )));
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time span covered by the trajectory, in seconds.
    pub fn span_seconds(&self) -> f64 {
        let first = self.samples[0].time;
        let last = self.samples[self.samples.len() - 1].time;
        (last - first).num_milliseconds() as f64 / 1_000.0
    }
}

/// A single boundary-crossing event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Event timestamp (UTC).
    pub time: DateTime<Utc>,
    /// Which boundary was crossed.
    pub boundary: BoundaryKind,
}

/// A boundary-crossing interval from a published interval list.
///
/// Some source lists contain intervals with `end < start`; such entries
/// are kept representable and filtered where an analysis requires
/// positive durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CrossingInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub boundary: BoundaryKind,
    pub direction: CrossingDirection,
}

impl CrossingInterval {
    /// Midpoint of the interval: start + (end - start) / 2.
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }

    /// Interval duration in seconds. Negative for malformed entries.
    pub fn duration_seconds(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1_000.0
    }

    /// Collapse the interval to a point event at its midpoint.
    pub fn as_event(&self) -> Event {
        Event {
            time: self.midpoint(),
            boundary: self.boundary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_357_000_000 + secs, 0).unwrap()
    }

    fn sample(secs: i64, x: f64, y: f64, z: f64) -> TrajectorySample {
        TrajectorySample {
            time: t(secs),
            x,
            y,
            z,
        }
    }

    #[test]
    fn cylindrical_radius_matches_hypot() {
        let s = sample(0, 1.0, 3.0, 4.0);
        assert!((s.cylindrical_radius() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn trajectory_rejects_empty() {
        assert!(Trajectory::new(Vec::new()).is_err());
    }

    #[test]
    fn trajectory_rejects_descending_times() {
        let samples = vec![sample(10, 0.0, 0.0, 0.0), sample(5, 0.0, 0.0, 0.0)];
        assert!(Trajectory::new(samples).is_err());
    }

    #[test]
    fn trajectory_span() {
        let samples = vec![
            sample(0, 0.0, 0.0, 0.0),
            sample(30, 0.0, 0.0, 0.0),
            sample(60, 0.0, 0.0, 0.0),
        ];
        let traj = Trajectory::new(samples).unwrap();
        assert!((traj.span_seconds() - 60.0).abs() < 1e-9);
        assert_eq!(traj.len(), 3);
    }

    #[test]
    fn interval_midpoint_and_duration() {
        let interval = CrossingInterval {
            start: t(0),
            end: t(120),
            boundary: BoundaryKind::BowShock,
            direction: CrossingDirection::Inbound,
        };
        assert_eq!(interval.midpoint(), t(60));
        assert!((interval.duration_seconds() - 120.0).abs() < 1e-9);
        assert_eq!(interval.as_event().time, t(60));
        assert_eq!(interval.as_event().boundary, BoundaryKind::BowShock);
    }

    #[test]
    fn malformed_interval_has_negative_duration() {
        let interval = CrossingInterval {
            start: t(100),
            end: t(40),
            boundary: BoundaryKind::Magnetopause,
            direction: CrossingDirection::Outbound,
        };
        assert!(interval.duration_seconds() < 0.0);
    }

    #[test]
    fn boundary_labels() {
        assert_eq!(BoundaryKind::BowShock.label(), "BS");
        assert_eq!(BoundaryKind::Magnetopause.to_string(), "MP");
    }

    #[test]
    fn serde_roundtrip_event() {
        let event = Event {
            time: t(42),
            boundary: BoundaryKind::Magnetopause,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("magnetopause"));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
