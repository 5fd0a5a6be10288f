//! Region sample windows flanking a crossing interval.
//!
//! Training and validation samples for region classification are drawn
//! from the windows immediately before and after a crossing interval.
//! Which plasma region each window sees depends on the boundary and the
//! direction of travel: an inbound bow-shock crossing has solar wind
//! ahead of it and magnetosheath behind, and so on.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mbs_common::{
    BoundaryKind, CrossingDirection, CrossingInterval, Error, PlasmaRegion, Result,
};

/// A labeled time window adjacent to a crossing interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub region: PlasmaRegion,
}

impl RegionWindow {
    /// Whether a timestamp falls inside the window (inclusive bounds).
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time <= self.end
    }
}

fn regions_outside_inside(boundary: BoundaryKind) -> (PlasmaRegion, PlasmaRegion) {
    match boundary {
        BoundaryKind::BowShock => (PlasmaRegion::SolarWind, PlasmaRegion::Magnetosheath),
        BoundaryKind::Magnetopause => {
            (PlasmaRegion::Magnetosheath, PlasmaRegion::Magnetosphere)
        }
    }
}

/// The two sample windows flanking a crossing interval: [leading,
/// trailing], each `window_seconds` long and touching the interval.
///
/// Inbound crossings lead with the outer region (e.g. solar wind before
/// an inbound bow-shock crossing) and trail with the inner; outbound
/// crossings are mirrored.
pub fn flanking_windows(
    interval: &CrossingInterval,
    window_seconds: f64,
) -> Result<[RegionWindow; 2]> {
    if !window_seconds.is_finite() || window_seconds <= 0.0 {
        return Err(Error::Validation(format!(
            "window length must be positive and finite, got {window_seconds}"
        )));
    }
    if interval.end < interval.start {
        return Err(Error::Validation(
            "crossing interval ends before it starts".to_string(),
        ));
    }

    let window = Duration::milliseconds((window_seconds * 1_000.0).round() as i64);
    let (outside, inside) = regions_outside_inside(interval.boundary);
    let (leading_region, trailing_region) = match interval.direction {
        CrossingDirection::Inbound => (outside, inside),
        CrossingDirection::Outbound => (inside, outside),
    };

    Ok([
        RegionWindow {
            start: interval.start - window,
            end: interval.start,
            region: leading_region,
        },
        RegionWindow {
            start: interval.end,
            end: interval.end + window,
            region: trailing_region,
        },
    ])
}
