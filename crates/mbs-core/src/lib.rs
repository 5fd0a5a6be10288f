//! Boundary Survey Core Library
//!
//! Statistical core for magnetospheric boundary-crossing analysis:
//! - Nearest-time alignment of crossing events onto the trajectory
//! - Residence-normalized spatial density maps and their comparison
//! - Duration-confidence saturation fits with knee detection
//! - Heliocentric-distance rate correlations and duration profiles
//!
//! Everything here is a pure, synchronous function over already-loaded
//! inputs. Telemetry parsing, ephemeris computation, and rendering live
//! in collaborating crates; this one only produces plain serializable
//! results.

pub mod align;
pub mod compare;
pub mod density;
pub mod duration_model;
pub mod duration_profile;
pub mod heliocentric;
pub mod pipeline;
pub mod windows;

pub use align::{align_events, nearest_sample_index, AlignedEvent};
pub use compare::difference;
pub use density::{build_density_map, occurrence_rate_map, DensityMap};
pub use duration_model::{fit_duration_confidence, DurationConfidenceFit, KneePoint};
pub use duration_profile::{duration_profile, DurationBinSummary};
pub use heliocentric::{correlate_rate_with_distance, rate_profile, CorrelationResult, DistanceRateProfile};
pub use pipeline::{
    density_maps_by_boundary, duration_fits_by_boundary, rate_correlations_by_boundary,
    BoundaryCorrelation, BoundaryDensity, BoundaryDurationFit,
};
pub use windows::{flanking_windows, RegionWindow};
