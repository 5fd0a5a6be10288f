//! Shared types for the boundary survey engine.
//!
//! This crate provides:
//! - Domain types: trajectory samples, crossing events and intervals
//! - Structured error handling with stable codes and categories
//! - Partial-result collection for batch analyses

pub mod error;
pub mod types;

pub use error::{
    BatchFailure, BatchOutcome, BatchSummary, Error, ErrorCategory, Result, StructuredError,
};
pub use types::{
    BoundaryKind, CrossingDirection, CrossingInterval, Event, PlasmaRegion, Trajectory,
    TrajectorySample,
};
