//! Boundary survey configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the survey configuration file
//! - JSON and TOML loading
//! - Semantic validation (edge ordering, positive cadence, sane bounds)
//!
//! Nothing here is silently assumed by the analysis core: `mbs-core`
//! functions take edges and cadence as explicit parameters, and this
//! crate is only the typed carrier callers load them from.

pub mod survey;
pub mod validate;

pub use survey::{
    uniform_edges, AlignmentConfig, DurationModelConfig, GridConfig, HeliocentricConfig,
    SurveyConfig, WindowConfig,
};
pub use validate::{validate_survey, ConfigError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
