//! Typed survey configuration.
//!
//! Defaults reproduce the published survey setup: 0.5-radii spatial bins
//! over x in [-5, 5] and cylindrical radius in [0, 10], 0.01 AU
//! heliocentric bins over [0.30, 0.47], and 1 s averaged trajectory
//! cadence. Callers with other missions supply their own edges.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::{ConfigError, ValidationResult};

/// Build inclusive uniform bin edges from `start` to `stop` in steps of
/// `step`, the way the survey grids are written down in the literature.
pub fn uniform_edges(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop < start {
        return Vec::new();
    }
    let n = ((stop - start) / step).round() as usize;
    (0..=n).map(|i| start + i as f64 * step).collect()
}

/// Spatial grid and trajectory cadence for density maps.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GridConfig {
    /// Along-track bin edges, planet radii.
    pub x_edges: Vec<f64>,
    /// Cylindrical-radius bin edges, planet radii.
    pub cyl_edges: Vec<f64>,
    /// Trajectory sampling cadence, seconds per sample.
    pub cadence_seconds: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_edges: uniform_edges(-5.0, 5.0, 0.5),
            cyl_edges: uniform_edges(0.0, 10.0, 0.5),
            cadence_seconds: 1.0,
        }
    }
}

/// Heliocentric-distance binning for rate correlations and duration
/// profiles.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HeliocentricConfig {
    /// Bin edges in astronomical units.
    pub distance_edges_au: Vec<f64>,
}

impl Default for HeliocentricConfig {
    fn default() -> Self {
        Self {
            distance_edges_au: uniform_edges(0.30, 0.47, 0.01),
        }
    }
}

/// Duration-confidence model settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DurationModelConfig {
    /// Outlier screen threshold in robust sigma units.
    pub outlier_sigma: f64,
    /// Initial (a, b, c) guess for the saturating-exponential fit.
    pub initial_guess: [f64; 3],
    /// Maximum optimizer iterations.
    pub max_iterations: usize,
    /// Optimizer convergence tolerance.
    pub tolerance: f64,
}

impl Default for DurationModelConfig {
    fn default() -> Self {
        Self {
            outlier_sigma: 3.0,
            initial_guess: [1.0, 1.0, 1.0],
            max_iterations: 200,
            tolerance: 1e-10,
        }
    }
}

/// Event-to-trajectory alignment settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AlignmentConfig {
    /// Largest allowed event-to-sample gap, seconds. None imposes no
    /// bound: an event far outside the trajectory still matches the
    /// nearest boundary sample.
    #[serde(default)]
    pub max_gap_seconds: Option<f64>,
}

/// Region sample window settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WindowConfig {
    /// Length of each flanking sample window, seconds.
    pub window_seconds: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_seconds: 600.0,
        }
    }
}

/// Complete survey configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SurveyConfig {
    /// Schema version of the file; checked against
    /// [`crate::CONFIG_SCHEMA_VERSION`] at validation.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub heliocentric: HeliocentricConfig,
    #[serde(default)]
    pub duration_model: DurationModelConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub windows: WindowConfig,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            grid: GridConfig::default(),
            heliocentric: HeliocentricConfig::default(),
            duration_model: DurationModelConfig::default(),
            alignment: AlignmentConfig::default(),
            windows: WindowConfig::default(),
        }
    }
}

impl SurveyConfig {
    /// Load and validate from a JSON file.
    pub fn from_json_file(path: &Path) -> ValidationResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: SurveyConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        crate::validate::validate_survey(&config)?;
        Ok(config)
    }

    /// Load and validate from a TOML file.
    pub fn from_toml_file(path: &Path) -> ValidationResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: SurveyConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        crate::validate::validate_survey(&config)?;
        Ok(config)
    }
}
