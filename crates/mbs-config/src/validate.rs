//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::survey::SurveyConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ConfigError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ConfigError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::IoError(_) => 60,
            ConfigError::ParseError(_) => 61,
            ConfigError::SemanticError(_) => 63,
            ConfigError::InvalidValue { .. } => 65,
            ConfigError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a survey configuration semantically.
pub fn validate_survey(config: &SurveyConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ConfigError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_edge_array("grid.x_edges", &config.grid.x_edges)?;
    validate_edge_array("grid.cyl_edges", &config.grid.cyl_edges)?;
    validate_edge_array(
        "heliocentric.distance_edges_au",
        &config.heliocentric.distance_edges_au,
    )?;

    validate_positive("grid.cadence_seconds", config.grid.cadence_seconds)?;
    validate_positive(
        "duration_model.outlier_sigma",
        config.duration_model.outlier_sigma,
    )?;
    validate_positive("duration_model.tolerance", config.duration_model.tolerance)?;
    validate_positive("windows.window_seconds", config.windows.window_seconds)?;

    if config.duration_model.max_iterations == 0 {
        return Err(ConfigError::InvalidValue {
            field: "duration_model.max_iterations".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    for (i, p) in config.duration_model.initial_guess.iter().enumerate() {
        if !p.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: format!("duration_model.initial_guess[{i}]"),
                message: format!("must be finite, got {p}"),
            });
        }
    }

    if let Some(gap) = config.alignment.max_gap_seconds {
        validate_positive("alignment.max_gap_seconds", gap)?;
    }

    Ok(())
}

fn validate_edge_array(field: &str, edges: &[f64]) -> ValidationResult<()> {
    if edges.len() < 2 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("needs at least 2 edges, got {}", edges.len()),
        });
    }
    for pair in edges.windows(2) {
        if !pair[0].is_finite() || !pair[1].is_finite() || pair[1] <= pair[0] {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!(
                    "edges must be finite and strictly increasing ({} then {})",
                    pair[0], pair[1]
                ),
            });
        }
    }
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("must be positive and finite, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{GridConfig, SurveyConfig};

    #[test]
    fn default_passes() {
        validate_survey(&SurveyConfig::default()).unwrap();
    }

    #[test]
    fn version_mismatch_rejected() {
        let config = SurveyConfig {
            schema_version: "0.0.1".to_string(),
            ..SurveyConfig::default()
        };
        assert!(matches!(
            validate_survey(&config),
            Err(ConfigError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn short_edge_array_rejected() {
        let config = SurveyConfig {
            grid: GridConfig {
                x_edges: vec![0.0],
                ..GridConfig::default()
            },
            ..SurveyConfig::default()
        };
        let err = validate_survey(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "grid.x_edges"));
    }

    #[test]
    fn non_monotone_edges_rejected() {
        let config = SurveyConfig {
            grid: GridConfig {
                cyl_edges: vec![0.0, 2.0, 1.0],
                ..GridConfig::default()
            },
            ..SurveyConfig::default()
        };
        assert!(validate_survey(&config).is_err());
    }

    #[test]
    fn zero_cadence_rejected() {
        let config = SurveyConfig {
            grid: GridConfig {
                cadence_seconds: 0.0,
                ..GridConfig::default()
            },
            ..SurveyConfig::default()
        };
        let err = validate_survey(&config).unwrap_err();
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn negative_gap_rejected() {
        let mut config = SurveyConfig::default();
        config.alignment.max_gap_seconds = Some(-5.0);
        assert!(validate_survey(&config).is_err());
    }

    #[test]
    fn error_codes_stable() {
        assert_eq!(ConfigError::IoError("x".into()).code(), 60);
        assert_eq!(ConfigError::ParseError("x".into()).code(), 61);
        assert_eq!(
            ConfigError::VersionMismatch {
                expected: "1".into(),
                actual: "2".into()
            }
            .code(),
            66
        );
    }
}
