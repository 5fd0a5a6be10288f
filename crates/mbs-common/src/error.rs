//! Error types for the boundary survey engine.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for batch drivers
//!
//! Undefined density bins are NaN values, never errors: a bin the
//! spacecraft never visited is propagated as NaN through every downstream
//! computation rather than aborting it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for boundary survey operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed inputs: bad bin edges, mismatched grids, empty trajectories.
    Validation,
    /// Event-to-trajectory matching outside a caller-supplied gap bound.
    Alignment,
    /// Nonlinear fit failures (non-convergence, degenerate systems).
    Fit,
    /// Too few usable points for a statistic.
    InsufficientData,
    /// File I/O and serialization errors (configuration loading).
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Alignment => write!(f, "alignment"),
            ErrorCategory::Fit => write!(f, "fit"),
            ErrorCategory::InsufficientData => write!(f, "insufficient_data"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the boundary survey engine.
#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (10-19)
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("bin edges for {axis} must be strictly increasing with at least 2 edges")]
    InvalidBinEdges { axis: String },

    #[error("grids are not comparable: {reason}")]
    GridMismatch { reason: String },

    // Alignment errors (20-29)
    #[error(
        "event {index} matched trajectory with gap {gap_seconds:.3} s, \
         exceeding the allowed {max_gap_seconds:.3} s"
    )]
    AlignmentGapExceeded {
        index: usize,
        gap_seconds: f64,
        max_gap_seconds: f64,
    },

    // Fit errors (30-39)
    #[error(
        "fit did not converge after {iterations} iterations \
         (best residual sum of squares {residual_sum_squares:.6e})"
    )]
    FitDidNotConverge {
        iterations: usize,
        residual_sum_squares: f64,
        /// Best-attempted parameters at the point the optimizer stopped.
        best_params: [f64; 3],
    },

    #[error("fit produced a degenerate normal system: {0}")]
    FitDegenerate(String),

    // Insufficient data errors (40-49)
    #[error("not enough usable data points: {n} (minimum {min})")]
    InsufficientData { n: usize, min: usize },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Validation errors
    /// - 20-29: Alignment errors
    /// - 30-39: Fit errors
    /// - 40-49: Insufficient-data errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Validation(_) => 10,
            Error::InvalidBinEdges { .. } => 11,
            Error::GridMismatch { .. } => 12,
            Error::AlignmentGapExceeded { .. } => 20,
            Error::FitDidNotConverge { .. } => 30,
            Error::FitDegenerate(_) => 31,
            Error::InsufficientData { .. } => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_) | Error::InvalidBinEdges { .. } | Error::GridMismatch { .. } => {
                ErrorCategory::Validation
            }
            Error::AlignmentGapExceeded { .. } => ErrorCategory::Alignment,
            Error::FitDidNotConverge { .. } | Error::FitDegenerate(_) => ErrorCategory::Fit,
            Error::InsufficientData { .. } => ErrorCategory::InsufficientData,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether a batch driver may keep going after this error.
    ///
    /// A single non-convergent fit or an over-gap event list is local to
    /// the affected item; sibling computations are unaffected.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Inputs need fixing before a retry makes sense.
            Error::Validation(_) => false,
            Error::InvalidBinEdges { .. } => false,
            Error::GridMismatch { .. } => false,

            // Per-item conditions: siblings continue.
            Error::AlignmentGapExceeded { .. } => true,
            Error::FitDidNotConverge { .. } => true,
            Error::FitDegenerate(_) => true,
            Error::InsufficientData { .. } => true,

            // Often transient.
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,
    /// Error category for grouping.
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Whether a batch driver may continue past this error.
    pub recoverable: bool,
    /// Additional structured context (e.g. event index, gap seconds).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::AlignmentGapExceeded {
                index,
                gap_seconds,
                max_gap_seconds,
            } => {
                context.insert("event_index".to_string(), serde_json::json!(index));
                context.insert("gap_seconds".to_string(), serde_json::json!(gap_seconds));
                context.insert(
                    "max_gap_seconds".to_string(),
                    serde_json::json!(max_gap_seconds),
                );
            }
            Error::FitDidNotConverge {
                iterations,
                best_params,
                ..
            } => {
                context.insert("iterations".to_string(), serde_json::json!(iterations));
                context.insert(
                    "best_params".to_string(),
                    serde_json::json!(best_params.to_vec()),
                );
            }
            Error::InsufficientData { n, min } => {
                context.insert("n".to_string(), serde_json::json!(n));
                context.insert("min".to_string(), serde_json::json!(min));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

/// A single failure in a batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchFailure {
    /// Identifier of the failed item (e.g. a boundary label).
    pub item_id: String,
    /// The structured error.
    pub error: StructuredError,
}

/// Summary of a batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub all_succeeded: bool,
    pub any_succeeded: bool,
}

/// Result of a batch analysis that may have partial success.
///
/// A caller running many independent maps or fits receives every result
/// that could be computed, plus a per-item error record for the rest.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchOutcome<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure>,
    pub summary: BatchSummary,
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        BatchOutcome {
            succeeded: Vec::new(),
            failed: Vec::new(),
            summary: BatchSummary {
                total: 0,
                succeeded: 0,
                failed: 0,
                all_succeeded: true,
                any_succeeded: false,
            },
        }
    }

    pub fn add_success(&mut self, item: T) {
        self.succeeded.push(item);
        self.summary.succeeded += 1;
        self.summary.total += 1;
        self.summary.any_succeeded = true;
    }

    pub fn add_failure(&mut self, item_id: impl Into<String>, error: &Error) {
        self.failed.push(BatchFailure {
            item_id: item_id.into(),
            error: StructuredError::from(error),
        });
        self.summary.failed += 1;
        self.summary.total += 1;
        self.summary.all_succeeded = false;
    }

    /// Record a result, routing it to successes or failures.
    pub fn record(&mut self, item_id: impl Into<String>, result: Result<T>) {
        match result {
            Ok(item) => self.add_success(item),
            Err(err) => self.add_failure(item_id, &err),
        }
    }
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}
