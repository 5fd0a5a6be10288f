//! Saturating duration-confidence model.
//!
//! Region detections gain confidence with duration up to a point of
//! diminishing returns. This module screens duration outliers, fits
//! `confidence = 1 - exp(-a * (duration - b)) + c` by damped least
//! squares, and locates the knee of the empirical curve where marginal
//! confidence gain flattens.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use mbs_common::{Error, Result};
use mbs_config::DurationModelConfig;
use mbs_math::stats::fit::{fit_saturating_exp, saturating_exp, FitError, FitOptions};
use mbs_math::stats::knee::knee_point;
use mbs_math::robust_zscores;

/// Knee of the empirical duration-confidence curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KneePoint {
    /// Duration at maximal curvature, seconds.
    pub duration_seconds: f64,
    /// Observed confidence at the knee.
    pub confidence: f64,
}

/// Fitted duration-confidence model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct DurationConfidenceFit {
    /// Fitted (a, b, c).
    pub params: [f64; 3],
    /// Standard errors: sqrt of the fit covariance diagonal.
    pub std_errors: [f64; 3],
    /// Knee of the empirical curve, when one exists.
    pub knee: Option<KneePoint>,
    /// Observations used by the fit after screening.
    pub n_used: usize,
    /// Observations removed by the outlier screen.
    pub n_rejected: usize,
    /// Residual sum of squares at the fitted parameters.
    pub residual_sum_squares: f64,
    /// Optimizer iterations consumed.
    pub iterations: usize,
}

impl DurationConfidenceFit {
    /// Evaluate the fitted curve at a duration.
    pub fn evaluate(&self, duration_seconds: f64) -> f64 {
        saturating_exp(duration_seconds, &self.params)
    }
}

/// Fit the duration-confidence model to paired observations.
///
/// Non-finite pairs are dropped, then durations whose robust z-score
/// exceeds `config.outlier_sigma` in magnitude are removed (a lone
/// extreme duration cannot inflate the scale enough to hide itself).
/// The fit starts from `config.initial_guess`; non-convergence is an
/// error carrying the best-attempted parameters so batch drivers can
/// record it and continue. The knee is located on the empirical curve,
/// not the fitted one.
pub fn fit_duration_confidence(
    durations: &[f64],
    confidences: &[f64],
    config: &DurationModelConfig,
) -> Result<DurationConfidenceFit> {
    if durations.len() != confidences.len() {
        return Err(Error::Validation(format!(
            "paired arrays differ in length: {} vs {}",
            durations.len(),
            confidences.len()
        )));
    }

    let finite: Vec<(f64, f64)> = durations
        .iter()
        .zip(confidences)
        .filter(|(d, c)| d.is_finite() && c.is_finite())
        .map(|(&d, &c)| (d, c))
        .collect();

    let screened = screen_outliers(&finite, config.outlier_sigma);
    let n_rejected = finite.len() - screened.len();

    const MIN_POINTS: usize = 4;
    if screened.len() < MIN_POINTS {
        return Err(Error::InsufficientData {
            n: screened.len(),
            min: MIN_POINTS,
        });
    }

    let xs: Vec<f64> = screened.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = screened.iter().map(|p| p.1).collect();

    let options = FitOptions {
        max_iterations: config.max_iterations,
        tolerance: config.tolerance,
    };
    let report = fit_saturating_exp(&xs, &ys, config.initial_guess, &options).map_err(
        |err| match err {
            FitError::NotEnoughPoints { n, params } => Error::InsufficientData {
                n,
                min: params + 1,
            },
            other => Error::FitDegenerate(other.to_string()),
        },
    )?;

    if !report.converged {
        warn!(
            iterations = report.iterations,
            rss = report.residual_sum_squares,
            "duration-confidence fit did not converge"
        );
        return Err(Error::FitDidNotConverge {
            iterations: report.iterations,
            residual_sum_squares: report.residual_sum_squares,
            best_params: report.params,
        });
    }

    let knee = empirical_knee(&screened);

    Ok(DurationConfidenceFit {
        params: report.params,
        std_errors: report.std_errors,
        knee,
        n_used: screened.len(),
        n_rejected,
        residual_sum_squares: report.residual_sum_squares,
        iterations: report.iterations,
    })
}

/// Remove observations whose duration lies outside the robust z-score
/// threshold. A zero-spread sample (all-NaN scores) is kept intact.
fn screen_outliers(pairs: &[(f64, f64)], sigma: f64) -> Vec<(f64, f64)> {
    let durations: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let scores = robust_zscores(&durations);
    if scores.iter().all(|z| z.is_nan()) {
        return pairs.to_vec();
    }
    pairs
        .iter()
        .zip(&scores)
        .filter(|(_, z)| z.abs() <= sigma)
        .map(|(&p, _)| p)
        .collect()
}

/// Knee of the empirical curve: sort by duration (stable, so duplicate
/// durations keep their earliest observation), then take the point of
/// maximal normalized distance above the diagonal.
fn empirical_knee(pairs: &[(f64, f64)]) -> Option<KneePoint> {
    let mut sorted = pairs.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let xs: Vec<f64> = sorted.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = sorted.iter().map(|p| p.1).collect();
    knee_point(&xs, &ys).map(|k| KneePoint {
        duration_seconds: k.x,
        confidence: k.y,
    })
}
