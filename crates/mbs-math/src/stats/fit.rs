//! Damped least-squares fit of the saturating confidence model.
//!
//! The model is `f(x) = 1 - exp(-a * (x - b)) + c`, fitted by
//! Levenberg-Marquardt on the 3x3 normal equations with an analytic
//! Jacobian. Parameter standard errors come from the unscaled inverse
//! normal matrix times the residual variance.

use serde::Serialize;
use thiserror::Error;

/// Number of model parameters (a, b, c).
const N_PARAMS: usize = 3;

/// Options controlling the optimizer.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Maximum outer iterations.
    pub max_iterations: usize,
    /// Convergence threshold on the step norm and the relative residual
    /// improvement.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
        }
    }
}

/// Outcome of a fit, converged or not.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FitReport {
    /// Fitted (a, b, c).
    pub params: [f64; 3],
    /// Standard errors: sqrt of the covariance diagonal. NaN when the
    /// system is too small or degenerate for a covariance estimate.
    pub std_errors: [f64; 3],
    /// Whether the optimizer met the convergence threshold.
    pub converged: bool,
    /// Outer iterations consumed.
    pub iterations: usize,
    /// Residual sum of squares at the reported parameters.
    pub residual_sum_squares: f64,
}

/// Errors raised before the optimizer can run.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("paired arrays differ in length: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("not enough points to fit {params} parameters: {n}")]
    NotEnoughPoints { n: usize, params: usize },
    #[error("model is non-finite at the initial guess")]
    NonFiniteStart,
}

/// The saturating confidence model: `1 - exp(-a * (x - b)) + c`.
///
/// Monotonically non-decreasing in x for a > 0.
pub fn saturating_exp(x: f64, params: &[f64; 3]) -> f64 {
    let [a, b, c] = *params;
    1.0 - (-a * (x - b)).exp() + c
}

fn model_jacobian_row(x: f64, params: &[f64; 3]) -> [f64; 3] {
    let [a, b, _] = *params;
    let e = (-a * (x - b)).exp();
    [(x - b) * e, -a * e, 1.0]
}

fn residual_sum_squares(x: &[f64], y: &[f64], params: &[f64; 3]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r = yi - saturating_exp(xi, params);
            r * r
        })
        .sum()
}

/// Fit the saturating model by Levenberg-Marquardt.
///
/// Returns a [`FitReport`] whether or not the optimizer converged; the
/// caller decides how to treat a non-converged report. The reference
/// initial guess for crossing-confidence data is `[1.0, 1.0, 1.0]`.
pub fn fit_saturating_exp(
    x: &[f64],
    y: &[f64],
    initial: [f64; 3],
    options: &FitOptions,
) -> Result<FitReport, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < N_PARAMS {
        return Err(FitError::NotEnoughPoints {
            n,
            params: N_PARAMS,
        });
    }

    let mut params = initial;
    let mut rss = residual_sum_squares(x, y, &params);
    if !rss.is_finite() {
        return Err(FitError::NonFiniteStart);
    }

    let mut lambda = 1e-3;
    let mut converged = false;
    let mut iterations = 0;

    for _ in 0..options.max_iterations {
        iterations += 1;

        // Assemble J^T J and J^T r at the current parameters.
        let mut jtj = [0.0f64; 9];
        let mut jtr = [0.0f64; 3];
        for (&xi, &yi) in x.iter().zip(y) {
            let row = model_jacobian_row(xi, &params);
            let r = yi - saturating_exp(xi, &params);
            for i in 0..3 {
                for j in 0..3 {
                    jtj[i * 3 + j] += row[i] * row[j];
                }
                jtr[i] += row[i] * r;
            }
        }

        // Damp the diagonal and solve for the step.
        let mut damped = jtj;
        for i in 0..3 {
            damped[i * 3 + i] += lambda * jtj[i * 3 + i].max(1e-12);
        }
        let Some(inv) = invert_3x3(&damped) else {
            lambda *= 10.0;
            continue;
        };

        let mut step = [0.0f64; 3];
        for i in 0..3 {
            for j in 0..3 {
                step[i] += inv[i * 3 + j] * jtr[j];
            }
        }

        let trial = [
            params[0] + step[0],
            params[1] + step[1],
            params[2] + step[2],
        ];
        let trial_rss = residual_sum_squares(x, y, &trial);

        if trial_rss.is_finite() && trial_rss <= rss {
            let improvement = (rss - trial_rss) / rss.max(1e-300);
            let step_norm =
                (step[0] * step[0] + step[1] * step[1] + step[2] * step[2]).sqrt();
            params = trial;
            rss = trial_rss;
            lambda = (lambda / 10.0).max(1e-12);
            if step_norm < options.tolerance || improvement < options.tolerance {
                converged = true;
                break;
            }
        } else {
            lambda *= 10.0;
            if lambda > 1e12 {
                break;
            }
        }
    }

    let std_errors = standard_errors(x, &params, rss);

    Ok(FitReport {
        params,
        std_errors,
        converged,
        iterations,
        residual_sum_squares: rss,
    })
}

/// sqrt(diag((J^T J)^-1 * rss / (n - p))) at the fitted parameters.
fn standard_errors(x: &[f64], params: &[f64; 3], rss: f64) -> [f64; 3] {
    let n = x.len();
    if n <= N_PARAMS {
        return [f64::NAN; 3];
    }

    let mut jtj = [0.0f64; 9];
    for &xi in x {
        let row = model_jacobian_row(xi, params);
        for i in 0..3 {
            for j in 0..3 {
                jtj[i * 3 + j] += row[i] * row[j];
            }
        }
    }

    let Some(inv) = invert_3x3(&jtj) else {
        return [f64::NAN; 3];
    };

    let variance = rss / (n - N_PARAMS) as f64;
    let mut errors = [0.0f64; 3];
    for i in 0..3 {
        let v = inv[i * 3 + i] * variance;
        errors[i] = if v >= 0.0 { v.sqrt() } else { f64::NAN };
    }
    errors
}

fn invert_3x3(m: &[f64; 9]) -> Option<[f64; 9]> {
    let a = m[0];
    let b = m[1];
    let c = m[2];
    let d = m[3];
    let e = m[4];
    let f = m[5];
    let g = m[6];
    let h = m[7];
    let i = m[8];

    let det = a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g);
    if !det.is_finite() || det.abs() < 1e-30 {
        return None;
    }

    let inv_det = 1.0 / det;
    Some([
        (e * i - f * h) * inv_det,
        (c * h - b * i) * inv_det,
        (b * f - c * e) * inv_det,
        (f * g - d * i) * inv_det,
        (a * i - c * g) * inv_det,
        (c * d - a * f) * inv_det,
        (d * h - e * g) * inv_det,
        (b * g - a * h) * inv_det,
        (a * e - b * d) * inv_det,
    ])
}
