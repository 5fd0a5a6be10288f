//! Pearson correlation with a two-sided significance test.
//!
//! Under the null hypothesis the sample coefficient for n points follows
//! a symmetric beta distribution on [-1, 1] with shape n/2 - 1, so the
//! two-sided p-value is the tail mass of that distribution beyond |r|.

use serde::Serialize;
use thiserror::Error;

use super::special::betainc;

/// A correlation coefficient with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    /// Pearson coefficient in [-1, 1].
    pub coefficient: f64,
    /// Two-sided p-value in [0, 1].
    pub p_value: f64,
    /// Number of paired samples used.
    pub n: usize,
}

/// Errors raised while computing correlations.
#[derive(Debug, Error)]
pub enum CorrelationError {
    #[error("paired arrays differ in length: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("not enough paired samples: {n} (min {min})")]
    NotEnoughSamples { n: usize, min: usize },
}

/// Pearson correlation between two equal-length samples.
///
/// Either sample having zero variance yields a coefficient of 0 and a
/// p-value of 1 rather than a division by zero. With exactly 2 points
/// the test degenerates and the p-value is 1.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation, CorrelationError> {
    if x.len() != y.len() {
        return Err(CorrelationError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(CorrelationError::NotEnoughSamples { n, min: 2 });
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom < 1e-12 {
        return Ok(Correlation {
            coefficient: 0.0,
            p_value: 1.0,
            n,
        });
    }

    // Rounding can push |r| a hair past 1 for perfectly linear data.
    let coefficient = (cov / denom).clamp(-1.0, 1.0);
    let p_value = two_sided_p(coefficient, n);

    Ok(Correlation {
        coefficient,
        p_value,
        n,
    })
}

fn two_sided_p(r: f64, n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    let shape = n as f64 / 2.0 - 1.0;
    // CDF of the symmetric beta on [-1, 1] evaluated at |r|.
    let cdf = betainc((r.abs() + 1.0) / 2.0, shape, shape);
    (2.0 * (1.0 - cdf)).clamp(0.0, 1.0)
}
