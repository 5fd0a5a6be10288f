//! Descriptive statistics for duration and rate series.
//!
//! Quartiles use linear interpolation between order statistics. Two
//! standardizations are provided: plain z-scores over the population
//! mean/std, and robust z-scores over the median and MAD-derived scale
//! for outlier screens that must not let an extreme value mask itself.

use serde::Serialize;

/// Scale factor relating the median absolute deviation to the standard
/// deviation of a normal distribution.
const MAD_TO_SIGMA: f64 = 1.4826;

/// Five-number summary of a sample (box-plot statistics).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Drop NaN and infinite values.
pub fn filter_finite(samples: &[f64]) -> Vec<f64> {
    samples.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean. NaN for empty input.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation (ddof = 0). NaN for empty input.
pub fn population_std(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    let m = mean(samples);
    let var = samples.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / samples.len() as f64;
    var.sqrt()
}

/// Z-scores standardized by the population mean and standard deviation.
///
/// A zero-spread sample yields all-NaN scores rather than dividing by zero.
pub fn zscores(samples: &[f64]) -> Vec<f64> {
    let m = mean(samples);
    let s = population_std(samples);
    if !s.is_finite() || s == 0.0 {
        return vec![f64::NAN; samples.len()];
    }
    samples.iter().map(|v| (v - m) / s).collect()
}

/// Sample median. NaN for empty input.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    let mut values = samples.to_vec();
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Median absolute deviation about a given center.
pub fn mad(samples: &[f64], center: f64) -> f64 {
    let deviations: Vec<f64> = samples.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// Z-scores standardized by the median and the MAD-derived scale.
///
/// Unlike [`zscores`], a single extreme value cannot inflate the scale
/// enough to mask itself, so a 3-sigma screen removes it at any sample
/// size. A zero-MAD sample yields all-NaN scores.
pub fn robust_zscores(samples: &[f64]) -> Vec<f64> {
    let center = median(samples);
    let scale = MAD_TO_SIGMA * mad(samples, center);
    if !scale.is_finite() || scale == 0.0 {
        return vec![f64::NAN; samples.len()];
    }
    samples.iter().map(|v| (v - center) / scale).collect()
}

/// Interpolated quantile of a sorted sample, q in [0, 1].
///
/// Input must be sorted ascending; NaN for empty input.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Five-number summary of a sample. None if no finite values remain.
pub fn five_number_summary(samples: &[f64]) -> Option<FiveNumberSummary> {
    let mut values = filter_finite(samples);
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    Some(FiveNumberSummary {
        min: values[0],
        q1: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q3: quantile_sorted(&values, 0.75),
        max: values[values.len() - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn mean_and_std_basics() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx_eq(mean(&v), 5.0, 1e-12));
        assert!(approx_eq(population_std(&v), 2.0, 1e-12));
    }

    #[test]
    fn mean_of_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(population_std(&[]).is_nan());
    }

    #[test]
    fn zscores_standardize() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let z = zscores(&v);
        assert!(approx_eq(z[0], -1.5, 1e-12));
        assert!(approx_eq(z[7], 2.0, 1e-12));
        assert!(approx_eq(mean(&z), 0.0, 1e-12));
    }

    #[test]
    fn zscores_zero_spread_all_nan() {
        let z = zscores(&[3.0, 3.0, 3.0]);
        assert!(z.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn median_and_mad() {
        let v = [1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
        assert!(approx_eq(median(&v), 2.0, 1e-12));
        assert!(approx_eq(mad(&v, 2.0), 1.0, 1e-12));
    }

    #[test]
    fn robust_screen_drops_lone_extreme_duration() {
        // A lone extreme value inflates the plain standard deviation
        // enough to hide itself (z ~ 1.98 here), but not the MAD scale.
        let durations = [50.0, 100.0, 150.0, 200.0, 1000.0];
        let plain = zscores(&durations);
        assert!(plain[4].abs() < 3.0);

        let robust = robust_zscores(&durations);
        assert!(robust[4].abs() > 3.0);
        let kept: Vec<f64> = durations
            .iter()
            .zip(&robust)
            .filter(|(_, z)| z.abs() <= 3.0)
            .map(|(d, _)| *d)
            .collect();
        assert_eq!(kept, vec![50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn robust_zscores_zero_mad_all_nan() {
        let z = robust_zscores(&[5.0, 5.0, 5.0, 9.0]);
        assert!(z.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn quantiles_interpolate() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(approx_eq(quantile_sorted(&sorted, 0.5), 2.5, 1e-12));
        assert!(approx_eq(quantile_sorted(&sorted, 0.25), 1.75, 1e-12));
        assert!(approx_eq(quantile_sorted(&sorted, 0.0), 1.0, 1e-12));
        assert!(approx_eq(quantile_sorted(&sorted, 1.0), 4.0, 1e-12));
    }

    #[test]
    fn five_number_summary_ignores_non_finite() {
        let v = [5.0, f64::NAN, 1.0, 3.0, f64::INFINITY, 2.0, 4.0];
        let s = five_number_summary(&v).unwrap();
        assert!(approx_eq(s.min, 1.0, 1e-12));
        assert!(approx_eq(s.median, 3.0, 1e-12));
        assert!(approx_eq(s.max, 5.0, 1e-12));
        assert!(s.q1 <= s.median && s.median <= s.q3);
    }

    #[test]
    fn five_number_summary_empty_is_none() {
        assert!(five_number_summary(&[]).is_none());
        assert!(five_number_summary(&[f64::NAN]).is_none());
    }
}
