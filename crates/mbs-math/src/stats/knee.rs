//! Knee-point location for concave, increasing empirical curves.
//!
//! Both axes are min-max normalized to [0, 1]; the knee is the point
//! maximizing the vertical distance between the normalized curve and the
//! diagonal, i.e. where the marginal gain starts to flatten. Duplicate
//! x-values keep their earliest occurrence, and the earliest maximum
//! wins a distance tie, so the result is deterministic.

use serde::Serialize;

/// A located knee, in the original (un-normalized) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Knee {
    pub x: f64,
    pub y: f64,
    /// Index into the de-duplicated, x-sorted curve.
    pub index: usize,
}

/// Locate the knee of a concave increasing curve sorted ascending by x.
///
/// Returns None when fewer than 3 distinct x-values remain after
/// de-duplication, or when either axis has zero range (no curvature to
/// speak of). Non-finite pairs are dropped.
pub fn knee_point(xs: &[f64], ys: &[f64]) -> Option<Knee> {
    if xs.len() != ys.len() {
        return None;
    }

    // Drop non-finite pairs, then keep the earliest y for each distinct x.
    let mut curve: Vec<(f64, f64)> = Vec::with_capacity(xs.len());
    for (&x, &y) in xs.iter().zip(ys) {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        if let Some(&(last_x, _)) = curve.last() {
            if x < last_x {
                return None; // not sorted
            }
            if x == last_x {
                continue;
            }
        }
        curve.push((x, y));
    }

    if curve.len() < 3 {
        return None;
    }

    let x_min = curve[0].0;
    let x_max = curve[curve.len() - 1].0;
    let (y_min, y_max) = curve
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });

    let x_range = x_max - x_min;
    let y_range = y_max - y_min;
    if x_range <= 0.0 || y_range <= 0.0 {
        return None;
    }

    let mut best_index = 0;
    let mut best_distance = f64::NEG_INFINITY;
    for (i, &(x, y)) in curve.iter().enumerate() {
        let x_norm = (x - x_min) / x_range;
        let y_norm = (y - y_min) / y_range;
        let distance = y_norm - x_norm;
        if distance > best_distance {
            best_distance = distance;
            best_index = i;
        }
    }

    let (x, y) = curve[best_index];
    Some(Knee {
        x,
        y,
        index: best_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sharp_elbow_is_found() {
        // Piecewise-linear curve with a sharp elbow at x = 2.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ys = [0.0, 0.45, 0.9, 0.92, 0.94, 0.96, 1.0];
        let knee = knee_point(&xs, &ys).unwrap();
        assert_eq!(knee.x, 2.0);
        assert!((knee.y - 0.9).abs() < 1e-12);
    }

    #[test]
    fn saturating_exponential_knee_near_scale() {
        // y = 1 - exp(-x / 3): the max of y_norm - x_norm sits where the
        // normalized slope is 1.
        let xs: Vec<f64> = (0..100).map(|i| i as f64 * 0.2).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| 1.0 - (-x / 3.0).exp()).collect();
        let knee = knee_point(&xs, &ys).unwrap();
        // Analytic maximum for this curve over [0, 19.8] sits at
        // x = 3 * ln(x_range / (3 * y_max)) ~ 5.67.
        assert!((knee.x - 5.67).abs() <= 0.4, "knee at {}", knee.x);
    }

    #[test]
    fn knee_lies_within_observed_range() {
        let xs = [10.0, 20.0, 40.0, 80.0, 160.0];
        let ys = [0.1, 0.5, 0.8, 0.9, 0.95];
        let knee = knee_point(&xs, &ys).unwrap();
        assert!(knee.x >= 10.0 && knee.x <= 160.0);
    }

    #[test]
    fn duplicate_x_keeps_earliest() {
        let xs = [0.0, 1.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 0.8, 0.2, 0.9, 1.0];
        let knee = knee_point(&xs, &ys).unwrap();
        // The second (1.0, 0.2) sample is discarded.
        assert_eq!(knee.x, 1.0);
        assert!((knee.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn unsorted_input_is_rejected() {
        assert!(knee_point(&[0.0, 2.0, 1.0], &[0.0, 0.5, 1.0]).is_none());
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert!(knee_point(&[1.0, 2.0], &[0.1, 0.2]).is_none());
        assert!(knee_point(&[1.0, 1.0, 1.0], &[0.1, 0.2, 0.3]).is_none());
        assert!(knee_point(&[1.0, 2.0, 3.0], &[0.5, 0.5, 0.5]).is_none());
        assert!(knee_point(&[], &[]).is_none());
    }

    #[test]
    fn non_finite_pairs_dropped() {
        let xs = [0.0, 1.0, f64::NAN, 2.0, 3.0];
        let ys = [0.0, 0.45, 0.5, 0.9, 1.0];
        let knee = knee_point(&xs, &ys).unwrap();
        assert_eq!(knee.x, 2.0);
    }
}
