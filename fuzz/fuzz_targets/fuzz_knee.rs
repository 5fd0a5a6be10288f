//! Fuzz target for knee-point detection.
//!
//! Any pair of float arrays must either produce a knee inside the
//! observed x range or none at all; never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mbs_math::knee_point;

fuzz_target!(|input: (Vec<f64>, Vec<f64>)| {
    let (mut xs, ys) = input;
    xs.sort_by(|a, b| a.total_cmp(b));

    if let Some(knee) = knee_point(&xs, &ys) {
        let finite: Vec<f64> = xs.iter().copied().filter(|v| v.is_finite()).collect();
        assert!(!finite.is_empty());
        assert!(knee.x >= finite[0]);
        assert!(knee.x <= finite[finite.len() - 1]);
        assert!(knee.y.is_finite());
    }
});
