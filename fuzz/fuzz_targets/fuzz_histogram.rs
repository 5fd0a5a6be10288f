//! Fuzz target for explicit-edge histogram binning.
//!
//! Arbitrary samples and edge arrays must never panic, and accepted
//! inputs must conserve in-range counts.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mbs_math::{bin_index, histogram1d, validate_edges};

fuzz_target!(|input: (Vec<f64>, Vec<f64>)| {
    let (values, edges) = input;

    if validate_edges(&edges, "fuzz").is_err() {
        let _ = histogram1d(&values, &edges);
        return;
    }

    let counts = histogram1d(&values, &edges).expect("validated edges must bin");
    let total: f64 = counts.iter().sum();
    let in_range = values
        .iter()
        .filter(|v| v.is_finite() && **v >= edges[0] && **v <= edges[edges.len() - 1])
        .count();
    assert_eq!(total as usize, in_range);

    for v in values {
        if let Some(i) = bin_index(&edges, v) {
            assert!(i < edges.len() - 1);
        }
    }
});
