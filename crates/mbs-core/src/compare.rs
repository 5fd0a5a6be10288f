//! Elementwise comparison of density maps.
//!
//! The difference of two residence-normalized maps highlights where one
//! detection method places crossings more often than another. A bin
//! undefined in either input is not comparable and stays NaN. No
//! re-normalization is applied; callers wanting a symmetric display
//! range read [`DensityMap::max_abs_finite`] from the result.

use mbs_common::{Error, Result};

use crate::density::DensityMap;

/// Elementwise `a - b` over maps built on identical bin edges.
pub fn difference(a: &DensityMap, b: &DensityMap) -> Result<DensityMap> {
    if a.x_edges != b.x_edges || a.y_edges != b.y_edges {
        return Err(Error::GridMismatch {
            reason: "bin edges differ".to_string(),
        });
    }
    if a.values.len() != b.values.len() {
        return Err(Error::GridMismatch {
            reason: format!(
                "value grids differ in size: {} vs {}",
                a.values.len(),
                b.values.len()
            ),
        });
    }

    let values = a
        .values
        .iter()
        .zip(&b.values)
        .map(|(&x, &y)| x - y)
        .collect();

    Ok(DensityMap {
        x_edges: a.x_edges.clone(),
        y_edges: a.y_edges.clone(),
        values,
    })
}
