//! Boundary survey math utilities.

pub mod stats;

pub use stats::correlation::*;
pub use stats::descriptive::*;
pub use stats::fit::*;
pub use stats::histogram::*;
pub use stats::knee::*;
pub use stats::special::*;
