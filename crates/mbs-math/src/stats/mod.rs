//! Core statistics modules.

pub mod correlation;
pub mod descriptive;
pub mod fit;
pub mod histogram;
pub mod knee;
pub mod special;
