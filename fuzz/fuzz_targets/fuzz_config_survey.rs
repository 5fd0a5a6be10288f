//! Fuzz target for survey configuration parsing.
//!
//! Tests that JSON survey configuration parsing and semantic validation
//! handle arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mbs_config::{validate_survey, SurveyConfig};

fuzz_target!(|data: &[u8]| {
    // Parsing and validation should never panic, only return errors.
    if let Ok(config) = serde_json::from_slice::<SurveyConfig>(data) {
        let _ = validate_survey(&config);
    }
});
