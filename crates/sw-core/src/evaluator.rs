//! Threshold evaluation

use std::time::Duration;

use crate::config::Thresholds;
use crate::time::format_age;
use crate::types::{Status, Verdict};

/// Classify a snapshot age against the warning and critical thresholds.
///
/// Comparisons are strict: an age exactly equal to a threshold does not
/// trigger that severity. The critical threshold is checked first, so a
/// critical threshold below the warning one simply shadows it.
pub fn classify(age: Duration, thresholds: &Thresholds) -> Status {
    if age > thresholds.critical {
        Status::Critical
    } else if age > thresholds.warning {
        Status::Warning
    } else {
        Status::Ok
    }
}

/// Message carried by every threshold verdict
pub fn age_message(age: Duration) -> String {
    format!("latest snapshot created {} ago", format_age(age))
}

/// Classify and attach the age message
pub fn evaluate(age: Duration, thresholds: &Thresholds) -> Verdict {
    Verdict::new(classify(age, thresholds), age_message(age))
}
