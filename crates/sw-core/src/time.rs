//! Time utilities for snapwatch
//!
//! Snapshot ages are reported rounded to whole seconds in a compact
//! `1h0m0s` form that monitoring operators are used to from the original
//! restic checks.

use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;

/// Round a duration to the nearest whole second, halves rounding up.
pub fn round_to_seconds(duration: Duration) -> Duration {
    let mut secs = duration.as_secs();
    if duration.subsec_nanos() >= 500_000_000 {
        secs = secs.saturating_add(1);
    }
    Duration::from_secs(secs)
}

/// Render a duration as hours, minutes and seconds.
///
/// Leading zero units are dropped, inner ones are kept, and anything below a
/// second is rounded away first.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use sw_core::time::format_age;
///
/// assert_eq!(format_age(Duration::from_secs(3600)), "1h0m0s");
/// assert_eq!(format_age(Duration::from_secs(303)), "5m3s");
/// assert_eq!(format_age(Duration::from_millis(400)), "0s");
/// ```
pub fn format_age(duration: Duration) -> String {
    let total = round_to_seconds(duration).as_secs();
    let hours = total / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
