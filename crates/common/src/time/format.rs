//! Human-readable duration formatting

use std::time::Duration;

/// Format a duration as its non-zero leading units, e.g. `"2h 0m 0s"`
///
/// Sub-second durations are rendered in milliseconds, or microseconds below
/// one millisecond.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use convointel_common::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(1800)), "30m 0s");
/// assert_eq!(format_duration(Duration::from_secs(7200)), "2h 0m 0s");
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if total_secs == 0 {
        let millis = duration.as_millis();
        if millis == 0 {
            return format!("{}us", duration.as_micros());
        }
        return format!("{}ms", millis);
    }

    let units = [
        (total_secs / 86_400, "d"),
        ((total_secs % 86_400) / 3_600, "h"),
        ((total_secs % 3_600) / 60, "m"),
        (total_secs % 60, "s"),
    ];
    let first = units.iter().position(|(value, _)| *value > 0).unwrap_or(units.len() - 1);

    units[first..].iter().map(|(value, suffix)| format!("{value}{suffix}")).collect::<Vec<_>>().join(" ")
}
