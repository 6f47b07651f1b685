//! Display formatting for dates and durations.

use chrono::{DateTime, Utc};

/// Placeholder shown where a value is missing.
pub const MISSING: &str = "-";

/// Formats an instant as `YYYY-MM-DD HH:MM`, or `-` when absent.
pub fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Formats the clock part of an instant as `HH:MM`, or `-` when absent.
pub fn format_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.format("%H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Formats a duration in milliseconds as Korean hours/minutes.
///
/// Sub-minute durations are shown in seconds; negative durations are `-`.
pub fn format_duration_ms(ms: i64) -> String {
    if ms < 0 {
        return MISSING.to_string();
    }

    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;

    match (hours, minutes) {
        (0, 0) => format!("{}초", total_secs),
        (0, m) => format!("{}분", m),
        (h, 0) => format!("{}시간", h),
        (h, m) => format!("{}시간 {}분", h, m),
    }
}

/// Converts minutes to whole hours, rounding half away from zero.
pub fn hours_rounded(minutes: f64) -> i64 {
    if minutes.is_finite() {
        (minutes / 60.0).round() as i64
    } else {
        0
    }
}

/// Formats a percentage with one decimal place.
pub fn format_percent(ratio: f64) -> String {
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    format!("{:.1}%", ratio * 100.0)
}
