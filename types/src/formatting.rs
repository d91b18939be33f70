//! Display helpers for durations and uptime.
//!
//! Kept here so the index worker and any UI consumer render the same strings.

/// Format a millisecond duration as `m:ss.t`.
///
/// # Examples
/// ```
/// use buffscope_types::formatting::format_duration_ms;
/// assert_eq!(format_duration_ms(0), "0:00.0");
/// assert_eq!(format_duration_ms(12_340), "0:12.3");
/// assert_eq!(format_duration_ms(75_000), "1:15.0");
/// ```
pub fn format_duration_ms(ms: i64) -> String {
    let ms = ms.max(0);
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let tenths = (ms % 1_000) / 100;
    format!("{}:{:02}.{}", minutes, seconds, tenths)
}

/// Format an uptime fraction (0.0..=1.0) as a percentage with one decimal.
///
/// Values outside the range are clamped; NaN renders as `0.0%`.
///
/// # Examples
/// ```
/// use buffscope_types::formatting::format_uptime;
/// assert_eq!(format_uptime(0.5), "50.0%");
/// assert_eq!(format_uptime(1.2), "100.0%");
/// ```
pub fn format_uptime(fraction: f64) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    format!("{:.1}%", fraction * 100.0)
}
