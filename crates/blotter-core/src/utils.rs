//! Human-readable formatting of sizes, durations and timestamps.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Format a byte count with decimal units.
///
/// # Examples
/// ```
/// use blotter_core::utils::format_byte_count;
///
/// assert_eq!(format_byte_count(1), "1 byte");
/// assert_eq!(format_byte_count(512), "512 bytes");
/// assert_eq!(format_byte_count(1_500), "1.5 KB");
/// assert_eq!(format_byte_count(2_000_000), "2.0 MB");
/// ```
pub fn format_byte_count(bytes: u64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB"];
    match bytes {
        1 => return "1 byte".to_string(),
        0..1000 => return format!("{bytes} bytes"),
        _ => {},
    }

    // Rounded to tenths before picking the unit, so 999.95 KB reads 1.0 MB.
    let bytes = u128::from(bytes);
    let mut divisor = 1000_u128;
    let mut unit_index = 0;
    let mut tenths = (bytes * 10 + divisor / 2) / divisor;
    while tenths >= 10_000 && unit_index < UNITS.len() - 1 {
        divisor *= 1000;
        unit_index += 1;
        tenths = (bytes * 10 + divisor / 2) / divisor;
    }
    format!("{}.{} {}", tenths / 10, tenths % 10, UNITS[unit_index])
}

/// Byte count for a section title, `None` when there is nothing to report.
pub fn format_body_size(bytes: u64) -> Option<String> {
    (bytes > 0).then(|| format_byte_count(bytes))
}

/// Format a duration the way request timings are usually read.
///
/// # Examples
/// ```
/// use blotter_core::utils::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(120)), "120 ms");
/// assert_eq!(format_duration(Duration::from_millis(1_250)), "1.25 s");
/// assert_eq!(format_duration(Duration::from_secs(95)), "1m 35s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        return format!("{millis} ms");
    }
    let centis = (millis + 5) / 10;
    if centis < 6000 {
        format!("{}.{:02} s", centis / 100, centis % 100)
    } else {
        let secs = duration.as_secs().max(60);
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Format a timestamp as `HH:mm:ss.SSS`.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_byte_count_boundaries() {
        assert_eq!(format_byte_count(0), "0 bytes");
        assert_eq!(format_byte_count(999), "999 bytes");
        assert_eq!(format_byte_count(1_000), "1.0 KB");
        assert_eq!(format_byte_count(999_949), "999.9 KB");
        assert_eq!(format_byte_count(3_500_000_000), "3.5 GB");
    }

    #[test]
    fn test_byte_count_rounds_into_next_unit() {
        assert_eq!(format_byte_count(999_950), "1.0 MB");
        assert_eq!(format_byte_count(999_999_999), "1.0 GB");
        assert_eq!(format_byte_count(1_949_999), "1.9 MB");
    }

    #[test]
    fn test_duration_rounds_into_minutes() {
        assert_eq!(format_duration(Duration::from_millis(1_234)), "1.23 s");
        assert_eq!(format_duration(Duration::from_millis(59_994)), "59.99 s");
        assert_eq!(format_duration(Duration::from_millis(59_999)), "1m 0s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_body_size_is_none_for_empty() {
        assert_eq!(format_body_size(0), None);
        assert_eq!(format_body_size(20).as_deref(), Some("20 bytes"));
    }

    #[test]
    fn test_format_time() {
        let time = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 3)
            .single()
            .unwrap_or_default()
            + chrono::Duration::milliseconds(42);
        assert_eq!(format_time(&time), "07:05:03.042");
    }

    #[test]
    fn test_duration_sub_millisecond() {
        assert_eq!(format_duration(Duration::from_micros(400)), "0 ms");
    }

    proptest! {
        #[test]
        fn test_byte_count_never_empty(bytes in any::<u64>()) {
            let formatted = format_byte_count(bytes);
            prop_assert!(!formatted.is_empty());
            prop_assert!(formatted.contains("byte") || formatted.ends_with('B'));
        }
    }
}
