//! Timestamp formatting for subtitle output.
//!
//! Both formatters truncate; neither ever rounds up. Negative and NaN inputs
//! saturate to zero.

/// Formats seconds as an SRT timestamp: `HH:MM:SS,mmm`.
///
/// Hours are unbounded and simply grow past two digits.
pub fn format_srt_timestamp(seconds: f64) -> String {
    // `as` saturates negatives and NaN to 0 and truncates the fraction.
    let total_ms = (seconds * 1000.0) as u64;

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Formats seconds as `MM:SS` for the bilingual report.
///
/// There is no hour field; minutes keep counting past 59.
pub fn format_display_timestamp(seconds: f64) -> String {
    let total_secs = seconds as u64;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use regex::Regex;

    /// Parses `HH:MM:SS,mmm` back into seconds.
    pub(crate) fn parse_srt_timestamp(value: &str) -> f64 {
        let re = Regex::new(r"^(\d{2,}):(\d{2}):(\d{2}),(\d{3})$").unwrap();
        let caps = re.captures(value).unwrap();
        let field = |i: usize| caps[i].parse::<f64>().unwrap();
        field(1) * 3600.0 + field(2) * 60.0 + field(3) + field(4) / 1000.0
    }

    const SAMPLES: &[f64] = &[
        0.0, 0.0005, 0.999, 1.0, 1.001, 2.4, 59.9999, 61.25, 3599.999, 3600.0, 3661.5, 45296.789,
        359999.999, 360000.0, 1234567.891,
    ];

    #[test]
    fn test_srt_known_values() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(2.5), "00:00:02,500");
        assert_eq!(format_srt_timestamp(3661.5), "01:01:01,500");
        assert_eq!(format_srt_timestamp(45296.75), "12:34:56,750");
    }

    #[test]
    fn test_srt_truncates_instead_of_rounding() {
        assert_eq!(format_srt_timestamp(0.9999), "00:00:00,999");
        assert_eq!(format_srt_timestamp(59.9999), "00:00:59,999");
    }

    #[test]
    fn test_srt_hours_grow_past_two_digits() {
        assert_eq!(format_srt_timestamp(360000.0), "100:00:00,000");
    }

    #[test]
    fn test_srt_shape_and_parse_back_within_one_ms() {
        let shape = Regex::new(r"^\d{2,}:\d{2}:\d{2},\d{3}$").unwrap();
        for &s in SAMPLES {
            let formatted = format_srt_timestamp(s);
            assert!(shape.is_match(&formatted), "{formatted}");

            let parsed = parse_srt_timestamp(&formatted);
            assert!(parsed <= s + 1e-9, "{s} rounded up to {parsed}");
            assert!(s - parsed < 0.001 + 1e-9, "{s} parsed as {parsed}");
        }
    }

    #[test]
    fn test_display_shape_and_minutes() {
        let shape = Regex::new(r"^\d{2,}:\d{2}$").unwrap();
        for &s in SAMPLES {
            let formatted = format_display_timestamp(s);
            assert!(shape.is_match(&formatted), "{formatted}");

            let minutes: u64 = formatted.split(':').next().unwrap().parse().unwrap();
            assert_eq!(minutes, (s / 60.0).floor() as u64);
        }
    }

    #[test]
    fn test_display_known_values() {
        assert_eq!(format_display_timestamp(0.0), "00:00");
        assert_eq!(format_display_timestamp(65.9), "01:05");
        assert_eq!(format_display_timestamp(3661.0), "61:01");
    }

    #[test]
    fn test_negative_and_nan_saturate_to_zero() {
        assert_eq!(format_srt_timestamp(-3.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(f64::NAN), "00:00:00,000");
        assert_eq!(format_display_timestamp(-3.0), "00:00");
    }
}
