//! Text renderings of a subtitle sequence.
//!
//! Every renderer accepts any slice, including an empty one. Indices are
//! dense over the slice, so cues skipped upstream leave no gaps.

use chrono::{DateTime, Local};
use std::fmt::Write;

use super::timestamp::{format_display_timestamp, format_srt_timestamp};
use super::SubtitleSegment;

const BILINGUAL_TITLE: &str = "English Audio → Japanese Subtitles";

/// Renders SRT cues carrying the Japanese text.
pub fn render_srt(segments: &[SubtitleSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(segment.start),
            format_srt_timestamp(segment.end),
            segment.japanese
        );
    }
    out
}

/// Renders the bilingual EN/JA report.
///
/// `generated_at` is printed in the banner.
pub fn render_bilingual(segments: &[SubtitleSegment], generated_at: DateTime<Local>) -> String {
    let rule = "=".repeat(60);
    let mut out = format!(
        "{rule}\n{BILINGUAL_TITLE}\nGenerated: {}\n{rule}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    for (i, segment) in segments.iter().enumerate() {
        let _ = write!(
            out,
            "[{:03}] {} - {}\nEN: {}\nJA: {}\n{}\n\n",
            i + 1,
            format_display_timestamp(segment.start),
            format_display_timestamp(segment.end),
            segment.english,
            segment.japanese,
            "-".repeat(40)
        );
    }
    out
}

/// Renders only the Japanese lines, headed by the source file name.
pub fn render_japanese_only(segments: &[SubtitleSegment], file_name: &str) -> String {
    let mut out = format!("File: {file_name}\n{}\n\n", "=".repeat(50));
    for (i, segment) in segments.iter().enumerate() {
        let _ = write!(out, "{:02}. {}\n\n", i + 1, segment.japanese);
    }
    out
}

/// Prefixes a rendering with the source file name for on-screen display.
pub fn with_file_header(file_name: &str, content: &str) -> String {
    format!("File: {file_name}\n\n{content}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::timestamp::tests::parse_srt_timestamp;
    use chrono::TimeZone;

    fn segment(start: f64, end: f64, english: &str, japanese: &str) -> SubtitleSegment {
        SubtitleSegment {
            start,
            end,
            english: english.to_string(),
            japanese: japanese.to_string(),
        }
    }

    fn sample() -> Vec<SubtitleSegment> {
        vec![
            segment(0.0, 2.0, "Hi", "こんにちは"),
            segment(4.0, 6.5, "Bye", "さようなら"),
        ]
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_srt_exact_output() {
        assert_eq!(
            render_srt(&sample()),
            "1\n00:00:00,000 --> 00:00:02,000\nこんにちは\n\n\
             2\n00:00:04,000 --> 00:00:06,500\nさようなら\n\n"
        );
    }

    #[test]
    fn test_srt_indices_are_dense() {
        let segments: Vec<_> = (0..5)
            .map(|i| segment(i as f64 * 10.0, i as f64 * 10.0 + 3.0, "en", "ja"))
            .collect();
        let srt = render_srt(&segments);

        let blocks: Vec<&str> = srt.split("\n\n").filter(|b| !b.is_empty()).collect();
        assert_eq!(blocks.len(), 5);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.lines().next().unwrap(), (i + 1).to_string());
        }
    }

    #[test]
    fn test_srt_timestamps_round_trip() {
        let segments = vec![
            segment(0.0, 1.234, "a", "あ"),
            segment(61.5, 65.0009, "b", "い"),
            segment(3599.9, 3725.25, "c", "う"),
        ];
        let srt = render_srt(&segments);

        let ranges: Vec<(f64, f64)> = srt
            .lines()
            .filter(|line| line.contains(" --> "))
            .map(|line| {
                let (start, end) = line.split_once(" --> ").unwrap();
                (parse_srt_timestamp(start), parse_srt_timestamp(end))
            })
            .collect();

        assert_eq!(ranges.len(), segments.len());
        for (segment, (start, end)) in segments.iter().zip(ranges) {
            assert!((segment.start - start).abs() < 0.001 + 1e-9);
            assert!((segment.end - end).abs() < 0.001 + 1e-9);
        }
    }

    #[test]
    fn test_srt_of_nothing_is_empty() {
        assert_eq!(render_srt(&[]), "");
    }

    #[test]
    fn test_bilingual_exact_output() {
        let rule = "=".repeat(60);
        let dashes = "-".repeat(40);
        let expected = format!(
            "{rule}\nEnglish Audio → Japanese Subtitles\nGenerated: 2024-05-01 09:30:00\n{rule}\n\n\
             [001] 00:00 - 00:02\nEN: Hi\nJA: こんにちは\n{dashes}\n\n\
             [002] 00:04 - 00:06\nEN: Bye\nJA: さようなら\n{dashes}\n\n"
        );
        assert_eq!(render_bilingual(&sample(), generated_at()), expected);
    }

    #[test]
    fn test_bilingual_of_nothing_is_banner_only() {
        let text = render_bilingual(&[], generated_at());
        assert!(text.starts_with(&"=".repeat(60)));
        assert!(text.contains("Generated: 2024-05-01 09:30:00"));
        assert!(!text.contains("EN:"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_japanese_only_listing() {
        let text = render_japanese_only(&sample(), "talk.wav");
        assert_eq!(
            text,
            format!(
                "File: talk.wav\n{}\n\n01. こんにちは\n\n02. さようなら\n\n",
                "=".repeat(50)
            )
        );
    }

    #[test]
    fn test_file_header() {
        assert_eq!(with_file_header("talk.wav", "body"), "File: talk.wav\n\nbody");
    }
}
