//! Bilingual subtitle segments and their text renderings.
//!
//! [`build_segments`] turns a transcription into translated segments; the
//! `render` functions turn those segments into SRT, the bilingual report and
//! the Japanese-only listing.

pub mod render;
pub mod timestamp;

use crate::transcription::TranscriptionResult;
use crate::translation::{translate_text, TranslationContext, Translator};

pub use render::{render_bilingual, render_srt};

/// One subtitle cue with both language variants.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleSegment {
    pub start: f64,
    pub end: f64,
    pub english: String,
    pub japanese: String,
}

/// Builds translated subtitle segments from a transcription.
///
/// Without raw segments the whole transcript becomes one cue spanning
/// `[0, duration]`. Otherwise each raw segment with non-blank text becomes one
/// cue, in API order, keeping its start and end; blank segments are skipped.
/// Translation failures are stored as the Japanese text and never stop the loop.
pub async fn build_segments<T: Translator>(
    transcription: &TranscriptionResult,
    translator: &T,
    context: TranslationContext,
) -> Vec<SubtitleSegment> {
    if transcription.segments.is_empty() {
        tracing::debug!("No segment data, translating the whole transcript as one cue");
        let japanese = translate_text(translator, &transcription.text, context).await;
        return vec![SubtitleSegment {
            start: 0.0,
            end: transcription.duration,
            english: transcription.text.clone(),
            japanese,
        }];
    }

    let mut segments = Vec::with_capacity(transcription.segments.len());
    for (index, raw) in transcription.segments.iter().enumerate() {
        let english = raw.text.trim();
        if english.is_empty() {
            tracing::debug!("Skipping blank segment #{index} at {:.2}s", raw.start);
            continue;
        }

        let japanese = translate_text(translator, english, context).await;
        segments.push(SubtitleSegment {
            start: raw.start,
            end: raw.end,
            english: english.to_string(),
            japanese,
        });
    }

    tracing::info!(
        "Built {} subtitle segments from {} raw segments",
        segments.len(),
        transcription.segments.len()
    );
    segments
}
