//! Speech recognition for English WAV files.
//!
//! [`transcribe`] is the adapter the rest of the application uses: it
//! validates the file locally, then hands it to a [`SpeechRecognizer`]. Every
//! failure comes back as a [`TranscriptionError`]; nothing is raised past this
//! module in any other form.

pub mod api;
pub mod validate;

use std::path::Path;

use crate::pipeline::Progress;

pub use api::{OpenAiRecognizer, RawSegment, SpeechRecognizer, TranscriptionResult};
pub use validate::validate_wav;

/// Terminal failures of a transcription. Each one ends processing of the file.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("Only WAV files are supported. Convert other formats to WAV first (see 'ejsub convert-help').")]
    WrongFormat,
    #[error("Failed to read WAV file: {0}")]
    Unreadable(#[source] hound::Error),
    #[error("File is too large: {size_mb:.1}MB (limit: 25MB)")]
    TooLarge { size_mb: f64 },
    #[error("Speech recognition error: {0}")]
    Remote(String),
}

/// Validates `audio_path` and transcribes it.
///
/// `on_progress` is told when validation starts and when the upload starts.
///
/// # Errors
/// See [`validate_wav`] for the local checks; any remote failure is returned
/// as [`TranscriptionError::Remote`].
pub async fn transcribe<R, P>(
    recognizer: &R,
    audio_path: &Path,
    on_progress: &P,
) -> Result<TranscriptionResult, TranscriptionError>
where
    R: SpeechRecognizer,
    P: Fn(Progress) + Sync,
{
    on_progress(Progress::Validating);
    let info = validate_wav(audio_path)?;
    tracing::info!(
        "Validated {}: {}ch {}bit {}Hz, {:.2}s, {} bytes",
        audio_path.display(),
        info.channels,
        info.bits_per_sample,
        info.sample_rate,
        info.duration_secs,
        info.file_size
    );

    on_progress(Progress::Recognizing);
    let result = recognizer.recognize(audio_path).await.map_err(|e| {
        tracing::error!("Speech recognition failed: {e}");
        TranscriptionError::Remote(e.to_string())
    })?;

    tracing::info!(
        "Recognized {:.1}s of {} audio in {} segments",
        result.duration,
        result.language,
        result.segments.len()
    );
    Ok(result)
}
