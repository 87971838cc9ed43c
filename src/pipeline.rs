//! Runs one audio file through recognition and translation.
//!
//! [`spawn_job`] starts the work on a background task so the interactive side
//! stays responsive; the task reports coarse [`Progress`] over a one-way
//! channel and shares no other state. [`Session`] keeps the segments of the
//! last processed file for later save actions.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::subtitle::{self, SubtitleSegment};
use crate::transcription::{self, SpeechRecognizer, TranscriptionError};
use crate::translation::{TranslationContext, Translator};

/// Milestones reported while a file is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Validating,
    Recognizing,
    Translating,
    Done,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "Checking WAV file..."),
            Self::Recognizing => write!(f, "Recognizing English speech..."),
            Self::Translating => write!(f, "Translating into Japanese..."),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Everything produced for one audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub segments: Vec<SubtitleSegment>,
    pub original_text: String,
    pub duration: f64,
}

/// Transcribes `audio_path` and builds its subtitle segments.
///
/// # Errors
/// Returns the [`TranscriptionError`] when transcription fails; translation
/// failures are embedded in the segments instead.
pub async fn process_file<R, T, P>(
    recognizer: &R,
    translator: &T,
    context: TranslationContext,
    audio_path: &Path,
    on_progress: &P,
) -> Result<ProcessedFile, TranscriptionError>
where
    R: SpeechRecognizer,
    T: Translator,
    P: Fn(Progress) + Sync,
{
    let transcription = transcription::transcribe(recognizer, audio_path, on_progress).await?;

    on_progress(Progress::Translating);
    let segments = subtitle::build_segments(&transcription, translator, context).await;

    on_progress(Progress::Done);
    Ok(ProcessedFile {
        segments,
        original_text: transcription.text,
        duration: transcription.duration,
    })
}

/// Handle to a running job.
pub type JobHandle = JoinHandle<Result<ProcessedFile, TranscriptionError>>;

/// Starts processing `audio_path` on a background task.
///
/// Progress arrives on the returned receiver; the channel closes when the job
/// ends. There is no cancellation once started.
pub fn spawn_job<R, T>(
    recognizer: Arc<R>,
    translator: Arc<T>,
    context: TranslationContext,
    audio_path: PathBuf,
) -> (JobHandle, mpsc::UnboundedReceiver<Progress>)
where
    R: SpeechRecognizer + 'static,
    T: Translator + 'static,
{
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        // A closed receiver only means nobody is watching.
        let report = move |progress: Progress| {
            let _ = progress_tx.send(progress);
        };
        process_file(&*recognizer, &*translator, context, &audio_path, &report).await
    });

    (handle, progress_rx)
}

/// The segments of the most recently processed file.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<ProcessedFile>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current result.
    pub fn load(&mut self, processed: ProcessedFile) {
        self.current = Some(processed);
    }

    /// Drops the current result.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn segments(&self) -> &[SubtitleSegment] {
        self.current
            .as_ref()
            .map(|processed| processed.segments.as_slice())
            .unwrap_or_default()
    }

    /// Writes the SRT rendering to `path`.
    ///
    /// # Errors
    /// - If there are no segments to save
    /// - If the file cannot be written
    pub fn save_srt(&self, path: &Path) -> anyhow::Result<()> {
        let segments = self.segments_to_save()?;
        write_output(path, &subtitle::render_srt(segments))
    }

    /// Writes the bilingual rendering to `path`.
    ///
    /// # Errors
    /// - If there are no segments to save
    /// - If the file cannot be written
    pub fn save_bilingual(&self, path: &Path) -> anyhow::Result<()> {
        let segments = self.segments_to_save()?;
        write_output(path, &subtitle::render_bilingual(segments, Local::now()))
    }

    fn segments_to_save(&self) -> anyhow::Result<&[SubtitleSegment]> {
        let segments = self.segments();
        if segments.is_empty() {
            return Err(anyhow::anyhow!("There is no subtitle data to save"));
        }
        Ok(segments)
    }
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("Failed to save '{}': {e}", path.display()))?;
    tracing::info!("Saved {}", path.display());
    Ok(())
}
