//! Generate subtitles for one or more WAV files.
//!
//! Each file is processed on a background task while the terminal shows its
//! progress. Results are printed in the chosen view and optionally saved as
//! `<stem>.srt` and `<stem>.txt`.

use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{self, CredentialStore, EjsubConfig};
use crate::pipeline::{self, Progress, Session};
use crate::subtitle::render;
use crate::transcription::OpenAiRecognizer;
use crate::translation::OpenAiTranslator;

/// What to print after a file has been processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// English and Japanese side by side with display timestamps
    #[default]
    Bilingual,
    /// The SRT subtitle file
    Srt,
    /// Japanese lines only
    Japanese,
    /// Print nothing
    None,
}

/// Options of the `process` command.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub view: View,
    pub save: bool,
    pub out_dir: Option<PathBuf>,
}

/// Handles subtitle generation for the given files, one at a time.
///
/// A file that fails does not stop the remaining files; the command fails at
/// the end if any file failed.
///
/// # Errors
/// - If configuration or credentials cannot be loaded
/// - If no API key is available
/// - If any file failed to process or save
pub async fn handle_process(files: Vec<PathBuf>, options: ProcessOptions) -> anyhow::Result<()> {
    tracing::info!("=== ejsub Process Command ===");

    let config_data = EjsubConfig::load().map_err(|err| {
        tracing::error!("Failed to load configuration: {err}");
        anyhow::anyhow!("Configuration error: {err}")
    })?;

    let store = CredentialStore::open_default()?;
    let api_key = config::resolve_api_key(&store).ok_or_else(|| {
        anyhow::anyhow!("No OpenAI API key set. Please run 'ejsub auth' first")
    })?;

    let settings = config_data.openai_settings(api_key);
    let context = settings.translation.context;
    let recognizer = Arc::new(OpenAiRecognizer::new(settings.clone()));
    let translator = Arc::new(OpenAiTranslator::new(settings));

    ctrlc::set_handler(|| {
        let _ = console::Term::stderr().show_cursor();
        eprintln!("\nInterrupted");
        std::process::exit(130);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl-C handler: {e}"))?;

    let mut session = Session::new();
    let mut failures = 0;

    for file in &files {
        let file_name = display_name(file);
        let (handle, mut progress_rx) =
            pipeline::spawn_job(recognizer.clone(), translator.clone(), context, file.clone());

        let spinner = cliclack::spinner();
        spinner.start(format!("{file_name}: {}", Progress::Validating));
        while let Some(progress) = progress_rx.recv().await {
            spinner.set_message(format!("{file_name}: {progress}"));
        }

        let outcome = handle
            .await
            .map_err(|e| anyhow::anyhow!("Processing task for {file_name} failed: {e}"))?;

        match outcome {
            Ok(processed) => {
                spinner.stop(format!(
                    "{file_name}: {} subtitles from {:.1}s of audio",
                    processed.segments.len(),
                    processed.duration
                ));
                tracing::debug!("Original transcript: {}", processed.original_text);
                session.load(processed);
            }
            Err(e) => {
                spinner.error(format!("{file_name}: {e}"));
                tracing::error!("Processing {} failed: {e}", file.display());
                session.clear();
                failures += 1;
                continue;
            }
        }

        print_view(options.view, &session, &file_name);

        if options.save {
            if let Err(e) = save_outputs(&session, file, options.out_dir.as_deref()) {
                tracing::error!("{e}");
                cliclack::log::error(format!("{e}"))?;
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!(
            "{failures} of {} file(s) could not be processed or saved",
            files.len()
        ));
    }

    Ok(())
}

fn print_view(view: View, session: &Session, file_name: &str) {
    let segments = session.segments();
    let content = match view {
        View::Bilingual => render::with_file_header(
            file_name,
            &render::render_bilingual(segments, chrono::Local::now()),
        ),
        View::Srt => render::render_srt(segments),
        View::Japanese => render::render_japanese_only(segments, file_name),
        View::None => return,
    };
    print!("{content}");
}

/// Saves `<stem>.srt` and `<stem>.txt` next to the input or into `out_dir`.
fn save_outputs(session: &Session, input: &Path, out_dir: Option<&Path>) -> anyhow::Result<()> {
    let (srt_path, text_path) = output_paths(input, out_dir);

    session.save_srt(&srt_path)?;
    session.save_bilingual(&text_path)?;

    cliclack::log::success(format!(
        "Saved {} and {}",
        srt_path.display(),
        text_path.display()
    ))?;
    Ok(())
}

fn output_paths(input: &Path, out_dir: Option<&Path>) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "subtitles".to_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    (
        dir.join(format!("{stem}.srt")),
        dir.join(format!("{stem}.txt")),
    )
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_default_next_to_input() {
        let (srt, text) = output_paths(Path::new("/audio/talk.wav"), None);
        assert_eq!(srt, PathBuf::from("/audio/talk.srt"));
        assert_eq!(text, PathBuf::from("/audio/talk.txt"));
    }

    #[test]
    fn test_outputs_go_to_out_dir() {
        let (srt, text) = output_paths(Path::new("/audio/talk.WAV"), Some(Path::new("/subs")));
        assert_eq!(srt, PathBuf::from("/subs/talk.srt"));
        assert_eq!(text, PathBuf::from("/subs/talk.txt"));
    }

    #[test]
    fn test_relative_input_without_parent_dir() {
        let (srt, _) = output_paths(Path::new("talk.wav"), None);
        assert_eq!(srt, PathBuf::from("talk.srt"));
    }

    #[test]
    fn test_display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("/audio/talk.wav")), "talk.wav");
    }
}
