//! Edit `ejsub.toml` in the user's editor.
//!
//! The file is re-read after the editor exits so a typo in `[api]`,
//! `[transcription]` or `[translation]` is reported immediately, together with
//! the settings the next `ejsub process` run will use.

use cliclack::{intro, log, note, outro};
use console::style;
use std::process::Command;

use crate::config::{get_config_path, EjsubConfig};
use crate::translation::TranslationContext;

/// Editors tried, in order, when `$EDITOR` is unset.
const FALLBACK_EDITORS: [&str; 2] = ["nano", "vi"];

/// Opens the ejsub configuration in an editor and validates the result.
///
/// # Errors
/// - If the config path cannot be determined
/// - If no editor is found or it cannot be started
/// - If the editor exits with a failure status
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = get_config_path()?;
    intro(style(" config ").on_white().black())?;
    note("file", config_path.display())?;

    let editor = pick_editor(std::env::var("EDITOR").ok(), is_editor_available).ok_or_else(|| {
        anyhow::anyhow!("No editor found. Set $EDITOR to edit {}", config_path.display())
    })?;
    tracing::info!("Editing {} with {editor}", config_path.display());

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to start editor '{editor}': {e}"))?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor '{editor}' exited with code {}; the configuration was not checked",
            status.code().unwrap_or(-1)
        ));
    }

    match EjsubConfig::load_from(&config_path) {
        Ok(config_data) => {
            note("settings for the next run", describe_settings(&config_data))?;
            outro("Configuration is valid.")?;
            tracing::info!("Config file edited and validated");
        }
        Err(e) => {
            tracing::warn!("Edited config does not parse: {e}");
            log::warning(format!("{e}"))?;
            outro("Fix the file with 'ejsub config' before running 'ejsub process'.")?;
        }
    }

    Ok(())
}

/// One line per config section, as shown after editing.
fn describe_settings(config_data: &EjsubConfig) -> String {
    let context = match config_data.translation.context {
        TranslationContext::Subtitle => "subtitle",
        TranslationContext::General => "general",
    };

    format!(
        "api            {}\ntranscription  {} (English)\ntranslation    {}, temperature {}, {context} context",
        config_data.api.base_url,
        config_data.transcription.model,
        config_data.translation.model,
        config_data.translation.temperature,
    )
}

/// `$EDITOR` when set, otherwise the first available fallback.
fn pick_editor(env_editor: Option<String>, available: impl Fn(&str) -> bool) -> Option<String> {
    env_editor
        .filter(|editor| !editor.trim().is_empty())
        .or_else(|| {
            FALLBACK_EDITORS
                .into_iter()
                .find(|editor| available(editor))
                .map(str::to_string)
        })
}

fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
