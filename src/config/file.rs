//! Configuration file management for ejsub.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::translation::TranslationContext;

/// Connection settings shared by the recognition and translation clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Speech recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionSettings {
    /// Model sent with every transcription request
    #[serde(default = "default_transcription_model")]
    pub model: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: default_transcription_model(),
        }
    }
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

/// Translation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationSettings {
    /// Chat model used for translation
    #[serde(default = "default_translation_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Which system instruction to use
    #[serde(default)]
    pub context: TranslationContext,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            model: default_translation_model(),
            temperature: default_temperature(),
            context: TranslationContext::default(),
        }
    }
}

fn default_translation_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EjsubConfig {
    /// Version of the binary that last wrote this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub transcription: TranscriptionSettings,
    #[serde(default)]
    pub translation: TranslationSettings,
}

impl EjsubConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config_content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let config: EjsubConfig = toml::from_str(&config_content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_config_path()?)
    }

    /// Saves configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let config_content = toml::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Everything the OpenAI clients need, resolved from config and credentials.
///
/// Built once per command and handed to the clients, so nothing downstream
/// reads global state.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub transcription: TranscriptionSettings,
    pub translation: TranslationSettings,
}

impl EjsubConfig {
    /// Combines this configuration with an API key.
    pub fn openai_settings(&self, api_key: String) -> OpenAiSettings {
        OpenAiSettings {
            api_key,
            base_url: self.api.base_url.trim_end_matches('/').to_string(),
            transcription: self.transcription.clone(),
            translation: self.translation.clone(),
        }
    }
}

/// Retrieves the path to the config file, creating its directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("ejsub");

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create config directory: {e}"))?;

    Ok(config_dir.join("ejsub.toml"))
}
