//! First-run setup.
//!
//! Writes the default configuration file, stamped with the running version.

pub mod version;

use std::path::Path;

/// Embedded default configuration template.
const DEFAULT_CONFIG: &str = include_str!("../../environments/ejsub.toml");

/// Current application version from Cargo.toml
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Writes the default config to `config_path` unless a file already exists.
///
/// An existing config is left alone so user edits survive upgrades; only its
/// version line is refreshed by [`version::update_config_version`].
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn run_setup(config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() {
        tracing::debug!("Keeping existing config at {}", config_path.display());
        return Ok(());
    }

    if let Some(config_dir) = config_path.parent() {
        std::fs::create_dir_all(config_dir)?;
    }

    let full_config = format!("config_version = \"{CURRENT_VERSION}\"\n{DEFAULT_CONFIG}");
    std::fs::write(config_path, full_config)?;
    tracing::info!("Wrote default config to {}", config_path.display());

    Ok(())
}
