//! Credential storage for ejsub.
//!
//! API keys live outside the main config file, in the user's local data
//! directory, with permissions restricted to the owner on Unix. The store is a
//! sectioned key/value table; every `set` is written to disk immediately.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Section holding OpenAI credentials.
pub const OPENAI_SECTION: &str = "openai";
/// Key of the API key inside [`OPENAI_SECTION`].
pub const API_KEY: &str = "api_key";
/// Environment variable that overrides the stored key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Persistent key/value store for credentials.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    sections: Sections,
}

impl CredentialStore {
    /// Opens the store in the default location.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    /// - If an existing credentials file cannot be read or parsed
    pub fn open_default() -> anyhow::Result<Self> {
        let data_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".local")
            .join("share")
            .join("ejsub");
        Self::open(data_dir.join("credentials.toml"))
    }

    /// Opens the store at `path`. A missing file yields an empty store.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let sections = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Failed to read credentials: {e}"))?;
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Credentials file is corrupt: {e}"))?
        } else {
            Sections::new()
        };

        Ok(Self { path, sections })
    }

    /// Returns the stored value, if any. Empty values count as absent.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|values| values.get(key))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Stores a value and persists the whole store.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> anyhow::Result<()> {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.save()
    }

    /// Writes the store to disk with owner-only permissions.
    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create data directory: {e}"))?;
        }

        let content = toml::to_string_pretty(&self.sections)?;
        let mut file = open_private(&self.path)
            .map_err(|e| anyhow::anyhow!("Failed to open credentials file: {e}"))?;
        file.write_all(content.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write credentials: {e}"))?;

        tracing::debug!("Credentials saved to {}", self.path.display());
        Ok(())
    }
}

/// Opens `path` for rewriting; a new file is created with mode 0600 and an
/// existing one is narrowed to 0600 before any content is written.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

/// Resolves the OpenAI API key: environment variable first, then the store.
pub fn resolve_api_key(store: &CredentialStore) -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| store.get(OPENAI_SECTION, API_KEY).map(str::to_string))
}
