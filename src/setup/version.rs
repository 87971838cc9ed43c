//! Config version stamps.
//!
//! The first line of `ejsub.toml` records the version that last wrote it. A
//! stamp older than the running binary, or a missing stamp, means the file
//! should be migrated and re-stamped.

use anyhow::anyhow;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

/// Current application version from Cargo.toml
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version reported for a config file without a stamp.
const LEGACY_VERSION: &str = "unknown (legacy config)";

/// A `major.minor.patch` version.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
struct SemanticVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl SemanticVersion {
    fn parse(version_str: &str) -> anyhow::Result<Self> {
        let parts = version_str
            .trim()
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| anyhow!("Invalid version component '{part}' in '{version_str}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(SemanticVersion {
                major: *major,
                minor: *minor,
                patch: *patch,
            }),
            _ => Err(anyhow!(
                "Invalid version format: '{version_str}'. Expected 'major.minor.patch'"
            )),
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Reads the `config_version = "X.Y.Z"` stamp from the first line.
///
/// A commented-out stamp does not count.
fn read_config_version(config_path: &Path) -> anyhow::Result<Option<String>> {
    let content = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow!("Failed to read {}: {e}", config_path.display()))?;
    let Some(first_line) = content.lines().next() else {
        return Ok(None);
    };

    let regex = Regex::new(r#"^\s*config_version\s*=\s*"([^"]+)""#)?;
    Ok(regex
        .captures(first_line)
        .map(|caps| caps[1].to_string()))
}

/// Returns the version to migrate from, or `None` when the stamp is current.
///
/// A missing file yields `None`; writing the default config is the job of
/// [`super::run_setup`]. A file without a stamp yields a legacy marker.
///
/// # Errors
/// - If the file cannot be read
/// - If the stamp is not a valid version
pub fn check_setup_needed(config_path: &Path) -> anyhow::Result<Option<String>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let Some(config_version) = read_config_version(config_path)? else {
        return Ok(Some(LEGACY_VERSION.to_string()));
    };

    let config_parsed = SemanticVersion::parse(&config_version)?;
    let current_parsed = SemanticVersion::parse(CURRENT_VERSION)?;

    match config_parsed.cmp(&current_parsed) {
        Ordering::Less => Ok(Some(config_version)),
        Ordering::Equal => Ok(None),
        Ordering::Greater => {
            tracing::warn!(
                "Config version {config_parsed} is newer than app version {current_parsed}"
            );
            Ok(None)
        }
    }
}

/// Rewrites the stamp as the first line, keeping every other line.
///
/// # Errors
/// - If the file cannot be read or written
pub fn update_config_version(config_path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(config_path)?;

    let mut new_content = format!(r#"config_version = "{CURRENT_VERSION}""#);
    for line in content
        .lines()
        .filter(|line| !line.trim_start().starts_with("config_version"))
    {
        new_content.push('\n');
        new_content.push_str(line);
    }
    new_content.push('\n');

    std::fs::write(config_path, new_content)?;
    Ok(())
}
