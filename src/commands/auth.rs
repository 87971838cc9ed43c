//! OpenAI API key management.
//!
//! Prompts for an API key, checks it against the models endpoint and stores it.
//! Pressing Enter keeps the key that is already stored.

use cliclack::{intro, note, outro, password};
use console::style;

use crate::config::{self, CredentialStore, EjsubConfig, API_KEY, OPENAI_SECTION};
use crate::http;

/// Handles API key entry and optional endpoint change.
///
/// # Errors
/// - If configuration cannot be loaded or saved
/// - If the prompt is cancelled
/// - If the key is empty and no key is stored
/// - If the API rejects the key
pub async fn handle_auth(base_url: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== ejsub Authentication ===");

    // Let cliclack see Ctrl-C as a cancelled prompt.
    ctrlc::set_handler(move || {})
        .map_err(|e| anyhow::anyhow!("Failed to set Ctrl-C handler: {e}"))?;

    intro(style(" auth ").on_white().black())?;

    let mut config_data = EjsubConfig::load()?;
    if let Some(base_url) = base_url {
        config_data.api.base_url = base_url.trim_end_matches('/').to_string();
        config_data.save()?;
        tracing::info!("API base URL set to {}", config_data.api.base_url);
    }
    note("endpoint", &config_data.api.base_url)?;

    let mut store = CredentialStore::open_default()?;
    let current_key = store
        .get(OPENAI_SECTION, API_KEY)
        .map(str::to_string);

    if std::env::var(config::API_KEY_ENV).is_ok_and(|v| !v.is_empty()) {
        note(
            "environment",
            format!(
                "{} is set and takes precedence over the stored key.",
                config::API_KEY_ENV
            ),
        )?;
    }

    let entered = if current_key.is_some() {
        password("Enter OpenAI API key (press Enter to keep current):")
            .allow_empty()
            .interact()
            .map_err(|e| anyhow::anyhow!("API key input cancelled: {e}"))?
    } else {
        password("Enter OpenAI API key:")
            .interact()
            .map_err(|e| anyhow::anyhow!("API key input cancelled: {e}"))?
    };

    let api_key = match (entered.trim(), current_key) {
        ("", Some(key)) => key,
        ("", None) => return Err(anyhow::anyhow!("API key cannot be empty")),
        (key, _) => key.to_string(),
    };

    let spinner = cliclack::spinner();
    spinner.start("Checking API key...");
    let settings = config_data.openai_settings(api_key.clone());
    if let Err(e) = verify_api_key(&settings.base_url, &settings.api_key).await {
        spinner.error(format!("{e}"));
        return Err(e);
    }
    spinner.stop("API key accepted");

    store.set(OPENAI_SECTION, API_KEY, &api_key)?;

    outro("✅ Configuration saved.")?;
    tracing::info!("API key stored");
    Ok(())
}

/// Lists models with the key to confirm the API accepts it.
async fn verify_api_key(base_url: &str, api_key: &str) -> anyhow::Result<()> {
    let url = format!("{base_url}/models");
    tracing::debug!("Verifying API key against {url}");

    http::send("OpenAI", reqwest::Client::new().get(&url).bearer_auth(api_key)).await?;
    Ok(())
}
