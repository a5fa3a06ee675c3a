//! Inference API key management.
//!
//! Prompts for the key and stores it outside the config file. Users can keep an
//! existing key by pressing Enter without entering anything.

use anyhow::anyhow;
use cliclack::{intro, note, outro, password};
use console::style;

use crate::config::{ApiKey, CredentialStore};

/// Prompts for and saves the API key, or removes it when `remove` is set.
///
/// # Errors
/// - If the prompt is cancelled
/// - If an empty key is entered and none is stored
/// - If the credentials file cannot be written
pub fn handle_auth(remove: bool) -> Result<(), anyhow::Error> {
    tracing::info!("=== rheumassist Authentication ===");

    let store = CredentialStore::default_location()?;

    if remove {
        store.clear()?;
        println!("API key removed.");
        return Ok(());
    }

    // Let cliclack handle Ctrl-C as a cancelled prompt
    ctrlc::set_handler(move || {})
        .map_err(|e| anyhow!("Failed to set Ctrl-C handler: {e}"))?;

    intro(style(" auth ").on_white().black())?;

    let current = store.load().ok().flatten();

    let entered = if current.is_some() {
        note("API key", "An inference API key is already saved.")?;
        password("Enter inference API key (press Enter to keep current):")
            .allow_empty()
            .interact()
            .map_err(|e| anyhow!("API key input cancelled: {e}"))?
    } else {
        password("Enter inference API key:")
            .interact()
            .map_err(|e| anyhow!("API key input cancelled: {e}"))?
    };

    let key = match (ApiKey::new(&entered), current) {
        (Some(key), _) => key,
        (None, Some(existing)) => existing,
        (None, None) => return Err(anyhow!("API key cannot be empty")),
    };

    store.save(&key)?;

    outro("✅ API key saved.")?;
    tracing::info!("Authentication completed");

    Ok(())
}
