//! First-run setup.
//!
//! Writes the default configuration file when none exists yet.

use std::path::{Path, PathBuf};

use crate::config::get_config_path;

/// Embedded default configuration template.
const DEFAULT_CONFIG: &str = include_str!("../../environments/rheumassist.toml");

/// Current application version from Cargo.toml
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Makes sure the config file exists, creating it from the template if needed.
///
/// Returns the config file path.
///
/// # Errors
/// - If the config path cannot be determined
/// - If the default file cannot be written
pub fn ensure_config() -> anyhow::Result<PathBuf> {
    let config_path = get_config_path()?;

    if config_path.exists() {
        tracing::debug!("Config file present at {}", config_path.display());
    } else {
        write_default_config(&config_path).map_err(|e| {
            tracing::error!("Setup failed: {e}");
            anyhow::anyhow!("Setup failed: {e}")
        })?;
        tracing::info!(
            "Created default configuration (version {}) at {}",
            CURRENT_VERSION,
            config_path.display()
        );
    }

    Ok(config_path)
}

/// The default config file, prefixed with the version that wrote it.
fn default_config_contents() -> String {
    format!("config_version = \"{CURRENT_VERSION}\"\n{DEFAULT_CONFIG}")
}

/// Writes the default config file to `path`.
///
/// # Errors
/// Returns an error if the file cannot be written.
fn write_default_config(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, default_config_contents())?;
    Ok(())
}
