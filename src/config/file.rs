//! Configuration file management for rheumassist.
//!
//! Configuration is stored in `~/.config/rheumassist/rheumassist.toml`.
//! Every field has a default, so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default hosted model used for case analysis.
pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/meta-llama/Llama-2-70b-chat-hf";

/// Inference endpoint and request parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceSettings {
    /// URL the analysis request is POSTed to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Prompt sent as `inputs`
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Maximum length of the generated output
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_prompt() -> String {
    "Analyze this rheumatology case...".to_string()
}

fn default_max_length() -> u32 {
    2000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            prompt: default_prompt(),
            max_length: default_max_length(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl InferenceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete application configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Version of rheumassist that wrote the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<String>,
    #[serde(default)]
    pub inference: InferenceSettings,
}

impl AssistantConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {}: {e}", path.display())
        })?;
        let config: AssistantConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {e}", path.display()))?;
        tracing::debug!(
            "Configuration loaded from {} (written by version {})",
            path.display(),
            config.config_version.as_deref().unwrap_or("unknown")
        );
        Ok(config)
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
        .join("rheumassist");

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create config directory: {e}"))?;

    Ok(config_dir.join("rheumassist.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_template_matches_defaults() {
        let template = include_str!("../../environments/rheumassist.toml");
        let config: AssistantConfig = toml::from_str(template).unwrap();
        assert_eq!(config.inference, InferenceSettings::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AssistantConfig = toml::from_str(
            r#"
            config_version = "0.1.0"

            [inference]
            temperature = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.config_version.as_deref(), Some("0.1.0"));
        assert_eq!(config.inference.temperature, 0.2);
        assert_eq!(config.inference.max_length, 2000);
        assert_eq!(config.inference.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.inference.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config: AssistantConfig = toml::from_str("").unwrap();
        assert_eq!(config.inference, InferenceSettings::default());
    }

    #[test]
    fn test_load_from_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rheumassist.toml");
        fs::write(&path, "[inference\nendpoint = 1").unwrap();

        let err = AssistantConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config file"));
    }
}
