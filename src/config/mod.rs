//! Configuration management for rheumassist.
//!
//! This module handles loading the application configuration from a TOML file
//! in the user's config directory, and storing the inference API key with
//! restricted permissions in the user's local data directory. The key is
//! never written to the config file.

pub mod file;
pub mod secrets;

pub use file::{get_config_path, AssistantConfig, InferenceSettings};
pub use secrets::{resolve_api_key, ApiKey, CredentialStore, API_KEY_ENV};
