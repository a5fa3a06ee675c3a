//! Application command handlers for rheumassist.
//!
//! # Commands
//! - `tui`: Interactive assistant with Upload Audio, Analysis and Medical Record views
//! - `analyze`: Run one analysis without the UI and print the result
//! - `auth`: Save or remove the inference API key
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod analyze;
pub mod auth;
pub mod config;
pub mod logs;
pub mod tui;

pub use analyze::handle_analyze;
pub use auth::handle_auth;
pub use config::handle_config;
pub use logs::handle_logs;
pub use tui::handle_tui;

use anyhow::anyhow;
use std::sync::Arc;

use crate::config::{resolve_api_key, AssistantConfig, CredentialStore, API_KEY_ENV};
use crate::inference::HttpInferenceClient;
use crate::workflow::SubmissionController;

/// Builds the submission controller from the config file and the stored API key.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If no API key is configured
/// - If the HTTP client cannot be created
fn load_controller() -> anyhow::Result<SubmissionController> {
    let config = AssistantConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {e}");
        anyhow!("Configuration error: {e}")
    })?;

    let store = CredentialStore::default_location()?;
    let api_key = resolve_api_key(&store)?.ok_or_else(|| {
        anyhow!("No API key configured. Please run 'rheumassist auth' or set {API_KEY_ENV}")
    })?;

    let client = HttpInferenceClient::new(
        config.inference.endpoint.clone(),
        api_key,
        config.inference.timeout(),
    )?;
    tracing::info!("Using inference endpoint {}", client.endpoint());

    let controller = SubmissionController::new(Arc::new(client), &config.inference);
    tracing::debug!(
        "Analysis parameters: max_length={}, temperature={}",
        controller.request().parameters.max_length,
        controller.request().parameters.temperature
    );
    Ok(controller)
}
