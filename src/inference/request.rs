//! Request body sent to the inference endpoint.

use serde::Serialize;

use crate::config::InferenceSettings;

/// Sampling parameters forwarded with every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InferenceParameters {
    pub max_length: u32,
    pub temperature: f64,
}

/// JSON body of an inference call: `{"inputs": ..., "parameters": {...}}`.
///
/// The selected audio is not part of the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    pub inputs: String,
    pub parameters: InferenceParameters,
}

impl InferenceRequest {
    pub fn from_settings(settings: &InferenceSettings) -> Self {
        Self {
            inputs: settings.prompt.clone(),
            parameters: InferenceParameters {
                max_length: settings.max_length,
                temperature: settings.temperature,
            },
        }
    }
}
