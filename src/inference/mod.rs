//! Hosted language-model inference client.
//!
//! The endpoint is treated as opaque: a JSON prompt goes in, arbitrary JSON
//! comes back. The [`InferenceClient`] trait is the seam the submission
//! controller talks to; [`HttpInferenceClient`] is the reqwest implementation.

pub mod client;
pub mod error;
pub mod request;

pub use client::{HttpInferenceClient, InferenceClient};
pub use error::InferenceError;
pub use request::{InferenceParameters, InferenceRequest};
