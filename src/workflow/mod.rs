//! Upload, validate, submit and display workflow.
//!
//! The workflow is split into three stages that share a single in-memory
//! [`Workflow`] state:
//! - `input`: turns a chosen path into a [`SelectedFile`] and checks its media type
//! - `submission`: sends the analysis request and settles the outcome
//! - `state`: the state itself and the transitions both stages drive
//!
//! Rendering lives in `crate::ui` and only reads this state.

pub mod input;
pub mod state;
pub mod submission;

pub use input::SelectedFile;
pub use state::{Analysis, Phase, Step, Workflow};
pub use submission::SubmissionController;

use thiserror::Error;

/// Errors the user can recover from locally by choosing another file or retrying.
///
/// The `Display` output of each variant is the exact text shown in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The declared media type does not start with `audio/`
    #[error("Please select a valid audio file (e.g., .mp3, .wav)")]
    InvalidMediaType { media_type: String },

    /// Submission was requested before any audio file was stored
    #[error("Please upload an audio file before proceeding.")]
    NoFileSelected,

    /// The chosen path could not be opened as a regular file
    #[error("Cannot open {path}: {reason}")]
    FileUnavailable { path: String, reason: String },

    /// A submission is already outstanding
    #[error("An analysis is already in progress. Please wait for it to finish.")]
    SubmissionInProgress,
}
