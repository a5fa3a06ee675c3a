//! Workflow state and its transitions.

use chrono::{DateTime, Local};
use serde_json::Value;
use std::path::Path;

use super::input::{validate_media_type, SelectedFile};
use super::WorkflowError;

/// The active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Upload,
    Analysis,
    MedicalRecord,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Upload, Step::Analysis, Step::MedicalRecord];

    pub fn title(&self) -> &'static str {
        match self {
            Step::Upload => "Upload Audio",
            Step::Analysis => "Analysis",
            Step::MedicalRecord => "Medical Record",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Step::Upload => 0,
            Step::Analysis => 1,
            Step::MedicalRecord => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The tab to the right, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The tab to the left, wrapping around.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Where the workflow currently stands, derived from the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    /// Short status shown next to the title.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "no file",
            Phase::FileSelected => "ready",
            Phase::Submitting => "analyzing",
            Phase::Succeeded => "analysis ready",
            Phase::Failed => "analysis failed",
        }
    }
}

/// A parsed response from the inference endpoint, stored verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub result: Value,
    pub received_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Succeeded,
    Failed,
}

/// In-memory state shared by the input, submission and presentation stages.
///
/// Invariants:
/// - `processing` is true only while a submission is outstanding
/// - the step moves to [`Step::Analysis`] only after a result was stored
#[derive(Debug, Default)]
pub struct Workflow {
    selected_file: Option<SelectedFile>,
    processing: bool,
    error: Option<String>,
    analysis: Option<Analysis>,
    step: Step,
    outcome: Option<Outcome>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `file` if its media type is audio, otherwise records the error.
    ///
    /// A rejected file never replaces the one already stored and never
    /// changes the current step.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), WorkflowError> {
        tracing::debug!(
            "Selected file: {} ({}, {} bytes)",
            file.path().display(),
            file.media_type(),
            file.size()
        );

        if let Err(e) = validate_media_type(file.media_type()) {
            tracing::info!(
                "Rejected {} with media type '{}'",
                file.name(),
                file.media_type()
            );
            self.error = Some(e.to_string());
            return Err(e);
        }

        tracing::info!("Audio file selected: {}", file.name());
        self.selected_file = Some(file);
        self.error = None;
        self.outcome = None;
        Ok(())
    }

    /// Opens `path` and selects it.
    ///
    /// # Errors
    /// - If the path cannot be opened as a regular file
    /// - If the file's media type is not audio
    pub fn select_path(&mut self, path: &Path) -> Result<(), WorkflowError> {
        match SelectedFile::from_path(path) {
            Ok(file) => self.select_file(file),
            Err(e) => {
                tracing::warn!("File selection failed: {e}");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Switches the active view. Independent of workflow progress.
    pub fn set_step(&mut self, step: Step) {
        if self.step != step {
            tracing::debug!("Switching view to {}", step.title());
            self.step = step;
        }
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn phase(&self) -> Phase {
        if self.processing {
            return Phase::Submitting;
        }
        if self.selected_file.is_none() {
            return Phase::Idle;
        }
        match self.outcome {
            Some(Outcome::Succeeded) => Phase::Succeeded,
            Some(Outcome::Failed) => Phase::Failed,
            None => Phase::FileSelected,
        }
    }

    pub(super) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub(super) fn mark_submitting(&mut self) {
        self.processing = true;
    }

    /// Stores a received result and shows it.
    ///
    /// The error is left alone: only a successful selection clears it.
    pub(super) fn record_success(&mut self, result: Value) {
        self.analysis = Some(Analysis {
            result,
            received_at: Local::now(),
        });
        self.outcome = Some(Outcome::Succeeded);
        self.step = Step::Analysis;
        self.processing = false;
    }

    pub(super) fn record_failure(&mut self, message: String) {
        self.error = Some(message);
        self.outcome = Some(Outcome::Failed);
        self.processing = false;
    }
}
