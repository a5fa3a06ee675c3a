//! Submission controller: sends the analysis request and settles the outcome.

use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::state::Workflow;
use super::WorkflowError;
use crate::config::InferenceSettings;
use crate::inference::{InferenceClient, InferenceError, InferenceRequest};

/// Drives one analysis at a time through an [`InferenceClient`].
///
/// The work is split so an interactive caller can keep rendering while the
/// request is in flight:
/// 1. [`begin`](Self::begin) checks preconditions and raises the processing flag
/// 2. [`dispatch`](Self::dispatch) runs the request on a tokio task
/// 3. [`settle`](Self::settle) stores the result or error and lowers the flag
///
/// [`submit`](Self::submit) runs all three in sequence.
pub struct SubmissionController {
    client: Arc<dyn InferenceClient>,
    request: InferenceRequest,
}

impl SubmissionController {
    pub fn new(client: Arc<dyn InferenceClient>, settings: &InferenceSettings) -> Self {
        Self {
            client,
            request: InferenceRequest::from_settings(settings),
        }
    }

    /// The fixed request every submission sends.
    pub fn request(&self) -> &InferenceRequest {
        &self.request
    }

    /// Starts a submission.
    ///
    /// # Errors
    /// - [`WorkflowError::SubmissionInProgress`] if one is outstanding; state is untouched
    /// - [`WorkflowError::NoFileSelected`] if no file is stored; the error is recorded
    pub fn begin(&self, workflow: &mut Workflow) -> Result<InferenceRequest, WorkflowError> {
        if workflow.is_processing() {
            tracing::warn!("Ignoring submission while another analysis is in flight");
            return Err(WorkflowError::SubmissionInProgress);
        }

        let Some(file) = workflow.selected_file() else {
            let err = WorkflowError::NoFileSelected;
            workflow.set_error(err.to_string());
            return Err(err);
        };

        // The audio only gates submission; the endpoint receives the prompt alone.
        tracing::info!("Submitting case analysis for {}", file.name());
        workflow.mark_submitting();
        Ok(self.request.clone())
    }

    /// Sends `request` on a background task.
    pub fn dispatch(&self, request: InferenceRequest) -> JoinHandle<Result<Value, InferenceError>> {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move { client.infer(&request).await })
    }

    /// Records the outcome of a dispatched request and clears the processing flag.
    pub fn settle(&self, workflow: &mut Workflow, outcome: Result<Value, InferenceError>) {
        match outcome {
            Ok(result) => {
                tracing::info!("Analysis completed");
                tracing::debug!("Analysis result: {result}");
                workflow.record_success(result);
            }
            Err(e) => {
                tracing::error!("Analysis failed: {e}");
                workflow.record_failure(format!("Error during analysis: {e}"));
            }
        }
    }

    /// Runs a complete submission and waits for it to settle.
    ///
    /// Failures of the request itself are recorded on `workflow`, not returned.
    ///
    /// # Errors
    /// - If the submission could not start (see [`begin`](Self::begin))
    pub async fn submit(&self, workflow: &mut Workflow) -> Result<(), WorkflowError> {
        let request = self.begin(workflow)?;
        let outcome = self.client.infer(&request).await;
        self.settle(workflow, outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Phase, SelectedFile, Step};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers every request with a fixed outcome and counts calls.
    struct FakeClient {
        outcome: Result<Value, InferenceError>,
        calls: AtomicUsize,
        seen: Mutex<Vec<InferenceRequest>>,
    }

    impl FakeClient {
        fn new(outcome: Result<Value, InferenceError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InferenceClient for FakeClient {
        async fn infer(&self, request: &InferenceRequest) -> Result<Value, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            self.outcome.clone()
        }
    }

    fn controller(client: Arc<FakeClient>) -> SubmissionController {
        SubmissionController::new(client, &InferenceSettings::default())
    }

    fn workflow_with_audio() -> Workflow {
        let mut workflow = Workflow::new();
        workflow
            .select_file(SelectedFile::new("visit.mp3", "audio/mpeg", 4096))
            .unwrap();
        workflow
    }

    #[tokio::test]
    async fn test_submit_without_file_sets_error_and_skips_network() {
        let client = FakeClient::new(Ok(json!({})));
        let controller = controller(client.clone());
        let mut workflow = Workflow::new();

        let result = controller.submit(&mut workflow).await;

        assert_eq!(result, Err(WorkflowError::NoFileSelected));
        assert_eq!(
            workflow.error(),
            Some("Please upload an audio file before proceeding.")
        );
        assert_eq!(client.calls(), 0);
        assert!(!workflow.is_processing());
    }

    #[tokio::test]
    async fn test_successful_submission_shows_analysis() {
        let body = json!({"generated_text": "..."});
        let client = FakeClient::new(Ok(body.clone()));
        let controller = controller(client.clone());
        let mut workflow = workflow_with_audio();

        controller.submit(&mut workflow).await.unwrap();

        assert_eq!(workflow.step(), Step::Analysis);
        assert_eq!(workflow.analysis().unwrap().result, body);
        assert!(workflow.error().is_none());
        assert!(!workflow.is_processing());
        assert_eq!(workflow.phase(), Phase::Succeeded);
        assert_eq!(client.calls(), 1);
        assert_eq!(client.seen.lock().unwrap()[0], *controller.request());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_upload_step() {
        let client = FakeClient::new(Err(InferenceError::Network("timeout".to_string())));
        let controller = controller(client.clone());
        let mut workflow = workflow_with_audio();

        controller.submit(&mut workflow).await.unwrap();

        let error = workflow.error().unwrap();
        assert!(error.starts_with("Error during analysis:"));
        assert!(error.contains("timeout"));
        assert_eq!(workflow.step(), Step::Upload);
        assert!(workflow.analysis().is_none());
        assert!(!workflow.is_processing());
        assert_eq!(workflow.phase(), Phase::Failed);
        assert!(workflow.selected_file().is_some());
    }

    #[tokio::test]
    async fn test_processing_flag_spans_the_request() {
        let client = FakeClient::new(Ok(json!([{"generated_text": "done"}])));
        let controller = controller(client.clone());
        let mut workflow = workflow_with_audio();

        let request = controller.begin(&mut workflow).unwrap();
        assert!(workflow.is_processing());
        assert_eq!(workflow.phase(), Phase::Submitting);

        let outcome = controller.dispatch(request).await.unwrap();
        assert!(workflow.is_processing());

        controller.settle(&mut workflow, outcome);
        assert!(!workflow.is_processing());
        assert_eq!(workflow.step(), Step::Analysis);
    }

    #[tokio::test]
    async fn test_processing_flag_cleared_after_failure() {
        let client = FakeClient::new(Err(InferenceError::Parse("expected value".to_string())));
        let controller = controller(client.clone());
        let mut workflow = workflow_with_audio();

        let request = controller.begin(&mut workflow).unwrap();
        let outcome = controller.dispatch(request).await.unwrap();
        controller.settle(&mut workflow, outcome);

        assert!(!workflow.is_processing());
        assert!(workflow.error().unwrap().contains("expected value"));
    }

    #[tokio::test]
    async fn test_second_submission_while_in_flight_is_rejected() {
        let client = FakeClient::new(Ok(json!({})));
        let controller = controller(client.clone());
        let mut workflow = workflow_with_audio();

        controller.begin(&mut workflow).unwrap();
        let second = controller.submit(&mut workflow).await;

        assert_eq!(second, Err(WorkflowError::SubmissionInProgress));
        assert!(workflow.is_processing());
        assert!(workflow.error().is_none());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_resubmission_after_failure_succeeds() {
        let failing = controller(FakeClient::new(Err(InferenceError::Connect)));
        let working = controller(FakeClient::new(Ok(json!({"generated_text": "ok"}))));
        let mut workflow = workflow_with_audio();

        failing.submit(&mut workflow).await.unwrap();
        assert_eq!(workflow.phase(), Phase::Failed);

        working.submit(&mut workflow).await.unwrap();
        assert_eq!(workflow.phase(), Phase::Succeeded);
        assert_eq!(workflow.step(), Step::Analysis);
        assert!(workflow.analysis().is_some());
    }

    #[tokio::test]
    async fn test_rejection_during_flight_survives_success() {
        let client = FakeClient::new(Ok(json!({"generated_text": "ok"})));
        let controller = controller(client.clone());
        let mut workflow = workflow_with_audio();

        let request = controller.begin(&mut workflow).unwrap();
        workflow
            .select_file(SelectedFile::new("notes.txt", "text/plain", 10))
            .unwrap_err();

        let outcome = controller.dispatch(request).await.unwrap();
        controller.settle(&mut workflow, outcome);

        assert_eq!(
            workflow.error(),
            Some("Please select a valid audio file (e.g., .mp3, .wav)")
        );
        assert_eq!(workflow.step(), Step::Analysis);
        assert_eq!(workflow.selected_file().unwrap().name(), "visit.mp3");
    }
}
