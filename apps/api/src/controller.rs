//! Application State Controller — owns the submission state machine.
//!
//! States: `Idle` → `Submitting` → `Succeeded` | `Failed`, with any
//! terminal state re-entering `Submitting` on the next valid submit.
//! At most one submission is in flight; a second submit while one runs is
//! rejected. Every transition is broadcast on a watch channel so any
//! presentation layer can follow along without polling the controller.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::provider::AnalysisProvider;
use crate::encoding::{self, DocumentSource};
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRequest, AnalysisResult};

/// Shown when the user submits without a document or a job title.
pub const MISSING_INPUTS_MESSAGE: &str = "Please upload your resume and provide a job title.";

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// The full lifecycle of one analysis, as seen by the presentation layer.
#[derive(Debug, Clone, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    Failed {
        message: String,
    },
}

/// Raw user input for one submit attempt. Both fields are validated
/// before anything is encoded or sent.
#[derive(Debug, Clone)]
pub struct Submission {
    pub document: Option<DocumentSource>,
    pub role_title: String,
}

pub struct AnalysisController {
    provider: Arc<dyn AnalysisProvider>,
    state_tx: watch::Sender<AnalysisState>,
}

impl AnalysisController {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        let (state_tx, _) = watch::channel(AnalysisState::Idle);
        Self { provider, state_tx }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AnalysisState {
        self.state_tx.borrow().clone()
    }

    /// Subscribes to state transitions. The receiver sees every
    /// `Submitting`/`Succeeded`/`Failed` change.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state_tx.subscribe()
    }

    /// Runs one submission through validation → encode → analyze.
    ///
    /// Validation failures leave the current state untouched and make no
    /// provider call. A submit while another is in flight is rejected the
    /// same way. Otherwise the prior result or error is cleared, the
    /// state passes through `Submitting`, and lands in `Succeeded` or
    /// `Failed`.
    pub async fn submit(&self, submission: Submission) -> Result<AnalysisResult, AppError> {
        let document = match submission.document {
            Some(doc) if !doc.is_empty() => doc,
            _ => return Err(AppError::Validation(MISSING_INPUTS_MESSAGE.to_string())),
        };
        let role_title = submission.role_title.trim().to_string();
        if role_title.is_empty() {
            return Err(AppError::Validation(MISSING_INPUTS_MESSAGE.to_string()));
        }

        // Claim the single in-flight slot, clearing any prior result or
        // error. send_if_modified updates the value even with no
        // subscribers listening.
        let claimed = self.state_tx.send_if_modified(|state| {
            if matches!(state, AnalysisState::Submitting) {
                false
            } else {
                *state = AnalysisState::Submitting;
                true
            }
        });
        if !claimed {
            return Err(AppError::Busy);
        }

        let submission_id = Uuid::new_v4();
        info!(%submission_id, role_title = %role_title, "analysis submission started");

        match self.run(&document, role_title).await {
            Ok(result) => {
                info!(
                    %submission_id,
                    score = result.match_percentage,
                    "analysis submission succeeded"
                );
                self.state_tx
                    .send_replace(AnalysisState::Succeeded(result.clone()));
                Ok(result)
            }
            Err(err) => {
                error!(%submission_id, "analysis submission failed: {err}");
                self.state_tx.send_replace(AnalysisState::Failed {
                    message: failure_message(&err),
                });
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        document: &DocumentSource,
        role_title: String,
    ) -> Result<AnalysisResult, AppError> {
        let document_data = encoding::resolve(document).await?;
        let request = AnalysisRequest {
            document_data,
            media_type: document.media_type().to_string(),
            role_title,
        };
        self.provider.analyze(&request).await
    }
}

/// The user-visible failure text: the error's own message, or the generic
/// fallback when it is blank.
fn failure_message(err: &AppError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    use crate::llm_client::LlmError;

    enum StubMode {
        Succeed,
        Fail,
        FailOnce,
        BlockUntil(Arc<Notify>),
    }

    struct StubProvider {
        calls: Arc<AtomicUsize>,
        mode: StubMode,
    }

    #[async_trait::async_trait]
    impl AnalysisProvider for StubProvider {
        async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
            let prior_calls = self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.mode {
                StubMode::Succeed => Ok(sample_result()),
                StubMode::Fail => Err(AppError::Analysis {
                    cause: LlmError::EmptyContent,
                }),
                StubMode::FailOnce if prior_calls == 0 => Err(AppError::Analysis {
                    cause: LlmError::EmptyContent,
                }),
                StubMode::FailOnce => Ok(sample_result()),
                StubMode::BlockUntil(release) => {
                    release.notified().await;
                    Ok(sample_result())
                }
            }
        }
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            match_percentage: 67,
            summary: "Solid fit with one gap.".to_string(),
            matching_skills: vec!["SQL".to_string(), "Python".to_string()],
            missing_skills: vec!["Go".to_string()],
            career_guidance: "Learn Go.\nShip a Go service.".to_string(),
            interview_questions: vec!["Describe a data pipeline you built.".to_string()],
        }
    }

    fn controller_with(mode: StubMode) -> (AnalysisController, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = StubProvider {
            calls: calls.clone(),
            mode,
        };
        (AnalysisController::new(Arc::new(provider)), calls)
    }

    fn pdf_document() -> DocumentSource {
        DocumentSource::Bytes {
            bytes: bytes::Bytes::from_static(b"%PDF-1.4"),
            media_type: "application/pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_without_inputs_stays_idle_and_makes_no_call() {
        let (controller, calls) = controller_with(StubMode::Succeed);

        let err = controller
            .submit(Submission {
                document: None,
                role_title: String::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), MISSING_INPUTS_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(matches!(controller.state(), AnalysisState::Idle));
    }

    #[tokio::test]
    async fn test_submit_with_blank_role_title_is_rejected() {
        let (controller, calls) = controller_with(StubMode::Succeed);

        let err = controller
            .submit(Submission {
                document: Some(pdf_document()),
                role_title: "   ".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_submit_lands_in_succeeded() {
        let (controller, calls) = controller_with(StubMode::Succeed);

        let result = controller
            .submit(Submission {
                document: Some(pdf_document()),
                role_title: "Data Engineer".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.match_percentage, 67);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match controller.state() {
            AnalysisState::Succeeded(r) => assert_eq!(r.match_percentage, 67),
            other => panic!("expected Succeeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provider_failure_lands_in_failed_with_fixed_message() {
        let (controller, _) = controller_with(StubMode::Fail);

        let err = controller
            .submit(Submission {
                document: Some(pdf_document()),
                role_title: "Data Engineer".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Analysis { .. }));
        match controller.state() {
            AnalysisState::Failed { message } => {
                assert_eq!(message, "Failed to get analysis from AI");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreadable_document_lands_in_failed() {
        let (controller, calls) = controller_with(StubMode::Succeed);

        let err = controller
            .submit(Submission {
                document: Some(DocumentSource::Path {
                    path: "/nonexistent/resume.pdf".into(),
                    media_type: "application/pdf".to_string(),
                }),
                role_title: "Data Engineer".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Encoding(_)));
        // The encoder fails before the provider is ever reached
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match controller.state() {
            AnalysisState::Failed { message } => {
                assert!(message.contains("Failed to read resume document"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_rejected() {
        let release = Arc::new(Notify::new());
        let (controller, calls) = controller_with(StubMode::BlockUntil(release.clone()));
        let controller = Arc::new(controller);

        let mut states = controller.subscribe();
        let first = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .submit(Submission {
                        document: Some(pdf_document()),
                        role_title: "Data Engineer".to_string(),
                    })
                    .await
            })
        };

        states
            .wait_for(|s| matches!(s, AnalysisState::Submitting))
            .await
            .unwrap();

        let err = controller
            .submit(Submission {
                document: Some(pdf_document()),
                role_title: "Data Engineer".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Busy));

        release.notify_one();
        let result = first.await.unwrap().unwrap();
        assert_eq!(result.match_percentage, 67);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(controller.state(), AnalysisState::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_resubmit_replaces_prior_failure() {
        let (controller, calls) = controller_with(StubMode::FailOnce);
        let submission = Submission {
            document: Some(pdf_document()),
            role_title: "Data Engineer".to_string(),
        };

        let _ = controller.submit(submission.clone()).await;
        assert!(matches!(controller.state(), AnalysisState::Failed { .. }));

        controller.submit(submission).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(controller.state(), AnalysisState::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_subscribers_observe_each_transition() {
        let (controller, _) = controller_with(StubMode::Succeed);
        let mut states = controller.subscribe();

        controller
            .submit(Submission {
                document: Some(pdf_document()),
                role_title: "Data Engineer".to_string(),
            })
            .await
            .unwrap();

        // Both transitions were published; the receiver can catch up to
        // the latest even if it missed the intermediate one.
        states.changed().await.unwrap();
        assert!(matches!(
            *states.borrow_and_update(),
            AnalysisState::Succeeded(_)
        ));
    }

    #[test]
    fn test_blank_error_message_falls_back_to_generic_text() {
        let err = AppError::Validation("   ".to_string());
        assert_eq!(failure_message(&err), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_failure_message_uses_error_display() {
        let err = AppError::Analysis {
            cause: LlmError::EmptyContent,
        };
        assert_eq!(failure_message(&err), "Failed to get analysis from AI");
    }
}
