use std::sync::Arc;

use backend::{ApiError, EnrollmentApi};
use learn_core::model::{EnrollmentId, ProgressSnapshot};
use tracing::{info, warn};

use super::reader::EnrollmentProgressReader;
use super::session::{CompletionOutcome, CompletionTicket, LearningSession};
use crate::error::CompletionError;

/// Explicit "mark lesson complete" flow with server reconciliation.
#[derive(Clone)]
pub struct LessonCompletionService {
    enrollments: Arc<dyn EnrollmentApi>,
    reader: EnrollmentProgressReader,
}

impl LessonCompletionService {
    #[must_use]
    pub fn new(enrollments: Arc<dyn EnrollmentApi>, reader: EnrollmentProgressReader) -> Self {
        Self {
            enrollments,
            reader,
        }
    }

    /// Send the completion call for `ticket`.
    ///
    /// # Errors
    ///
    /// Returns the backend error; rejections carry the server message.
    pub async fn submit(&self, ticket: CompletionTicket) -> Result<(), ApiError> {
        self.enrollments
            .complete_lesson(ticket.enrollment_id, ticket.lesson_id)
            .await?;
        info!(
            enrollment_id = %ticket.enrollment_id,
            lesson_id = %ticket.lesson_id,
            "lesson marked complete"
        );
        Ok(())
    }

    /// Fetch the authoritative snapshot after a local flip.
    ///
    /// Failures are logged and yield `None`; the provisional local state stays.
    pub async fn reconciliation(&self, enrollment_id: EnrollmentId) -> Option<ProgressSnapshot> {
        match self.reader.snapshot(enrollment_id).await {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                warn!(%enrollment_id, %error, "progress reconciliation failed");
                None
            }
        }
    }

    /// Complete the current lesson of `session`, advance, then reconcile.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::Busy` if a completion is already in flight,
    /// `CompletionError::NoLesson` when nothing is selected, or
    /// `CompletionError::Api` when the backend refuses.
    pub async fn complete(
        &self,
        session: &mut LearningSession,
    ) -> Result<CompletionOutcome, CompletionError> {
        let ticket = session.begin_completion()?;
        let result = self.submit(ticket).await;
        let outcome = session.finish_completion(ticket, result)?;
        if let Some(snapshot) = self.reconciliation(ticket.enrollment_id).await {
            session.merge_snapshot(&snapshot);
        }
        Ok(outcome)
    }
}
