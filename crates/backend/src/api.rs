use std::sync::Arc;

use async_trait::async_trait;
use learn_core::model::{
    CourseId, Enrollment, EnrollmentId, LessonId, LessonProgressUpdate, Module, ProgressSnapshot,
};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Domain(#[from] learn_core::Error),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    /// Text suitable for showing to the learner.
    ///
    /// Backend rejections carry their own message, which is passed through verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => "Terjadi kesalahan. Silakan coba lagi.".to_string(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Enrollment endpoints of the learning backend.
#[async_trait]
pub trait EnrollmentApi: Send + Sync {
    /// All enrollments of the signed-in learner.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body cannot be decoded.
    async fn get_my_courses(&self) -> Result<Vec<Enrollment>, ApiError>;

    /// Module and lesson progress for one enrollment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body cannot be decoded.
    async fn get_enrollment_progress(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<ProgressSnapshot, ApiError>;

    /// Push the current playback progress of a lesson. The response is an acknowledgement only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the update or is unreachable.
    async fn update_lesson_progress(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        update: LessonProgressUpdate,
    ) -> Result<(), ApiError>;

    /// Mark a lesson as completed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message when refused.
    async fn complete_lesson(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
    ) -> Result<(), ApiError>;
}

/// Course structure endpoints of the learning backend.
#[async_trait]
pub trait ModuleApi: Send + Sync {
    /// Ordered modules of a course, each with its ordered lessons.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body cannot be decoded.
    async fn get_course_modules(&self, course_id: CourseId) -> Result<Vec<Module>, ApiError>;
}

/// Both backend contracts behind trait objects, so adapters can be swapped.
#[derive(Clone)]
pub struct Backend {
    pub enrollments: Arc<dyn EnrollmentApi>,
    pub modules: Arc<dyn ModuleApi>,
}

impl Backend {
    #[must_use]
    pub fn new(enrollments: Arc<dyn EnrollmentApi>, modules: Arc<dyn ModuleApi>) -> Self {
        Self {
            enrollments,
            modules,
        }
    }

    /// Use one adapter for both contracts.
    #[must_use]
    pub fn from_adapter<A>(adapter: A) -> Self
    where
        A: EnrollmentApi + ModuleApi + 'static,
    {
        let adapter = Arc::new(adapter);
        let enrollments: Arc<dyn EnrollmentApi> = adapter.clone();
        let modules: Arc<dyn ModuleApi> = adapter;
        Self {
            enrollments,
            modules,
        }
    }
}
