//! Shared error types for the services crate.

use backend::ApiError;
use learn_core::model::CourseId;
use thiserror::Error;

/// Shown to a learner who opens a course they are not enrolled in.
pub const NOT_ENROLLED_MESSAGE: &str = "Anda belum terdaftar di kursus ini";

/// Errors emitted while resolving and loading a learner's course progress.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressReaderError {
    #[error("Anda belum terdaftar di kursus ini")]
    NotEnrolled { course_id: CourseId },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the "mark lesson complete" flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompletionError {
    #[error("a completion request is already in flight")]
    Busy,
    #[error("no lesson is selected")]
    NoLesson,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CompletionError {
    /// Text for the blocking alert; backend messages pass through verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Errors emitted while loading client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}
