#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod learning;

pub use backend::ApiError;
pub use learn_core::Clock;

pub use app_services::AppServices;
pub use config::ClientConfig;
pub use error::{CompletionError, ConfigError, NOT_ENROLLED_MESSAGE, ProgressReaderError};
pub use learning::{
    CompletionOutcome, CompletionTicket, CourseProgress, EnrollmentProgressReader,
    LearningSession, LessonCompletionService, ProgressReporter, ReportingHandle, SaveOutcome,
    SavedProgress,
};
