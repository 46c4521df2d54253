use std::sync::Arc;

use backend::{ApiError, Backend, HttpBackend};
use learn_core::model::CourseId;

use crate::Clock;
use crate::config::ClientConfig;
use crate::learning::{EnrollmentProgressReader, LessonCompletionService, ProgressReporter};

/// Assembles app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    start_course: Option<CourseId>,
    reader: Arc<EnrollmentProgressReader>,
    reporter: Arc<ProgressReporter>,
    completion: Arc<LessonCompletionService>,
}

impl AppServices {
    #[must_use]
    pub fn new(backend: &Backend, config: &ClientConfig, clock: Clock) -> Self {
        let reader = EnrollmentProgressReader::new(
            Arc::clone(&backend.enrollments),
            Arc::clone(&backend.modules),
        );
        let reporter = ProgressReporter::new(Arc::clone(&backend.enrollments), config.progress, clock);
        let completion =
            LessonCompletionService::new(Arc::clone(&backend.enrollments), reader.clone());

        Self {
            start_course: config.course_id,
            reader: Arc::new(reader),
            reporter: Arc::new(reporter),
            completion: Arc::new(completion),
        }
    }

    /// Build services talking JSON over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the base URL is invalid or the client cannot be built.
    pub fn http(config: &ClientConfig, clock: Clock) -> Result<Self, ApiError> {
        let backend = Backend::from_adapter(HttpBackend::new(config.http_config())?);
        Ok(Self::new(&backend, config, clock))
    }

    /// Course to open on launch, if configured.
    #[must_use]
    pub fn start_course(&self) -> Option<CourseId> {
        self.start_course
    }

    #[must_use]
    pub fn reader(&self) -> Arc<EnrollmentProgressReader> {
        Arc::clone(&self.reader)
    }

    #[must_use]
    pub fn reporter(&self) -> Arc<ProgressReporter> {
        Arc::clone(&self.reporter)
    }

    #[must_use]
    pub fn completion(&self) -> Arc<LessonCompletionService> {
        Arc::clone(&self.completion)
    }
}
