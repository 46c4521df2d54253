use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use learn_core::model::CourseId;
use services::{AppServices, EnrollmentProgressReader, LessonCompletionService, ProgressReporter};

pub trait UiApp: Send + Sync {
    fn start_course(&self) -> Option<CourseId>;

    fn reader(&self) -> Arc<EnrollmentProgressReader>;
    fn reporter(&self) -> Arc<ProgressReporter>;
    fn completion(&self) -> Arc<LessonCompletionService>;
}

impl UiApp for AppServices {
    fn start_course(&self) -> Option<CourseId> {
        AppServices::start_course(self)
    }

    fn reader(&self) -> Arc<EnrollmentProgressReader> {
        AppServices::reader(self)
    }

    fn reporter(&self) -> Arc<ProgressReporter> {
        AppServices::reporter(self)
    }

    fn completion(&self) -> Arc<LessonCompletionService> {
        AppServices::completion(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    start_course: Option<CourseId>,
    start_course_once: Arc<AtomicBool>,

    reader: Arc<EnrollmentProgressReader>,
    reporter: Arc<ProgressReporter>,
    completion: Arc<LessonCompletionService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let start_course = app.start_course();
        Self {
            start_course,
            start_course_once: Arc::new(AtomicBool::new(start_course.is_some())),
            reader: app.reader(),
            reporter: app.reporter(),
            completion: app.completion(),
        }
    }

    /// The configured start course, handed out once per launch.
    #[must_use]
    pub fn take_start_course(&self) -> Option<CourseId> {
        if self.start_course_once.swap(false, Ordering::AcqRel) {
            self.start_course
        } else {
            None
        }
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

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
