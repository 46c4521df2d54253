//! Course learning flow: loading progress, navigating, saving playback, completing.

mod completion;
mod reader;
mod reporter;
mod session;

pub use completion::LessonCompletionService;
pub use reader::{CourseProgress, EnrollmentProgressReader};
pub use reporter::{ProgressReporter, ReportingHandle, SaveOutcome, SavedProgress};
pub use session::{CompletionOutcome, CompletionTicket, LearningSession};
