mod course;
mod enrollment;
mod ids;
mod lesson;
mod progress;

pub use ids::{CourseId, EnrollmentId, LessonId, ModuleId, ParseIdError};

pub use course::{Course, Module};
pub use enrollment::Enrollment;
pub use lesson::{Lesson, LessonBadge, LessonKind, LessonKindError, LessonStatus};
pub use progress::{LessonProgress, LessonProgressUpdate, ModuleProgress, ProgressSnapshot};
