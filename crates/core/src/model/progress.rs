use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, ModuleId};
use crate::model::lesson::LessonStatus;

/// Per-lesson entry of a progress snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: LessonId,
    #[serde(default)]
    pub status: LessonStatus,
    #[serde(default)]
    pub progress_percentage: u32,
}

/// Per-module entry of a progress snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub module_id: ModuleId,
    #[serde(default)]
    pub completed_lessons: u32,
    #[serde(default)]
    pub lessons: Vec<LessonProgress>,
}

/// Combined module/lesson progress for one enrollment, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub module_progress: Vec<ModuleProgress>,
}

/// Body of an "update lesson progress" call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LessonProgressUpdate {
    pub progress_percentage: u32,
    /// Playback position in seconds.
    pub last_position: f64,
}
