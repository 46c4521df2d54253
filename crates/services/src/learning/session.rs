use std::fmt;

use backend::ApiError;
use learn_core::model::{
    Course, Enrollment, EnrollmentId, Lesson, LessonId, Module, ModuleId, ProgressSnapshot,
};
use learn_core::playback::to_whole_percentage;
use learn_core::{Navigator, PlaybackSample, Position};

use crate::error::CompletionError;

/// Identifies the lesson a completion request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionTicket {
    pub enrollment_id: EnrollmentId,
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
}

/// What happened after a successful completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Navigation moved on to the following lesson.
    Advanced(Position),
    /// The completed lesson was the last one; navigation stayed put.
    Finished,
    /// The learner had already moved elsewhere while the request was in flight.
    Stayed,
}

/// In-memory state of one learner working through one course.
///
/// Holds the module/lesson tree, the navigation cursor, the locally tracked
/// playback percentage and the busy flag of the completion action. Nothing here
/// talks to the backend; services feed results in.
pub struct LearningSession {
    enrollment: Enrollment,
    course: Course,
    navigator: Navigator,
    video_progress: f64,
    completing: bool,
}

impl LearningSession {
    #[must_use]
    pub fn new(enrollment: Enrollment, course: Course) -> Self {
        let navigator = Navigator::new(&course);
        let mut session = Self {
            enrollment,
            course,
            navigator,
            video_progress: 0.0,
            completing: false,
        };
        session.video_progress = session.current_lesson_percentage();
        session
    }

    #[must_use]
    pub fn enrollment(&self) -> &Enrollment {
        &self.enrollment
    }

    #[must_use]
    pub fn enrollment_id(&self) -> EnrollmentId {
        self.enrollment.id
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Fold a server snapshot into the tree. The server wins over local flips.
    pub fn merge_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.course.merge_progress(snapshot);
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.navigator.current()
    }

    #[must_use]
    pub fn current_module(&self) -> Option<&Module> {
        let position = self.navigator.current()?;
        self.course.module_at(position.module_index)
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        let position = self.navigator.current()?;
        self.course
            .module_at(position.module_index)?
            .lessons()
            .get(position.lesson_index)
    }

    /// Locally tracked playback percentage of the current lesson.
    #[must_use]
    pub fn video_progress(&self) -> f64 {
        self.video_progress
    }

    #[must_use]
    pub fn is_completing(&self) -> bool {
        self.completing
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.navigator.has_next()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.navigator.has_previous()
    }

    /// Jump to any lesson; the displayed percentage resets to its last known value.
    pub fn select_lesson(&mut self, module_id: ModuleId, lesson_id: LessonId) -> Option<Position> {
        let position = self.navigator.select(module_id, lesson_id)?;
        self.video_progress = self.current_lesson_percentage();
        Some(position)
    }

    pub fn next(&mut self) -> Option<Position> {
        let position = self.navigator.next()?;
        self.video_progress = self.current_lesson_percentage();
        Some(position)
    }

    pub fn previous(&mut self) -> Option<Position> {
        let position = self.navigator.previous()?;
        self.video_progress = self.current_lesson_percentage();
        Some(position)
    }

    pub fn toggle_module(&mut self, module_id: ModuleId) -> bool {
        self.navigator.toggle_module(module_id)
    }

    /// Apply a time update from the video surface of the current lesson.
    ///
    /// Ignored when the current lesson is not a video.
    pub fn record_playback(&mut self, sample: PlaybackSample) -> f64 {
        if self
            .current_lesson()
            .is_some_and(|lesson| lesson.kind().tracks_playback())
        {
            self.video_progress = sample.percentage();
        }
        self.video_progress
    }

    /// Remember a save the backend acknowledged for `lesson_id`.
    ///
    /// Returning to that lesson later resets the displayed percentage and the save
    /// loop's comparison point to this value instead of the one fetched on load.
    pub fn record_saved_progress(&mut self, lesson_id: LessonId, percentage: f64) {
        self.course
            .record_saved_progress(lesson_id, to_whole_percentage(percentage));
    }

    /// Raise the busy flag and describe the lesson to complete.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::Busy` while a previous request is outstanding and
    /// `CompletionError::NoLesson` when nothing is selected.
    pub fn begin_completion(&mut self) -> Result<CompletionTicket, CompletionError> {
        if self.completing {
            return Err(CompletionError::Busy);
        }
        let position = self.navigator.current().ok_or(CompletionError::NoLesson)?;
        self.completing = true;
        Ok(CompletionTicket {
            enrollment_id: self.enrollment.id,
            module_id: position.module_id,
            lesson_id: position.lesson_id,
        })
    }

    /// Lower the busy flag and apply the backend's answer.
    ///
    /// On success the lesson flips to completed at 100%, its module counter moves up
    /// by one and navigation advances. These local changes are provisional until the
    /// next snapshot merge. On failure local state is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::Api` carrying the backend error.
    pub fn finish_completion(
        &mut self,
        ticket: CompletionTicket,
        result: Result<(), ApiError>,
    ) -> Result<CompletionOutcome, CompletionError> {
        self.completing = false;
        result?;

        self.course
            .complete_lesson(ticket.module_id, ticket.lesson_id);

        let still_here = self
            .navigator
            .current()
            .is_some_and(|p| p.lesson_id == ticket.lesson_id && p.module_id == ticket.module_id);
        if !still_here {
            return Ok(CompletionOutcome::Stayed);
        }
        self.video_progress = 100.0;
        Ok(match self.next() {
            Some(position) => CompletionOutcome::Advanced(position),
            None => CompletionOutcome::Finished,
        })
    }

    fn current_lesson_percentage(&self) -> f64 {
        self.current_lesson()
            .map_or(0.0, |lesson| f64::from(lesson.progress_percentage()))
    }
}

impl fmt::Debug for LearningSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearningSession")
            .field("enrollment_id", &self.enrollment.id)
            .field("course_id", &self.course.id())
            .field("position", &self.navigator.current())
            .field("video_progress", &self.video_progress)
            .field("completing", &self.completing)
            .finish_non_exhaustive()
    }
}
