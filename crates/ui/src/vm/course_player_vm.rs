use learn_core::PlaybackSample;
use learn_core::model::{EnrollmentId, LessonId, LessonKind, ModuleId, ProgressSnapshot};
use learn_core::playback::to_whole_percentage;
use services::{
    ApiError, CompletionError, CompletionOutcome, CompletionTicket, CourseProgress,
    LearningSession,
};

use super::lesson_vm::{LessonPaneVm, badge_class, badge_symbol, map_lesson_pane};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerIntent {
    SelectLesson {
        module_id: ModuleId,
        lesson_id: LessonId,
    },
    Next,
    Previous,
    ToggleModule(ModuleId),
    Playback(PlaybackSample),
    MarkComplete,
}

/// Follow-up work a view must do after an intent is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEffect {
    None,
    /// The current lesson changed; rebind playback listeners and the save loop.
    LessonChanged,
    /// Send the completion call for this ticket.
    SubmitCompletion(CompletionTicket),
}

/// The video save loop should run for this lesson.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReportingTarget {
    pub enrollment_id: EnrollmentId,
    pub lesson_id: LessonId,
    pub initial_percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LessonRowVm {
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
    pub title: String,
    pub kind_label: &'static str,
    pub badge_class: &'static str,
    pub badge_symbol: &'static str,
    pub is_current: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModuleRowVm {
    pub module_id: ModuleId,
    pub title: String,
    pub progress_label: String,
    pub progress_percentage: u32,
    pub expanded: bool,
    pub lessons: Vec<LessonRowVm>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerHeaderVm {
    pub course_title: String,
    pub overall_progress: u32,
    pub playback_label: String,
    pub can_previous: bool,
    pub can_next: bool,
    pub can_complete: bool,
    pub completing: bool,
}

/// All mutable state of the course player page.
#[derive(Debug)]
pub struct CoursePlayerVm {
    session: LearningSession,
}

impl CoursePlayerVm {
    #[must_use]
    pub fn new(progress: CourseProgress) -> Self {
        Self {
            session: LearningSession::new(progress.enrollment, progress.course),
        }
    }

    #[must_use]
    pub fn session(&self) -> &LearningSession {
        &self.session
    }

    /// Apply one user or player intent.
    pub fn apply(&mut self, intent: PlayerIntent) -> PlayerEffect {
        let before = self.current_lesson_id();
        match intent {
            PlayerIntent::SelectLesson {
                module_id,
                lesson_id,
            } => {
                self.session.select_lesson(module_id, lesson_id);
            }
            PlayerIntent::Next => {
                self.session.next();
            }
            PlayerIntent::Previous => {
                self.session.previous();
            }
            PlayerIntent::ToggleModule(module_id) => {
                self.session.toggle_module(module_id);
            }
            PlayerIntent::Playback(sample) => {
                self.session.record_playback(sample);
            }
            PlayerIntent::MarkComplete => {
                return match self.session.begin_completion() {
                    Ok(ticket) => PlayerEffect::SubmitCompletion(ticket),
                    Err(_) => PlayerEffect::None,
                };
            }
        }
        if intent_may_move(intent) && before != self.current_lesson_id() {
            PlayerEffect::LessonChanged
        } else {
            PlayerEffect::None
        }
    }

    /// Apply the answer to a completion call issued for `ticket`.
    ///
    /// # Errors
    ///
    /// Returns the completion error whose `user_message` goes into the alert.
    pub fn finish_completion(
        &mut self,
        ticket: CompletionTicket,
        result: Result<(), ApiError>,
    ) -> Result<CompletionOutcome, CompletionError> {
        self.session.finish_completion(ticket, result)
    }

    pub fn merge_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.session.merge_snapshot(snapshot);
    }

    /// Keep a save acknowledged by the backend for when the learner returns.
    pub fn record_saved(&mut self, lesson_id: LessonId, percentage: f64) {
        self.session.record_saved_progress(lesson_id, percentage);
    }

    #[must_use]
    pub fn current_lesson_id(&self) -> Option<LessonId> {
        self.session.position().map(|position| position.lesson_id)
    }

    /// Save-loop target for the current lesson, only when it is a video.
    #[must_use]
    pub fn reporting_target(&self) -> Option<ReportingTarget> {
        let lesson = self.session.current_lesson()?;
        (lesson.kind() == LessonKind::Video).then(|| ReportingTarget {
            enrollment_id: self.session.enrollment_id(),
            lesson_id: lesson.id(),
            initial_percentage: f64::from(lesson.progress_percentage()),
        })
    }

    #[must_use]
    pub fn header(&self) -> PlayerHeaderVm {
        let course = self.session.course();
        let can_complete = !self.session.is_completing()
            && self
                .session
                .current_lesson()
                .is_some_and(|lesson| !lesson.status().is_completed());
        PlayerHeaderVm {
            course_title: course.title().to_string(),
            overall_progress: course.overall_progress(),
            playback_label: format!(
                "{}%",
                to_whole_percentage(self.session.video_progress())
            ),
            can_previous: self.session.has_previous(),
            can_next: self.session.has_next(),
            can_complete,
            completing: self.session.is_completing(),
        }
    }

    #[must_use]
    pub fn sidebar(&self) -> Vec<ModuleRowVm> {
        let current = self.current_lesson_id();
        let navigator = self.session.navigator();
        self.session
            .course()
            .modules()
            .iter()
            .map(|module| ModuleRowVm {
                module_id: module.id(),
                title: module.title().to_string(),
                progress_label: format!(
                    "{}/{}",
                    module.completed_lessons(),
                    module.total_lessons()
                ),
                progress_percentage: module.progress_percentage(),
                expanded: navigator.is_expanded(module.id()),
                lessons: module
                    .lessons()
                    .iter()
                    .map(|lesson| LessonRowVm {
                        module_id: module.id(),
                        lesson_id: lesson.id(),
                        title: lesson.title().to_string(),
                        kind_label: super::lesson_vm::kind_label(lesson.kind()),
                        badge_class: badge_class(lesson.badge()),
                        badge_symbol: badge_symbol(lesson.badge()),
                        is_current: current == Some(lesson.id()),
                    })
                    .collect(),
            })
            .collect()
    }

    #[must_use]
    pub fn lesson_pane(&self) -> Option<LessonPaneVm> {
        self.session.current_lesson().map(map_lesson_pane)
    }
}

fn intent_may_move(intent: PlayerIntent) -> bool {
    matches!(
        intent,
        PlayerIntent::SelectLesson { .. } | PlayerIntent::Next | PlayerIntent::Previous
    )
}
