use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::LessonId;

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lesson type: {0}")]
pub struct LessonKindError(pub String);

/// What a lesson renders as in the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Text,
    Quiz,
    Assignment,
}

impl LessonKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Text => "text",
            Self::Quiz => "quiz",
            Self::Assignment => "assignment",
        }
    }

    /// Only video lessons have a playback position worth reporting.
    #[must_use]
    pub fn tracks_playback(self) -> bool {
        matches!(self, Self::Video)
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonKind {
    type Err = LessonKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "text" => Ok(Self::Text),
            "quiz" => Ok(Self::Quiz),
            "assignment" => Ok(Self::Assignment),
            other => Err(LessonKindError(other.to_string())),
        }
    }
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Server-reported learner status for a lesson.
///
/// Transitions are expected to go forward but nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Icon shown next to a lesson in the module list. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonBadge {
    Check,
    Play,
    Lock,
}

impl LessonStatus {
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    #[must_use]
    pub fn badge(self, is_preview: bool) -> LessonBadge {
        match self {
            Self::Completed => LessonBadge::Check,
            Self::InProgress => LessonBadge::Play,
            Self::NotStarted if is_preview => LessonBadge::Play,
            Self::NotStarted => LessonBadge::Lock,
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// An atomic unit of content inside a module.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    kind: LessonKind,
    content_url: Option<String>,
    content: Option<String>,
    description: Option<String>,
    duration_minutes: u32,
    order_index: u32,
    is_preview: bool,
    status: LessonStatus,
    progress_percentage: u32,
}

impl Lesson {
    #[must_use]
    pub fn new(id: LessonId, title: impl Into<String>, kind: LessonKind, order_index: u32) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            content_url: None,
            content: None,
            description: None,
            duration_minutes: 0,
            order_index,
            is_preview: false,
            status: LessonStatus::NotStarted,
            progress_percentage: 0,
        }
    }

    #[must_use]
    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_preview(mut self, is_preview: bool) -> Self {
        self.is_preview = is_preview;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, status: LessonStatus, progress_percentage: u32) -> Self {
        self.apply_progress(status, progress_percentage);
        self
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    #[must_use]
    pub fn content_url(&self) -> Option<&str> {
        self.content_url.as_deref()
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn order_index(&self) -> u32 {
        self.order_index
    }

    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.is_preview
    }

    #[must_use]
    pub fn status(&self) -> LessonStatus {
        self.status
    }

    #[must_use]
    pub fn progress_percentage(&self) -> u32 {
        self.progress_percentage
    }

    #[must_use]
    pub fn badge(&self) -> LessonBadge {
        self.status.badge(self.is_preview)
    }

    /// Overwrite status and percentage with values reported by the backend.
    pub fn apply_progress(&mut self, status: LessonStatus, progress_percentage: u32) {
        self.status = status;
        self.progress_percentage = progress_percentage;
    }

    /// Flip to completed at 100%.
    ///
    /// Returns `true` if the lesson was not already completed.
    pub fn mark_completed(&mut self) -> bool {
        let changed = !self.status.is_completed();
        self.apply_progress(LessonStatus::Completed, 100);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Video".parse::<LessonKind>().unwrap(), LessonKind::Video);
        assert_eq!(" quiz ".parse::<LessonKind>().unwrap(), LessonKind::Quiz);
        assert!("podcast".parse::<LessonKind>().is_err());
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let status: LessonStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, LessonStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&LessonStatus::NotStarted).unwrap(),
            "\"not_started\""
        );
    }

    #[test]
    fn badge_reflects_status_and_preview() {
        assert_eq!(LessonStatus::Completed.badge(false), LessonBadge::Check);
        assert_eq!(LessonStatus::InProgress.badge(false), LessonBadge::Play);
        assert_eq!(LessonStatus::NotStarted.badge(false), LessonBadge::Lock);
        assert_eq!(LessonStatus::NotStarted.badge(true), LessonBadge::Play);
    }

    #[test]
    fn mark_completed_reports_whether_it_changed() {
        let mut lesson = Lesson::new(LessonId::new(1), "Intro", LessonKind::Video, 1)
            .with_progress(LessonStatus::InProgress, 40);
        assert!(lesson.mark_completed());
        assert_eq!(lesson.status(), LessonStatus::Completed);
        assert_eq!(lesson.progress_percentage(), 100);
        assert!(!lesson.mark_completed());
    }
}
