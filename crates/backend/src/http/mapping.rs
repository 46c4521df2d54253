use learn_core::model::{Lesson, LessonId, LessonKind, LessonStatus, Module, ModuleId};
use serde::Deserialize;

use crate::api::ApiError;

/// Responses may come bare or wrapped in `{ "data": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleDto {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub lessons: Vec<LessonDto>,
    #[serde(default)]
    pub completed_lessons: Option<u32>,
    #[serde(default)]
    pub total_lessons: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonDto {
    pub id: LessonId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub status: Option<LessonStatus>,
    #[serde(default)]
    pub progress_percentage: Option<u32>,
}

pub(crate) fn map_lesson(dto: LessonDto) -> Result<Lesson, ApiError> {
    let kind: LessonKind = dto
        .kind
        .parse()
        .map_err(|e: learn_core::model::LessonKindError| ApiError::Domain(e.into()))?;

    let mut lesson = Lesson::new(dto.id, dto.title, kind, dto.order_index)
        .with_preview(dto.is_preview)
        .with_duration_minutes(dto.duration_minutes.unwrap_or_default())
        .with_progress(
            dto.status.unwrap_or_default(),
            dto.progress_percentage.unwrap_or_default(),
        );
    if let Some(url) = dto.content_url.filter(|url| !url.trim().is_empty()) {
        lesson = lesson.with_content_url(url);
    }
    if let Some(content) = dto.content {
        lesson = lesson.with_content(content);
    }
    if let Some(description) = dto.description {
        lesson = lesson.with_description(description);
    }
    Ok(lesson)
}

pub(crate) fn map_module(dto: ModuleDto) -> Result<Module, ApiError> {
    let lessons = dto
        .lessons
        .into_iter()
        .map(map_lesson)
        .collect::<Result<Vec<_>, _>>()?;
    let module = Module::new(dto.id, dto.title, dto.order_index, lessons);
    let completed = dto.completed_lessons.unwrap_or(module.completed_lessons());
    let total = dto.total_lessons.unwrap_or(module.total_lessons());
    Ok(module.with_counts(completed, total))
}

pub(crate) fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data": [1, 2]}"#).unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);
        let bare: Envelope<Vec<u32>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_inner(), vec![3]);
    }

    #[test]
    fn module_maps_with_sorted_lessons_and_counts() {
        let json = r#"{
            "id": 2, "title": "Ownership", "order_index": 1,
            "completed_lessons": 1, "total_lessons": 2,
            "lessons": [
                {"id": 11, "title": "Borrowing", "type": "text", "order_index": 2, "content": "<p>hi</p>"},
                {"id": 10, "title": "Moves", "type": "video", "order_index": 1,
                 "content_url": "https://cdn.example/moves.mp4", "duration_minutes": 12,
                 "status": "completed", "progress_percentage": 100, "is_preview": true}
            ]
        }"#;
        let dto: ModuleDto = serde_json::from_str(json).unwrap();
        let module = map_module(dto).unwrap();

        assert_eq!(module.completed_lessons(), 1);
        assert_eq!(module.total_lessons(), 2);
        let first = &module.lessons()[0];
        assert_eq!(first.id(), LessonId::new(10));
        assert_eq!(first.kind(), LessonKind::Video);
        assert_eq!(first.content_url(), Some("https://cdn.example/moves.mp4"));
        assert!(first.is_preview());
        assert_eq!(first.status(), LessonStatus::Completed);
        assert_eq!(module.lessons()[1].content(), Some("<p>hi</p>"));
    }

    #[test]
    fn unknown_lesson_type_is_rejected() {
        let json = r#"{"id": 1, "title": "x", "type": "podcast"}"#;
        let dto: LessonDto = serde_json::from_str(json).unwrap();
        assert!(matches!(map_lesson(dto), Err(ApiError::Domain(_))));
    }

    #[test]
    fn error_message_prefers_backend_text() {
        assert_eq!(
            error_message(403, r#"{"message": "Anda belum terdaftar"}"#),
            "Anda belum terdaftar"
        );
        assert_eq!(error_message(500, "oops"), "request failed with status 500");
        assert_eq!(error_message(400, r#"{"error": "bad"}"#), "bad");
    }
}
