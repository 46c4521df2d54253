use std::collections::{HashMap, HashSet};

use learn_core::model::{Lesson, LessonBadge, LessonId, LessonKind};

/// What the lesson pane renders for the current lesson.
#[derive(Clone, Debug, PartialEq)]
pub enum LessonBodyVm {
    Video { src: Option<String> },
    Text { html: String },
    Generic { description: Option<String> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LessonPaneVm {
    pub lesson_id: LessonId,
    pub title: String,
    pub kind_label: &'static str,
    pub duration_label: Option<String>,
    pub body: LessonBodyVm,
    pub completed: bool,
}

#[must_use]
pub fn map_lesson_pane(lesson: &Lesson) -> LessonPaneVm {
    let body = match lesson.kind() {
        LessonKind::Video => LessonBodyVm::Video {
            src: lesson.content_url().map(str::to_string),
        },
        LessonKind::Text => LessonBodyVm::Text {
            html: sanitize_html(lesson.content().unwrap_or_default()),
        },
        LessonKind::Quiz | LessonKind::Assignment => LessonBodyVm::Generic {
            description: lesson
                .description()
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string),
        },
    };

    LessonPaneVm {
        lesson_id: lesson.id(),
        title: lesson.title().to_string(),
        kind_label: kind_label(lesson.kind()),
        duration_label: duration_label(lesson.duration_minutes()),
        body,
        completed: lesson.status().is_completed(),
    }
}

#[must_use]
pub fn kind_label(kind: LessonKind) -> &'static str {
    match kind {
        LessonKind::Video => "Video",
        LessonKind::Text => "Bacaan",
        LessonKind::Quiz => "Kuis",
        LessonKind::Assignment => "Tugas",
    }
}

#[must_use]
pub fn badge_class(badge: LessonBadge) -> &'static str {
    match badge {
        LessonBadge::Check => "badge-check",
        LessonBadge::Play => "badge-play",
        LessonBadge::Lock => "badge-lock",
    }
}

#[must_use]
pub fn badge_symbol(badge: LessonBadge) -> &'static str {
    match badge {
        LessonBadge::Check => "✓",
        LessonBadge::Play => "▶",
        LessonBadge::Lock => "🔒",
    }
}

fn duration_label(minutes: u32) -> Option<String> {
    (minutes > 0).then(|| format!("{minutes} menit"))
}

/// Allow-list cleaning of lesson HTML before it is injected into the page.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "hr", "em", "strong", "b", "i", "u", "code", "pre",
        "blockquote", "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "table", "thead", "tbody",
        "tr", "th", "td", "img",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href", "title"].into_iter().collect());
    attributes.insert("img", ["src", "alt", "title"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}
