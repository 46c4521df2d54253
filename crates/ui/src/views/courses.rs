use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CourseCardVm, map_course_cards};

#[component]
pub fn CourseListView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut redirected = use_signal(|| false);
    if !redirected() {
        redirected.set(true);
        if let Some(course_id) = ctx.take_start_course() {
            navigator.replace(Route::CoursePlayer {
                course_id: course_id.value(),
            });
        }
    }

    let reader = ctx.reader();
    let mut resource = use_resource(move || {
        let reader = reader.clone();
        async move {
            let enrollments = reader.my_courses().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_course_cards(&enrollments))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Kursus Saya" }
            match state {
                ViewState::Idle => rsx! {
                    p { class: "muted", "Menunggu..." }
                },
                ViewState::Loading => rsx! {
                    p { class: "muted", "Memuat kursus..." }
                },
                ViewState::Ready(cards) if cards.is_empty() => rsx! {
                    p { class: "muted", "Anda belum terdaftar di kursus apa pun." }
                },
                ViewState::Ready(cards) => rsx! {
                    div { class: "course-grid",
                        for card in cards {
                            CourseCard { key: "{card.course_id}", card }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn",
                        onclick: move |_| resource.restart(),
                        "Coba lagi"
                    }
                },
            }
        }
    }
}

#[component]
fn CourseCard(card: CourseCardVm) -> Element {
    let width = format!("width: {}%", card.progress);
    rsx! {
        div { class: "course-card",
            h3 { "{card.title}" }
            p { class: "muted", "{card.status_label} · {card.progress}% selesai" }
            div { class: "progress-bar",
                span { style: "{width}" }
            }
            p {
                Link {
                    to: Route::CoursePlayer { course_id: card.course_id.value() },
                    "{card.action_label}"
                }
            }
        }
    }
}
