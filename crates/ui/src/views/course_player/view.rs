use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus::core::Task;
use dioxus_router::use_navigator;
use serde::Deserialize;
use tracing::debug;

use learn_core::PlaybackSample;
use learn_core::model::{CourseId, LessonId};
use services::ReportingHandle;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    CoursePlayerVm, LessonBodyVm, LessonPaneVm, ModuleRowVm, PlayerEffect, PlayerHeaderVm,
    PlayerIntent, format_saved_at,
};

use super::scripts::{
    VIDEO_ELEMENT_ID, alert_script, not_enrolled_alert_script, video_listener_script,
    video_release_script,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const GENERIC_FALLBACK: &str = "Detail akan diberikan oleh instruktur.";

#[derive(Debug, Deserialize)]
struct PlaybackPayload {
    current_time: f64,
    duration: f64,
}

#[component]
pub fn CoursePlayerView(course_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let course_id = CourseId::new(course_id);
    let reader = ctx.reader();
    let reporter = ctx.reporter();
    let completion = ctx.completion();

    let mut vm = use_signal(|| None::<CoursePlayerVm>);
    let mut reporting = use_signal(|| None::<ReportingHandle>);
    let mut listeners = use_signal(Vec::<Task>::new);
    let mut bound_lesson = use_signal(|| None::<LessonId>);
    let mut saved_label = use_signal(|| None::<String>);

    let mut resource = use_resource(move || {
        let reader = reader.clone();
        async move {
            match reader.load(course_id).await {
                Ok(progress) => {
                    vm.set(Some(CoursePlayerVm::new(progress)));
                    Ok::<_, ViewError>(())
                }
                Err(err) => {
                    let err = ViewError::from(err);
                    if err == ViewError::NotEnrolled {
                        let _ = eval(&not_enrolled_alert_script());
                        navigator.replace(Route::MyCourses {});
                    }
                    Err(err)
                }
            }
        }
    });
    let state = view_state_from_resource(&resource);

    // Rebind the save loop and the video listener whenever the current lesson changes.
    use_effect(move || {
        let (current, target) = match vm.read().as_ref() {
            Some(player) => (player.current_lesson_id(), player.reporting_target()),
            None => (None, None),
        };
        if *bound_lesson.peek() == current {
            return;
        }
        bound_lesson.set(current);

        for task in listeners.take() {
            task.cancel();
        }
        let _ = eval(video_release_script());
        reporting.set(None);
        saved_label.set(None);

        let Some(target) = target else {
            return;
        };
        debug!(lesson_id = %target.lesson_id, "binding video progress reporting");
        let handle = reporter.start(
            target.enrollment_id,
            target.lesson_id,
            target.initial_percentage,
        );
        let mut saved_rx = handle.saved();
        reporting.set(Some(handle));

        let playback = spawn(async move {
            let mut channel = eval(&video_listener_script(VIDEO_ELEMENT_ID));
            while let Ok(payload) = channel.recv::<PlaybackPayload>().await {
                let sample = PlaybackSample::new(payload.current_time, payload.duration);
                if let Some(player) = vm.write().as_mut() {
                    player.apply(PlayerIntent::Playback(sample));
                }
                if let Some(handle) = reporting.read().as_ref() {
                    handle.record(sample);
                }
            }
        });
        let saves = spawn(async move {
            while saved_rx.changed().await.is_ok() {
                let latest = *saved_rx.borrow_and_update();
                let Some(saved) = latest else {
                    continue;
                };
                if let Some(player) = vm.write().as_mut() {
                    player.record_saved(target.lesson_id, saved.percentage);
                }
                saved_label.set(Some(format_saved_at(saved.saved_at)));
            }
        });
        listeners.set(vec![playback, saves]);
    });

    use_drop(|| {
        let _ = eval(video_release_script());
    });

    let dispatch_intent = use_callback(move |intent: PlayerIntent| {
        let effect = {
            let mut guard = vm.write();
            match guard.as_mut() {
                Some(player) => player.apply(intent),
                None => return,
            }
        };
        let PlayerEffect::SubmitCompletion(ticket) = effect else {
            return;
        };
        let completion = completion.clone();
        spawn(async move {
            let result = completion.submit(ticket).await;
            let finished = vm
                .write()
                .as_mut()
                .map(|player| player.finish_completion(ticket, result));
            match finished {
                Some(Ok(_)) => {
                    if let Some(snapshot) = completion.reconciliation(ticket.enrollment_id).await {
                        if let Some(player) = vm.write().as_mut() {
                            player.merge_snapshot(&snapshot);
                        }
                    }
                }
                Some(Err(err)) => {
                    let _ = eval(&alert_script(&err.user_message()));
                }
                None => {}
            }
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<PlayerTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let view_data = vm
        .read()
        .as_ref()
        .map(|player| (player.header(), player.sidebar(), player.lesson_pane()));
    let saved = saved_label().unwrap_or_default();

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Memuat pelajaran..." }
                },
                ViewState::Error(ViewError::NotEnrolled) => rsx! {
                    p { "{ViewError::NotEnrolled.message()}" }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn",
                        onclick: move |_| resource.restart(),
                        "Coba lagi"
                    }
                },
                ViewState::Ready(()) => match view_data {
                    Some((header, sidebar, pane)) => {
                        let playback_label = header.playback_label.clone();
                        rsx! {
                            PlayerHeader { header: header.clone(), saved }
                            div { class: "player",
                                aside { class: "player-sidebar",
                                    for module in sidebar {
                                        ModuleSection {
                                            key: "{module.module_id}",
                                            module,
                                            on_intent: dispatch_intent,
                                        }
                                    }
                                }
                                section { class: "lesson-pane",
                                    match pane {
                                        Some(pane) => rsx! {
                                            LessonPane { pane, playback_label }
                                        },
                                        None => rsx! {
                                            p { class: "muted", "Kursus ini belum memiliki pelajaran." }
                                        },
                                    }
                                    PlayerActions { header, on_intent: dispatch_intent }
                                }
                            }
                        }
                    }
                    None => rsx! {
                        p { class: "muted", "Memuat pelajaran..." }
                    },
                },
            }
        }
    }
}

#[component]
fn PlayerHeader(header: PlayerHeaderVm, saved: String) -> Element {
    rsx! {
        div { class: "player-header",
            h2 { "{header.course_title}" }
            p { class: "muted", "Progres kursus: {header.overall_progress}%" }
            if !saved.is_empty() {
                p { class: "muted", id: "player-saved-at", "{saved}" }
            }
        }
    }
}

#[component]
fn ModuleSection(module: ModuleRowVm, on_intent: EventHandler<PlayerIntent>) -> Element {
    let ModuleRowVm {
        module_id,
        title,
        progress_label,
        progress_percentage,
        expanded,
        lessons,
    } = module;
    let arrow = if expanded { "▾" } else { "▸" };
    rsx! {
        div { class: "module",
            button {
                class: "module-header",
                onclick: move |_| on_intent.call(PlayerIntent::ToggleModule(module_id)),
                span { "{arrow} {title}" }
                span { class: "muted", "{progress_label}" }
            }
            div { class: "progress-bar",
                span {
                    class: "progress-bar-fill",
                    style: "width: {progress_percentage}%",
                }
            }
            if expanded {
                for lesson in lessons {
                    button {
                        key: "{lesson.lesson_id}",
                        class: if lesson.is_current { "lesson-row current" } else { "lesson-row" },
                        onclick: move |_| on_intent.call(PlayerIntent::SelectLesson {
                            module_id: lesson.module_id,
                            lesson_id: lesson.lesson_id,
                        }),
                        span { class: lesson.badge_class, "{lesson.badge_symbol}" }
                        span { "{lesson.title}" }
                        span { class: "muted", "{lesson.kind_label}" }
                    }
                }
            }
        }
    }
}

#[component]
fn LessonPane(pane: LessonPaneVm, playback_label: String) -> Element {
    let LessonPaneVm {
        lesson_id,
        title,
        kind_label,
        duration_label,
        body,
        completed,
    } = pane;
    let meta = match duration_label {
        Some(duration) => format!("{kind_label} · {duration}"),
        None => kind_label.to_string(),
    };
    rsx! {
        h3 { "{title}" }
        p { class: "muted", "{meta}" }
        if completed {
            p { class: "badge-check", id: "lesson-completed", "Selesai ✓" }
        }
        match body {
            LessonBodyVm::Video { src: Some(src) } => rsx! {
                video {
                    key: "{lesson_id}",
                    id: VIDEO_ELEMENT_ID,
                    src: "{src}",
                    controls: true,
                    preload: "metadata",
                }
                p { class: "muted", id: "player-playback", "Ditonton: {playback_label}" }
            },
            LessonBodyVm::Video { src: None } => rsx! {
                p { class: "muted", "Video belum tersedia." }
            },
            LessonBodyVm::Text { html } => rsx! {
                div { class: "lesson-body", dangerous_inner_html: "{html}" }
            },
            LessonBodyVm::Generic { description } => rsx! {
                div { class: "lesson-body",
                    p { {description.unwrap_or_else(|| GENERIC_FALLBACK.to_string())} }
                }
            },
        }
    }
}

#[component]
fn PlayerActions(header: PlayerHeaderVm, on_intent: EventHandler<PlayerIntent>) -> Element {
    let complete_label = if header.completing {
        "Menyimpan..."
    } else if header.can_complete {
        "Tandai selesai"
    } else {
        "Selesai"
    };
    rsx! {
        div { class: "player-actions",
            button {
                id: "player-previous",
                class: "btn",
                disabled: !header.can_previous,
                onclick: move |_| on_intent.call(PlayerIntent::Previous),
                "Sebelumnya"
            }
            button {
                id: "player-complete",
                class: "btn btn-primary",
                disabled: !header.can_complete,
                onclick: move |_| on_intent.call(PlayerIntent::MarkComplete),
                "{complete_label}"
            }
            button {
                id: "player-next",
                class: "btn",
                disabled: !header.can_next,
                onclick: move |_| on_intent.call(PlayerIntent::Next),
                "Berikutnya"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct PlayerTestHandles {
    dispatch: Rc<RefCell<Option<Callback<PlayerIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<CoursePlayerVm>>>>>,
}

#[cfg(test)]
impl PlayerTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<PlayerIntent>,
        vm: Signal<Option<CoursePlayerVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<PlayerIntent> {
        (*self.dispatch.borrow()).expect("player dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<CoursePlayerVm>> {
        (*self.vm.borrow()).expect("player vm registered")
    }
}
