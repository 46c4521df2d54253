use services::NOT_ENROLLED_MESSAGE;

pub(super) const VIDEO_ELEMENT_ID: &str = "lesson-video";

/// Bind a `timeupdate` listener on the lesson video that reports through `dioxus.send`.
///
/// Any listener from a previous lesson is removed first.
pub(super) fn video_listener_script(element_id: &str) -> String {
    format!(
        r#"(function() {{
                    const state = window.__learnVideo || (window.__learnVideo = {{
                        el: null,
                        handler: null,
                    }});
                    if (state.el && state.handler) {{
                        state.el.removeEventListener("timeupdate", state.handler);
                    }}
                    state.el = null;
                    state.handler = null;
                    const el = document.getElementById({element_id:?});
                    if (!el) return;
                    const handler = () => {{
                        const duration = Number.isFinite(el.duration) ? el.duration : 0;
                        dioxus.send({{ current_time: el.currentTime || 0, duration }});
                    }};
                    el.addEventListener("timeupdate", handler);
                    state.el = el;
                    state.handler = handler;
                }})();"#,
    )
}

pub(super) fn video_release_script() -> &'static str {
    r#"(function() {
                const state = window.__learnVideo;
                if (!state) return;
                if (state.el && state.handler) {
                    state.el.removeEventListener("timeupdate", state.handler);
                }
                state.el = null;
                state.handler = null;
            })();"#
}

pub(super) fn alert_script(message: &str) -> String {
    format!("alert({message:?});")
}

/// Shown before the player sends a learner without an enrollment back to their courses.
pub(super) fn not_enrolled_alert_script() -> String {
    alert_script(NOT_ENROLLED_MESSAGE)
}
