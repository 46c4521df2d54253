use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use backend::{Backend, InMemoryBackend};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, Router, use_route};
use learn_core::time::fixed_clock;
use services::{AppServices, ClientConfig};

use crate::context::{UiApp, build_app_context};
use crate::views::course_player::PlayerTestHandles;
use crate::views::{CourseListView, CoursePlayerView};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Courses,
    Player(u64),
}

/// Path of the route the test router last rendered.
#[derive(Clone, Default)]
pub struct RouteLog(Rc<RefCell<String>>);

impl RouteLog {
    fn record(&self, path: String) {
        *self.0.borrow_mut() = path;
    }

    pub fn current(&self) -> String {
        self.0.borrow().clone()
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
    player_handles: Option<PlayerTestHandles>,
    route_log: RouteLog,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.route_log.clone());
    if let Some(handles) = props.player_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

// Mirrors the app routes so redirects issued by the views resolve.
#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[layout(RouteRecorder)]
        #[route("/")]
        Root {},
        #[route("/dashboard/siswa/courses", CourseListView)]
        MyCourses {},
        #[route("/courses/:course_id/learn", CoursePlayerView)]
        CoursePlayer { course_id: u64 },
}

#[component]
fn RouteRecorder() -> Element {
    let route = use_route::<TestRoute>();
    use_context::<RouteLog>().record(route.to_string());
    rsx! { Outlet::<TestRoute> {} }
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Courses => rsx! { CourseListView {} },
        ViewKind::Player(course_id) => rsx! { CoursePlayerView { course_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    pub player_handles: Option<PlayerTestHandles>,
    route_log: RouteLog,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let spawned tasks settle across a few polls.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn current_path(&self) -> String {
        self.route_log.current()
    }

    pub fn player_handles(&self) -> PlayerTestHandles {
        self.player_handles
            .clone()
            .expect("player handles only exist for the player view")
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, backend: InMemoryBackend) -> ViewHarness {
    let services = AppServices::new(
        &Backend::from_adapter(backend.clone()),
        &ClientConfig::default(),
        fixed_clock(),
    );
    let player_handles = match view {
        ViewKind::Player(_) => Some(PlayerTestHandles::default()),
        ViewKind::Courses => None,
    };

    let route_log = RouteLog::default();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(services),
            view,
            player_handles: player_handles.clone(),
            route_log: route_log.clone(),
        },
    );

    ViewHarness {
        dom,
        backend,
        player_handles,
        route_log,
    }
}
