use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{CourseListView, CoursePlayerView};

/// Where a learner who is not enrolled gets sent.
pub const MY_COURSES_PATH: &str = "/dashboard/siswa/courses";

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[redirect("/", || Route::MyCourses {})]
        #[route("/dashboard/siswa/courses", CourseListView)] MyCourses {},
        #[route("/courses/:course_id/learn", CoursePlayerView)] CoursePlayer { course_id: u64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { "Learn" }
                Link { to: Route::MyCourses {}, "Kursus Saya" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_enrolled_redirect_target_matches_route() {
        assert_eq!(Route::MyCourses {}.to_string(), MY_COURSES_PATH);
        assert_eq!(
            Route::CoursePlayer { course_id: 12 }.to_string(),
            "/courses/12/learn"
        );
    }
}
