use dioxus::prelude::*;

mod views;

use types::{AuthFailure, ErrorKind, ListState};
use uuid::Uuid;
use views::{Dashboard, EmployeeCreate, EmployeeEdit, Employees, Login, Profile};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login?:error")]
    Login { error: Option<String> },
    #[layout(AuthenticatedLayout)]
        #[route("/")]
        Dashboard {},
        #[route("/employees?:..query")]
        EmployeeList { query: ListState },
        #[route("/employees/new")]
        EmployeeCreate {},
        #[route("/employees/:id/edit")]
        EmployeeEdit { id: Uuid },
        #[route("/profile?:status")]
        Profile { status: Option<String> },
}

impl Route {
    pub fn employees() -> Self {
        Route::EmployeeList {
            query: ListState::default(),
        }
    }

    pub fn login_expired() -> Self {
        Route::Login {
            error: Some(AuthFailure::Expired.code().to_string()),
        }
    }
}

#[component]
fn EmployeeList(query: ListState) -> Element {
    rsx! { Employees { query } }
}

fn main() {
    #[cfg(feature = "server")]
    {
        server::init_tracing();
        dioxus::serve(|| async move {
            let routes = server::init().await?;

            Ok(dioxus::server::router(App).merge(routes))
        });
    }

    #[cfg(all(feature = "web", not(feature = "server")))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Staff Desk" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}

#[component]
fn NavLink(to: Route, children: Element) -> Element {
    let current_route: Route = use_route();
    let is_active = matches!(
        (&current_route, &to),
        (Route::Dashboard {}, Route::Dashboard {})
            | (
                Route::EmployeeList { .. } | Route::EmployeeCreate {} | Route::EmployeeEdit { .. },
                Route::EmployeeList { .. }
            )
            | (Route::Profile { .. }, Route::Profile { .. })
    );

    rsx! {
        Link {
            to,
            class: if is_active { "active" },
            {children}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// A message shown above the page content.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub tone: Tone,
    pub message: String,
    /// Error chain and backtrace of internal errors.
    pub details: Option<String>,
}

impl Notice {
    fn from_error(error: &types::Error) -> Self {
        // Internal errors carry their cause chain after the first line.
        let (message, details) = match error.message.split_once('\n') {
            Some((first, rest)) if error.kind == ErrorKind::Internal => {
                (first.to_string(), Some(rest.trim().to_string()))
            }
            _ => (error.message.clone(), None),
        };

        Self {
            tone: Tone::Error,
            message,
            details: details.filter(|d| !d.is_empty()),
        }
    }
}

/// Global notice state - use `use_notice()` to access
#[derive(Clone, Copy)]
pub struct NoticeState(Signal<Option<Notice>>);

impl NoticeState {
    pub fn success(&mut self, message: impl Into<String>) {
        self.0.set(Some(Notice {
            tone: Tone::Success,
            message: message.into(),
            details: None,
        }));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.0.set(Some(Notice {
            tone: Tone::Error,
            message: message.into(),
            details: None,
        }));
    }

    /// Show `error`, or go to the login page when the session is gone.
    pub fn set_error(&mut self, error: &types::Error) {
        if error.kind == ErrorKind::Unauthorized {
            navigator().push(Route::login_expired());
            return;
        }
        self.0.set(Some(Notice::from_error(error)));
    }

    pub fn set_server_error(&mut self, err: &ServerFnError) {
        self.set_error(&types::Error::from_server_error(err));
    }

    pub fn clear(&mut self) {
        self.0.set(None);
    }
}

pub fn use_notice() -> NoticeState {
    use_context::<NoticeState>()
}

/// Keep the cause chain and only the backtrace frames from this workspace.
fn filter_backtrace(details: &str) -> String {
    let (chain, backtrace) = details
        .split_once("Stack backtrace:")
        .unwrap_or((details, ""));

    let frames = backtrace.lines().filter(|line| {
        ["server::", "api::", "web::", "types::"]
            .iter()
            .any(|krate| line.contains(krate))
    });

    chain
        .trim_end()
        .lines()
        .chain(frames)
        .collect::<Vec<_>>()
        .join("\n")
}

#[component]
fn NoticeBanner() -> Element {
    let mut notice_state = use_notice();
    let notice = notice_state.0.read();

    let Some(notice) = notice.as_ref() else {
        return rsx! {};
    };

    let class = match notice.tone {
        Tone::Success => "notice-banner notice-success",
        Tone::Error => "notice-banner notice-error",
    };
    let details = notice.details.as_deref().map(filter_backtrace);

    rsx! {
        div { class, role: "alert",
            div { class: "notice-banner-header",
                span { class: "notice-banner-message", "{notice.message}" }
                button {
                    class: "notice-banner-close",
                    onclick: move |_| notice_state.clear(),
                    "×"
                }
            }
            if let Some(details) = details {
                if !details.is_empty() {
                    pre { class: "notice-details", "{details}" }
                }
            }
        }
    }
}

#[component]
fn AuthenticatedLayout() -> Element {
    use_context_provider(|| NoticeState(Signal::new(None)));
    let user = use_server_future(api::get_current_user)?;

    match &*user.read() {
        Some(Ok(Some(session))) => {
            let initial = session.initial();

            rsx! {
                div { class: "app-layout",
                    aside { class: "sidebar",
                        div { class: "sidebar-header",
                            span { class: "sidebar-logo", "Staff Desk" }
                        }
                        nav { class: "sidebar-nav",
                            NavLink { to: Route::Dashboard {}, "Dashboard" }
                            NavLink { to: Route::employees(), "Employees" }
                            NavLink { to: Route::Profile { status: None }, "Profile" }
                        }
                        div { class: "sidebar-footer",
                            div { class: "sidebar-user",
                                div { class: "sidebar-avatar", "{initial}" }
                                div { class: "sidebar-user-info",
                                    div { class: "sidebar-user-name", "{session.display_name}" }
                                    div { class: "sidebar-user-role", "{session.username}" }
                                }
                            }
                            a { href: "/auth/logout", rel: "external", class: "sidebar-logout", "Sign out" }
                        }
                    }
                    main { class: "main-content",
                        NoticeBanner {}
                        Outlet::<Route> {}
                    }
                }
            }
        }
        Some(Ok(None)) | Some(Err(_)) => {
            navigator().push(Route::Login { error: None });
            rsx! {
                div { class: "loading", "Redirecting to login..." }
            }
        }
        None => {
            rsx! {
                div { class: "loading", "Loading..." }
            }
        }
    }
}
