use dioxus::prelude::*;
use types::list_state::ALL_DIVISIONS;
use types::{Employee, Error, ListState, ListView, Outcome, Phase};

use super::components::{Avatar, DeleteConfirmModal, Pagination};
use crate::{Route, use_notice};

/// The employee list. Search, division filter and page all come from the
/// URL; the page only ever changes them by navigating.
#[component]
pub fn Employees(query: ReadSignal<ListState>) -> Element {
    let mut view = use_signal(ListView::<Employee>::new);
    let mut notice = use_notice();
    let divisions = use_resource(api::list_divisions);
    let mut pending_delete = use_signal(|| None::<Employee>);
    let mut deleting = use_signal(|| false);

    let mut load = move |state: ListState| {
        let ticket = view.write().begin(state.clone());
        spawn(async move {
            let result = api::list_employees(state)
                .await
                .map_err(|e| Error::from_server_error(&e));

            match view.write().resolve(ticket, result) {
                Outcome::Relocate(state) => {
                    tracing::debug!(page = state.page(), "page out of range, relocating");
                    navigator().replace(Route::EmployeeList { query: state });
                }
                Outcome::Failed(error) => notice.set_error(&error),
                Outcome::Applied | Outcome::Stale => {}
            }
        });
    };

    use_effect(move || {
        let state = query();
        // A relocation lands on the page that is already displayed.
        if !view.peek().shows(&state) {
            load(state);
        }
    });

    use_drop(move || {
        if let Ok(mut view) = view.try_write() {
            view.cancel();
        }
    });

    let navigate = move |next: ListState, replace: bool| {
        let route = Route::EmployeeList { query: next };
        if replace {
            navigator().replace(route);
        } else {
            navigator().push(route);
        }
    };

    let current = query();
    let pending = pending_delete().map(|e| (e.id, e.name));
    let list = view.read();
    let busy = list.is_loading();

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Employees" }
                    p { class: "page-subtitle", "Search, filter and manage employee records." }
                }
                div { class: "page-header-actions",
                    Link { to: Route::EmployeeCreate {}, class: "btn btn-primary", "Add Employee" }
                }
            }

            div { class: "card",
                div { class: "filter-bar",
                    input {
                        class: "form-input filter-search",
                        r#type: "search",
                        placeholder: "Search by name...",
                        value: "{current.search()}",
                        oninput: move |e| {
                            let mut next = query();
                            next.set_search(e.value());
                            // Typing should not flood the history.
                            navigate(next, true);
                        },
                    }
                    select {
                        class: "form-input filter-division",
                        value: "{current.division().as_param()}",
                        onchange: move |e| {
                            let mut next = query();
                            next.set_division(&e.value());
                            navigate(next, false);
                        },
                        option { value: ALL_DIVISIONS, "All divisions" }
                        if let Some(Ok(divisions)) = &*divisions.read() {
                            for division in divisions {
                                option { key: "{division.id}", value: "{division.id}", "{division.name}" }
                            }
                        }
                    }
                }

                if let Some(failed) = list.failed_query().cloned() {
                    div { class: "retry-bar",
                        if list.meta().is_some() {
                            p { "The list could not be refreshed. Showing the last loaded page." }
                        } else {
                            p { "The employee list could not be loaded." }
                        }
                        button {
                            class: "btn btn-secondary",
                            onclick: move |_| load(failed.clone()),
                            "Retry"
                        }
                    }
                }

                if list.meta().is_none() {
                    if list.phase() != Phase::Error {
                        div { class: "loading", "Loading employees..." }
                    }
                } else {
                    div { class: if busy { "table-container is-loading" } else { "table-container" },
                        table {
                            thead {
                                tr {
                                    th { "" }
                                    th { "Name" }
                                    th { "Phone" }
                                    th { "Position" }
                                    th { "Division" }
                                    th { class: "table-actions", "" }
                                }
                            }
                            tbody {
                                for employee in list.items().iter().cloned() {
                                    {
                                        let id = employee.id;
                                        let image = employee.image.as_ref().map(|u| u.to_string());
                                        let division = employee.division_name().to_string();
                                        let target = employee.clone();

                                        rsx! {
                                            tr { key: "{id}",
                                                td {
                                                    Avatar { name: employee.name.clone(), image }
                                                }
                                                td { "{employee.name}" }
                                                td { "{employee.phone}" }
                                                td { "{employee.position}" }
                                                td { "{division}" }
                                                td { class: "table-actions",
                                                    Link {
                                                        to: Route::EmployeeEdit { id },
                                                        class: "btn btn-link",
                                                        "Edit"
                                                    }
                                                    button {
                                                        class: "btn btn-link btn-link-danger",
                                                        onclick: move |_| pending_delete.set(Some(target.clone())),
                                                        "Delete"
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        if list.items().is_empty() {
                            div { class: "empty-state",
                                if current.search().is_empty() {
                                    p { "No employees yet." }
                                } else {
                                    p { "No employees match \"{current.search()}\"." }
                                }
                            }
                        }
                    }
                    if let Some(meta) = list.meta().copied() {
                        Pagination {
                            meta,
                            disabled: busy,
                            on_page: move |page| {
                                let mut next = query();
                                if next.set_page(page, meta.last_page) {
                                    navigate(next, false);
                                }
                            },
                        }
                    }
                }
            }
        }

        if let Some((id, name)) = pending {
            DeleteConfirmModal {
                subject: name,
                deleting: deleting(),
                on_close: move |_| pending_delete.set(None),
                on_confirm: move |_| {
                    spawn(async move {
                        deleting.set(true);
                        match api::delete_employee(id).await {
                            Ok(()) => {
                                notice.success("Employee deleted.");
                                // The list may shrink by a page; the server clamps.
                                load(query());
                            }
                            Err(e) => notice.set_server_error(&e),
                        }
                        deleting.set(false);
                        pending_delete.set(None);
                    });
                },
            }
        }
    }
}
