use dioxus::prelude::*;
use types::{PageLink, PageMeta};

const PAGE_RADIUS: u32 = 2;

/// Photo of an employee, or their initial when there is none.
#[component]
pub fn Avatar(name: String, image: Option<String>) -> Element {
    let initial = name.chars().next().unwrap_or('?').to_uppercase().to_string();

    rsx! {
        if let Some(src) = image {
            img { class: "avatar", src, alt: "{name}" }
        } else {
            div { class: "avatar avatar-placeholder", "{initial}" }
        }
    }
}

#[component]
pub fn FieldError(message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            p { class: "form-error", "{message}" }
        }
    }
}

/// Previous/next and numbered page buttons for a list page.
#[component]
pub fn Pagination(meta: PageMeta, disabled: bool, on_page: EventHandler<u32>) -> Element {
    let current = meta.current_page;

    rsx! {
        div { class: "pagination",
            span { class: "pagination-summary",
                if meta.total == 0 {
                    "No results"
                } else {
                    "Showing {meta.first_item()}–{meta.last_item()} of {meta.total}"
                }
            }
            div { class: "pagination-buttons",
                button {
                    class: "btn btn-secondary btn-sm",
                    disabled: disabled || !meta.has_previous(),
                    onclick: move |_| on_page.call(current - 1),
                    "Previous"
                }
                for (i, link) in meta.page_links(PAGE_RADIUS).into_iter().enumerate() {
                    {match link {
                        PageLink::Page(page) => rsx! {
                            button {
                                key: "{page}",
                                class: if page == current { "btn btn-primary btn-sm" } else { "btn btn-secondary btn-sm" },
                                disabled: disabled || page == current,
                                onclick: move |_| on_page.call(page),
                                "{page}"
                            }
                        },
                        PageLink::Gap => rsx! {
                            span { key: "gap-{i}", class: "pagination-gap", "…" }
                        },
                    }}
                }
                button {
                    class: "btn btn-secondary btn-sm",
                    disabled: disabled || !meta.has_next(),
                    onclick: move |_| on_page.call(current + 1),
                    "Next"
                }
            }
        }
    }
}

#[component]
pub fn DeleteConfirmModal(
    subject: String,
    deleting: bool,
    on_close: EventHandler<()>,
    on_confirm: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| if !deleting { on_close.call(()) },
            div { class: "modal modal-sm",
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "Delete Employee" }
                    if !deleting {
                        button {
                            class: "modal-close",
                            onclick: move |_| on_close.call(()),
                            "×"
                        }
                    }
                }
                div { class: "modal-body",
                    p { "Are you sure you want to delete " strong { "{subject}" } "?" }
                    p { class: "text-muted", "This action cannot be undone." }
                }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        disabled: deleting,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        disabled: deleting,
                        onclick: move |_| on_confirm.call(()),
                        if deleting { "Deleting..." } else { "Delete" }
                    }
                }
            }
        }
    }
}
