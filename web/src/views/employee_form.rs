use dioxus::prelude::*;
use types::{EmployeeDraft, Error, Field, FieldErrors, POSITIONS};
use uuid::Uuid;

use super::components::{Avatar, FieldError};
use crate::{Route, use_notice};

#[component]
pub fn EmployeeCreate() -> Element {
    rsx! { EmployeeEditor { id: None } }
}

#[component]
pub fn EmployeeEdit(id: Uuid) -> Element {
    rsx! { EmployeeEditor { id: Some(id) } }
}

/// Create form when `id` is `None`, edit form otherwise.
#[component]
fn EmployeeEditor(id: ReadSignal<Option<Uuid>>) -> Element {
    let mut notice = use_notice();
    let divisions = use_resource(api::list_divisions);
    let mut draft = use_signal(EmployeeDraft::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut loading = use_signal(|| id.peek().is_some());
    let mut load_failed = use_signal(|| false);
    let mut attempt = use_signal(|| 0u32);
    let mut saving = use_signal(|| false);

    // Load the record being edited
    use_effect(move || {
        let Some(id) = id() else {
            return;
        };
        attempt();
        spawn(async move {
            loading.set(true);
            load_failed.set(false);
            match api::get_employee(id).await {
                Ok(employee) => draft.set(employee.to_draft()),
                Err(e) => {
                    let error = Error::from_server_error(&e);
                    if leaves_form(&error) {
                        notice.error("That employee no longer exists.");
                        navigator().replace(Route::employees());
                    } else {
                        load_failed.set(true);
                        notice.set_error(&error);
                    }
                }
            }
            loading.set(false);
        });
    });

    let submit = move |_: Event<MouseData>| {
        let current = draft();
        // Same rules the store applies; catch them before the round trip.
        if let Err(error) = current.validate() {
            errors.set(error.field_errors().cloned().unwrap_or_default());
            return;
        }
        errors.set(FieldErrors::new());

        spawn(async move {
            saving.set(true);
            let result = match id() {
                Some(id) => api::update_employee(id, current).await,
                None => api::create_employee(current).await,
            };

            match result {
                Ok(employee) => {
                    notice.success(format!("{} saved.", employee.name));
                    navigator().push(Route::employees());
                }
                Err(e) => {
                    let error = Error::from_server_error(&e);
                    if let Some(fields) = error.field_errors() {
                        errors.set(fields.clone());
                    } else if leaves_form(&error) {
                        notice.error("That employee no longer exists.");
                        navigator().replace(Route::employees());
                    } else {
                        notice.set_error(&error);
                    }
                }
            }
            saving.set(false);
        });
    };

    let title = if id().is_some() { "Edit Employee" } else { "Add Employee" };
    let field_error = move |field: Field| errors.read().get(field).map(str::to_string);

    if loading() {
        return rsx! {
            div { class: "loading", "Loading employee..." }
        };
    }

    if load_failed() {
        return rsx! {
            div { class: "card",
                div { class: "empty-state",
                    p { "The employee could not be loaded." }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| attempt += 1,
                        "Retry"
                    }
                    Link { to: Route::employees(), class: "btn btn-link", "Back to list" }
                }
            }
        };
    }

    let current = draft();
    // Keep a position that is not in the list selectable when editing.
    let custom_position =
        !current.position.is_empty() && !POSITIONS.contains(&current.position.as_str());
    let preview = {
        let image = current.image.trim();
        (image.starts_with("http://") || image.starts_with("https://")).then(|| image.to_string())
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "{title}" }
                }
                div { class: "page-header-actions",
                    Link { to: Route::employees(), class: "btn btn-secondary", "Back to list" }
                }
            }

            div { class: "card form-card",
                div { class: "card-body",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "name", "Name *" }
                        input {
                            id: "name",
                            class: "form-input",
                            r#type: "text",
                            placeholder: "e.g. Budi Santoso",
                            value: "{current.name}",
                            oninput: move |e| draft.write().name = e.value(),
                        }
                        FieldError { message: field_error(Field::Name) }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "phone", "Phone *" }
                        input {
                            id: "phone",
                            class: "form-input",
                            r#type: "tel",
                            placeholder: "e.g. 0812-3456-7890",
                            value: "{current.phone}",
                            oninput: move |e| draft.write().phone = e.value(),
                        }
                        FieldError { message: field_error(Field::Phone) }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "position", "Position *" }
                        select {
                            id: "position",
                            class: "form-input",
                            value: "{current.position}",
                            onchange: move |e| draft.write().position = e.value(),
                            option { value: "", disabled: true, "Choose a position" }
                            if custom_position {
                                option { value: "{current.position}", "{current.position}" }
                            }
                            for position in POSITIONS {
                                option { key: "{position}", value: "{position}", "{position}" }
                            }
                        }
                        FieldError { message: field_error(Field::Position) }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "division", "Division" }
                        select {
                            id: "division",
                            class: "form-input",
                            value: "{current.division_id}",
                            onchange: move |e| draft.write().division_id = e.value(),
                            option { value: "", "No division" }
                            if let Some(Ok(divisions)) = &*divisions.read() {
                                for division in divisions {
                                    option { key: "{division.id}", value: "{division.id}", "{division.name}" }
                                }
                            }
                        }
                        FieldError { message: field_error(Field::Division) }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "image", "Photo URL" }
                        div { class: "form-row",
                            Avatar { name: current.name.clone(), image: preview }
                            input {
                                id: "image",
                                class: "form-input",
                                r#type: "url",
                                placeholder: "https://...",
                                value: "{current.image}",
                                oninput: move |e| draft.write().image = e.value(),
                            }
                        }
                        FieldError { message: field_error(Field::Image) }
                    }
                }
                div { class: "card-footer",
                    Link { to: Route::employees(), class: "btn btn-secondary", "Cancel" }
                    button {
                        class: "btn btn-primary",
                        disabled: saving(),
                        onclick: submit,
                        if saving() { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}

/// Whether a failed load or save means the record is gone, so the form
/// should hand back to the list instead of staying open.
fn leaves_form(error: &Error) -> bool {
    error.is_not_found()
}
