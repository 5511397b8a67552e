use dioxus::prelude::*;
use types::{AuthFailure, Field, PROFILE_SAVED, ProfileUpdate};

use super::components::FieldError;

#[component]
pub fn Profile(status: ReadSignal<Option<String>>) -> Element {
    let user = use_resource(api::get_current_user);
    let mut display_name = use_signal(String::new);

    use_effect(move || {
        if let Some(Ok(Some(session))) = &*user.read() {
            display_name.set(session.display_name.clone());
        }
    });

    let saved = status().as_deref() == Some(PROFILE_SAVED);
    let failure = status().as_deref().and_then(AuthFailure::from_code);
    let problem = ProfileUpdate {
        display_name: display_name(),
    }
    .validate()
    .err()
    .and_then(|e| {
        e.field_errors()
            .and_then(|fields| fields.get(Field::DisplayName))
            .map(str::to_string)
    });

    let username = match &*user.read() {
        Some(Ok(Some(session))) => session.username.clone(),
        _ => String::new(),
    };

    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "Profile" }
                p { class: "page-subtitle", "Change how your name appears in the dashboard." }
            }

            div { class: "card form-card",
                form {
                    action: "/auth/profile",
                    method: "post",
                    div { class: "card-body",
                        if saved {
                            div { class: "notice-banner notice-success", role: "status",
                                span { class: "notice-banner-message", "Profile updated." }
                            }
                        }
                        if let Some(failure) = failure {
                            div { class: "notice-banner notice-error", role: "alert",
                                span { class: "notice-banner-message", "{failure.message()}" }
                            }
                        }
                        div { class: "form-group",
                            span { class: "form-label", "Username" }
                            div { class: "form-value", "{username}" }
                        }
                        div { class: "form-group",
                            label { class: "form-label", r#for: "display_name", "Display name" }
                            input {
                                id: "display_name",
                                name: "display_name",
                                class: "form-input",
                                r#type: "text",
                                value: "{display_name}",
                                oninput: move |e| display_name.set(e.value()),
                            }
                            FieldError { message: problem.clone() }
                        }
                    }
                    div { class: "card-footer",
                        button {
                            r#type: "submit",
                            class: "btn btn-primary",
                            disabled: problem.is_some(),
                            "Save"
                        }
                    }
                }
            }
        }
    }
}
