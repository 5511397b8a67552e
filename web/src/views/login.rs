use dioxus::prelude::*;
use types::{AuthFailure, Credentials, Field, UserSession};

use super::components::FieldError;
use crate::Route;

/// Where to send a visitor of the login page who is already signed in.
fn signed_in_destination(session: Option<&UserSession>) -> Option<Route> {
    session.map(|_| Route::Dashboard {})
}

/// Login form. Submits natively to `/auth/login`, which redirects back here
/// with an `error` code when the credentials are rejected.
#[component]
pub fn Login(error: ReadSignal<Option<String>>) -> Element {
    let user = use_server_future(api::get_current_user)?;

    use_effect(move || {
        if let Some(Ok(session)) = &*user.read()
            && let Some(route) = signed_in_destination(session.as_ref())
        {
            navigator().replace(route);
        }
    });

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut touched = use_signal(|| false);

    let failure = error().as_deref().and_then(AuthFailure::from_code);
    let credentials = Credentials {
        username: username(),
        password: password(),
    };
    let problems = credentials
        .validate()
        .err()
        .and_then(|e| e.field_errors().cloned())
        .unwrap_or_default();
    let field_error = |field: Field| {
        touched()
            .then(|| problems.get(field).map(str::to_string))
            .flatten()
    };

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    h1 { class: "login-title", "Staff Desk" }
                    p { class: "login-subtitle", "Sign in to manage employees" }
                }
                if let Some(failure) = failure {
                    div { class: "notice-banner notice-error", role: "alert",
                        span { class: "notice-banner-message", "{failure.message()}" }
                    }
                }
                form {
                    action: "/auth/login",
                    method: "post",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "username", "Username" }
                        input {
                            id: "username",
                            name: "username",
                            class: "form-input",
                            r#type: "text",
                            autocomplete: "username",
                            value: "{username}",
                            oninput: move |e| username.set(e.value()),
                            onblur: move |_| touched.set(true),
                        }
                        FieldError { message: field_error(Field::Username) }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "password", "Password" }
                        input {
                            id: "password",
                            name: "password",
                            class: "form-input",
                            r#type: "password",
                            autocomplete: "current-password",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                            onblur: move |_| touched.set(true),
                        }
                        FieldError { message: field_error(Field::Password) }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-primary login-btn",
                        disabled: !problems.is_empty(),
                        "Sign in"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_in_user_leaves_login() {
        let session = UserSession {
            username: "Admin".into(),
            display_name: "Admin".into(),
        };

        assert_eq!(signed_in_destination(Some(&session)), Some(Route::Dashboard {}));
        assert_eq!(signed_in_destination(None), None);
    }
}
