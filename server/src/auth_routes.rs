use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use cookie::{Cookie, SameSite};
use dioxus::server::ServerFnError;
use secrecy::{ExposeSecret, SecretString};
use types::{
    AuthFailure, Credentials, PROFILE_SAVED, ProfileUpdate, SESSION_COOKIE_NAME, UserSession,
};

use crate::{config::Config, session_from_headers, token};

#[derive(Clone)]
pub struct AuthState {
    admin_username: String,
    admin_password: SecretString,
    admin_display_name: String,
    session_secret: SecretString,
}

impl AuthState {
    pub fn new(config: &Config) -> Self {
        Self {
            admin_username: config.admin_username.clone(),
            admin_password: config.admin_password.clone(),
            admin_display_name: config.admin_display_name.clone(),
            session_secret: config.session_secret.clone(),
        }
    }

    /// Check the submitted credentials against the configured admin account.
    fn authenticate(&self, credentials: &Credentials) -> Result<UserSession, AuthFailure> {
        credentials
            .validate()
            .map_err(|error| AuthFailure::from_error(&error))?;

        let username_ok = credentials.username.trim() == self.admin_username;
        let password_ok = credentials.password == self.admin_password.expose_secret();
        if !(username_ok && password_ok) {
            return Err(AuthFailure::Credentials);
        }

        Ok(UserSession {
            username: self.admin_username.clone(),
            display_name: self.admin_display_name.clone(),
        })
    }

    fn session_cookie(&self, session: &UserSession) -> types::Result<String> {
        let token = token::session_token(session, &self.session_secret)?;
        let cookie = Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        Ok(cookie.to_string())
    }
}

pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
        .route("/auth/profile", post(update_profile))
        .with_state(state)
}

fn redirect_with(path: &str, key: &str, value: &str) -> Response {
    Redirect::to(&format!("{path}?{key}={value}")).into_response()
}

async fn login(
    State(state): State<AuthState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, ServerFnError> {
    login_inner(state, credentials).map_err(Into::into)
}

fn login_inner(state: AuthState, credentials: Credentials) -> types::Result<Response> {
    let session = match state.authenticate(&credentials) {
        Ok(session) => session,
        Err(failure) => {
            tracing::info!(code = failure.code(), "login rejected");
            return Ok(redirect_with("/login", "error", failure.code()));
        }
    };

    tracing::info!(username = %session.username, "logged in");
    let cookie = state.session_cookie(&session)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

async fn update_profile(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Form(update): Form<ProfileUpdate>,
) -> Result<Response, ServerFnError> {
    update_profile_inner(state, headers, update).map_err(Into::into)
}

fn update_profile_inner(
    state: AuthState,
    headers: HeaderMap,
    update: ProfileUpdate,
) -> types::Result<Response> {
    let Ok(mut session) = session_from_headers(&headers, &state.session_secret) else {
        return Ok(redirect_with("/login", "error", AuthFailure::Expired.code()));
    };

    match update.validate() {
        Ok(display_name) => session.display_name = display_name,
        Err(error) => {
            let failure = AuthFailure::from_error(&error);
            return Ok(redirect_with("/profile", "status", failure.code()));
        }
    }

    tracing::info!(username = %session.username, "updated display name");
    let cookie = state.session_cookie(&session)?;
    let target = format!("/profile?status={PROFILE_SAVED}");
    Ok(([(SET_COOKIE, cookie)], Redirect::to(&target)).into_response())
}

async fn logout() -> impl IntoResponse {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::ZERO)
        .build();

    ([(SET_COOKIE, cookie.to_string())], Redirect::to("/login"))
}
