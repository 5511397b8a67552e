mod auth_routes;
mod config;
mod listing;
mod rest_routes;
pub mod store;
mod token;

use axum::Router;
use axum::http::{HeaderMap, header::COOKIE};
use cookie::Cookie;
use dioxus::fullstack::FullstackContext;
use secrecy::SecretString;
use tokio::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use types::{Error, Result, SESSION_COOKIE_NAME, UserSession};

use crate::auth_routes::{AuthState, auth_router};
pub use crate::config::{Config, StoreKind, config, install};
pub use crate::listing::{dashboard_summary, list_page};
pub use crate::rest_routes::{RestState, rest_router};
pub use crate::store::{AnyStore, RecordStore};

static STORE: OnceCell<AnyStore> = OnceCell::const_new();

/// Log to stdout, filtered by `RUST_LOG` (default `info,server=debug`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,server=debug"));

    // The dev server may have installed a subscriber already.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration, open the record store and build the non-Dioxus routes.
pub async fn init() -> anyhow::Result<Router> {
    let loaded = Config::load().map_err(|e| anyhow::anyhow!("loading configuration: {e}"))?;
    install(loaded);
    let config = config();

    let store = store()
        .await
        .map_err(|e| anyhow::anyhow!("opening record store: {e}"))?
        .clone();

    let rest = rest_router(RestState::new(
        store,
        config.api_token.clone(),
        config.page_size,
    ));

    Ok(auth_router(AuthState::new(config)).merge(rest))
}

/// The record store selected by configuration, opened on first use.
pub async fn store() -> Result<&'static AnyStore> {
    STORE.get_or_try_init(|| AnyStore::open(config())).await
}

/// Read and verify the session cookie out of request headers.
pub fn session_from_headers(headers: &HeaderMap, secret: &SecretString) -> Result<UserSession> {
    let cookie_header = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::unauthorized("no cookies in request"))?;

    let cookie = Cookie::split_parse(cookie_header)
        .filter_map(|c| c.ok())
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .ok_or_else(|| Error::unauthorized("session cookie not found"))?;

    token::session_from_token(cookie.value(), secret).map_err(|error| {
        tracing::debug!(%error, "rejected session cookie");
        Error::unauthorized("session is invalid, please log in again")
    })
}

/// Extract the user session from the request cookie.
pub async fn get_session_from_cookie() -> Result<UserSession> {
    let headers: HeaderMap = FullstackContext::extract().await?;
    session_from_headers(&headers, &config().session_secret)
}

/// Require a logged-in session, failing with an unauthorized error.
pub async fn require_session() -> Result<UserSession> {
    get_session_from_cookie().await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_session_found_among_other_cookies() {
        let secret: SecretString = "test-secret".into();
        let session = UserSession {
            username: "Admin".into(),
            display_name: "Admin".into(),
        };
        let value = token::session_token(&session, &secret).unwrap();

        let found = session_from_headers(
            &headers(&format!("theme=dark; {SESSION_COOKIE_NAME}={value}; lang=id")),
            &secret,
        )
        .unwrap();

        assert_eq!(found, session);
    }

    #[test]
    fn test_missing_session_is_unauthorized() {
        let secret: SecretString = "test-secret".into();

        let error = session_from_headers(&HeaderMap::new(), &secret).unwrap_err();
        assert_eq!(error.kind, types::ErrorKind::Unauthorized);

        let error = session_from_headers(&headers("theme=dark"), &secret).unwrap_err();
        assert_eq!(error.kind, types::ErrorKind::Unauthorized);
    }
}
