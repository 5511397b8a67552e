//! The `/v1` JSON interface other instances use as their remote store.

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use types::{Division, Employee, EmployeeDraft, EmployeeFilter, Error, Paged};
use uuid::Uuid;

use crate::store::RecordStore;

/// Largest page a client may ask for.
const MAX_PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct RestState<S> {
    store: S,
    api_token: Option<SecretString>,
    per_page: u32,
}

impl<S> RestState<S> {
    /// `api_token` of `None` leaves the interface open.
    pub fn new(store: S, api_token: Option<SecretString>, per_page: u32) -> Self {
        Self {
            store,
            api_token,
            per_page,
        }
    }
}

pub fn rest_router<S>(state: RestState<S>) -> Router
where
    S: RecordStore + Clone + 'static,
{
    Router::new()
        .route(
            "/v1/employees",
            get(list_employees::<S>).post(create_employee::<S>),
        )
        .route(
            "/v1/employees/{id}",
            get(get_employee::<S>)
                .put(update_employee::<S>)
                .delete(delete_employee::<S>),
        )
        .route("/v1/divisions", get(list_divisions::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_token::<S>,
        ))
        .with_state(state)
}

/// [`Error`] rendered as its status code and JSON body.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.kind.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "rest request failed");
        }
        (status, Json(self.0)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn require_token<S>(
    State(state): State<RestState<S>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = &state.api_token else {
        return next.run(request).await;
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(expected.expose_secret()) {
        next.run(request).await
    } else {
        ApiError(Error::unauthorized("missing or invalid API token")).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u32>,
    per_page: Option<u32>,
    #[serde(default)]
    name: String,
    division_id: Option<String>,
}

async fn list_employees<S: RecordStore>(
    State(state): State<RestState<S>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Paged<Employee>>> {
    let filter = EmployeeFilter {
        name: params.name,
        division_id: params.division_id.filter(|d| !d.is_empty()),
    };
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params
        .per_page
        .unwrap_or(state.per_page)
        .clamp(1, MAX_PER_PAGE);

    Ok(Json(state.store.query(&filter, page, per_page).await?))
}

async fn get_employee<S: RecordStore>(
    State(state): State<RestState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.store.get(id).await?))
}

async fn create_employee<S: RecordStore>(
    State(state): State<RestState<S>>,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let employee = state.store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update_employee<S: RecordStore>(
    State(state): State<RestState<S>>,
    Path(id): Path<Uuid>,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.store.update(id, draft).await?))
}

async fn delete_employee<S: RecordStore>(
    State(state): State<RestState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_divisions<S: RecordStore>(
    State(state): State<RestState<S>>,
) -> ApiResult<Json<Vec<Division>>> {
    Ok(Json(state.store.divisions().await?))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use tower::ServiceExt;
    use types::ErrorKind;

    use super::*;
    use crate::store::MemoryStore;

    fn router(token: Option<&str>) -> Router {
        rest_router(RestState::new(
            MemoryStore::seeded(),
            token.map(SecretString::from),
            5,
        ))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_uses_default_page_size() {
        let (status, body) = send(router(None), get("/v1/employees")).await;
        assert_eq!(status, StatusCode::OK);

        let page: Paged<Employee> = serde_json::from_slice(&body).unwrap();
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.meta.per_page, 5);
        assert_eq!(page.meta.last_page, 2);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (_, body) = send(
            router(None),
            get("/v1/employees?name=SITI&division_id=teknologi&per_page=500"),
        )
        .await;

        let page: Paged<Employee> = serde_json::from_slice(&body).unwrap();
        assert_eq!(page.meta.per_page, MAX_PER_PAGE);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "Siti Aminah");
    }

    #[tokio::test]
    async fn test_unknown_employee_is_404_with_error_body() {
        let uri = format!("/v1/employees/{}", Uuid::now_v7());
        let (status, body) = send(router(None), get(&uri)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: Error = serde_json::from_slice(&body).unwrap();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_204() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/v1/employees/{}", Uuid::now_v7()))
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(router(None), request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_422() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/employees")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"","phone":"12","position":""}"#))
            .unwrap();

        let (status, body) = send(router(None), request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: Error = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.field_errors().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_token_required_when_configured() {
        let (status, body) = send(router(Some("s3cret")), get("/v1/divisions")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let error: Error = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.kind, ErrorKind::Unauthorized);

        let request = Request::builder()
            .uri("/v1/divisions")
            .header(AUTHORIZATION, "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(router(Some("s3cret")), request).await;
        assert_eq!(status, StatusCode::OK);
    }
}
