use dioxus::prelude::*;
#[cfg(feature = "server")]
use server::RecordStore;
use types::{DashboardSummary, Division, Employee, EmployeeDraft, ListState, Paged, UserSession};
use uuid::Uuid;

#[post("/api/current-user")]
pub async fn get_current_user() -> ServerFnResult<Option<UserSession>> {
    match server::get_session_from_cookie().await {
        Ok(session) => Ok(Some(session)),
        Err(_) => Ok(None),
    }
}

/// One page of the employee list. A page past the end comes back clamped to
/// the last page that exists.
#[post("/api/employees")]
pub async fn list_employees(query: ListState) -> ServerFnResult<Paged<Employee>> {
    server::require_session().await?;
    let store = server::store().await?;
    Ok(server::list_page(store, &query, server::config().page_size).await?)
}

#[post("/api/divisions")]
pub async fn list_divisions() -> ServerFnResult<Vec<Division>> {
    server::require_session().await?;
    Ok(server::store().await?.divisions().await?)
}

#[post("/api/employees/get")]
pub async fn get_employee(id: Uuid) -> ServerFnResult<Employee> {
    server::require_session().await?;
    Ok(server::store().await?.get(id).await?)
}

#[post("/api/employees/create")]
pub async fn create_employee(draft: EmployeeDraft) -> ServerFnResult<Employee> {
    server::require_session().await?;
    Ok(server::store().await?.create(draft).await?)
}

#[post("/api/employees/update")]
pub async fn update_employee(id: Uuid, draft: EmployeeDraft) -> ServerFnResult<Employee> {
    server::require_session().await?;
    Ok(server::store().await?.update(id, draft).await?)
}

#[post("/api/employees/delete")]
pub async fn delete_employee(id: Uuid) -> ServerFnResult<()> {
    server::require_session().await?;
    server::store().await?.delete(id).await?;
    Ok(())
}

#[post("/api/dashboard")]
pub async fn dashboard_summary() -> ServerFnResult<DashboardSummary> {
    server::require_session().await?;
    let store = server::store().await?;
    Ok(server::dashboard_summary(store).await?)
}
