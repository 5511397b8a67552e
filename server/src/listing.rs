use types::{DashboardSummary, Employee, ListState, Paged, Result};

use crate::store::RecordStore;

/// Fetch the page `state` asks for.
///
/// When the collection shrank under the caller and the page no longer
/// exists, the last page is served instead; `meta.current_page` tells the
/// caller where it ended up.
pub async fn list_page<S: RecordStore>(
    store: &S,
    state: &ListState,
    per_page: u32,
) -> Result<Paged<Employee>> {
    let filter = state.filter();
    let page = store.query(&filter, state.page(), per_page).await?;

    let mut clamped = state.clone();
    if !clamped.clamp(page.meta.total, per_page) {
        return Ok(page);
    }

    tracing::debug!(
        requested = state.page(),
        serving = clamped.page(),
        "requested page out of range, clamping"
    );
    store.query(&filter, clamped.page(), per_page).await
}

pub async fn dashboard_summary<S: RecordStore>(store: &S) -> Result<DashboardSummary> {
    let employees = store.all().await?;
    let divisions = store.divisions().await?;
    Ok(DashboardSummary::build(&employees, &divisions))
}
