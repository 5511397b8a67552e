use dioxus::prelude::*;
use types::{DashboardSummary, ListState};

use super::components::Avatar;
use crate::{Route, use_notice};

#[component]
pub fn Dashboard() -> Element {
    let mut notice = use_notice();
    let summary = use_resource(api::dashboard_summary);

    use_effect(move || {
        if let Some(Err(e)) = &*summary.read() {
            notice.set_server_error(e);
        }
    });

    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "Dashboard" }
                p { class: "page-subtitle", "An overview of your staff." }
            }
            match &*summary.read() {
                Some(Ok(summary)) => rsx! { Overview { summary: summary.clone() } },
                Some(Err(_)) => rsx! {
                    div { class: "empty-state", "The summary could not be loaded." }
                },
                None => rsx! {
                    div { class: "loading", "Loading..." }
                },
            }
        }
    }
}

#[component]
fn Overview(summary: DashboardSummary) -> Element {
    let max = summary.chart_max();

    rsx! {
        div { class: "dashboard-grid",
            StatCard { label: "Employees", value: summary.total_employees }
            StatCard { label: "Divisions", value: summary.total_divisions }
            StatCard { label: "Without division", value: summary.unassigned }
        }

        div { class: "grid grid-cols-2",
            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Employees per division" }
                }
                div { class: "card-body bar-chart",
                    for count in summary.per_division.iter() {
                        {
                            let width = count.employees as f64 * 100.0 / max as f64;
                            let style = format!("width: {width:.0}%");
                            let mut query = ListState::default();
                            query.set_division(&count.division.id);

                            rsx! {
                                Link {
                                    key: "{count.division.id}",
                                    to: Route::EmployeeList { query },
                                    class: "bar-row",
                                    span { class: "bar-label", "{count.division.name}" }
                                    span { class: "bar-track",
                                        span { class: "bar-fill", style }
                                    }
                                    span { class: "bar-value", "{count.employees}" }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Recently added" }
                    Link { to: Route::employees(), class: "btn btn-link", "View all" }
                }
                ul { class: "recent-list",
                    for employee in summary.recent.iter() {
                        li { key: "{employee.id}", class: "recent-item",
                            Avatar {
                                name: employee.name.clone(),
                                image: employee.image.as_ref().map(|u| u.to_string()),
                            }
                            div { class: "recent-info",
                                Link {
                                    to: Route::EmployeeEdit { id: employee.id },
                                    class: "recent-name",
                                    "{employee.name}"
                                }
                                div { class: "text-muted", "{employee.position} · {employee.division_name()}" }
                            }
                            span { class: "text-muted text-sm",
                                {employee.created_at.strftime("%d %b %Y").to_string()}
                            }
                        }
                    }
                    if summary.recent.is_empty() {
                        li { class: "text-muted", "No employees yet." }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCard(label: String, value: u64) -> Element {
    rsx! {
        div { class: "dashboard-card",
            p { class: "dashboard-card-desc", "{label}" }
            h3 { class: "dashboard-card-title", "{value}" }
        }
    }
}
