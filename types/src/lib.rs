mod dashboard;
mod employee;
mod error;
pub mod list_state;
mod list_view;
mod page;
mod session;

pub use dashboard::{DashboardSummary, DivisionCount, RECENT_LIMIT};
pub use employee::{Division, Employee, EmployeeDraft, POSITIONS, ValidDraft};
pub use error::{Error, ErrorKind, Field, FieldErrors, Result};
pub use list_state::{DivisionFilter, ListState};
pub use list_view::{ListView, Outcome, Phase, Ticket};
pub use page::{EmployeeFilter, PageLink, PageMeta, Paged, total_pages};
pub use session::{
    AuthFailure, Credentials, PROFILE_SAVED, ProfileUpdate, SESSION_COOKIE_NAME, UserSession,
    decode_session, encode_session,
};

// FIXME: We can do this better I think.
#[doc(hidden)]
pub use anyhow::anyhow as internal_anyhow_dont_use;
