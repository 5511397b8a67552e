//! Where in the employee list the user currently is.
//!
//! [`ListState`] holds the search text, the division filter and the page
//! number. It lives in the URL query (`?search=..&division=..&page=..`) so a
//! reload or back/forward navigation reproduces the same view; every reader
//! decodes it from there with [`ListState::decode`] and every writer pushes
//! [`ListState::encode`] back.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::page::{EmployeeFilter, total_pages};

pub const SEARCH_KEY: &str = "search";
pub const DIVISION_KEY: &str = "division";
pub const PAGE_KEY: &str = "page";

/// Wildcard value of the division parameter.
pub const ALL_DIVISIONS: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivisionFilter {
    #[default]
    All,
    Only(String),
}

impl DivisionFilter {
    /// Empty input and the wildcard both mean every division.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | ALL_DIVISIONS => DivisionFilter::All,
            id => DivisionFilter::Only(id.to_string()),
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            DivisionFilter::All => ALL_DIVISIONS,
            DivisionFilter::Only(id) => id,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            DivisionFilter::All => None,
            DivisionFilter::Only(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListState {
    search: String,
    division: DivisionFilter,
    page: u32,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            division: DivisionFilter::All,
            page: 1,
        }
    }
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn division(&self) -> &DivisionFilter {
        &self.division
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Change the search text. Always returns to the first page.
    pub fn set_search(&mut self, value: impl Into<String>) {
        self.search = value.into();
        self.page = 1;
    }

    /// Change the division filter. Always returns to the first page.
    pub fn set_division(&mut self, value: &str) {
        self.division = DivisionFilter::parse(value);
        self.page = 1;
    }

    /// Move to page `n` if it exists. Returns whether the state changed.
    pub fn set_page(&mut self, n: u32, total_pages: u32) -> bool {
        if n < 1 || n > total_pages.max(1) || n == self.page {
            return false;
        }
        self.page = n;
        true
    }

    /// Pull the page back into `[1, total_pages]` for `total` matching items.
    /// Returns whether the page moved.
    pub fn clamp(&mut self, total: u64, per_page: u32) -> bool {
        let clamped = self.page.clamp(1, total_pages(total, per_page));
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }

    /// The same filters on another page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            name: self.search.clone(),
            division_id: self.division.id().map(str::to_string),
        }
    }

    /// The URL parameters for this state. Default values are left out.
    pub fn encode(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if !self.search.is_empty() {
            params.push((SEARCH_KEY, self.search.clone()));
        }
        if let DivisionFilter::Only(id) = &self.division {
            params.push((DIVISION_KEY, id.clone()));
        }
        if self.page != 1 {
            params.push((PAGE_KEY, self.page.to_string()));
        }
        params
    }

    /// Rebuild a state from URL parameters.
    ///
    /// Unknown keys are ignored and malformed values fall back to their
    /// defaults, so any address bar content yields a usable state.
    pub fn decode<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = Self::default();
        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                SEARCH_KEY => state.search = value.to_string(),
                DIVISION_KEY => state.division = DivisionFilter::parse(value),
                PAGE_KEY => state.page = value.trim().parse().ok().filter(|p| *p >= 1).unwrap_or(1),
                _ => {}
            }
        }
        state
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.encode())
            .finish()
    }

    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::decode(form_urlencoded::parse(query.as_bytes()))
    }
}

impl fmt::Display for ListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl From<&str> for ListState {
    fn from(query: &str) -> Self {
        Self::from_query_string(query)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_defaults_encode_to_nothing() {
        assert_eq!(ListState::default().to_query_string(), "");
        assert_eq!(ListState::from_query_string(""), ListState::default());
    }

    #[test]
    fn test_decode_reads_known_keys() {
        let state = ListState::from_query_string("?search=budi+s&division=teknologi&page=3&sort=name");
        assert_eq!(state.search(), "budi s");
        assert_eq!(state.division(), &DivisionFilter::Only("teknologi".into()));
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_decode_is_lenient() {
        let state = ListState::from_query_string("page=0&division=all");
        assert_eq!(state, ListState::default());

        let state = ListState::from_query_string("page=abc&division=");
        assert_eq!(state, ListState::default());
    }

    #[test]
    fn test_set_page_rejects_out_of_range() {
        let mut state = ListState::default();
        assert!(!state.set_page(0, 2));
        assert!(!state.set_page(3, 2));
        assert!(state.set_page(2, 2));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut state = ListState::default().with_page(4);
        assert!(state.clamp(6, 5));
        assert_eq!(state.page(), 2);

        assert!(state.clamp(0, 5));
        assert_eq!(state.page(), 1);
        assert!(!state.clamp(0, 5));
    }

    #[test]
    fn test_filter_follows_state() {
        let mut state = ListState::default();
        state.set_search("an");
        state.set_division("pemasaran");

        let filter = state.filter();
        assert_eq!(filter.name, "an");
        assert_eq!(filter.division_id.as_deref(), Some("pemasaran"));
    }

    #[derive(Debug, Clone)]
    enum Action {
        Search(String),
        Division(String),
        Page(u32, u32),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            ".{0,12}".prop_map(Action::Search),
            prop_oneof![Just("all".to_string()), Just(String::new()), "[a-z0-9-]{1,10}"]
                .prop_map(Action::Division),
            (0u32..20, 0u32..20).prop_map(|(n, total)| Action::Page(n, total)),
        ]
    }

    fn apply(state: &mut ListState, action: &Action) {
        match action {
            Action::Search(s) => state.set_search(s.clone()),
            Action::Division(d) => state.set_division(d),
            Action::Page(n, total) => {
                state.set_page(*n, *total);
            }
        }
    }

    proptest! {
        #[test]
        fn filter_changes_reset_page(actions in prop::collection::vec(action(), 0..20), search in ".{0,8}", division in "[a-z]{0,6}") {
            let mut state = ListState::default();
            for a in &actions {
                apply(&mut state, a);
            }

            state.set_search(search);
            prop_assert_eq!(state.page(), 1);

            apply(&mut state, &Action::Page(3, 5));
            state.set_division(&division);
            prop_assert_eq!(state.page(), 1);
        }

        #[test]
        fn clamp_keeps_page_in_bounds(page in 1u32..1000, total in 0u64..10_000, per_page in 1u32..100) {
            let mut state = ListState::default().with_page(page);
            state.clamp(total, per_page);

            let upper = total.div_ceil(u64::from(per_page)).max(1);
            prop_assert!(state.page() >= 1);
            prop_assert!(u64::from(state.page()) <= upper);
        }

        #[test]
        fn url_roundtrip(actions in prop::collection::vec(action(), 0..20)) {
            let mut state = ListState::default();
            for a in &actions {
                apply(&mut state, a);
            }

            let decoded = ListState::from_query_string(&state.to_string());
            prop_assert_eq!(decoded, state);
        }
    }
}
