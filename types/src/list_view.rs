use crate::{
    error::Error,
    list_state::ListState,
    page::{PageMeta, Paged},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Handle for one fetch started by [`ListView::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket(u64);

/// What the caller should do with a resolved fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The page is now displayed.
    Applied,
    /// A newer fetch was started since; the result was dropped.
    Stale,
    /// The page is displayed, but the store moved it to another page number.
    /// The address bar must be replaced with this state.
    Relocate(ListState),
    /// The fetch failed. The last good page stays displayed.
    Failed(Error),
}

/// Fetch bookkeeping for one list view session.
///
/// Only the newest ticket may change what is displayed, so a slow earlier
/// request never overwrites a faster later one.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    phase: Phase,
    generation: u64,
    requested: Option<ListState>,
    shown: Option<ListState>,
    page: Option<Paged<T>>,
    error: Option<Error>,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            requested: None,
            shown: None,
            page: None,
            error: None,
        }
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn items(&self) -> &[T] {
        self.page.as_ref().map(|p| p.data.as_slice()).unwrap_or(&[])
    }

    pub fn meta(&self) -> Option<&PageMeta> {
        self.page.as_ref().map(|p| &p.meta)
    }

    pub fn total_pages(&self) -> u32 {
        self.meta().map(|m| m.last_page).unwrap_or(1)
    }

    /// The query whose fetch failed, to be sent again on retry.
    pub fn failed_query(&self) -> Option<&ListState> {
        match self.phase {
            Phase::Error => self.requested.as_ref(),
            _ => None,
        }
    }

    /// Whether the displayed data already answers `state`.
    pub fn shows(&self, state: &ListState) -> bool {
        self.phase == Phase::Ready && self.shown.as_ref() == Some(state)
    }

    /// Start fetching `state`. Any ticket handed out earlier becomes stale.
    pub fn begin(&mut self, state: ListState) -> Ticket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.requested = Some(state);
        Ticket(self.generation)
    }

    /// Apply the result of the fetch identified by `ticket`.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<Paged<T>, Error>) -> Outcome {
        if ticket.0 != self.generation || self.phase != Phase::Loading {
            return Outcome::Stale;
        }

        let Some(requested) = self.requested.take() else {
            return Outcome::Stale;
        };

        match result {
            Ok(page) => {
                let current = page.meta.current_page;
                let shown = requested.clone().with_page(current);
                self.page = Some(page);
                self.error = None;
                self.phase = Phase::Ready;
                self.shown = Some(shown.clone());

                if current == requested.page() {
                    Outcome::Applied
                } else {
                    Outcome::Relocate(shown)
                }
            }
            Err(error) => {
                self.error = Some(error.clone());
                self.phase = Phase::Error;
                self.requested = Some(requested);
                Outcome::Failed(error)
            }
        }
    }

    /// Drop every outstanding fetch, e.g. when the view goes away.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.requested = None;
        if self.phase == Phase::Loading {
            self.phase = if self.page.is_some() {
                Phase::Ready
            } else {
                Phase::Idle
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageMeta;

    fn page(items: &[u32], current: u32, total: u64) -> Paged<u32> {
        Paged {
            data: items.to_vec(),
            meta: PageMeta::new(current, total, 5),
        }
    }

    #[test]
    fn test_idle_loading_ready() {
        let mut view = ListView::new();
        assert_eq!(view.phase(), Phase::Idle);

        let state = ListState::default();
        let ticket = view.begin(state.clone());
        assert!(view.is_loading());
        assert!(!view.shows(&state));

        let outcome = view.resolve(ticket, Ok(page(&[1, 2, 3, 4, 5], 1, 7)));
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(view.phase(), Phase::Ready);
        assert_eq!(view.items(), &[1, 2, 3, 4, 5]);
        assert_eq!(view.total_pages(), 2);
        assert!(view.shows(&state));
    }

    #[test]
    fn test_slow_request_does_not_overwrite_newer() {
        let mut view = ListView::new();
        let mut second_state = ListState::default();
        second_state.set_search("an");

        let first = view.begin(ListState::default());
        let second = view.begin(second_state.clone());

        assert_eq!(view.resolve(second, Ok(page(&[9], 1, 1))), Outcome::Applied);
        assert_eq!(view.resolve(first, Ok(page(&[1, 2], 1, 2))), Outcome::Stale);
        assert_eq!(view.items(), &[9]);
        assert!(view.shows(&second_state));
    }

    #[test]
    fn test_failure_keeps_last_good_page() {
        let mut view = ListView::new();
        let ticket = view.begin(ListState::default());
        let _ = view.resolve(ticket, Ok(page(&[1, 2], 1, 2)));

        let ticket = view.begin(ListState::default());
        let outcome = view.resolve(ticket, Err(Error::query("connection refused")));

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(view.phase(), Phase::Error);
        assert_eq!(view.items(), &[1, 2]);
        assert_eq!(view.failed_query(), Some(&ListState::default()));

        // Retrying the same query leaves the error state.
        let state = view.failed_query().cloned().unwrap();
        let ticket = view.begin(state);
        assert_eq!(view.failed_query(), None);
        assert_eq!(view.resolve(ticket, Ok(page(&[1], 1, 1))), Outcome::Applied);
        assert!(view.error().is_none());
    }

    #[test]
    fn test_failed_query_survives_until_retried() {
        let mut view = ListView::<u32>::new();
        let mut state = ListState::default();
        state.set_search("an");
        let state = state.with_page(2);

        let ticket = view.begin(state.clone());
        let _ = view.resolve(ticket, Err(Error::query("timeout")));

        // The URL did not change, so only the failed query can restart it.
        assert!(!view.shows(&state));
        assert_eq!(view.failed_query(), Some(&state));
        assert!(view.meta().is_none());

        let ticket = view.begin(state.clone());
        assert_eq!(
            view.resolve(ticket, Ok(Paged {
                data: vec![6],
                meta: PageMeta::new(2, 6, 5),
            })),
            Outcome::Applied
        );
        assert_eq!(view.phase(), Phase::Ready);
        assert!(view.shows(&state));
    }

    #[test]
    fn test_clamped_page_relocates() {
        let mut view = ListView::new();
        let state = ListState::default().with_page(2);

        let ticket = view.begin(state.clone());
        let outcome = view.resolve(ticket, Ok(page(&[1, 2, 3, 4, 5], 1, 5)));

        let expected = state.with_page(1);
        assert_eq!(outcome, Outcome::Relocate(expected.clone()));
        assert_eq!(view.items(), &[1, 2, 3, 4, 5]);
        // The corrected URL does not need another fetch.
        assert!(view.shows(&expected));
    }

    #[test]
    fn test_cancel_discards_outstanding() {
        let mut view = ListView::new();
        let ticket = view.begin(ListState::default());
        view.cancel();

        assert_eq!(view.phase(), Phase::Idle);
        assert_eq!(view.resolve(ticket, Ok(page(&[1], 1, 1))), Outcome::Stale);
        assert!(view.items().is_empty());
    }
}
