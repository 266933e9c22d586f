//! Paper list controller: one event loop tying query state, debouncing, URL
//! sync, fetching and vote reconciliation together.
//!
//! Callers feed user intents through the setter methods and drive
//! [`PaperListController::next_event`] (or [`PaperListController::settle`]) to
//! let debounced input and network responses flow back into the view.

use std::sync::Arc;
use std::time::Duration;

use papers2code_core::{
    Action, AdvancedFilters, ApiError, Debouncer, EffectiveQuery, FilterField, History, PageLabel,
    Paper, QueryState, SortPreference, Transition, UrlSync, Vote, reconcile_vote, visible_pages,
};
use tokio::time::Instant;

use crate::api::PapersApi;
use crate::fetcher::{FetchOutcome, Fetcher};

/// Quiet period before a search edit takes effect
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug)]
pub struct ControllerOptions {
    pub page_size: u32,
    pub debounce: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: papers2code_core::DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// What happened while waiting in [`PaperListController::next_event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEvent {
    /// The debounced search term changed; a fetch was issued if needed.
    SearchSettled(String),
    Loaded { page: u32, total_count: u64 },
    /// Shown as a message; the previous list stays visible.
    Failed(ApiError),
    /// The view should show a login prompt.
    LoginRequired,
}

enum Wake {
    Debounce,
    Fetched(FetchOutcome),
}

pub struct PaperListController<A, H> {
    state: QueryState,
    debouncer: Debouncer<String>,
    url_sync: UrlSync,
    history: H,
    fetcher: Fetcher<A>,
    papers: Vec<Paper>,
    error: Option<String>,
    login_required: bool,
    last_issued: Option<EffectiveQuery>,
}

impl<A: PapersApi, H: History> PaperListController<A, H> {
    pub fn new(api: Arc<A>, history: H, options: ControllerOptions) -> Self {
        Self {
            state: QueryState::new(options.page_size),
            debouncer: Debouncer::new(String::new(), options.debounce),
            url_sync: UrlSync::new(),
            history,
            fetcher: Fetcher::new(api),
            papers: Vec::new(),
            error: None,
            login_required: false,
            last_issued: None,
        }
    }

    /// Restore state from the current location and issue the first fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        self.location_changed();
        self.fetch_if_changed();
    }

    // -- user intents --

    /// Keystroke in the search box. Takes effect after the debounce window.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.state.update(Action::SearchTermEdited(term.clone()));
        self.debouncer.push(term, Instant::now());
    }

    pub fn set_sort(&mut self, sort: SortPreference) -> Transition {
        self.dispatch(Action::SortChanged(sort))
    }

    pub fn set_filter_field(&mut self, field: FilterField) -> Transition {
        self.dispatch(Action::FilterEdited(field))
    }

    pub fn apply_filters(&mut self) -> Transition {
        self.dispatch(Action::FiltersApplied)
    }

    pub fn clear_filters(&mut self) -> Transition {
        self.dispatch(Action::FiltersCleared)
    }

    pub fn set_page(&mut self, page: u32) -> Transition {
        self.dispatch(Action::PageRequested(page))
    }

    pub fn next_page(&mut self) -> Transition {
        self.dispatch(Action::NextPage)
    }

    pub fn prev_page(&mut self) -> Transition {
        self.dispatch(Action::PrevPage)
    }

    /// Re-issue the current query, e.g. after a failure.
    pub fn reload(&mut self) {
        self.last_issued = None;
        self.fetch_if_changed();
    }

    /// React to a location change made outside the controller (back/forward,
    /// followed link).
    pub fn location_changed(&mut self) -> Transition {
        match self.url_sync.read(&self.history, &self.state.url_state()) {
            Some(url) => {
                log::debug!("Restoring list state from ?{}", self.history.location());
                // Only a differing search replaces the input; otherwise keep
                // any edit that is still waiting out the quiet period.
                if url.search != self.state.debounced_search_term() {
                    self.debouncer.reset(url.search.clone());
                }
                self.dispatch(Action::UrlRestored(url))
            }
            None => Transition::default(),
        }
    }

    /// Cast or clear the current user's vote and patch the item in place.
    ///
    /// Does not refetch or move the page. On failure the item keeps the vote
    /// state it had before the attempt.
    pub async fn vote(&mut self, paper_id: &str, vote: Vote) -> Result<(), ApiError> {
        let api = Arc::clone(self.fetcher.api());
        match api.vote(paper_id, vote).await {
            Ok(updated) => {
                if !reconcile_vote(&mut self.papers, &updated) {
                    log::debug!("Voted paper {paper_id} is no longer displayed");
                }
                Ok(())
            }
            Err(e) => {
                if e.requires_login() {
                    self.login_required = true;
                }
                log::warn!("Vote on {paper_id} failed: {e}");
                Err(e)
            }
        }
    }

    // -- event loop --

    /// Wait for the next debounce settle or fetch completion and apply it.
    ///
    /// Cancel-safe; pends forever when [`Self::is_idle`].
    pub async fn next_event(&mut self) -> ListEvent {
        loop {
            if let Some(event) = self.step().await {
                return event;
            }
        }
    }

    /// Drive events until nothing is pending; returns what happened.
    pub async fn settle(&mut self) -> Vec<ListEvent> {
        let mut events = Vec::new();
        // A wake may settle nothing (search edited back to the settled term)
        // and leave the controller idle, so re-check before every wait.
        while !self.is_idle() {
            events.extend(self.step().await);
        }
        events
    }

    /// One wait on the debounce deadline or the fetch in flight.
    async fn step(&mut self) -> Option<ListEvent> {
        let deadline = self.debouncer.deadline();
        let wake = tokio::select! {
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                Wake::Debounce
            }
            outcome = self.fetcher.next_outcome() => Wake::Fetched(outcome),
        };

        match wake {
            Wake::Debounce => {
                let term = self.debouncer.poll(Instant::now())?;
                self.dispatch(Action::SearchSettled(term.clone()));
                Some(ListEvent::SearchSettled(term))
            }
            Wake::Fetched(outcome) => self.apply_outcome(outcome),
        }
    }

    fn dispatch(&mut self, action: Action) -> Transition {
        let transition = self.state.update(action);
        if let Some(reason) = &transition.rejected {
            log::debug!("Ignored: {reason}");
        }
        if transition.refetch {
            self.fetch_if_changed();
        }
        if transition.write_url {
            self.url_sync
                .write(&mut self.history, &self.state.url_state());
        }
        transition
    }

    fn fetch_if_changed(&mut self) {
        let query = self.state.effective_query();
        if self.last_issued.as_ref() == Some(&query) {
            return;
        }
        self.last_issued = Some(query.clone());
        self.fetcher.issue(query);
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) -> Option<ListEvent> {
        match outcome.result {
            Ok(page) => {
                log::debug!(
                    "Loaded page {} ({} papers, {} total)",
                    outcome.query.page,
                    page.papers.len(),
                    page.total_count
                );
                self.papers = page.papers;
                self.error = None;
                self.dispatch(Action::ResultsLoaded {
                    total_count: page.total_count,
                });
                Some(ListEvent::Loaded {
                    page: outcome.query.page,
                    total_count: page.total_count,
                })
            }
            Err(ApiError::Cancelled) => None,
            Err(e) if e.requires_login() => {
                log::warn!("Paper list requires login: {e}");
                self.login_required = true;
                Some(ListEvent::LoginRequired)
            }
            Err(e) => {
                log::warn!("Failed to load papers: {e}");
                self.error = Some(e.to_string());
                Some(ListEvent::Failed(e))
            }
        }
    }

    // -- view --

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    /// No fetch in flight and no search edit waiting to settle.
    pub fn is_idle(&self) -> bool {
        !self.fetcher.is_loading() && self.debouncer.deadline().is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn login_required(&self) -> bool {
        self.login_required
    }

    pub fn acknowledge_login_prompt(&mut self) {
        self.login_required = false;
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn draft_filters(&self) -> &AdvancedFilters {
        self.state.draft_filters()
    }

    /// Pagination footer; empty when there is a single page.
    pub fn page_labels(&self, surrounding: u32) -> Vec<PageLabel> {
        let total = self.state.total_pages();
        if total <= 1 {
            return Vec::new();
        }
        visible_pages(self.state.current_page(), total, surrounding)
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Navigate the history; call [`Self::location_changed`] afterwards.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }
}
