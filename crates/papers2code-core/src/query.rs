//! List query state and its transition function.
//!
//! Every user intent is an [`Action`]; [`QueryState::update`] applies it and
//! reports, in one [`Transition`], whether the effective query or the share URL
//! changed. Dependent effects (page reset on a new search, page clamping when
//! results arrive) happen inside the same transition, never as a second pass.

use crate::filters::{AdvancedFilters, FilterError, FilterField, SortPreference};
use crate::url_state::UrlState;

/// Papers per page requested from the API
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// The request actually sent to the Papers API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    /// `None` means relevance ranking
    pub sort: Option<SortPreference>,
    pub filters: AdvancedFilters,
}

/// Something the user (or the page around the list) did.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Keystroke in the search box. Does not affect the effective query.
    SearchTermEdited(String),
    /// The debouncer released a new search term.
    SearchSettled(String),
    SortChanged(SortPreference),
    /// Edit to the draft filters in the advanced search panel.
    FilterEdited(FilterField),
    FiltersApplied,
    FiltersCleared,
    PageRequested(u32),
    NextPage,
    PrevPage,
    /// The address bar changed underneath us (mount, back/forward, link).
    UrlRestored(UrlState),
    /// A list response arrived for the current effective query.
    ResultsLoaded { total_count: u64 },
}

/// Why an action was ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Sort is locked to relevance while a text or author search is active.
    SortLocked,
    InvalidFilters(FilterError),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SortLocked => f.write_str("sort is fixed to relevance while searching"),
            Self::InvalidFilters(e) => write!(f, "{e}"),
        }
    }
}

/// Effects required after an [`Action`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    /// The effective query changed; a new request is due.
    pub refetch: bool,
    /// The share URL changed; the address bar must be replaced.
    pub write_url: bool,
    pub rejected: Option<Rejection>,
}

impl Transition {
    fn rejected(reason: Rejection) -> Self {
        Self {
            rejected: Some(reason),
            ..Default::default()
        }
    }
}

/// Everything that determines which papers are shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    search_term: String,
    debounced_search_term: String,
    sort_preference: SortPreference,
    draft_filters: AdvancedFilters,
    applied_filters: AdvancedFilters,
    current_page: u32,
    /// Unknown until the first response arrives
    total_pages: Option<u32>,
    total_count: u64,
    page_size: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_term: String::new(),
            debounced_search_term: String::new(),
            sort_preference: SortPreference::default(),
            draft_filters: AdvancedFilters::default(),
            applied_filters: AdvancedFilters::default(),
            current_page: 1,
            total_pages: None,
            total_count: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn debounced_search_term(&self) -> &str {
        &self.debounced_search_term
    }

    pub fn sort_preference(&self) -> SortPreference {
        self.sort_preference
    }

    pub fn draft_filters(&self) -> &AdvancedFilters {
        &self.draft_filters
    }

    pub fn applied_filters(&self) -> &AdvancedFilters {
        &self.applied_filters
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Server-reported page count, 1 before the first response.
    pub fn total_pages(&self) -> u32 {
        self.total_pages.unwrap_or(1)
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// True when the server ranks by relevance and the sort control is inert.
    pub fn is_relevance_sort(&self) -> bool {
        !self.debounced_search_term.is_empty() || !self.applied_filters.search_authors.is_empty()
    }

    pub fn effective_query(&self) -> EffectiveQuery {
        EffectiveQuery {
            page: self.current_page,
            limit: self.page_size,
            search: self.debounced_search_term.clone(),
            sort: (!self.is_relevance_sort()).then_some(self.sort_preference),
            filters: self.applied_filters.clone(),
        }
    }

    pub fn url_state(&self) -> UrlState {
        UrlState {
            search: self.debounced_search_term.clone(),
            page: self.current_page,
            sort: self.sort_preference,
            filters: self.applied_filters.clone(),
        }
    }

    /// Apply one action and report the resulting effects.
    pub fn update(&mut self, action: Action) -> Transition {
        let query_before = self.effective_query();
        let url_before = self.url_state();

        match action {
            Action::SearchTermEdited(term) => self.search_term = term,
            Action::SearchSettled(term) => {
                if term != self.debounced_search_term {
                    self.debounced_search_term = term;
                    self.current_page = 1;
                }
            }
            Action::SortChanged(sort) => {
                if self.is_relevance_sort() {
                    return Transition::rejected(Rejection::SortLocked);
                }
                self.sort_preference = sort;
            }
            Action::FilterEdited(field) => self.draft_filters.set(field),
            Action::FiltersApplied => {
                let applied = self.draft_filters.normalized();
                if let Err(e) = applied.validate() {
                    return Transition::rejected(Rejection::InvalidFilters(e));
                }
                if applied != self.applied_filters {
                    self.applied_filters = applied.clone();
                    self.current_page = 1;
                }
                self.draft_filters = applied;
            }
            Action::FiltersCleared => {
                if !self.applied_filters.is_empty() {
                    self.current_page = 1;
                }
                self.draft_filters = AdvancedFilters::default();
                self.applied_filters = AdvancedFilters::default();
            }
            Action::PageRequested(page) => self.current_page = self.clamp_page(page),
            Action::NextPage => {
                self.current_page = self.clamp_page(self.current_page.saturating_add(1));
            }
            Action::PrevPage => {
                self.current_page = self.clamp_page(self.current_page.saturating_sub(1));
            }
            Action::UrlRestored(url) => self.restore(url),
            Action::ResultsLoaded { total_count } => {
                let pages = total_count.div_ceil(u64::from(self.page_size)).max(1);
                let pages = u32::try_from(pages).unwrap_or(u32::MAX);
                self.total_count = total_count;
                self.total_pages = Some(pages);
                self.current_page = self.clamp_page(self.current_page);
            }
        }

        let transition = Transition {
            refetch: self.effective_query() != query_before,
            write_url: self.url_state() != url_before,
            rejected: None,
        };
        log::debug!(
            "query state: page={} search={:?} sort={:?} refetch={} write_url={}",
            self.current_page,
            self.debounced_search_term,
            self.effective_query().sort,
            transition.refetch,
            transition.write_url
        );
        transition
    }

    /// Apply only the fields that differ; the URL's page wins over the usual
    /// reset-to-first-page rule.
    fn restore(&mut self, url: UrlState) {
        if url.search != self.debounced_search_term {
            self.search_term = url.search.clone();
            self.debounced_search_term = url.search;
        }
        if url.sort != self.sort_preference {
            self.sort_preference = url.sort;
        }
        let mut filters = url.filters.normalized();
        if let Err(e) = filters.validate() {
            log::warn!("Ignoring date range from link: {e}");
            filters.start_date = None;
            filters.end_date = None;
        }
        if filters != self.applied_filters {
            self.draft_filters = filters.clone();
            self.applied_filters = filters;
        }
        if url.page != self.current_page {
            self.current_page = self.clamp_page(url.page);
        }
    }

    fn clamp_page(&self, page: u32) -> u32 {
        match self.total_pages {
            Some(total) => page.clamp(1, total),
            None => page.max(1),
        }
    }
}
