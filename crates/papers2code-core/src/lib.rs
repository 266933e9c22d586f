//! Papers2Code core - paper list query coordination
//!
//! Synchronous building blocks for a paginated, filterable paper list:
//! debouncing, page-range display, the query state machine and its
//! share-URL encoding. Network access lives in `papers2code-client`.

pub mod debounce;
pub mod error;
pub mod filters;
pub mod logging;
pub mod pages;
pub mod paper;
pub mod query;
pub mod url_state;

// Re-exports for convenience
pub use debounce::Debouncer;
pub use error::ApiError;
pub use filters::{
    AdvancedFilters, DATE_FORMAT, FilterError, FilterField, SortPreference, parse_date,
};
pub use logging::{IndicatifLogger, init_logging};
pub use pages::{PageLabel, visible_pages};
pub use paper::{Paper, Vote, reconcile_vote};
pub use query::{Action, DEFAULT_PAGE_SIZE, EffectiveQuery, QueryState, Rejection, Transition};
pub use url_state::{History, MemoryHistory, UrlState, UrlSync};
