//! Papers2Code client - Papers API transport and list controller
//!
//! Async side of the paper list: a reqwest transport for the Papers API,
//! a cancellable fetcher that lets only the latest query win, and the
//! controller that drives `papers2code-core` state from user input,
//! debounce timers and network responses.

pub mod api;
pub mod controller;
pub mod fetcher;
pub mod http;
pub mod session;

// Re-exports
pub use api::{PaperPage, PapersApi, classify_failure};
pub use controller::{ControllerOptions, DEFAULT_DEBOUNCE, ListEvent, PaperListController};
pub use fetcher::{FetchOutcome, Fetcher};
pub use http::HttpPapersApi;
pub use session::Session;
