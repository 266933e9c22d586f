//! Remote fetcher: at most one meaningful list request at a time.
//!
//! Issuing a new query cancels the previous request's token. Results travel
//! back over a channel tagged with their token, and anything whose token was
//! cancelled is dropped on receipt, so a superseded response can never be
//! applied even if it already arrived.

use std::sync::Arc;

use papers2code_core::{ApiError, EffectiveQuery};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{PaperPage, PapersApi};

struct Completion {
    token: CancellationToken,
    query: EffectiveQuery,
    result: Result<PaperPage, ApiError>,
}

/// A non-cancelled list response.
#[derive(Debug)]
pub struct FetchOutcome {
    pub query: EffectiveQuery,
    pub result: Result<PaperPage, ApiError>,
}

pub struct Fetcher<A> {
    api: Arc<A>,
    in_flight: Option<(CancellationToken, EffectiveQuery)>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<A: PapersApi> Fetcher<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Start fetching `query`, superseding any request in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn issue(&mut self, query: EffectiveQuery) {
        self.cancel();
        let token = CancellationToken::new();
        log::debug!(
            "Fetching page {} (search={:?}, sort={:?})",
            query.page,
            query.search,
            query.sort
        );

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let task_token = token.clone();
        let task_query = query.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = task_token.cancelled() => Err(ApiError::Cancelled),
                r = api.list_papers(&task_query) => r,
            };
            // Receiver gone means the fetcher was dropped
            let _ = tx.send(Completion {
                token: task_token,
                query: task_query,
                result,
            });
        });

        self.in_flight = Some((token, query));
    }

    /// Cancel the request in flight, if any. Its result will be discarded.
    pub fn cancel(&mut self) {
        if let Some((token, query)) = self.in_flight.take() {
            log::debug!("Cancelling superseded fetch of page {}", query.page);
            token.cancel();
        }
    }

    /// True from `issue` until that request's outcome is received or it is
    /// cancelled.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_query(&self) -> Option<&EffectiveQuery> {
        self.in_flight.as_ref().map(|(_, q)| q)
    }

    /// Wait for the current request's outcome, skipping cancelled ones.
    ///
    /// Cancel-safe. Never resolves while nothing is in flight.
    pub async fn next_outcome(&mut self) -> FetchOutcome {
        loop {
            if self.in_flight.is_none() {
                std::future::pending::<()>().await;
            }
            let Some(done) = self.rx.recv().await else {
                // We hold a sender, so the channel never closes
                std::future::pending::<()>().await;
                continue;
            };
            if done.token.is_cancelled() {
                log::debug!("Discarding result of cancelled fetch (page {})", done.query.page);
                continue;
            }
            self.in_flight = None;
            return FetchOutcome {
                query: done.query,
                result: done.result,
            };
        }
    }
}

impl<A> Drop for Fetcher<A> {
    fn drop(&mut self) {
        if let Some((token, _)) = self.in_flight.take() {
            token.cancel();
        }
    }
}
