//! reqwest-backed Papers API transport

use std::sync::Arc;
use std::time::Duration;

use papers2code_core::{ApiError, EffectiveQuery, Paper, Vote};
use serde::Deserialize;

use crate::api::{PaperPage, PapersApi, classify_failure, list_params};
use crate::session::Session;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsrfResponse {
    csrf_token: String,
}

/// HTTP client for the Papers API rooted at `base_url` (e.g.
/// `https://example.org/api`).
#[derive(Clone)]
pub struct HttpPapersApi {
    client: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl HttpPapersApi {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<Session>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .user_agent(concat!("papers2code/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Unknown(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `{base}/papers/{id}/vote` with the id escaped as one path segment.
    fn vote_url(&self, paper_id: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.url("/papers"))
            .map_err(|e| ApiError::Unknown(format!("invalid API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Unknown(format!("invalid API URL: {}", self.base_url)))?
            .push(paper_id)
            .push("vote");
        Ok(url)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.access_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send and turn non-2xx responses into [`ApiError`]s.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = classify_failure(status.as_u16(), &body);
        if err == ApiError::SessionInvalid {
            self.session.invalidate_csrf_token();
        }
        log::debug!("Papers API returned {status}: {err}");
        Err(err)
    }

    /// Cached CSRF token, fetched from `/auth/csrf-token` on first use.
    async fn csrf_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.session.csrf_token() {
            return Ok(token);
        }
        log::debug!("Fetching CSRF token");
        let resp = self.send(self.client.get(self.url("/auth/csrf-token"))).await?;
        let body: CsrfResponse = resp.json().await.map_err(|e| decode_error(&e))?;
        self.session.store_csrf_token(body.csrf_token.clone());
        Ok(body.csrf_token)
    }
}

impl PapersApi for HttpPapersApi {
    async fn list_papers(&self, query: &EffectiveQuery) -> Result<PaperPage, ApiError> {
        let req = self
            .client
            .get(self.url("/papers"))
            .query(&list_params(query));
        let resp = self.send(req).await?;
        resp.json::<PaperPage>().await.map_err(|e| decode_error(&e))
    }

    async fn vote(&self, paper_id: &str, vote: Vote) -> Result<Paper, ApiError> {
        let csrf = self.csrf_token().await?;
        let req = self
            .client
            .post(self.vote_url(paper_id)?)
            .header(CSRF_HEADER, csrf)
            .json(&serde_json::json!({ "vote_type": vote.as_str() }));
        let resp = self.send(req).await?;
        resp.json::<Paper>().await.map_err(|e| decode_error(&e))
    }
}

/// Transport failure without the request URL, which may carry query text.
fn transport_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        return ApiError::Unknown("request timed out".to_string());
    }
    if e.is_connect() {
        return ApiError::Unknown("cannot reach the papers service".to_string());
    }
    ApiError::Unknown(format!("request failed: {}", strip_url(e)))
}

fn decode_error(e: &reqwest::Error) -> ApiError {
    ApiError::Unknown(format!("invalid response: {}", strip_url(e)))
}

fn strip_url(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(url) = e.url() {
        msg = msg.replace(&format!(" ({url})"), "");
    }
    msg
}
