//! Papers API contract: request parameters, response shape, failure mapping

use std::future::Future;

use papers2code_core::filters::DATE_FORMAT;
use papers2code_core::{ApiError, EffectiveQuery, Paper, Vote};
use serde::Deserialize;

/// Response of `GET /papers`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperPage {
    pub papers: Vec<Paper>,
    pub total_count: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub has_more: bool,
}

/// Transport for the two calls the list view makes.
///
/// Implemented over HTTP by [`crate::HttpPapersApi`]; tests substitute fakes.
pub trait PapersApi: Send + Sync + 'static {
    fn list_papers(
        &self,
        query: &EffectiveQuery,
    ) -> impl Future<Output = Result<PaperPage, ApiError>> + Send;

    fn vote(
        &self,
        paper_id: &str,
        vote: Vote,
    ) -> impl Future<Output = Result<Paper, ApiError>> + Send;
}

/// Query parameters for `GET /papers`, empty values omitted.
pub fn list_params(query: &EffectiveQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
    ];
    if !query.search.is_empty() {
        params.push(("searchQuery", query.search.clone()));
    }
    if let Some(sort) = query.sort {
        params.push(("sort", sort.as_str().to_string()));
    }
    let f = &query.filters;
    if let Some(d) = f.start_date {
        params.push(("startDate", d.format(DATE_FORMAT).to_string()));
    }
    if let Some(d) = f.end_date {
        params.push(("endDate", d.format(DATE_FORMAT).to_string()));
    }
    if !f.search_authors.is_empty() {
        params.push(("searchAuthors", f.search_authors.clone()));
    }
    params.extend(f.tags.iter().map(|t| ("tags[]", t.clone())));
    if f.has_code {
        params.push(("hasCode", "true".to_string()));
    }
    if !f.contributor_id.is_empty() {
        params.push(("contributorId", f.contributor_id.clone()));
    }
    params
}

/// Map a non-2xx status and its body to the failure taxonomy.
pub fn classify_failure(status: u16, body: &str) -> ApiError {
    match status {
        401 => ApiError::AuthenticationRequired,
        403 if is_session_error(body) => ApiError::SessionInvalid,
        422 => ApiError::ValidationFailed(
            validation_message(body).unwrap_or_else(|| "request validation failed".to_string()),
        ),
        _ => ApiError::Unknown(
            error_message(body).unwrap_or_else(|| format!("HTTP {status}")),
        ),
    }
}

fn is_session_error(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    body.contains("csrf") || body.contains("session")
}

/// First structured detail of a 422 body.
///
/// Accepts `{"detail": [{"msg": ...}]}`, `{"detail": "..."}` and
/// `{"errors": [{"message": ...}]}`.
fn validation_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    let first = v
        .get("detail")
        .or_else(|| v.get("errors"))
        .and_then(|d| d.as_array())
        .and_then(|items| items.first());
    if let Some(item) = first {
        let msg = item
            .get("msg")
            .or_else(|| item.get("message"))
            .and_then(|m| m.as_str())?;
        let field = item
            .get("loc")
            .and_then(|l| l.as_array())
            .and_then(|l| l.last())
            .and_then(|l| l.as_str());
        return Some(match field {
            Some(field) => format!("{field}: {msg}"),
            None => msg.to_string(),
        });
    }
    error_message(body)
}

/// Human-readable message from a JSON error body, or the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        let msg = ["detail", "message", "error"]
            .iter()
            .find_map(|k| v.get(*k).and_then(|m| m.as_str()));
        if let Some(msg) = msg {
            return Some(msg.to_string());
        }
    }
    Some(body.to_string())
}
