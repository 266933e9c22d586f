//! Share-URL encoding of the list query and address-bar synchronization.
//!
//! Parameters are written in a fixed order and omitted at their default, so a
//! query string produced here decodes and re-encodes to itself.

use crate::filters::{AdvancedFilters, DATE_FORMAT, SortPreference, normalize_tags, parse_date};

/// The externally visible part of the list query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlState {
    pub search: String,
    pub page: u32,
    pub sort: SortPreference,
    pub filters: AdvancedFilters,
}

impl Default for UrlState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            sort: SortPreference::default(),
            filters: AdvancedFilters::default(),
        }
    }
}

impl UrlState {
    /// Encode as a query string without the leading `?`.
    pub fn encode(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if !self.search.is_empty() {
            pairs.push(("searchQuery", self.search.clone()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.sort != SortPreference::default() {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }
        let f = &self.filters;
        if let Some(d) = f.start_date {
            pairs.push(("startDate", d.format(DATE_FORMAT).to_string()));
        }
        if let Some(d) = f.end_date {
            pairs.push(("endDate", d.format(DATE_FORMAT).to_string()));
        }
        if !f.search_authors.is_empty() {
            pairs.push(("searchAuthors", f.search_authors.clone()));
        }
        if !f.tags.is_empty() {
            pairs.push(("tags", f.tags.join(",")));
        }
        if f.has_code {
            pairs.push(("hasCode", "true".to_string()));
        }
        if !f.contributor_id.is_empty() {
            pairs.push(("contributorId", f.contributor_id.clone()));
        }
        // Serializing a sequence of string pairs cannot fail
        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }

    /// Decode a query string (leading `?` optional). Unknown keys and
    /// malformed values fall back to their defaults.
    pub fn decode(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
            Ok(pairs) => pairs,
            Err(e) => {
                log::debug!("Ignoring malformed query string: {e}");
                return Self::default();
            }
        };

        let mut state = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "searchQuery" => state.search = value,
                "page" => state.page = value.trim().parse().ok().filter(|&p| p >= 1).unwrap_or(1),
                "sort" => state.sort = SortPreference::from_name(&value).unwrap_or_default(),
                "startDate" => state.filters.start_date = parse_date(&value),
                "endDate" => state.filters.end_date = parse_date(&value),
                "searchAuthors" => state.filters.search_authors = value.trim().to_string(),
                "tags" => state.filters.tags = normalize_tags([value.as_str()]),
                "hasCode" => state.filters.has_code = value == "true",
                "contributorId" => state.filters.contributor_id = value.trim().to_string(),
                other => log::debug!("Ignoring unknown query parameter {other:?}"),
            }
        }
        state
    }
}

/// Address bar abstraction: the current query string and in-place replacement.
pub trait History {
    fn location(&self) -> &str;
    fn replace(&mut self, query: &str);
}

/// In-memory history stack with back/forward navigation.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// Navigate to a new entry, dropping any forward entries.
    pub fn push(&mut self, query: impl Into<String>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(query.into());
        self.index += 1;
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> &str {
        &self.entries[self.index]
    }

    fn replace(&mut self, query: &str) {
        self.entries[self.index] = query.to_string();
    }
}

/// Two-way sync between [`UrlState`] and a [`History`].
///
/// Remembers its own last write so that reading it back is not mistaken for
/// external navigation.
#[derive(Debug, Default)]
pub struct UrlSync {
    last_written: Option<String>,
}

impl UrlSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current history entry if the encoding changed.
    pub fn write(&mut self, history: &mut impl History, state: &UrlState) -> bool {
        let query = state.encode();
        if history.location() == query {
            return false;
        }
        log::debug!("Replacing location with ?{query}");
        history.replace(&query);
        self.last_written = Some(query);
        true
    }

    /// Decode the current location if it was changed by someone else and
    /// differs from `current`.
    pub fn read(&mut self, history: &impl History, current: &UrlState) -> Option<UrlState> {
        let location = history.location();
        if self.last_written.as_deref() == Some(location) {
            return None;
        }
        self.last_written = None;
        let decoded = UrlState::decode(location);
        (decoded != *current).then_some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn full_state() -> UrlState {
        UrlState {
            search: "diffusion & co=1".into(),
            page: 4,
            sort: SortPreference::Upvotes,
            filters: AdvancedFilters {
                start_date: NaiveDate::from_ymd_opt(2021, 3, 1),
                end_date: NaiveDate::from_ymd_opt(2023, 12, 31),
                search_authors: "Ho, Salimans".into(),
                tags: vec!["generative models".into(), "vision".into()],
                has_code: true,
                contributor_id: "u-17".into(),
            },
        }
    }

    #[test]
    fn default_encodes_empty() {
        assert_eq!(UrlState::default().encode(), "");
        assert_eq!(UrlState::decode(""), UrlState::default());
    }

    #[test]
    fn roundtrip_full_state() {
        let state = full_state();
        let qs = state.encode();
        assert_eq!(UrlState::decode(&qs), state);
        assert_eq!(UrlState::decode(&qs).encode(), qs);
    }

    #[test]
    fn roundtrip_partial_states() {
        let base = full_state();
        let variants = [
            UrlState {
                search: "bert".into(),
                ..Default::default()
            },
            UrlState {
                page: 2,
                ..Default::default()
            },
            UrlState {
                sort: SortPreference::Oldest,
                filters: AdvancedFilters {
                    tags: vec!["rl".into()],
                    ..Default::default()
                },
                ..Default::default()
            },
            UrlState {
                filters: AdvancedFilters {
                    end_date: base.filters.end_date,
                    ..Default::default()
                },
                ..Default::default()
            },
        ];
        for state in variants {
            assert_eq!(UrlState::decode(&state.encode()), state, "{state:?}");
        }
    }

    #[test]
    fn defaults_are_omitted() {
        let state = UrlState {
            search: "gan".into(),
            page: 1,
            sort: SortPreference::Newest,
            ..Default::default()
        };
        assert_eq!(state.encode(), "searchQuery=gan");
    }

    #[test]
    fn parameter_order_is_fixed() {
        let qs = full_state().encode();
        let keys: Vec<&str> = qs
            .split('&')
            .map(|kv| kv.split('=').next().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec![
                "searchQuery",
                "page",
                "sort",
                "startDate",
                "endDate",
                "searchAuthors",
                "tags",
                "hasCode",
                "contributorId"
            ]
        );
    }

    #[test]
    fn decode_tolerates_garbage() {
        let s = UrlState::decode("?page=-3&sort=random&startDate=yesterday&foo=bar&hasCode=yes");
        assert_eq!(s, UrlState::default());
        assert_eq!(UrlState::decode("page=0").page, 1);
    }

    #[test]
    fn decode_explicit_defaults_canonicalizes() {
        let s = UrlState::decode("?page=1&sort=newest&searchQuery=vit");
        assert_eq!(s.encode(), "searchQuery=vit");
    }

    #[test]
    fn memory_history_navigation() {
        let mut h = MemoryHistory::new("");
        h.push("page=2");
        h.push("page=3");
        assert!(h.back());
        assert_eq!(h.location(), "page=2");
        h.push("sort=oldest");
        assert!(!h.forward());
        assert_eq!(h.len(), 3);
        assert!(h.back());
        assert!(h.back());
        assert!(!h.back());
        assert_eq!(h.location(), "");
    }

    #[test]
    fn sync_ignores_own_writes() {
        let mut h = MemoryHistory::new("");
        let mut sync = UrlSync::new();
        let state = UrlState {
            page: 3,
            ..Default::default()
        };

        assert!(sync.write(&mut h, &state));
        assert_eq!(h.location(), "page=3");
        assert_eq!(h.len(), 1, "replace, not push");
        assert_eq!(sync.read(&h, &UrlState::default()), None);

        // Writing the same state again is a no-op
        assert!(!sync.write(&mut h, &state));
    }

    #[test]
    fn sync_reads_external_navigation() {
        let mut h = MemoryHistory::new("page=2");
        let mut sync = UrlSync::new();
        let current = UrlState::default();

        let restored = sync.read(&h, &current).unwrap();
        assert_eq!(restored.page, 2);

        h.push("searchQuery=bert");
        assert_eq!(sync.read(&h, &restored).unwrap().search, "bert");
    }

    #[test]
    fn sync_skips_location_matching_state() {
        let h = MemoryHistory::new("sort=oldest");
        let mut sync = UrlSync::new();
        let current = UrlState {
            sort: SortPreference::Oldest,
            ..Default::default()
        };
        assert_eq!(sync.read(&h, &current), None);
    }
}
