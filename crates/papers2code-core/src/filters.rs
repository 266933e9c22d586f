//! Sort preference and advanced search filters

use chrono::NaiveDate;

/// Date format used on the wire and in share URLs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Explicit ordering chosen by the user.
///
/// The server ignores it (ranking by relevance) whenever a text or author
/// search is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortPreference {
    #[default]
    Newest,
    Oldest,
    Upvotes,
}

impl SortPreference {
    pub const ALL: [Self; 3] = [Self::Newest, Self::Oldest, Self::Upvotes];

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "upvotes" => Some(Self::Upvotes),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Upvotes => "upvotes",
        }
    }
}

impl std::fmt::Display for SortPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advanced search filters. Every field is always present; the empty value
/// (`None`, `""`, `[]`, `false`) means "no constraint".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvancedFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search_authors: String,
    pub tags: Vec<String>,
    pub has_code: bool,
    pub contributor_id: String,
}

/// A single editable field of [`AdvancedFilters`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterField {
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    SearchAuthors(String),
    Tags(Vec<String>),
    HasCode(bool),
    ContributorId(String),
}

/// Filters that cannot be applied as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterError {
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvertedDateRange { start, end } => write!(
                f,
                "start date {} is after end date {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }
}

impl std::error::Error for FilterError {}

impl AdvancedFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn set(&mut self, field: FilterField) {
        match field {
            FilterField::StartDate(d) => self.start_date = d,
            FilterField::EndDate(d) => self.end_date = d,
            FilterField::SearchAuthors(s) => self.search_authors = s,
            FilterField::Tags(tags) => self.tags = tags,
            FilterField::HasCode(b) => self.has_code = b,
            FilterField::ContributorId(s) => self.contributor_id = s,
        }
    }

    /// Canonical form: trimmed strings, normalized tags.
    ///
    /// Applied filters are always normalized so that share URLs encode them
    /// losslessly.
    pub fn normalized(&self) -> Self {
        Self {
            start_date: self.start_date,
            end_date: self.end_date,
            search_authors: self.search_authors.trim().to_string(),
            tags: normalize_tags(self.tags.iter().map(String::as_str)),
            has_code: self.has_code,
            contributor_id: self.contributor_id.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                Err(FilterError::InvertedDateRange { start, end })
            }
            _ => Ok(()),
        }
    }
}

/// Trim, split on commas, drop empties and de-duplicate (first wins).
pub fn normalize_tags<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.into_iter().flat_map(|s| s.split(',')) {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Parse `YYYY-MM-DD`, returning `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}
