//! Query validation and the local-vs-remote resolution plan.
//!
//! Resolution is decided before any I/O: a query that matches the featured
//! catalog never reaches the network, and everything else becomes exactly
//! one remote call in a mode picked from the query's prefix.

use thiserror::Error;

use crate::catalog::{self, Book};

/// Minimum length for an explicit submit to proceed past the advisory.
pub const MIN_QUERY_LEN: usize = 2;
/// Minimum length before live typing may trigger a debounced search.
pub const LIVE_QUERY_LEN: usize = 3;
/// Cap on results per remote call. Passed to the API, not enforced locally.
pub const REMOTE_RESULT_LIMIT: usize = 20;

/// Rejected queries never reach the network. These render as advisories in
/// the current view, never as the error state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Please enter a search term")]
    Empty,

    #[error("Search term must be at least 2 characters")]
    TooShort,
}

/// A trimmed query that passed the submit-length floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Err(QueryError::TooShort);
        }
        Ok(Query(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which search-endpoint parameter a remote lookup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    General,
    Title,
    Author,
}

impl SearchMode {
    /// Query-string parameter name on the search endpoint.
    pub fn param(&self) -> &'static str {
        match self {
            SearchMode::General => "q",
            SearchMode::Title => "title",
            SearchMode::Author => "author",
        }
    }
}

/// The resolver's decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// The fixed catalog satisfied the query; no remote call happens.
    Local(Vec<Book>),
    /// One remote call in the given mode with the cleaned term.
    Remote { mode: SearchMode, term: String },
}

/// Decide how to satisfy a query: the local catalog first (a non-empty
/// match short-circuits the network), then prefix classification.
pub fn resolve(query: &Query) -> Plan {
    let matches = catalog::local_matches(&catalog::featured(), query.as_str());
    if !matches.is_empty() {
        return Plan::Local(matches);
    }
    let (mode, term) = classify(query.as_str());
    Plan::Remote { mode, term }
}

/// Prefix syntax: `title:` scopes to titles, `author:` or `by ` scopes to
/// authors, anything else is a general search. Prefixes are stripped from
/// the term; matching is case-insensitive.
pub fn classify(raw: &str) -> (SearchMode, String) {
    if let Some(rest) = strip_prefix_ci(raw, "title:") {
        return (SearchMode::Title, rest.trim().to_string());
    }
    if let Some(rest) = strip_prefix_ci(raw, "author:") {
        return (SearchMode::Author, rest.trim().to_string());
    }
    if let Some(rest) = strip_prefix_ci(raw, "by ") {
        return (SearchMode::Author, rest.trim().to_string());
    }
    (SearchMode::General, raw.trim().to_string())
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
