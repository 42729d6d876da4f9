//! Open Library HTTP collaborator: configuration, the shared client, and
//! the two endpoints the application talks to (search and book details).

use serde::Deserialize;
use std::collections::HashMap;

use crate::prelude::*;
use bookscout_core::catalog::SearchHit;
use bookscout_core::details::RawDetails;
use bookscout_core::resolve::{SearchMode, REMOTE_RESULT_LIMIT};

/// Open Library hosts. Overridable through the environment for mirrors or
/// local fixtures.
#[derive(Debug, Clone)]
pub struct OpenLibraryConfig {
    pub base_url: String,
    pub covers_url: String,
}

impl OpenLibraryConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://openlibrary.org";
    pub const DEFAULT_COVERS_URL: &'static str = "https://covers.openlibrary.org";

    /// Load configuration from environment variables, with the public hosts
    /// as defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENLIBRARY_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            covers_url: std::env::var("OPENLIBRARY_COVERS_URL")
                .unwrap_or_else(|_| Self::DEFAULT_COVERS_URL.to_string()),
        }
    }
}

/// Create the HTTP client. Open Library asks callers to identify
/// themselves, so the client carries a descriptive User-Agent.
pub fn create_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("bookscout/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Wire shape of the search endpoint's response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<SearchHit>,
}

/// One search round trip. The caller picks the mode; the result count is
/// capped by the fixed per-call limit.
pub async fn search(
    client: &reqwest::Client,
    config: &OpenLibraryConfig,
    mode: SearchMode,
    term: &str,
) -> Result<Vec<SearchHit>, LookupError> {
    // Handle base_url that may or may not have trailing slash
    let base_url = config.base_url.trim_end_matches('/');
    let url = format!("{base_url}/search.json");
    let limit = REMOTE_RESULT_LIMIT.to_string();

    log::debug!("GET {url}?{}={term}&limit={limit}", mode.param());

    let response = client
        .get(&url)
        .query(&[(mode.param(), term), ("limit", limit.as_str())])
        .send()
        .await
        .map_err(|e| LookupError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(LookupError::Status(response.status().as_u16()));
    }

    let body: SearchResponse = response
        .json()
        .await
        .map_err(|e| LookupError::Parse(e.to_string()))?;

    Ok(body.docs)
}

/// Bibliographic key for the details endpoint.
pub fn bibkey(isbn: &str) -> String {
    format!("ISBN:{isbn}")
}

/// One details round trip. The response is an object keyed by bibkey; a
/// missing key means the library has no record for that ISBN.
pub async fn fetch_details(
    client: &reqwest::Client,
    config: &OpenLibraryConfig,
    isbn: &str,
) -> Result<RawDetails, LookupError> {
    let base_url = config.base_url.trim_end_matches('/');
    let key = bibkey(isbn);
    let url = format!(
        "{base_url}/api/books?bibkeys={}&format=json&jscmd=data",
        urlencoding::encode(&key)
    );

    log::debug!("GET {url}");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| LookupError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(LookupError::Status(response.status().as_u16()));
    }

    let mut body: HashMap<String, RawDetails> = response
        .json()
        .await
        .map_err(|e| LookupError::Parse(e.to_string()))?;

    body.remove(&key).ok_or(LookupError::NotFound)
}
