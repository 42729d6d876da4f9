//! Canonical book records and search-hit normalization.
//!
//! Open Library payloads are loose: most fields are optional, and name-like
//! fields arrive either as plain strings or as objects carrying a `name`.
//! Everything downstream of this module works with the canonical [`Book`]
//! shape and never sees that drift.

use serde::{Deserialize, Serialize};

/// Sentinel title for records the upstream data left untitled.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Sentinel author line for records with no author data.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Subjects are capped to keep the tag line readable.
pub const MAX_SUBJECTS: usize = 10;
/// Heading shown over the default catalog view.
pub const FEATURED_LABEL: &str = "Featured Books";

/// One element of the search endpoint's `docs` array, decoded tolerantly.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SearchHit {
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<NameValue>,
    #[serde(default)]
    pub publisher: Vec<NameValue>,
    pub first_publish_year: Option<u32>,
    #[serde(default)]
    pub isbn: Vec<String>,
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub subject: Vec<NameValue>,
    pub number_of_pages_median: Option<u32>,
}

/// A name-like field: a plain string, an object with a `name`, or (for
/// forward compatibility) any other JSON value.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum NameValue {
    Plain(String),
    Named { name: String },
    Other(serde_json::Value),
}

impl NameValue {
    /// Collapse to the display string. Strings pass through, objects give up
    /// their `name`, anything else renders as its JSON text.
    pub fn into_name(self) -> String {
        match self {
            NameValue::Plain(name) => name,
            NameValue::Named { name } => name,
            NameValue::Other(value) => value.to_string(),
        }
    }
}

pub(crate) fn collapse_names(values: Vec<NameValue>) -> Vec<String> {
    values.into_iter().map(NameValue::into_name).collect()
}

/// Canonical, display-ready record for one title. The `title` field is
/// always populated, with [`UNKNOWN_TITLE`] standing in for missing data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Book {
    pub id: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    pub publishers: Vec<String>,
    pub publish_year: Option<u32>,
    pub isbns: Vec<String>,
    pub cover_id: Option<i64>,
    pub subjects: Vec<String>,
    pub page_count: Option<u32>,
    pub description: Option<String>,
}

impl Book {
    /// Stub summary for enrichment flows that start from a bare identifier.
    pub fn from_isbn(isbn: &str) -> Self {
        Book {
            id: None,
            title: UNKNOWN_TITLE.to_string(),
            authors: Vec::new(),
            publishers: Vec::new(),
            publish_year: None,
            isbns: vec![isbn.to_string()],
            cover_id: None,
            subjects: Vec::new(),
            page_count: None,
            description: None,
        }
    }
}

/// Shape one raw search hit into the canonical record. Never fails: missing
/// fields degrade to sentinels or empty sequences.
pub fn normalize_search_hit(hit: SearchHit) -> Book {
    let title = match hit.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => UNKNOWN_TITLE.to_string(),
    };

    let mut subjects = collapse_names(hit.subject);
    subjects.truncate(MAX_SUBJECTS);

    Book {
        id: hit.key,
        title,
        authors: collapse_names(hit.author_name),
        publishers: collapse_names(hit.publisher),
        publish_year: hit.first_publish_year,
        isbns: hit.isbn,
        cover_id: hit.cover_i,
        subjects,
        page_count: hit.number_of_pages_median,
        description: None,
    }
}

/// Display rule for the author line: sentinel when empty, "a & b" for a
/// pair, "first & n others" beyond that.
pub fn format_authors(authors: &[String]) -> String {
    match authors {
        [] => UNKNOWN_AUTHOR.to_string(),
        [one] => one.clone(),
        [a, b] => format!("{a} & {b}"),
        [first, rest @ ..] => format!("{first} & {} others", rest.len()),
    }
}

/// The ten titles shipped as the default view. Doubles as the corpus the
/// resolver matches before touching the network.
const FEATURED: &[(&str, &str)] = &[
    ("The Great Gatsby", "F. Scott Fitzgerald"),
    ("To Kill a Mockingbird", "Harper Lee"),
    ("1984", "George Orwell"),
    ("Pride and Prejudice", "Jane Austen"),
    ("The Catcher in the Rye", "J.D. Salinger"),
    ("Lord of the Flies", "William Golding"),
    ("The Hobbit", "J.R.R. Tolkien"),
    ("Harry Potter", "J.K. Rowling"),
    ("Dune", "Frank Herbert"),
    ("The Alchemist", "Paulo Coelho"),
];

fn catalog_entry(title: &str, author: &str) -> Book {
    Book {
        id: None,
        title: title.to_string(),
        authors: vec![author.to_string()],
        publishers: Vec::new(),
        publish_year: None,
        isbns: Vec::new(),
        cover_id: None,
        subjects: Vec::new(),
        page_count: None,
        description: None,
    }
}

/// The static featured catalog.
pub fn featured() -> Vec<Book> {
    FEATURED
        .iter()
        .map(|(title, author)| catalog_entry(title, author))
        .collect()
}

/// Case-insensitive substring match on title or any author name.
pub fn local_matches(catalog: &[Book], query: &str) -> Vec<Book> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&needle)
                || book
                    .authors
                    .iter()
                    .any(|author| author.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
