//! Details-payload normalization and patch-merge semantics.
//!
//! A details lookup never replaces a book outright. It produces a
//! [`DetailPatch`] that is merged over the existing summary: fields the
//! payload carries overwrite, fields it omits leave the summary alone.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{collapse_names, Book, NameValue, MAX_SUBJECTS};

/// Sentinel used when a payload arrives but carries no description.
pub const NO_DESCRIPTION: &str = "No description available.";
/// Sentinel used when the details lookup itself failed or found nothing.
pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available.";

/// Details payload for one bibliographic key (`jscmd=data` shape).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RawDetails {
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<NameValue>,
    #[serde(default)]
    pub publishers: Vec<NameValue>,
    #[serde(default)]
    pub subjects: Vec<NameValue>,
    pub publish_date: Option<String>,
    pub number_of_pages: Option<u32>,
    pub description: Option<DescriptionField>,
    #[serde(default)]
    pub excerpts: Vec<Excerpt>,
}

/// Free-form description: a bare string or a typed object with a `value`
/// field, depending on the record's age.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum DescriptionField {
    Text(String),
    Object { value: String },
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Excerpt {
    pub text: Option<String>,
}

/// Partial enrichment produced by a details lookup. `None` and empty-vec
/// fields mean "no data", never "erase".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DetailPatch {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publishers: Vec<String>,
    pub publish_year: Option<u32>,
    /// Human-readable publish date, prettified when it parses as a full date.
    pub publish_date: Option<String>,
    pub page_count: Option<u32>,
    pub subjects: Vec<String>,
    pub description: Option<String>,
}

/// Shape a raw details payload into a patch. Never fails; the description
/// always resolves to something displayable.
pub fn normalize_details(raw: RawDetails) -> DetailPatch {
    let RawDetails {
        title,
        authors,
        publishers,
        subjects,
        publish_date,
        number_of_pages,
        description,
        excerpts,
    } = raw;

    let mut subjects = collapse_names(subjects);
    subjects.truncate(MAX_SUBJECTS);

    let publish_year = publish_date.as_deref().and_then(parse_publish_year);

    DetailPatch {
        title: title.filter(|title| !title.trim().is_empty()),
        authors: collapse_names(authors),
        publishers: collapse_names(publishers),
        publish_year,
        publish_date: publish_date.map(|date| format_publish_date(&date)),
        page_count: number_of_pages,
        subjects,
        description: Some(extract_description(&excerpts, description.as_ref())),
    }
}

/// Description precedence: first excerpt's text, then a bare string
/// description, then an object description's `value`, then the sentinel.
pub fn extract_description(excerpts: &[Excerpt], description: Option<&DescriptionField>) -> String {
    if let Some(text) = excerpts.first().and_then(|excerpt| excerpt.text.as_deref()) {
        if !text.trim().is_empty() {
            return text.to_string();
        }
    }
    match description {
        Some(DescriptionField::Text(text)) => text.clone(),
        Some(DescriptionField::Object { value }) => value.clone(),
        None => NO_DESCRIPTION.to_string(),
    }
}

fn parse_full_date(date: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%d %B %Y"];
    let date = date.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
}

/// Pull a year out of the free-form `publish_date` string ("March 2, 2009",
/// "2009-03-02", "2009"). Full-date parses win; otherwise the first
/// four-digit run is taken.
fn parse_publish_year(date: &str) -> Option<u32> {
    if let Some(parsed) = parse_full_date(date) {
        return u32::try_from(parsed.year()).ok();
    }
    let year = Regex::new(r"\b\d{4}\b").unwrap();
    year.find(date).and_then(|m| m.as_str().parse().ok())
}

/// Pretty-print a full publish date ("2009-03-02" becomes "March 2, 2009").
/// Strings that do not parse as a full date pass through unchanged.
pub fn format_publish_date(date: &str) -> String {
    match parse_full_date(date) {
        Some(parsed) => parsed.format("%B %-d, %Y").to_string(),
        None => date.trim().to_string(),
    }
}

/// Merge a patch over a summary, producing a new record. Present patch
/// fields overwrite; absent ones keep the summary's value.
pub fn merge(summary: &Book, patch: DetailPatch) -> Book {
    let mut merged = summary.clone();
    if let Some(title) = patch.title {
        merged.title = title;
    }
    if !patch.authors.is_empty() {
        merged.authors = patch.authors;
    }
    if !patch.publishers.is_empty() {
        merged.publishers = patch.publishers;
    }
    if let Some(year) = patch.publish_year {
        merged.publish_year = Some(year);
    }
    if let Some(pages) = patch.page_count {
        merged.page_count = Some(pages);
    }
    if !patch.subjects.is_empty() {
        merged.subjects = patch.subjects;
    }
    if let Some(description) = patch.description {
        merged.description = Some(description);
    }
    merged
}
