//! Deterministic cover-image URL construction for the covers host.

use crate::catalog::Book;

/// Image size code on the covers host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    pub fn code(&self) -> char {
        match self {
            CoverSize::Small => 'S',
            CoverSize::Medium => 'M',
            CoverSize::Large => 'L',
        }
    }
}

/// Which identifier a cover URL is keyed by.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverRef {
    Id(i64),
    Isbn(String),
}

impl CoverRef {
    /// A numeric cover id wins over an ISBN; records with neither have no
    /// cover at all.
    pub fn for_book(book: &Book) -> Option<CoverRef> {
        if let Some(id) = book.cover_id {
            return Some(CoverRef::Id(id));
        }
        book.isbns.first().map(|isbn| CoverRef::Isbn(isbn.clone()))
    }
}

/// Image URL on the covers host. Pure string work; nothing is fetched.
pub fn url(covers_base: &str, cover: &CoverRef, size: CoverSize) -> String {
    let base = covers_base.trim_end_matches('/');
    match cover {
        CoverRef::Id(id) => format!("{base}/b/id/{id}-{}.jpg", size.code()),
        CoverRef::Isbn(isbn) => format!("{base}/b/isbn/{isbn}-{}.jpg", size.code()),
    }
}

/// The URL for a record, if it has any cover reference.
pub fn url_for_book(covers_base: &str, book: &Book, size: CoverSize) -> Option<String> {
    CoverRef::for_book(book).map(|cover| url(covers_base, &cover, size))
}
