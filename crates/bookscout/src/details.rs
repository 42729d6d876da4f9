//! `bookscout details` - look up one book by ISBN and render the detail
//! card.
//!
//! Enrichment is additive and failure-tolerant: the card always renders,
//! with a neutral description when the lookup fails or finds nothing.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::openlibrary::{self, OpenLibraryConfig};
use crate::prelude::{eprintln, println, *};
use bookscout_core::catalog::{format_authors, Book};
use bookscout_core::covers::{self, CoverSize};
use bookscout_core::details::{merge, normalize_details, DESCRIPTION_UNAVAILABLE};
use bookscout_core::isbn;

/// Options for reading one book's details
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # 13-digit ISBN:
  bookscout details 9780451524935

  # Hyphenated and 10-digit forms work too:
  bookscout details 0-394-80001-X

  # Machine-readable output:
  bookscout details 9780451524935 --json")]
pub struct DetailsOptions {
    /// ISBN-10 or ISBN-13; hyphens and spaces are ignored
    #[clap(env = "BOOKSCOUT_ISBN")]
    pub isbn: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch-and-merge shared by the subcommand and the live session. Returns
/// the merged record plus the pretty publish date, when one was found.
/// Lookup failures degrade to the neutral fallback instead of erroring.
pub async fn enrich(
    client: &reqwest::Client,
    config: &OpenLibraryConfig,
    summary: &Book,
) -> (Book, Option<String>) {
    let Some(candidate) = summary.isbns.iter().find(|isbn| isbn::is_valid(isbn)) else {
        return (unavailable(summary), None);
    };
    let cleaned = isbn::normalize(candidate);

    match openlibrary::fetch_details(client, config, &cleaned).await {
        Ok(raw) => {
            let patch = normalize_details(raw);
            let publish_date = patch.publish_date.clone();
            (merge(summary, patch), publish_date)
        }
        Err(err) => {
            log::warn!("details lookup for ISBN {cleaned} failed: {err}");
            (unavailable(summary), None)
        }
    }
}

fn unavailable(summary: &Book) -> Book {
    let mut fallback = summary.clone();
    fallback.description = Some(DESCRIPTION_UNAVAILABLE.to_string());
    fallback
}

/// Format the detail card as human-readable text.
pub fn format_details_text(book: &Book, publish_date: Option<&str>, covers_base: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} - {}\n\n",
        book.title.bold(),
        format_authors(&book.authors)
    ));

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Publisher",
        book.publishers.first().map(String::as_str).unwrap_or("N/A")
    ]);
    let published = publish_date
        .map(str::to_string)
        .or_else(|| book.publish_year.map(|year| year.to_string()))
        .unwrap_or_else(|| "N/A".to_string());
    table.add_row(prettytable::row!["Published", published]);
    let pages = book
        .page_count
        .map(|pages| pages.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    table.add_row(prettytable::row!["Pages", pages]);
    table.add_row(prettytable::row![
        "ISBN",
        book.isbns.first().map(String::as_str).unwrap_or("N/A")
    ]);
    if let Some(cover) = covers::url_for_book(covers_base, book, CoverSize::Large) {
        table.add_row(prettytable::row!["Cover", cover]);
    }
    output.push_str(&table.to_string());

    if let Some(description) = &book.description {
        output.push_str(&format!(
            "\n{}:\n{}\n",
            "Description".green().bold(),
            description
        ));
    }

    if book.subjects.is_empty() {
        output.push_str(&format!(
            "\n{}: No subjects available\n",
            "Subjects".green().bold()
        ));
    } else {
        output.push_str(&format!(
            "\n{}: {}\n",
            "Subjects".green().bold(),
            book.subjects.join(", ")
        ));
    }
    output.push('\n');
    output
}

pub async fn run(options: DetailsOptions, global: crate::Global) -> Result<()> {
    if !isbn::is_valid(&options.isbn) {
        return Err(eyre!(
            "Invalid ISBN {:?}: expected 10 digits (last may be X) or 13 digits",
            options.isbn
        ));
    }
    let cleaned = isbn::normalize(&options.isbn);

    let config = OpenLibraryConfig::from_env();
    if global.verbose {
        println!("Open Library host: {}", config.base_url);
    }

    let client = openlibrary::create_client()?;
    if !options.json {
        eprintln!("{}", "Fetching details...".bright_black());
    }

    let summary = Book::from_isbn(&cleaned);
    let (book, publish_date) = enrich(&client, &config, &summary).await;

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&book)
                .map_err(|e| eyre!("Failed to serialize book to JSON: {}", e))?
        );
    } else {
        print!(
            "{}",
            format_details_text(&book, publish_date.as_deref(), &config.covers_url)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_book() -> Book {
        Book {
            id: None,
            title: "Nineteen Eighty-Four".to_string(),
            authors: vec!["George Orwell".to_string()],
            publishers: vec!["Secker & Warburg".to_string()],
            publish_year: Some(1949),
            isbns: vec!["9780451524935".to_string()],
            cover_id: None,
            subjects: vec!["Dystopias".to_string(), "Political fiction".to_string()],
            page_count: Some(328),
            description: Some("A novel about surveillance.".to_string()),
        }
    }

    #[test]
    fn test_format_details_text_contains_fields() {
        let book = create_test_book();
        let output = format_details_text(&book, Some("June 8, 1949"), "https://covers.example");

        assert!(output.contains("Nineteen Eighty-Four"));
        assert!(output.contains("George Orwell"));
        assert!(output.contains("Secker & Warburg"));
        assert!(output.contains("June 8, 1949"));
        assert!(output.contains("328"));
        assert!(output.contains("9780451524935"));
        assert!(output.contains("https://covers.example/b/isbn/9780451524935-L.jpg"));
        assert!(output.contains("A novel about surveillance."));
        assert!(output.contains("Dystopias, Political fiction"));
    }

    #[test]
    fn test_format_details_text_year_fallback_without_pretty_date() {
        let book = create_test_book();
        let output = format_details_text(&book, None, "https://covers.example");

        assert!(output.contains("1949"));
    }

    #[test]
    fn test_format_details_text_placeholders() {
        let book = Book::from_isbn("9780451524935");
        let output = format_details_text(&book, None, "https://covers.example");

        assert!(output.contains("Unknown Title"));
        assert!(output.contains("Unknown Author"));
        assert!(output.contains("N/A"));
        assert!(output.contains("No subjects available"));
    }

    #[test]
    fn test_unavailable_keeps_summary_but_marks_description() {
        let summary = create_test_book();
        let fallback = unavailable(&summary);

        assert_eq!(fallback.title, summary.title);
        assert_eq!(
            fallback.description,
            Some(DESCRIPTION_UNAVAILABLE.to_string())
        );
    }
}
