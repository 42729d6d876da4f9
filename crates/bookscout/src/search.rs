//! `bookscout search` - one-shot catalog search.
//!
//! The resolver runs first: a featured-catalog match renders without any
//! network traffic, anything else becomes exactly one Open Library call in
//! the mode picked from the query prefix.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::openlibrary::{self, OpenLibraryConfig};
use crate::prelude::{eprintln, println, *};
use bookscout_core::catalog::{format_authors, normalize_search_hit, Book, FEATURED_LABEL};
use bookscout_core::covers::{self, CoverSize};
use bookscout_core::resolve::{resolve, Plan, Query};
use bookscout_core::session::SEARCH_FAILED;

/// Options for searching the catalog
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # General search:
  bookscout search \"the left hand of darkness\"

  # Scope to titles or authors:
  bookscout search \"title:The Hobbit\"
  bookscout search \"author:Octavia Butler\"
  bookscout search \"by Stephen King\"

  # Machine-readable output:
  bookscout search \"dune\" --json

NOTES:
  - Queries matching the featured catalog are answered locally, without a
    network call
  - Remote searches return at most 20 results per call")]
pub struct SearchOptions {
    /// Search term; `title:` and `author:`/`by ` prefixes scope the lookup
    #[clap(env = "BOOKSCOUT_QUERY")]
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Search output for rendering and `--json`.
#[derive(Debug, Serialize, Clone)]
pub struct SearchResults {
    pub label: String,
    pub total: usize,
    pub books: Vec<Book>,
}

/// Resolve and execute one search round: the local catalog short-circuits,
/// otherwise exactly one remote call in the resolved mode.
pub async fn search_data(
    client: &reqwest::Client,
    config: &OpenLibraryConfig,
    query: &Query,
) -> Result<SearchResults, LookupError> {
    let label = query.as_str().to_string();
    let books = match resolve(query) {
        Plan::Local(books) => books,
        Plan::Remote { mode, term } => {
            let hits = openlibrary::search(client, config, mode, &term).await?;
            hits.into_iter().map(normalize_search_hit).collect()
        }
    };
    Ok(SearchResults {
        label,
        total: books.len(),
        books,
    })
}

/// Format results as JSON.
pub fn format_results_json(results: &SearchResults) -> Result<String> {
    serde_json::to_string_pretty(results)
        .map_err(|e| eyre!("Failed to serialize results to JSON: {}", e))
}

/// Format results as human-readable text, one card per hit.
pub fn format_results_text(results: &SearchResults, covers_base: &str) -> String {
    let mut output = String::new();

    if results.books.is_empty() {
        output.push_str(&format!("\n{}\n", "No books found".yellow().bold()));
        output.push_str("Try a different search term.\n\n");
        return output;
    }

    // The catalog heading is a section title; searches report their count.
    let heading = if results.label == FEATURED_LABEL {
        results.label.clone()
    } else {
        format!("Found {} books for \"{}\"", results.total, results.label)
    };
    output.push_str(&format!("\n{}\n", "=".repeat(70).bright_cyan()));
    output.push_str(&format!("{}\n", heading.bright_cyan().bold()));
    output.push_str(&format!("{}\n", "=".repeat(70).bright_cyan()));

    for (index, book) in results.books.iter().enumerate() {
        output.push_str(&format!(
            "\n{} {}\n",
            format!("[{}]", index + 1).yellow().bold(),
            truncate_text(&book.title, 50).white().bold()
        ));
        output.push_str(&format!(
            "    {}: {}\n",
            "By".green(),
            format_authors(&book.authors).bright_white()
        ));

        let year = book
            .publish_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        let publisher = book
            .publishers
            .first()
            .cloned()
            .unwrap_or_else(|| "Unknown Publisher".to_string());
        output.push_str(&format!(
            "    {}: {} | {}: {}\n",
            "Published".green(),
            year.bright_white(),
            "Publisher".green(),
            publisher.bright_white()
        ));

        if let Some(cover) = covers::url_for_book(covers_base, book, CoverSize::Large) {
            output.push_str(&format!("    {}: {}\n", "Cover".green(), cover.cyan()));
        }
        if let Some(isbn) = book.isbns.first() {
            output.push_str(&format!(
                "    {}: {} | {}\n",
                "ISBN".green(),
                isbn.bright_white(),
                format!("bookscout details {isbn}").bright_black()
            ));
        }
    }
    output.push('\n');
    output
}

/// Truncate display text, appending an ellipsis when something was cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{truncated}...")
    }
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let query = match Query::parse(&options.query) {
        Ok(query) => query,
        Err(advisory) => {
            // Input-boundary rejection: advise and leave quietly.
            eprintln!("{}", advisory.to_string().yellow());
            return Ok(());
        }
    };

    let config = OpenLibraryConfig::from_env();
    if global.verbose {
        println!("Open Library host: {}", config.base_url);
    }

    let client = openlibrary::create_client()?;
    if !options.json {
        eprintln!("{}", "Searching...".bright_black());
    }

    match search_data(&client, &config, &query).await {
        Ok(results) => {
            if options.json {
                println!("{}", format_results_json(&results)?);
            } else {
                print!("{}", format_results_text(&results, &config.covers_url));
            }
        }
        Err(err) => {
            log::error!("search for {:?} failed: {err}", query.as_str());
            eprintln!("{}", SEARCH_FAILED.red());
        }
    }

    Ok(())
}
