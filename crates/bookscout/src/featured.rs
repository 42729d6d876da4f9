//! `bookscout featured` - the static default catalog, no network involved.

use serde::{Deserialize, Serialize};

use crate::openlibrary::OpenLibraryConfig;
use crate::prelude::{println, *};
use crate::search::{format_results_json, format_results_text, SearchResults};
use bookscout_core::catalog;

/// Options for listing the featured catalog
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # The ten featured titles:
  bookscout featured

  # Machine-readable output:
  bookscout featured --json")]
pub struct FeaturedOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// The static default view.
pub fn featured_data() -> SearchResults {
    let books = catalog::featured();
    SearchResults {
        label: catalog::FEATURED_LABEL.to_string(),
        total: books.len(),
        books,
    }
}

pub async fn run(options: FeaturedOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Static catalog; no network call");
    }

    let results = featured_data();
    if options.json {
        println!("{}", format_results_json(&results)?);
    } else {
        let config = OpenLibraryConfig::from_env();
        print!("{}", format_results_text(&results, &config.covers_url));
    }

    Ok(())
}
