//! `bookscout live` - interactive search session over stdin lines.
//!
//! Each input line is an event for the pure session reducer: plain text
//! edits the query, an empty line clears it, `/open <n>` picks a result,
//! `/quit` leaves. The loop owns the things the reducer must not touch:
//! the debounce timer, the in-flight search futures, and the terminal.
//!
//! Searches are never cancelled once dispatched. Every dispatch carries a
//! sequence number and the reducer discards completions that are no longer
//! the latest, so slow responses cannot clobber a newer view.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use colored::Colorize;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncBufReadExt;
use tokio::time::{sleep, Instant, Sleep};

use crate::openlibrary::{self, OpenLibraryConfig};
use crate::prelude::{eprintln, println, *};
use crate::search::{format_results_text, SearchResults};
use bookscout_core::catalog::{normalize_search_hit, Book};
use bookscout_core::session::{
    Advisory, Effect, SearchOutcome, Session, SessionEvent, Step, UiState,
};

/// Default quiet period after the last edit before a live search fires.
pub const DEBOUNCE_MS: u64 = 500;

const SESSION_HELP: &str = "SESSION COMMANDS:
  <text>       edit the query; a search fires after the quiet period
  <empty line> clear the query and reload the featured catalog
  /open <n>    open result n and fetch its details
  /help        show this list
  /quit        leave the session";

/// Options for the interactive session
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # Start browsing the featured catalog:
  bookscout live

  # Start with a query already submitted:
  bookscout live --query \"dune\"

SESSION COMMANDS:
  <text>       edit the query; a search fires after the quiet period
  <empty line> clear the query and reload the featured catalog
  /open <n>    open result n and fetch its details
  /help        show this list
  /quit        leave the session")]
pub struct LiveOptions {
    /// Initial query, submitted before the first prompt
    #[arg(short, long)]
    pub query: Option<String>,

    /// Debounce quiet period in milliseconds
    #[arg(long, default_value_t = DEBOUNCE_MS)]
    pub debounce: u64,
}

/// What one input line means to the session.
#[derive(Debug, Clone, PartialEq)]
enum LineCommand {
    Edit(String),
    Clear,
    Open(usize),
    Help,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> LineCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineCommand::Clear;
    }
    if let Some(rest) = trimmed.strip_prefix('/') {
        let mut parts = rest.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some("quit") | Some("q") | Some("exit"), _) => LineCommand::Quit,
            (Some("help"), _) => LineCommand::Help,
            (Some("open"), Some(index)) => match index.parse() {
                Ok(index) => LineCommand::Open(index),
                Err(_) => LineCommand::Unknown(trimmed.to_string()),
            },
            _ => LineCommand::Unknown(trimmed.to_string()),
        };
    }
    LineCommand::Edit(trimmed.to_string())
}

/// Rendering boundary. Every call fully replaces what the user sees; the
/// session logic never touches the terminal directly.
trait Presenter {
    fn show_loading(&mut self);
    fn show_error(&mut self, message: &str);
    fn display_results(&mut self, books: &[Book], label: &str);
    fn display_details(&mut self, book: &Book, publish_date: Option<&str>);
    fn advise(&mut self, advisory: &Advisory);
}

fn render(presenter: &mut dyn Presenter, state: &UiState) {
    match state {
        UiState::Idle => {}
        UiState::Loading => presenter.show_loading(),
        UiState::Results { books, label } => presenter.display_results(books, label),
        UiState::Empty { label } => presenter.display_results(&[], label),
        UiState::Error { message } => presenter.show_error(message),
    }
}

struct TermPresenter {
    covers_url: String,
}

impl Presenter for TermPresenter {
    fn show_loading(&mut self) {
        eprintln!("{}", "Searching...".bright_black());
    }

    fn show_error(&mut self, message: &str) {
        println!("\n{} {}\n", "Error:".red().bold(), message);
    }

    fn display_results(&mut self, books: &[Book], label: &str) {
        let results = SearchResults {
            label: label.to_string(),
            total: books.len(),
            books: books.to_vec(),
        };
        print!("{}", format_results_text(&results, &self.covers_url));
        if !books.is_empty() {
            println!(
                "{}",
                format!("Open a result with /open <1-{}>", books.len()).bright_black()
            );
        }
    }

    fn display_details(&mut self, book: &Book, publish_date: Option<&str>) {
        print!(
            "{}",
            crate::details::format_details_text(book, publish_date, &self.covers_url)
        );
    }

    fn advise(&mut self, advisory: &Advisory) {
        eprintln!("{}", advisory.to_string().yellow());
    }
}

pub async fn run(options: LiveOptions, global: crate::Global) -> Result<()> {
    let config = OpenLibraryConfig::from_env();
    let client = openlibrary::create_client()?;

    if global.verbose {
        println!("Open Library host: {}", config.base_url);
        println!("Debounce quiet period: {}ms", options.debounce);
    }
    println!(
        "{}",
        "Interactive catalog session. Type to search, /help for commands.".bright_black()
    );

    let mut presenter = TermPresenter {
        covers_url: config.covers_url.clone(),
    };
    let mut session = Session::new();
    let quiet = Duration::from_millis(options.debounce);

    // Events waiting for the reducer. Seeded with the page-load behavior:
    // an initial query searches immediately, otherwise the featured
    // catalog comes up.
    let mut queue: VecDeque<SessionEvent> = VecDeque::new();
    queue.push_back(match &options.query {
        Some(query) => SessionEvent::QuerySubmitted(query.clone()),
        None => SessionEvent::QueryCleared,
    });

    // The debounce timer is re-armed in place; `armed_generation` is None
    // while no window is open.
    let mut debounce_timer: Pin<Box<Sleep>> = Box::pin(sleep(Duration::ZERO));
    let mut armed_generation: Option<u64> = None;

    // Dispatched searches; each resolves to the completion event for its
    // sequence number. Never cancelled, only outlived.
    let mut inflight: FuturesUnordered<BoxFuture<'static, SessionEvent>> = FuturesUnordered::new();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        while let Some(event) = queue.pop_front() {
            let previous = session.state.clone();
            let Step {
                session: next,
                effects,
            } = session.handle(event);
            session = next;

            for effect in effects {
                match effect {
                    Effect::ScheduleDebounce { generation } => {
                        debounce_timer.as_mut().reset(Instant::now() + quiet);
                        armed_generation = Some(generation);
                    }
                    Effect::Dispatch {
                        seq,
                        mode,
                        term,
                        label,
                    } => {
                        log::debug!("dispatching search seq={seq} mode={mode:?} term={term:?}");
                        let client = client.clone();
                        let config = config.clone();
                        inflight.push(
                            async move {
                                let outcome =
                                    match openlibrary::search(&client, &config, mode, &term).await {
                                        Ok(hits) => SearchOutcome::Hits(
                                            hits.into_iter().map(normalize_search_hit).collect(),
                                        ),
                                        Err(err) => {
                                            log::error!("search for {term:?} failed: {err}");
                                            SearchOutcome::Failed(err.to_string())
                                        }
                                    };
                                SessionEvent::SearchCompleted {
                                    seq,
                                    label,
                                    outcome,
                                }
                            }
                            .boxed(),
                        );
                    }
                    Effect::OpenDetails { book } => {
                        eprintln!("{}", "Fetching details...".bright_black());
                        let (merged, publish_date) =
                            crate::details::enrich(&client, &config, &book).await;
                        presenter.display_details(&merged, publish_date.as_deref());
                    }
                    Effect::Advise(advisory) => presenter.advise(&advisory),
                }
            }

            if session.state != previous {
                render(&mut presenter, &session.state);
            }
        }

        tokio::select! {
            line = lines.next_line() => {
                match line.map_err(|e| eyre!("Failed to read input: {}", e))? {
                    None => break,
                    Some(line) => match parse_line(&line) {
                        LineCommand::Quit => break,
                        LineCommand::Help => println!("{SESSION_HELP}"),
                        LineCommand::Clear => queue.push_back(SessionEvent::QueryCleared),
                        LineCommand::Edit(text) => queue.push_back(SessionEvent::QueryEdited(text)),
                        LineCommand::Open(index) => queue.push_back(SessionEvent::ResultOpened(index)),
                        LineCommand::Unknown(command) => {
                            eprintln!("{}", format!("Unknown command: {command}").yellow());
                        }
                    },
                }
            }
            () = debounce_timer.as_mut(), if armed_generation.is_some() => {
                if let Some(generation) = armed_generation.take() {
                    queue.push_back(SessionEvent::DebounceElapsed { generation });
                }
            }
            Some(event) = inflight.next(), if !inflight.is_empty() => {
                queue.push_back(event);
            }
        }
    }

    println!("{}", "Session ended.".bright_black());
    Ok(())
}
