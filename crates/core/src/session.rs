//! The interactive-session state machine.
//!
//! One owned [`Session`] value moves through [`Session::handle`], which maps
//! an event to the next session plus a list of [`Effect`]s for the shell to
//! run. The reducer is pure, so the awkward interactive behaviors live here
//! as testable logic:
//!
//! - **Debounce generations**: every live edit above the length threshold
//!   bumps a generation counter and asks the shell to re-arm the quiet-period
//!   timer. A timer fire carrying an old generation lost the last-writer-wins
//!   race and is ignored.
//! - **Sequence numbers**: every dispatched search carries a sequence number.
//!   Completions are accepted only when their number matches the most recent
//!   one issued, so a slow response can never overwrite a newer view.
//!
//! Nothing in this module performs I/O; the shell owns timers, HTTP, and
//! rendering.

use crate::catalog::{self, Book};
use crate::resolve::{self, Plan, Query, QueryError, SearchMode, LIVE_QUERY_LEN};

/// Generic failure line for the error view. Raw transport errors go to the
/// log only.
pub const SEARCH_FAILED: &str =
    "Failed to search books. Please check your connection and try again.";

/// What the user currently sees. Exactly one variant is active; every
/// transition replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    /// Nothing rendered yet.
    Idle,
    /// A remote search is in flight.
    Loading,
    /// A non-empty result list with the query (or catalog heading) as label.
    Results { books: Vec<Book>, label: String },
    /// A search completed successfully but matched nothing.
    Empty { label: String },
    /// A search failed; the message is already display-ready.
    Error { message: String },
}

/// Input-boundary advisories. These render as a notice in the current view
/// and never become the [`UiState::Error`] state.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// The query was rejected before resolution.
    Invalid(QueryError),
    /// A result index outside the current list was opened.
    NoSuchResult(usize),
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::Invalid(err) => write!(f, "{err}"),
            Advisory::NoSuchResult(index) => write!(f, "No result #{index} to open"),
        }
    }
}

/// Everything that can happen to a live session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The query text changed (live-typing path).
    QueryEdited(String),
    /// Explicit submit (one-shot command or seeded initial query).
    QuerySubmitted(String),
    /// The quiet-period timer armed for this generation elapsed.
    DebounceElapsed { generation: u64 },
    /// A dispatched search came back.
    SearchCompleted {
        seq: u64,
        label: String,
        outcome: SearchOutcome,
    },
    /// The user picked a result row (1-indexed) for enrichment.
    ResultOpened(usize),
    /// The query was cleared.
    QueryCleared,
}

/// Network outcome as the reducer sees it: canonical records, or a failure
/// already reduced to a loggable string.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Hits(Vec<Book>),
    Failed(String),
}

/// Work the shell must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Arm (or re-arm) the debounce timer for this generation.
    ScheduleDebounce { generation: u64 },
    /// Issue one remote search tagged with this sequence number.
    Dispatch {
        seq: u64,
        mode: SearchMode,
        term: String,
        label: String,
    },
    /// Open the detail view for this record; enrichment happens behind it.
    OpenDetails { book: Book },
    /// Show an advisory without leaving the current state.
    Advise(Advisory),
}

/// One reducer step: the next session value plus the effects to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl Step {
    fn new(session: Session, effects: Vec<Effect>) -> Self {
        Step { session, effects }
    }

    fn quiet(session: Session) -> Self {
        Step::new(session, Vec::new())
    }
}

/// The single owned UI state plus the counters that keep rapid-fire input
/// honest.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: UiState,
    /// Sequence of the most recently dispatched (or superseded) search.
    issued_seq: u64,
    /// Debounce generation of the most recent live edit.
    debounce_gen: u64,
    /// Text that will be resolved when the pending debounce fires.
    pending: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            state: UiState::Idle,
            issued_seq: 0,
            debounce_gen: 0,
            pending: None,
        }
    }

    /// Apply one event. Total: every (state, event) pair produces a next
    /// state, and stale bookkeeping ids produce a no-op step.
    pub fn handle(self, event: SessionEvent) -> Step {
        match event {
            SessionEvent::QueryEdited(text) => self.on_edited(text),
            SessionEvent::QuerySubmitted(text) => self.on_submitted(text),
            SessionEvent::DebounceElapsed { generation } => self.on_debounce(generation),
            SessionEvent::SearchCompleted {
                seq,
                label,
                outcome,
            } => self.on_completed(seq, label, outcome),
            SessionEvent::ResultOpened(index) => self.on_opened(index),
            SessionEvent::QueryCleared => self.on_cleared(),
        }
    }

    fn on_edited(mut self, text: String) -> Step {
        let trimmed = text.trim();
        if trimmed.chars().count() < LIVE_QUERY_LEN {
            // Below the live threshold the default view comes back
            // immediately and nothing touches the network.
            return self.on_cleared();
        }
        self.debounce_gen += 1;
        let generation = self.debounce_gen;
        self.pending = Some(trimmed.to_string());
        Step::new(self, vec![Effect::ScheduleDebounce { generation }])
    }

    fn on_submitted(self, text: String) -> Step {
        match Query::parse(&text) {
            Ok(query) => self.begin_search(query),
            Err(err) => {
                let effects = vec![Effect::Advise(Advisory::Invalid(err))];
                Step::new(self, effects)
            }
        }
    }

    fn on_debounce(mut self, generation: u64) -> Step {
        if generation != self.debounce_gen {
            // A newer edit re-armed the window; this fire lost the race.
            return Step::quiet(self);
        }
        let Some(text) = self.pending.take() else {
            return Step::quiet(self);
        };
        match Query::parse(&text) {
            Ok(query) => self.begin_search(query),
            Err(err) => Step::new(self, vec![Effect::Advise(Advisory::Invalid(err))]),
        }
    }

    /// Resolve a validated query: the local fast path lands on results with
    /// no effects, the remote path enters Loading with one tagged dispatch.
    fn begin_search(mut self, query: Query) -> Step {
        // Either way this supersedes anything still in flight.
        self.issued_seq += 1;
        self.pending = None;

        match resolve::resolve(&query) {
            Plan::Local(books) => {
                self.state = UiState::Results {
                    books,
                    label: query.as_str().to_string(),
                };
                Step::quiet(self)
            }
            Plan::Remote { mode, term } => {
                let seq = self.issued_seq;
                self.state = UiState::Loading;
                let label = query.as_str().to_string();
                Step::new(
                    self,
                    vec![Effect::Dispatch {
                        seq,
                        mode,
                        term,
                        label,
                    }],
                )
            }
        }
    }

    fn on_completed(mut self, seq: u64, label: String, outcome: SearchOutcome) -> Step {
        if seq != self.issued_seq {
            // Straggler from a superseded request; the newer view wins.
            return Step::quiet(self);
        }
        self.state = match outcome {
            SearchOutcome::Hits(books) if books.is_empty() => UiState::Empty { label },
            SearchOutcome::Hits(books) => UiState::Results { books, label },
            SearchOutcome::Failed(_) => UiState::Error {
                message: SEARCH_FAILED.to_string(),
            },
        };
        Step::quiet(self)
    }

    fn on_opened(self, index: usize) -> Step {
        let book = match &self.state {
            UiState::Results { books, .. } => {
                index.checked_sub(1).and_then(|i| books.get(i)).cloned()
            }
            _ => None,
        };
        let effects = match book {
            Some(book) => vec![Effect::OpenDetails { book }],
            None => vec![Effect::Advise(Advisory::NoSuchResult(index))],
        };
        Step::new(self, effects)
    }

    fn on_cleared(mut self) -> Step {
        // The static set needs no I/O, so a fresh cycle lands directly on
        // results. In-flight work is stale from this point on.
        self.issued_seq += 1;
        self.pending = None;
        self.state = UiState::Results {
            books: catalog::featured(),
            label: catalog::FEATURED_LABEL.to_string(),
        };
        Step::quiet(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_book(title: &str) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            authors: vec!["Test Author".to_string()],
            publishers: Vec::new(),
            publish_year: Some(2000),
            isbns: vec!["9780451524935".to_string()],
            cover_id: None,
            subjects: Vec::new(),
            page_count: None,
            description: None,
        }
    }

    fn completed(seq: u64, label: &str, books: Vec<Book>) -> SessionEvent {
        SessionEvent::SearchCompleted {
            seq,
            label: label.to_string(),
            outcome: SearchOutcome::Hits(books),
        }
    }

    /// Drive a session to a Loading state with one dispatched search and
    /// return it together with the dispatch sequence number.
    fn dispatched(query: &str) -> (Session, u64) {
        let step = Session::new().handle(SessionEvent::QuerySubmitted(query.to_string()));
        let seq = step
            .effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Dispatch { seq, .. } => Some(*seq),
                _ => None,
            })
            .expect("expected a dispatch effect");
        (step.session, seq)
    }

    #[test]
    fn test_new_session_is_idle() {
        assert_eq!(Session::new().state, UiState::Idle);
    }

    #[test]
    fn test_clear_shows_featured_catalog() {
        let step = Session::new().handle(SessionEvent::QueryCleared);

        assert!(step.effects.is_empty());
        match step.session.state {
            UiState::Results { books, label } => {
                assert_eq!(books.len(), 10);
                assert_eq!(label, catalog::FEATURED_LABEL);
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn test_short_edit_reverts_to_featured_immediately() {
        let (session, seq) = dispatched("quantum theory");

        let step = session.handle(SessionEvent::QueryEdited("ha".to_string()));
        assert!(step.effects.is_empty());
        assert!(matches!(step.session.state, UiState::Results { .. }));

        // The in-flight search was superseded by the revert.
        let step = step.session.handle(completed(
            seq,
            "quantum theory",
            vec![create_test_book("Stale")],
        ));
        match step.session.state {
            UiState::Results { label, .. } => assert_eq!(label, catalog::FEATURED_LABEL),
            other => panic!("expected featured results, got {other:?}"),
        }
    }

    #[test]
    fn test_edit_above_threshold_schedules_debounce() {
        let step = Session::new().handle(SessionEvent::QueryEdited("dune messiah".to_string()));

        assert_eq!(
            step.effects,
            vec![Effect::ScheduleDebounce { generation: 1 }]
        );
        // The view does not change until the timer fires.
        assert_eq!(step.session.state, UiState::Idle);
    }

    #[test]
    fn test_second_edit_supersedes_first_generation() {
        let step = Session::new().handle(SessionEvent::QueryEdited("space ope".to_string()));
        let step = step
            .session
            .handle(SessionEvent::QueryEdited("space opera".to_string()));
        assert_eq!(
            step.effects,
            vec![Effect::ScheduleDebounce { generation: 2 }]
        );

        // The stale generation's fire is a no-op.
        let step = step
            .session
            .handle(SessionEvent::DebounceElapsed { generation: 1 });
        assert!(step.effects.is_empty());
        assert_eq!(step.session.state, UiState::Idle);

        // The live generation resolves and dispatches.
        let step = step
            .session
            .handle(SessionEvent::DebounceElapsed { generation: 2 });
        assert_eq!(step.session.state, UiState::Loading);
        match &step.effects[..] {
            [Effect::Dispatch { mode, term, .. }] => {
                assert_eq!(*mode, SearchMode::General);
                assert_eq!(term, "space opera");
            }
            other => panic!("expected one dispatch, got {other:?}"),
        }
    }

    #[test]
    fn test_debounce_fire_without_pending_is_noop() {
        let step = Session::new().handle(SessionEvent::DebounceElapsed { generation: 0 });
        assert!(step.effects.is_empty());
        assert_eq!(step.session.state, UiState::Idle);
    }

    #[test]
    fn test_debounced_edit_can_resolve_locally() {
        let step = Session::new().handle(SessionEvent::QueryEdited("harry potter".to_string()));
        let step = step
            .session
            .handle(SessionEvent::DebounceElapsed { generation: 1 });

        assert!(step.effects.is_empty());
        match step.session.state {
            UiState::Results { books, label } => {
                assert_eq!(label, "harry potter");
                assert_eq!(books[0].title, "Harry Potter");
            }
            other => panic!("expected local results, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_empty_advises_without_state_change() {
        let step = Session::new().handle(SessionEvent::QuerySubmitted("  ".to_string()));

        assert_eq!(
            step.effects,
            vec![Effect::Advise(Advisory::Invalid(QueryError::Empty))]
        );
        assert_eq!(step.session.state, UiState::Idle);
    }

    #[test]
    fn test_submit_single_char_advises_too_short() {
        let step = Session::new().handle(SessionEvent::QuerySubmitted("a".to_string()));

        assert_eq!(
            step.effects,
            vec![Effect::Advise(Advisory::Invalid(QueryError::TooShort))]
        );
    }

    #[test]
    fn test_submit_local_match_never_dispatches() {
        let step = Session::new().handle(SessionEvent::QuerySubmitted("dune".to_string()));

        assert!(step.effects.is_empty());
        match step.session.state {
            UiState::Results { books, label } => {
                assert_eq!(label, "dune");
                assert_eq!(books[0].title, "Dune");
            }
            other => panic!("expected local results, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_remote_enters_loading_with_dispatch() {
        let step = Session::new().handle(SessionEvent::QuerySubmitted(
            "author:Ursula K. Le Guin".to_string(),
        ));

        assert_eq!(step.session.state, UiState::Loading);
        match &step.effects[..] {
            [Effect::Dispatch {
                seq,
                mode,
                term,
                label,
            }] => {
                assert_eq!(*seq, 1);
                assert_eq!(*mode, SearchMode::Author);
                assert_eq!(term, "Ursula K. Le Guin");
                assert_eq!(label, "author:Ursula K. Le Guin");
            }
            other => panic!("expected one dispatch, got {other:?}"),
        }
    }

    #[test]
    fn test_completion_with_hits_shows_results() {
        let (session, seq) = dispatched("quantum theory");

        let books = vec![create_test_book("A Brief History")];
        let step = session.handle(completed(seq, "quantum theory", books));

        match step.session.state {
            UiState::Results { books, label } => {
                assert_eq!(label, "quantum theory");
                assert_eq!(books.len(), 1);
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn test_completion_with_no_hits_shows_empty() {
        let (session, seq) = dispatched("zzzz not a book");

        let step = session.handle(completed(seq, "zzzz not a book", Vec::new()));
        assert_eq!(
            step.session.state,
            UiState::Empty {
                label: "zzzz not a book".to_string()
            }
        );
    }

    #[test]
    fn test_completion_failure_shows_generic_error() {
        let (session, seq) = dispatched("quantum theory");

        let step = session.handle(SessionEvent::SearchCompleted {
            seq,
            label: "quantum theory".to_string(),
            outcome: SearchOutcome::Failed("connection refused (os error 111)".to_string()),
        });

        match step.session.state {
            UiState::Error { message } => {
                assert_eq!(message, SEARCH_FAILED);
                // The raw transport detail never reaches the view.
                assert!(!message.contains("os error"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let (session, first_seq) = dispatched("quantum theory");

        // A second submit supersedes the first dispatch.
        let step = session.handle(SessionEvent::QuerySubmitted("modern physics".to_string()));
        let second_seq = match &step.effects[..] {
            [Effect::Dispatch { seq, .. }] => *seq,
            other => panic!("expected one dispatch, got {other:?}"),
        };
        assert!(second_seq > first_seq);

        // Completions arrive out of order: the newer one first.
        let step = step.session.handle(completed(
            second_seq,
            "modern physics",
            vec![create_test_book("Newer")],
        ));
        let step = step.session.handle(completed(
            first_seq,
            "quantum theory",
            vec![create_test_book("Stale")],
        ));

        match step.session.state {
            UiState::Results { books, label } => {
                assert_eq!(label, "modern physics");
                assert_eq!(books[0].title, "Newer");
            }
            other => panic!("expected newer results, got {other:?}"),
        }
    }

    #[test]
    fn test_clear_supersedes_inflight_search() {
        let (session, seq) = dispatched("quantum theory");

        let step = session.handle(SessionEvent::QueryCleared);
        let step = step.session.handle(completed(
            seq,
            "quantum theory",
            vec![create_test_book("Stale")],
        ));

        match step.session.state {
            UiState::Results { label, .. } => assert_eq!(label, catalog::FEATURED_LABEL),
            other => panic!("expected featured results, got {other:?}"),
        }
    }

    #[test]
    fn test_open_result_emits_details_effect() {
        let step = Session::new().handle(SessionEvent::QueryCleared);
        let step = step.session.handle(SessionEvent::ResultOpened(3));

        match &step.effects[..] {
            [Effect::OpenDetails { book }] => assert_eq!(book.title, "1984"),
            other => panic!("expected open-details, got {other:?}"),
        }
    }

    #[test]
    fn test_open_out_of_range_advises() {
        let step = Session::new().handle(SessionEvent::QueryCleared);

        let step = step.session.handle(SessionEvent::ResultOpened(0));
        assert_eq!(
            step.effects,
            vec![Effect::Advise(Advisory::NoSuchResult(0))]
        );

        let step = step.session.handle(SessionEvent::ResultOpened(11));
        assert_eq!(
            step.effects,
            vec![Effect::Advise(Advisory::NoSuchResult(11))]
        );
    }

    #[test]
    fn test_open_outside_results_state_advises() {
        let (session, _) = dispatched("quantum theory");

        let step = session.handle(SessionEvent::ResultOpened(1));
        assert_eq!(
            step.effects,
            vec![Effect::Advise(Advisory::NoSuchResult(1))]
        );
        assert_eq!(step.session.state, UiState::Loading);
    }

    #[test]
    fn test_advisory_display() {
        assert_eq!(
            Advisory::Invalid(QueryError::Empty).to_string(),
            "Please enter a search term"
        );
        assert_eq!(
            Advisory::NoSuchResult(7).to_string(),
            "No result #7 to open"
        );
    }
}
