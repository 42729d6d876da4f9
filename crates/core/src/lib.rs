//! Core library for bookscout
//!
//! This crate implements the **Functional Core** of the bookscout application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The bookscout project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`bookscout_core`** (this crate): Pure transformation functions with zero I/O
//! - **`bookscout`**: I/O operations and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No HTTP calls, no timers, no terminal output
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! Even the interactive session logic lives here: [`session`] is a pure
//! reducer over `(Session, SessionEvent)` pairs. The shell feeds it input
//! lines, timer fires, and completed lookups; the reducer decides what the
//! next view is and which effects to run. Debounce races and stale network
//! responses are therefore ordinary unit-test material.
//!
//! # Module Organization
//!
//! The core crate is organized by concern:
//!
//! - [`catalog`]: The canonical `Book` record, search-hit normalization, and
//!   the fixed featured catalog
//! - [`details`]: Details-payload normalization and patch-merge semantics
//! - [`resolve`]: Query validation and local-vs-remote resolution
//! - [`isbn`]: ISBN shape validation
//! - [`covers`]: Deterministic cover-image URL construction
//! - [`session`]: The UI state machine and its effect vocabulary
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use bookscout_core::catalog::{normalize_search_hit, SearchHit};
//!
//! // Create fixture data (no HTTP required)
//! let hit = SearchHit {
//!     title: Some("Dune".to_string()),
//!     // ... other fields
//!     ..Default::default()
//! };
//!
//! // Transform using pure function
//! let book = normalize_search_hit(hit);
//!
//! // Assert on results (no mocking needed)
//! assert_eq!(book.title, "Dune");
//! ```

pub mod catalog;
pub mod covers;
pub mod details;
pub mod isbn;
pub mod resolve;
pub mod session;
