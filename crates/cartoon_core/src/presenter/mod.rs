//! List screen presentation logic.
//!
//! # Invariants
//! - The in-memory rows mirror the store after every load or mutation.
//! - A failed store mutation never changes the in-memory rows.

pub mod list_presenter;
