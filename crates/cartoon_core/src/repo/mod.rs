//! Local store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the record store used by the load-once flow and the list screen.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Mutations stay pending until `save()`; `discard()` drops them.
//! - Store APIs return semantic errors (`NotFound`) in addition to DB errors.

pub mod cartoon_repo;
