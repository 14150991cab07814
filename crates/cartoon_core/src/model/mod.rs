//! Character record model.
//!
//! # Invariants
//! - Every text field of a record is present, possibly empty, never null.
//! - Identity is assigned by the store on insert.

pub mod cartoon;
