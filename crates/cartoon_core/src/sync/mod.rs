//! Load-once synchronization of remote records into the local store.
//!
//! # Invariants
//! - The loaded flag is set only after the inserted batch is committed.
//! - At most one load cycle runs at a time per coordinator.

pub mod load_once;
