//! Flutter-facing bindings for the cartoons list screen.

pub mod api;
