//! Durable key-value settings kept apart from the record store.
//!
//! # Invariants
//! - An absent key reads as `false`.
//! - A written value is on disk before `set_bool` returns.

mod file;

pub use file::FilePreferences;

use thiserror::Error;

/// Settings key of the load-once flag.
pub const LOADED_KEY: &str = "LOADED";

pub type PrefsResult<T> = Result<T, PrefsError>;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preferences io failed at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("preferences file `{path}` is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("preferences lock poisoned")]
    Poisoned,
}

/// Boolean settings store backing the load-once flag.
pub trait FlagStore: Send + Sync {
    fn get_bool(&self, key: &str) -> PrefsResult<bool>;
    fn set_bool(&self, key: &str, value: bool) -> PrefsResult<()>;
}
