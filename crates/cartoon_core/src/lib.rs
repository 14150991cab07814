//! Core logic for the cartoons list: load-once sync into a local store.
//! UI and FFI layers only compose what this crate exposes.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod presenter;
pub mod remote;
pub mod repo;
pub mod sync;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cartoon::{Cartoon, CartoonId, NewCartoon};
pub use prefs::{FilePreferences, FlagStore, PrefsError, PrefsResult, LOADED_KEY};
pub use presenter::list_presenter::{
    ListPresenter, ListView, PresenterError, ScreenState, DELETE_CONFIRMATION_LABEL,
};
pub use remote::{HttpRemoteSource, RemoteError, RemoteResult, RemoteSource, DEFAULT_API_URL};
pub use repo::cartoon_repo::{CartoonStore, SqliteCartoonStore, StoreError, StoreResult};
pub use sync::load_once::{parse_payload, LoadError, LoadOnceCoordinator, LoadOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
