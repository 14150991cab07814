//! FFI use-case API for the Flutter list screen.
//!
//! # Responsibility
//! - Expose the cartoons list screen to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` and a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every response carries the rows as currently shown.

use cartoon_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, FilePreferences, HttpRemoteSource, ListPresenter, ListView, LoadOnceCoordinator,
    SqliteCartoonStore, DELETE_CONFIRMATION_LABEL,
};
use log::{error, info};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.trim()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Label of the swipe-to-delete confirmation button.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_confirmation_label() -> String {
    DELETE_CONFIRMATION_LABEL.to_owned()
}

/// One list row as rendered by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartoonRow {
    /// Store-assigned record id.
    pub id: i64,
    /// Row text.
    pub title: String,
    pub species: String,
    pub image_url: String,
    pub status: String,
}

/// Response envelope for list screen calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartoonListResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// `uninitialized|loading|ready`.
    pub state: String,
    /// Rows as currently shown.
    pub rows: Vec<CartoonRow>,
    /// Row index to animate out after a successful delete.
    pub removed_row: Option<u32>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

#[derive(Debug, Default)]
struct RowChanges {
    removed: Option<usize>,
}

impl ListView for RowChanges {
    fn reload_rows(&mut self) {
        self.removed = None;
    }

    fn remove_row(&mut self, index: usize) {
        self.removed = Some(index);
    }
}

/// List screen handle owned by Dart.
#[flutter_rust_bridge::frb(opaque)]
pub struct CartoonScreen {
    runtime: tokio::runtime::Runtime,
    presenter: ListPresenter<HttpRemoteSource, RowChanges>,
}

/// Store and load coordinator shared by every screen on one data dir.
struct ScreenContext {
    store: Arc<SqliteCartoonStore>,
    coordinator: Arc<LoadOnceCoordinator<HttpRemoteSource>>,
}

static SCREEN_CONTEXTS: OnceLock<Mutex<HashMap<PathBuf, Arc<ScreenContext>>>> = OnceLock::new();

/// Opens the list screen backed by files under `data_dir`.
///
/// `api_url` overrides the default character endpoint when set. Screens on
/// the same `data_dir` share one store and one load coordinator for the
/// process lifetime; the first open's endpoint is the one used.
///
/// # FFI contract
/// - Creates `data_dir` when missing; no network access.
/// - Never panics; returns an error message on invalid input or IO failure.
pub fn open_cartoon_screen(
    data_dir: String,
    api_url: Option<String>,
) -> Result<CartoonScreen, String> {
    let mut config = AppConfig::for_data_dir(data_dir.trim());
    if let Some(api_url) = api_url.filter(|value| !value.trim().is_empty()) {
        config = config.with_api_url(api_url.trim());
    }
    config.validate().map_err(|err| err.to_string())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(|err| format!("runtime start failed: {err}"))?;
    let context = screen_context(&config)?;

    info!("event=screen_open module=ffi status=ok");
    Ok(CartoonScreen {
        runtime,
        presenter: ListPresenter::new(
            context.store.clone(),
            Arc::clone(&context.coordinator),
            RowChanges::default(),
        ),
    })
}

fn screen_context(config: &AppConfig) -> Result<Arc<ScreenContext>, String> {
    let mut contexts = SCREEN_CONTEXTS
        .get_or_init(Default::default)
        .lock()
        .map_err(|_| "screen registry lock poisoned".to_string())?;
    if let Some(context) = contexts.get(&config.database_path) {
        return Ok(Arc::clone(context));
    }

    let store = Arc::new(
        SqliteCartoonStore::open(&config.database_path)
            .map_err(|err| format!("store open failed: {err}"))?,
    );
    let prefs = Arc::new(
        FilePreferences::open(&config.preferences_path)
            .map_err(|err| format!("preferences open failed: {err}"))?,
    );
    let coordinator = Arc::new(LoadOnceCoordinator::new(
        store.clone(),
        prefs,
        HttpRemoteSource::new(),
        config.api_url.as_str(),
    ));

    let context = Arc::new(ScreenContext { store, coordinator });
    contexts.insert(config.database_path.clone(), Arc::clone(&context));
    Ok(context)
}

impl CartoonScreen {
    /// Populates the screen, running the one-time load when needed.
    ///
    /// # FFI contract
    /// - Blocking call; run off the UI isolate.
    /// - Rows are returned even when the load failed (`ok = false`).
    pub fn on_screen_ready(&mut self) -> CartoonListResponse {
        let result = self.runtime.block_on(self.presenter.on_screen_ready());
        match result {
            Ok(()) => self.response(true, format!("Loaded {} row(s).", self.presenter.row_count())),
            Err(err) => {
                error!("event=screen_ready module=ffi status=error error={err}");
                self.response(false, format!("on_screen_ready failed: {err}"))
            }
        }
    }

    /// Deletes the row at `index` after swipe confirmation.
    pub fn delete_row(&mut self, index: u32) -> CartoonListResponse {
        let Ok(index) = usize::try_from(index) else {
            return self.response(false, format!("row index {index} is not addressable"));
        };
        self.presenter.view_mut().removed = None;
        match self.presenter.delete_row(index) {
            Ok(()) => self.response(true, "Row deleted."),
            Err(err) => self.response(false, format!("delete_row failed: {err}")),
        }
    }

    /// Current rows without side effects.
    #[flutter_rust_bridge::frb(sync)]
    pub fn snapshot(&self) -> CartoonListResponse {
        self.response(true, String::new())
    }

    fn response(&self, ok: bool, message: impl Into<String>) -> CartoonListResponse {
        CartoonListResponse {
            ok,
            state: self.presenter.state().as_str().to_string(),
            rows: self
                .presenter
                .rows()
                .iter()
                .map(|cartoon| CartoonRow {
                    id: cartoon.id,
                    title: cartoon.display_name().to_string(),
                    species: cartoon.species.clone(),
                    image_url: cartoon.image_url.clone(),
                    status: cartoon.status.clone(),
                })
                .collect(),
            removed_row: self
                .presenter
                .view()
                .removed
                .and_then(|index| u32::try_from(index).ok()),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, delete_confirmation_label, init_logging, open_cartoon_screen, ping,
        screen_context,
    };
    use cartoon_core::{
        AppConfig, CartoonStore, FilePreferences, FlagStore, NewCartoon, SqliteCartoonStore,
        LOADED_KEY,
    };
    use std::path::Path;
    use std::sync::Arc;

    fn seed_loaded(data_dir: &Path, names: &[&str]) {
        let store = SqliteCartoonStore::open(data_dir.join("cartoons.sqlite3")).unwrap();
        let cartoons = names
            .iter()
            .map(|name| NewCartoon::named(*name))
            .collect::<Vec<_>>();
        store.bulk_insert(&cartoons).unwrap();
        store.save().unwrap();
        FilePreferences::open(data_dir.join("preferences.json"))
            .unwrap()
            .set_bool(LOADED_KEY, true)
            .unwrap();
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn delete_label_is_localized() {
        assert_eq!(delete_confirmation_label(), "Eliminar");
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn open_rejects_relative_data_dir_and_bad_url() {
        let relative = open_cartoon_screen("relative/dir".to_string(), None).err().unwrap();
        assert!(relative.contains("absolute"));

        let dir = tempfile::tempdir().unwrap();
        let bad_url = open_cartoon_screen(
            dir.path().display().to_string(),
            Some("not a url".to_string()),
        )
        .err()
        .unwrap();
        assert!(bad_url.contains("api_url"));
    }

    #[test]
    fn loaded_screen_lists_and_deletes_rows() {
        let dir = tempfile::tempdir().unwrap();
        seed_loaded(dir.path(), &["Rick", "Morty"]);
        let mut screen = open_cartoon_screen(
            dir.path().display().to_string(),
            Some("http://127.0.0.1:9/unreachable".to_string()),
        )
        .unwrap();

        let before = screen.snapshot();
        assert_eq!(before.state, "uninitialized");
        assert!(before.rows.is_empty());

        let ready = screen.on_screen_ready();
        assert!(ready.ok, "{}", ready.message);
        assert_eq!(ready.state, "ready");
        let titles = ready
            .rows
            .iter()
            .map(|row| row.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Rick", "Morty"]);

        let deleted = screen.delete_row(0);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.removed_row, Some(0));
        assert_eq!(deleted.rows.len(), 1);
        assert_eq!(deleted.rows[0].title, "Morty");

        let out_of_range = screen.delete_row(7);
        assert!(!out_of_range.ok);
        assert_eq!(out_of_range.removed_row, None);
        assert_eq!(out_of_range.rows.len(), 1);
    }

    #[test]
    fn failed_first_load_reports_error_with_empty_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut screen = open_cartoon_screen(
            dir.path().display().to_string(),
            Some("http://127.0.0.1:9/unreachable".to_string()),
        )
        .unwrap();

        let response = screen.on_screen_ready();

        assert!(!response.ok);
        assert_eq!(response.state, "ready");
        assert!(response.rows.is_empty());
        let prefs = FilePreferences::open(dir.path().join("preferences.json")).unwrap();
        assert!(!prefs.get_bool(LOADED_KEY).unwrap());
    }

    #[test]
    fn fresh_data_dir_is_created_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("fresh").join("install");

        let screen = open_cartoon_screen(data_dir.display().to_string(), None).unwrap();

        assert!(data_dir.join("cartoons.sqlite3").exists());
        assert_eq!(screen.snapshot().state, "uninitialized");
    }

    #[test]
    fn screens_on_one_data_dir_share_store_and_coordinator() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let config = AppConfig::for_data_dir(dir.path());

        let first = screen_context(&config).unwrap();
        let second = screen_context(&config).unwrap();
        let unrelated = screen_context(&AppConfig::for_data_dir(other.path())).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first.coordinator, &second.coordinator));
        assert!(!Arc::ptr_eq(&first, &unrelated));
    }

    #[test]
    fn second_screen_sees_load_completed_after_first_opened() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().display().to_string();
        let unreachable = Some("http://127.0.0.1:9/unreachable".to_string());
        let _first = open_cartoon_screen(data_dir.clone(), unreachable.clone()).unwrap();

        seed_loaded(dir.path(), &["Rick", "Morty"]);
        let mut second = open_cartoon_screen(data_dir, unreachable).unwrap();
        let response = second.on_screen_ready();

        assert!(response.ok, "{}", response.message);
        assert_eq!(response.rows.len(), 2);
    }
}
