#![allow(dead_code)]

use cartoon_core::{
    Cartoon, CartoonId, CartoonStore, FilePreferences, ListView, NewCartoon, RemoteError,
    RemoteResult, RemoteSource, SqliteCartoonStore, StoreError, StoreResult,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const RICK_AND_MORTY: &[u8] = br#"[{"name":"Rick","species":"Human"}, {"name":"Morty"}]"#;

/// Remote source replaying canned responses and counting calls.
pub struct ScriptedRemote {
    responses: Mutex<VecDeque<RemoteResult<Vec<u8>>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl ScriptedRemote {
    pub fn new(responses: Vec<RemoteResult<Vec<u8>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    pub fn ok(body: &[u8]) -> Self {
        Self::new(vec![Ok(body.to_vec())])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl RemoteSource for ScriptedRemote {
    async fn fetch(&self, _url: &str) -> RemoteResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(RemoteError::Transport("no scripted response".to_string())))
    }
}

/// Store wrapper counting batch inserts.
pub struct CountingStore {
    inner: SqliteCartoonStore,
    pub bulk_inserts: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: SqliteCartoonStore) -> Self {
        Self {
            inner,
            bulk_inserts: AtomicUsize::new(0),
        }
    }
}

impl CartoonStore for CountingStore {
    fn bulk_insert(&self, cartoons: &[NewCartoon]) -> StoreResult<usize> {
        self.bulk_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.bulk_insert(cartoons)
    }

    fn fetch_all(&self) -> StoreResult<Vec<Cartoon>> {
        self.inner.fetch_all()
    }

    fn delete(&self, id: CartoonId) -> StoreResult<()> {
        self.inner.delete(id)
    }

    fn save(&self) -> StoreResult<()> {
        self.inner.save()
    }

    fn discard(&self) -> StoreResult<()> {
        self.inner.discard()
    }

    fn count(&self) -> StoreResult<usize> {
        self.inner.count()
    }
}

/// Which store call `FailingStore` rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    BulkInsert,
    Save,
    FetchAll,
}

/// Store wrapper rejecting one kind of call and counting discards.
pub struct FailingStore {
    inner: SqliteCartoonStore,
    fail_on: FailOn,
    pub discards: AtomicUsize,
}

impl FailingStore {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            inner: SqliteCartoonStore::open_in_memory().unwrap(),
            fail_on,
            discards: AtomicUsize::new(0),
        }
    }

    fn check(&self, call: FailOn) -> StoreResult<()> {
        if self.fail_on == call {
            return Err(StoreError::Poisoned);
        }
        Ok(())
    }
}

impl CartoonStore for FailingStore {
    fn bulk_insert(&self, cartoons: &[NewCartoon]) -> StoreResult<usize> {
        self.check(FailOn::BulkInsert)?;
        self.inner.bulk_insert(cartoons)
    }

    fn fetch_all(&self) -> StoreResult<Vec<Cartoon>> {
        self.check(FailOn::FetchAll)?;
        self.inner.fetch_all()
    }

    fn delete(&self, id: CartoonId) -> StoreResult<()> {
        self.inner.delete(id)
    }

    fn save(&self) -> StoreResult<()> {
        self.check(FailOn::Save)?;
        self.inner.save()
    }

    fn discard(&self) -> StoreResult<()> {
        self.discards.fetch_add(1, Ordering::SeqCst);
        self.inner.discard()
    }

    fn count(&self) -> StoreResult<usize> {
        self.inner.count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Reload,
    Remove(usize),
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl ListView for RecordingView {
    fn reload_rows(&mut self) {
        self.events.push(ViewEvent::Reload);
    }

    fn remove_row(&mut self, index: usize) {
        self.events.push(ViewEvent::Remove(index));
    }
}

/// On-disk store and preferences under one temp dir.
pub struct Fixture {
    pub dir: TempDir,
    pub store: Arc<SqliteCartoonStore>,
    pub prefs: Arc<FilePreferences>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteCartoonStore::open(dir.path().join("cartoons.sqlite3")).unwrap());
        let prefs = Arc::new(FilePreferences::open(dir.path().join("preferences.json")).unwrap());
        Self { dir, store, prefs }
    }

    /// Reopens store and preferences as a fresh process would.
    pub fn restart(self) -> Self {
        let Self { dir, store, prefs } = self;
        drop(store);
        drop(prefs);
        let store = Arc::new(SqliteCartoonStore::open(dir.path().join("cartoons.sqlite3")).unwrap());
        let prefs = Arc::new(FilePreferences::open(dir.path().join("preferences.json")).unwrap());
        Self { dir, store, prefs }
    }
}
