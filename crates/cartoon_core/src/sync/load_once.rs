//! Load-once coordinator.
//!
//! # Responsibility
//! - Fetch the remote payload on first run and bulk-insert it.
//! - Gate later runs on the durable loaded flag.
//!
//! # Invariants
//! - Flag true means no network call.
//! - Every failure leaves the flag unset so a later run retries.
//! - Concurrent triggers share one in-flight cycle: one fetch, one insert.

use crate::model::cartoon::NewCartoon;
use crate::prefs::{FlagStore, PrefsError, LOADED_KEY};
use crate::remote::{RemoteError, RemoteSource};
use crate::repo::cartoon_repo::{CartoonStore, StoreError};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected http status {0}")]
    HttpStatus(u16),
    #[error("response body is empty")]
    EmptyBody,
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("store write failed: {0}")]
    StoreWrite(#[source] StoreError),
    #[error("loaded flag access failed: {0}")]
    Flag(#[from] PrefsError),
    #[error("store worker failed: {0}")]
    Worker(String),
}

impl From<RemoteError> for LoadError {
    fn from(value: RemoteError) -> Self {
        match value {
            RemoteError::Transport(message) => Self::Transport(message),
            RemoteError::HttpStatus(code) => Self::HttpStatus(code),
            RemoteError::EmptyBody => Self::EmptyBody,
        }
    }
}

/// Result of one `ensure_loaded` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The flag was already set; nothing was fetched.
    Skipped,
    /// This call fetched and committed `inserted` records.
    Loaded { inserted: usize },
}

/// Runs the one-time remote load behind a durable flag.
pub struct LoadOnceCoordinator<R: RemoteSource> {
    store: Arc<dyn CartoonStore>,
    flags: Arc<dyn FlagStore>,
    remote: R,
    url: String,
    in_flight: Mutex<()>,
}

impl<R: RemoteSource> LoadOnceCoordinator<R> {
    pub fn new(
        store: Arc<dyn CartoonStore>,
        flags: Arc<dyn FlagStore>,
        remote: R,
        url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            flags,
            remote,
            url: url.into(),
            in_flight: Mutex::new(()),
        }
    }

    /// Reads the durable loaded flag.
    pub fn is_loaded(&self) -> Result<bool, LoadError> {
        Ok(self.flags.get_bool(LOADED_KEY)?)
    }

    /// Loads remote records once per installation.
    ///
    /// # Errors
    /// - Remote failures map to `Transport`, `HttpStatus` or `EmptyBody`.
    /// - A payload that is not a JSON array of objects is `MalformedPayload`.
    /// - Insert or commit failures are `StoreWrite`; pending rows are discarded.
    pub async fn ensure_loaded(&self) -> Result<LoadOutcome, LoadError> {
        if self.is_loaded()? {
            info!("event=load_once module=sync status=skip reason=flag_set");
            return Ok(LoadOutcome::Skipped);
        }

        let _guard = self.in_flight.lock().await;
        if self.is_loaded()? {
            info!("event=load_once module=sync status=skip reason=joined_in_flight");
            return Ok(LoadOutcome::Skipped);
        }

        let started_at = Instant::now();
        info!("event=load_once module=sync status=start");
        match self.load_cycle().await {
            Ok(inserted) => {
                info!(
                    "event=load_once module=sync status=ok duration_ms={} inserted={}",
                    started_at.elapsed().as_millis(),
                    inserted
                );
                Ok(LoadOutcome::Loaded { inserted })
            }
            Err(err) => {
                error!(
                    "event=load_once module=sync status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    async fn load_cycle(&self) -> Result<usize, LoadError> {
        let body = self.remote.fetch(&self.url).await?;
        let cartoons = parse_payload(&body)?;

        let store = Arc::clone(&self.store);
        let inserted = tokio::task::spawn_blocking(move || commit_batch(store.as_ref(), &cartoons))
            .await
            .map_err(|err| LoadError::Worker(err.to_string()))??;

        self.flags.set_bool(LOADED_KEY, true)?;
        Ok(inserted)
    }
}

/// Parses a remote payload into insertable records.
///
/// The payload must be a JSON array of objects; fields are normalized by
/// `NewCartoon`'s lenient deserialization.
pub fn parse_payload(body: &[u8]) -> Result<Vec<NewCartoon>, LoadError> {
    serde_json::from_slice(body).map_err(|err| LoadError::MalformedPayload(err.to_string()))
}

fn commit_batch(store: &dyn CartoonStore, cartoons: &[NewCartoon]) -> Result<usize, LoadError> {
    let written = store.bulk_insert(cartoons).and_then(|inserted| {
        store.save()?;
        Ok(inserted)
    });

    match written {
        Ok(inserted) => Ok(inserted),
        Err(err) => {
            if let Err(discard_err) = store.discard() {
                warn!("event=load_once module=sync status=error error_code=discard_failed error={discard_err}");
            }
            Err(LoadError::StoreWrite(err))
        }
    }
}
