//! Cartoon list presenter.
//!
//! # Responsibility
//! - Populate rows from the store, triggering the one-time load when needed.
//! - Forward row deletes to the store and keep the rows in sync.
//!
//! # Invariants
//! - State moves `Uninitialized -> Loading -> Ready`; deletes keep `Ready`.
//! - Rows are re-read only after the load cycle has committed or failed.

use crate::model::cartoon::Cartoon;
use crate::remote::RemoteSource;
use crate::repo::cartoon_repo::{CartoonStore, StoreError};
use crate::sync::load_once::{LoadError, LoadOnceCoordinator};
use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;

/// Localized label of the swipe-to-delete confirmation button.
pub const DELETE_CONFIRMATION_LABEL: &str = "Eliminar";

#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("initial load failed: {0}")]
    Load(#[from] LoadError),
    #[error("store read failed: {0}")]
    StoreRead(#[source] StoreError),
    #[error("store delete failed: {0}")]
    StoreDelete(#[source] StoreError),
    #[error("row {index} out of range (rows={len})")]
    RowOutOfRange { index: usize, len: usize },
    #[error("screen is not ready")]
    NotReady,
}

/// Lifecycle of one list screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Uninitialized,
    Loading,
    Ready,
}

impl ScreenState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
        }
    }
}

/// View callbacks driven by the presenter.
pub trait ListView {
    /// All rows changed; re-render from the presenter.
    fn reload_rows(&mut self);
    /// The row at `index` was removed.
    fn remove_row(&mut self, index: usize);
}

pub struct ListPresenter<R: RemoteSource, V: ListView> {
    store: Arc<dyn CartoonStore>,
    coordinator: Arc<LoadOnceCoordinator<R>>,
    view: V,
    rows: Vec<Cartoon>,
    state: ScreenState,
}

impl<R: RemoteSource, V: ListView> ListPresenter<R, V> {
    pub fn new(
        store: Arc<dyn CartoonStore>,
        coordinator: Arc<LoadOnceCoordinator<R>>,
        view: V,
    ) -> Self {
        Self {
            store,
            coordinator,
            view,
            rows: Vec::new(),
            state: ScreenState::Uninitialized,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn rows(&self) -> &[Cartoon] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row text at `index`: the record's name.
    pub fn render_row(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(Cartoon::display_name)
    }

    /// Populates the screen, running the one-time load first when needed.
    ///
    /// Rows are rendered even when the load fails, so the screen shows
    /// whatever the store holds; the load error is returned afterwards.
    /// Calls after the first are no-ops.
    pub async fn on_screen_ready(&mut self) -> Result<(), PresenterError> {
        if self.state != ScreenState::Uninitialized {
            return Ok(());
        }

        if self.coordinator.is_loaded()? {
            self.populate()?;
            return Ok(());
        }

        self.state = ScreenState::Loading;
        info!("event=screen_load module=presenter status=start");
        let loaded = self.coordinator.ensure_loaded().await;
        if let Err(err) = &loaded {
            error!("event=screen_load module=presenter status=error error={err}");
        }

        // The load error wins over a failed re-read.
        let populated = self.populate();
        match (loaded, populated) {
            (Err(err), _) => {
                warn!(
                    "event=screen_load module=presenter status=error rows={}",
                    self.rows.len()
                );
                Err(err.into())
            }
            (Ok(_), Err(err)) => Err(err),
            (Ok(outcome), Ok(())) => {
                info!(
                    "event=screen_load module=presenter status=ok outcome={outcome:?} rows={}",
                    self.rows.len()
                );
                Ok(())
            }
        }
    }

    /// Deletes the record shown at `index` and removes its row.
    pub fn delete_row(&mut self, index: usize) -> Result<(), PresenterError> {
        if self.state != ScreenState::Ready {
            return Err(PresenterError::NotReady);
        }
        let id = match self.rows.get(index) {
            Some(cartoon) => cartoon.id,
            None => {
                return Err(PresenterError::RowOutOfRange {
                    index,
                    len: self.rows.len(),
                })
            }
        };

        if let Err(err) = self.store.delete(id).and_then(|()| self.store.save()) {
            if let Err(discard_err) = self.store.discard() {
                warn!("event=row_delete module=presenter status=error error_code=discard_failed error={discard_err}");
            }
            error!("event=row_delete module=presenter status=error id={id} error={err}");
            return Err(PresenterError::StoreDelete(err));
        }

        self.rows.remove(index);
        self.view.remove_row(index);
        info!(
            "event=row_delete module=presenter status=ok id={id} rows={}",
            self.rows.len()
        );
        Ok(())
    }

    fn populate(&mut self) -> Result<(), PresenterError> {
        let fetched = self.store.fetch_all();
        // Ready is terminal for this cycle even when the read fails.
        self.state = ScreenState::Ready;
        self.rows = fetched.map_err(PresenterError::StoreRead)?;
        self.view.reload_rows();
        Ok(())
    }
}
