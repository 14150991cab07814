//! Cartoon store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide batch insert, full fetch, single delete and commit over `cartoons`.
//! - Serialize every access to the underlying connection.
//!
//! # Invariants
//! - `bulk_insert` is all-or-nothing for its batch.
//! - Pending changes become durable only through `save()`.
//! - Reads observe pending changes made through the same store.
//! - The pending unit of work belongs to the store, not to a caller: `save`
//!   and `discard` act on everything staged so far, so callers that stage
//!   mutations must not interleave on one store.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::cartoon::{Cartoon, CartoonId, NewCartoon};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

const CARTOON_SELECT_SQL: &str = "SELECT id, name, species, image, status FROM cartoons";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("cartoon not found: {0}")]
    NotFound(CartoonId),
    #[error("store connection lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store used by the load-once coordinator and list presenter.
pub trait CartoonStore: Send + Sync {
    /// Stages all records as one atomic batch and returns how many were inserted.
    fn bulk_insert(&self, cartoons: &[NewCartoon]) -> StoreResult<usize>;
    /// Returns every stored record in insertion order.
    fn fetch_all(&self) -> StoreResult<Vec<Cartoon>>;
    /// Stages removal of one record.
    fn delete(&self, id: CartoonId) -> StoreResult<()>;
    /// Commits pending changes.
    fn save(&self) -> StoreResult<()>;
    /// Drops pending changes.
    fn discard(&self) -> StoreResult<()>;
    fn count(&self) -> StoreResult<usize>;
}

/// SQLite-backed cartoon store.
pub struct SqliteCartoonStore {
    conn: Mutex<Connection>,
}

impl SqliteCartoonStore {
    /// Opens (or creates) the store file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            error!("event=store_lock module=repo status=error error_code=poisoned");
            StoreError::Poisoned
        })
    }
}

impl CartoonStore for SqliteCartoonStore {
    fn bulk_insert(&self, cartoons: &[NewCartoon]) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        begin_pending(&conn)?;

        let batch = conn.savepoint()?;
        {
            let mut stmt = batch.prepare_cached(
                "INSERT INTO cartoons (name, species, image, status) VALUES (?1, ?2, ?3, ?4);",
            )?;
            for cartoon in cartoons {
                stmt.execute(params![
                    cartoon.name.as_str(),
                    cartoon.species.as_str(),
                    cartoon.image_url.as_str(),
                    cartoon.status.as_str(),
                ])?;
            }
        }
        batch.commit()?;

        debug!(
            "event=store_bulk_insert module=repo status=ok count={}",
            cartoons.len()
        );
        Ok(cartoons.len())
    }

    fn fetch_all(&self) -> StoreResult<Vec<Cartoon>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!("{CARTOON_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut cartoons = Vec::new();

        while let Some(row) = rows.next()? {
            cartoons.push(parse_cartoon_row(row)?);
        }

        Ok(cartoons)
    }

    fn delete(&self, id: CartoonId) -> StoreResult<()> {
        let conn = self.lock()?;
        begin_pending(&conn)?;

        let changed = conn.execute("DELETE FROM cartoons WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn save(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT;")?;
        }
        Ok(())
    }

    fn discard(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        if !conn.is_autocommit() {
            conn.execute_batch("ROLLBACK;")?;
        }
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cartoons;", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn begin_pending(conn: &Connection) -> StoreResult<()> {
    if conn.is_autocommit() {
        conn.execute_batch("BEGIN IMMEDIATE;")?;
    }
    Ok(())
}

fn parse_cartoon_row(row: &Row<'_>) -> StoreResult<Cartoon> {
    Ok(Cartoon {
        id: row.get("id")?,
        name: row.get("name")?,
        species: row.get("species")?,
        image_url: row.get("image")?,
        status: row.get("status")?,
    })
}
