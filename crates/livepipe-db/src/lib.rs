pub mod error;
pub mod livecomments;
pub mod migrations;
pub mod models;
pub mod ng_words;
pub mod queries;
pub mod reports;

use anyhow::Result;
use rusqlite::{Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub use error::{StoreError, StoreResult};
pub use rusqlite::Connection;

/// Shared handle to the livepipe store.
///
/// All access goes through one connection behind a mutex, so transactions
/// are serialized. Write transactions start with `BEGIN IMMEDIATE` and take
/// the SQLite write lock up front.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads from other processes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let db = Self::init(conn)?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` inside a read transaction. Every statement in `f` sees the
    /// same snapshot.
    pub fn read<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.run(TransactionBehavior::Deferred, f)
    }

    /// Run `f` inside a write transaction. Commits only when `f` returns
    /// `Ok`; any error (or unwinding panic) drops the transaction, which
    /// rolls it back.
    pub fn write<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.run(TransactionBehavior::Immediate, f)
    }

    fn run<F, T, E>(&self, behavior: TransactionBehavior, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let tx = conn
            .transaction_with_behavior(behavior)
            .map_err(StoreError::from)?;

        let value = f(&tx)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_rolls_back() {
        let db = Database::open_in_memory().unwrap();

        let res: StoreResult<()> = db.write(|tx| {
            queries::create_user(tx, "alice", "Alice", "", false)?;
            Err(StoreError::NotFound("anything"))
        });
        assert!(res.is_err());

        let users: i64 = db
            .read(|tx| {
                tx.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
                    .map_err(StoreError::from)
            })
            .unwrap();
        assert_eq!(users, 0);
    }

    #[test]
    fn successful_write_commits() {
        let db = Database::open_in_memory().unwrap();

        let id = db
            .write(|tx| queries::create_user(tx, "bob", "Bob", "hi", true))
            .unwrap();

        let name: String = db
            .read(|tx| {
                tx.query_row("SELECT name FROM users WHERE id = ?1", [id], |r| r.get(0))
                    .map_err(StoreError::from)
            })
            .unwrap();
        assert_eq!(name, "bob");
    }
}
