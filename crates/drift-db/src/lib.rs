//! # drift-db
//!
//! The dedup ledger: the only state wikidrift keeps between runs.
//!
//! One row per conflict hash, holding `action_required` and `action_done`
//! flags. Rows are inserted at most once and `action_done` only ever moves
//! from 0 to 1. Every mutation is committed before the call returns, so an
//! interrupted run leaves unfinished facts pending for the next one.
//!
//! Backed by an embedded libSQL database (`libsql` crate, local mode).

pub mod conflicts;
pub mod error;
pub mod helpers;
mod migrations;

use std::path::Path;

use error::DatabaseError;
use libsql::Builder;

pub use conflicts::{LedgerRow, LedgerStats};

/// Handle to the ledger database.
pub struct Ledger {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl Ledger {
    /// Open (or create) a local ledger at `path`. `:memory:` gives a
    /// throwaway ledger for tests and dry runs.
    ///
    /// Creates missing parent directories and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created, the
    /// database cannot be opened, or migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let ledger = Self { db, conn };
        ledger.run_migrations().await?;
        tracing::debug!(path, "ledger opened");
        Ok(ledger)
    }

    /// Underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
