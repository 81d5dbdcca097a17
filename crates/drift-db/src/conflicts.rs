//! Ledger operations on the `conflicts` table.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use drift_core::entities::DeprecationConflict;
use serde::Serialize;

use crate::Ledger;
use crate::error::DatabaseError;
use crate::helpers::{get_flag, get_opt_string, parse_datetime, parse_optional_datetime};

const ROW_COLUMNS: &str =
    "hash, signature, action_required, action_done, issue_url, created_at, done_at";

/// One persisted conflict fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    pub hash: String,
    pub signature: String,
    pub action_required: bool,
    pub action_done: bool,
    pub issue_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub done_at: Option<DateTime<Utc>>,
}

impl LedgerRow {
    /// Still waiting for a notification.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.action_required && !self.action_done
    }

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            hash: row.get::<String>(0)?,
            signature: row.get::<String>(1)?,
            action_required: get_flag(row, 2)?,
            action_done: get_flag(row, 3)?,
            issue_url: get_opt_string(row, 4)?,
            created_at: parse_datetime(&row.get::<String>(5)?)?,
            done_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        })
    }
}

/// Row counts by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total: u64,
    pub pending: u64,
    pub done: u64,
    /// Not done, and manually excluded from dispatch.
    pub excluded: u64,
}

impl Ledger {
    /// Whether a row with this hash was ever inserted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn exists(&self, hash: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT 1 FROM conflicts WHERE hash = ?1", [hash])
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Insert a new pending row unless one with this hash already exists.
    ///
    /// Returns `true` when a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn register(&self, hash: &str, signature: &str) -> Result<bool, DatabaseError> {
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO conflicts (hash, signature, action_required, action_done)
                 VALUES (?1, ?2, 1, 0)",
                libsql::params![hash, signature],
            )
            .await?;
        Ok(inserted > 0)
    }

    /// Register every conflict in one transaction, returning how many were new.
    ///
    /// Either all inserts are committed or none are.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any INSERT or the commit fails.
    pub async fn register_all(
        &self,
        conflicts: &[DeprecationConflict<'_>],
    ) -> Result<usize, DatabaseError> {
        let tx = self.conn.transaction().await?;
        let mut inserted = 0;
        for conflict in conflicts {
            let changed = tx
                .execute(
                    "INSERT OR IGNORE INTO conflicts (hash, signature, action_required, action_done)
                     VALUES (?1, ?2, 1, 0)",
                    libsql::params![
                        conflict.conflict_hash.as_str(),
                        conflict.conflict_signature.as_str()
                    ],
                )
                .await?;
            if changed > 0 {
                tracing::debug!(signature = %conflict.conflict_signature, "registered conflict");
                inserted += 1;
            }
        }
        tx.commit().await?;
        Ok(inserted)
    }

    /// Hashes with `action_required = 1 AND action_done = 0`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn pending_hashes(&self) -> Result<HashSet<String>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT hash FROM conflicts WHERE action_required = 1 AND action_done = 0",
                (),
            )
            .await?;
        let mut hashes = HashSet::new();
        while let Some(row) = rows.next().await? {
            hashes.insert(row.get::<String>(0)?);
        }
        Ok(hashes)
    }

    /// Mark a row done, recording the issue URL when known.
    ///
    /// Returns `false` if the row does not exist or was already done; a done
    /// row is never modified again.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the UPDATE fails.
    pub async fn mark_done(
        &self,
        hash: &str,
        issue_url: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute(
                "UPDATE conflicts
                 SET action_done = 1, issue_url = ?2, done_at = datetime('now')
                 WHERE hash = ?1 AND action_done = 0",
                libsql::params![hash, issue_url],
            )
            .await?;
        if changed == 0 {
            tracing::debug!(hash, "mark_done: no pending row");
        }
        Ok(changed > 0)
    }

    /// Include or exclude a row from dispatch. Returns `false` if no row has
    /// this hash.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the UPDATE fails.
    pub async fn set_action_required(
        &self,
        hash: &str,
        required: bool,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute(
                "UPDATE conflicts SET action_required = ?2 WHERE hash = ?1",
                libsql::params![hash, i64::from(required)],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Fetch one row by hash.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row is malformed.
    pub async fn get(&self, hash: &str) -> Result<Option<LedgerRow>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {ROW_COLUMNS} FROM conflicts WHERE hash = ?1"),
                [hash],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(LedgerRow::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Most recently registered rows first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list(&self, limit: u32) -> Result<Vec<LedgerRow>, DatabaseError> {
        self.select_rows(&format!(
            "SELECT {ROW_COLUMNS} FROM conflicts ORDER BY rowid DESC LIMIT {limit}"
        ))
        .await
    }

    /// Pending rows, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn pending(&self, limit: u32) -> Result<Vec<LedgerRow>, DatabaseError> {
        self.select_rows(&format!(
            "SELECT {ROW_COLUMNS} FROM conflicts
             WHERE action_required = 1 AND action_done = 0
             ORDER BY rowid LIMIT {limit}"
        ))
        .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn stats(&self) -> Result<LedgerStats, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*),
                        COALESCE(SUM(action_required = 1 AND action_done = 0), 0),
                        COALESCE(SUM(action_done = 1), 0),
                        COALESCE(SUM(action_required = 0 AND action_done = 0), 0)
                 FROM conflicts",
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = |idx: i32| -> Result<u64, DatabaseError> {
            let value = row.get::<i64>(idx)?;
            u64::try_from(value)
                .map_err(|_| DatabaseError::Query(format!("negative count: {value}")))
        };
        Ok(LedgerStats {
            total: count(0)?,
            pending: count(1)?,
            done: count(2)?,
            excluded: count(3)?,
        })
    }

    async fn select_rows(&self, sql: &str) -> Result<Vec<LedgerRow>, DatabaseError> {
        let mut rows = self.conn.query(sql, ()).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(LedgerRow::from_row(&row)?);
        }
        Ok(out)
    }
}
