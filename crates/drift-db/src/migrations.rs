//! Embedded schema migrations, run on every open. Statements are idempotent.

use crate::Ledger;
use crate::error::DatabaseError;

const MIGRATION_001: &str = include_str!("../migrations/001_conflicts.sql");

impl Ledger {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_conflicts: {e}")))?;
        Ok(())
    }
}
