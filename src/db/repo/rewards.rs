//! Reward ledger operations for the repository.
//!
//! The ledger is append-only: inserts are idempotent on `source_event_id`,
//! and nothing here updates or deletes existing rows.

use crate::domain::{Decimal, TimeMs, WalletId};
use sqlx::sqlite::SqliteConnection;
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

use super::Repository;

impl Repository {
    /// Append a reward entry idempotently.
    ///
    /// Returns true if a new row was written, false if the source event was
    /// already recorded.
    pub async fn insert_reward(
        conn: &mut SqliteConnection,
        wallet: &WalletId,
        amount: Decimal,
        source_event_id: &str,
        created_at: TimeMs,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO reward_ledger (wallet, amount, source_event_id, created_at_ms)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(source_event_id) DO NOTHING
            "#,
        )
        .bind(wallet.as_str())
        .bind(amount.to_canonical_string())
        .bind(source_event_id)
        .bind(created_at.as_i64())
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch every (wallet, amount) pair in the ledger.
    ///
    /// # Implementation Note
    ///
    /// Amounts are summed by the caller in Rust to preserve decimal
    /// precision. SQLite's SUM aggregate returns REAL (float), which would
    /// lose precision for commission amounts.
    pub async fn reward_amounts(&self) -> Result<Vec<(WalletId, Decimal)>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT wallet, amount
            FROM reward_ledger
            ORDER BY wallet ASC, id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let wallet: String = row.get("wallet");
                let amount_str: String = row.get("amount");
                let amount = Decimal::from_str(&amount_str).unwrap_or_else(|e| {
                    warn!(
                        wallet = %wallet,
                        amount = %amount_str,
                        error = %e,
                        "Failed to parse reward amount decimal, using default"
                    );
                    Decimal::default()
                });
                (WalletId::new(wallet), amount)
            })
            .collect())
    }
}
