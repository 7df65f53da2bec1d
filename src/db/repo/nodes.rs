//! Node store operations for the repository.

use crate::domain::{AffiliateNode, NodeId, NodeStatus, Percent, TimeMs, TreeId, WalletId};
use sqlx::sqlite::SqliteConnection;
use sqlx::Row;
use tracing::warn;

use super::Repository;

fn map_node_row(row: &sqlx::sqlite::SqliteRow) -> AffiliateNode {
    let wallet: String = row.get("wallet");
    let percent_str: String = row.get("commission_percent");
    let status_str: String = row.get("status");

    let commission_percent = Percent::from_str_canonical(&percent_str).unwrap_or_else(|e| {
        warn!(
            wallet = %wallet,
            commission_percent = %percent_str,
            error = %e,
            "Failed to parse node commission percent, using zero"
        );
        Percent::zero()
    });

    let status = NodeStatus::parse(&status_str).unwrap_or_else(|| {
        warn!(wallet = %wallet, status = %status_str, "Unknown node status, treating as active");
        NodeStatus::Active
    });

    AffiliateNode {
        id: NodeId::new(row.get::<i64, _>("id")),
        wallet: WalletId::new(wallet),
        tree_id: TreeId::new(row.get::<i64, _>("tree_id")),
        parent_wallet: row
            .get::<Option<String>, _>("parent_wallet")
            .map(WalletId::new),
        commission_percent,
        status,
        effective_from: TimeMs::new(row.get::<i64, _>("effective_from_ms")),
    }
}

impl Repository {
    /// Load every node in the forest, ordered by wallet for determinism.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_forest(
        conn: &mut SqliteConnection,
    ) -> Result<Vec<AffiliateNode>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, wallet, tree_id, parent_wallet, commission_percent, status, effective_from_ms
            FROM affiliate_nodes
            ORDER BY wallet ASC
            "#,
        )
        .fetch_all(conn)
        .await?;

        Ok(rows.iter().map(map_node_row).collect())
    }

    /// Load a single node by wallet.
    pub async fn fetch_node(
        conn: &mut SqliteConnection,
        wallet: &WalletId,
    ) -> Result<Option<AffiliateNode>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, wallet, tree_id, parent_wallet, commission_percent, status, effective_from_ms
            FROM affiliate_nodes
            WHERE wallet = ?
            "#,
        )
        .bind(wallet.as_str())
        .fetch_optional(conn)
        .await?;

        Ok(row.as_ref().map(map_node_row))
    }

    /// Pool-backed forest snapshot for the read-only paths.
    pub async fn forest_snapshot(&self) -> Result<Vec<AffiliateNode>, sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        Self::fetch_forest(&mut conn).await
    }

    /// Insert a node and return its row id.
    pub async fn insert_node(
        conn: &mut SqliteConnection,
        wallet: &WalletId,
        tree_id: TreeId,
        parent_wallet: Option<&WalletId>,
        commission_percent: Percent,
        status: NodeStatus,
        effective_from: TimeMs,
    ) -> Result<NodeId, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO affiliate_nodes
            (wallet, tree_id, parent_wallet, commission_percent, status, effective_from_ms)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(wallet.as_str())
        .bind(tree_id.as_i64())
        .bind(parent_wallet.map(|w| w.as_str()))
        .bind(commission_percent.to_canonical_string())
        .bind(status.as_str())
        .bind(effective_from.as_i64())
        .execute(conn)
        .await?;

        Ok(NodeId::new(result.last_insert_rowid()))
    }

    /// Point a node at a new parent and tree.
    pub async fn update_node_placement(
        conn: &mut SqliteConnection,
        wallet: &WalletId,
        parent_wallet: &WalletId,
        tree_id: TreeId,
        effective_from: TimeMs,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE affiliate_nodes
            SET parent_wallet = ?, tree_id = ?, effective_from_ms = ?
            WHERE wallet = ?
            "#,
        )
        .bind(parent_wallet.as_str())
        .bind(tree_id.as_i64())
        .bind(effective_from.as_i64())
        .bind(wallet.as_str())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Re-stamp a descendant's tree id during a subtree move.
    pub async fn update_node_tree(
        conn: &mut SqliteConnection,
        wallet: &WalletId,
        tree_id: TreeId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE affiliate_nodes SET tree_id = ? WHERE wallet = ?")
            .bind(tree_id.as_i64())
            .bind(wallet.as_str())
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Overwrite a node's commission percent, re-stamping when it took effect.
    pub async fn update_node_percent(
        conn: &mut SqliteConnection,
        wallet: &WalletId,
        commission_percent: Percent,
        effective_from: TimeMs,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE affiliate_nodes SET commission_percent = ?, effective_from_ms = ? WHERE wallet = ?",
        )
        .bind(commission_percent.to_canonical_string())
        .bind(effective_from.as_i64())
        .bind(wallet.as_str())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Overwrite a node's status, re-stamping when it took effect.
    pub async fn update_node_status(
        conn: &mut SqliteConnection,
        wallet: &WalletId,
        status: NodeStatus,
        effective_from: TimeMs,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE affiliate_nodes SET status = ?, effective_from_ms = ? WHERE wallet = ?")
            .bind(status.as_str())
            .bind(effective_from.as_i64())
            .bind(wallet.as_str())
            .execute(conn)
            .await?;

        Ok(())
    }
}
