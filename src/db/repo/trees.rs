//! Tree store operations for the repository.

use crate::domain::{AffiliateTree, Percent, TimeMs, TreeId, WalletId};
use sqlx::sqlite::SqliteConnection;
use sqlx::Row;
use tracing::warn;

use super::Repository;

fn map_tree_row(row: &sqlx::sqlite::SqliteRow) -> AffiliateTree {
    let root_wallet: String = row.get("root_wallet");
    let ceiling_str: String = row.get("ceiling_percent");

    let ceiling_percent = Percent::from_str_canonical(&ceiling_str).unwrap_or_else(|e| {
        warn!(
            root_wallet = %root_wallet,
            ceiling_percent = %ceiling_str,
            error = %e,
            "Failed to parse tree ceiling percent, using zero"
        );
        Percent::zero()
    });

    AffiliateTree {
        id: TreeId::new(row.get::<i64, _>("id")),
        root_wallet: WalletId::new(root_wallet),
        ceiling_percent,
        alias: row.get("alias"),
        created_at: TimeMs::new(row.get::<i64, _>("created_at_ms")),
    }
}

impl Repository {
    /// Insert a tree row and return its id.
    pub async fn insert_tree(
        conn: &mut SqliteConnection,
        root_wallet: &WalletId,
        ceiling_percent: Percent,
        alias: &str,
        created_at: TimeMs,
    ) -> Result<TreeId, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO affiliate_trees (root_wallet, ceiling_percent, alias, created_at_ms)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(root_wallet.as_str())
        .bind(ceiling_percent.to_canonical_string())
        .bind(alias)
        .bind(created_at.as_i64())
        .execute(conn)
        .await?;

        Ok(TreeId::new(result.last_insert_rowid()))
    }

    /// Overwrite a tree's commission ceiling.
    pub async fn update_tree_ceiling(
        conn: &mut SqliteConnection,
        tree_id: TreeId,
        ceiling_percent: Percent,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE affiliate_trees SET ceiling_percent = ? WHERE id = ?")
            .bind(ceiling_percent.to_canonical_string())
            .bind(tree_id.as_i64())
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Look up a tree by its root wallet.
    pub async fn tree_by_root(
        &self,
        root_wallet: &WalletId,
    ) -> Result<Option<AffiliateTree>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, root_wallet, ceiling_percent, alias, created_at_ms
            FROM affiliate_trees
            WHERE root_wallet = ?
            "#,
        )
        .bind(root_wallet.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(map_tree_row))
    }

    /// Count trees in the forest.
    pub async fn count_trees(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM affiliate_trees")
            .fetch_one(self.pool())
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use tempfile::TempDir;

    async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_insert_and_lookup_tree() {
        let (repo, _temp) = setup_test_db().await;

        let mut tx = repo.begin().await.unwrap();
        let tree_id = Repository::insert_tree(
            &mut tx,
            &WalletId::new("root"),
            Percent::from_str_canonical("25").unwrap(),
            "alpha",
            TimeMs::new(5000),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let tree = repo
            .tree_by_root(&WalletId::new("root"))
            .await
            .unwrap()
            .expect("tree should exist");
        assert_eq!(tree.id, tree_id);
        assert_eq!(tree.alias, "alpha");
        assert_eq!(
            tree.ceiling_percent,
            Percent::from_str_canonical("25").unwrap()
        );
        assert_eq!(repo.count_trees().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_root_wallet_unique() {
        let (repo, _temp) = setup_test_db().await;

        let mut tx = repo.begin().await.unwrap();
        Repository::insert_tree(
            &mut tx,
            &WalletId::new("root"),
            Percent::from_str_canonical("10").unwrap(),
            "alpha",
            TimeMs::new(1),
        )
        .await
        .unwrap();

        let dup = Repository::insert_tree(
            &mut tx,
            &WalletId::new("root"),
            Percent::from_str_canonical("20").unwrap(),
            "beta",
            TimeMs::new(2),
        )
        .await;
        assert!(dup.is_err());
    }
}
