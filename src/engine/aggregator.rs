//! Read-only downline aggregation.
//!
//! The aggregator holds no transaction handles: each call reads one forest
//! snapshot from the pool and joins it against the order ledger. Callers
//! needing a consistent view across calls must wrap them in their own read
//! transaction.

use crate::db::Repository;
use crate::domain::{NodeView, WalletAffiliateInfo, WalletId};
use crate::engine::{ForestIndex, TreeError};
use crate::ledger::{OrderLedger, VolumeAndCount};
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds nested downline views and per-wallet affiliate info.
pub struct DownlineAggregator {
    repo: Arc<Repository>,
    ledger: Arc<dyn OrderLedger>,
}

impl DownlineAggregator {
    pub fn new(repo: Arc<Repository>, ledger: Arc<dyn OrderLedger>) -> Self {
        Self { repo, ledger }
    }

    /// Build the nested downline rooted at `wallet`, with trading statistics
    /// attached to every node.
    ///
    /// Performs one order-ledger lookup per node in the subtree (issued
    /// concurrently); callers must treat this as an expensive, non-cached
    /// read.
    ///
    /// # Errors
    /// `NotAMember` if the wallet is not in the forest.
    pub async fn build_downline(&self, wallet: &WalletId) -> Result<NodeView, TreeError> {
        let index = ForestIndex::build(self.repo.forest_snapshot().await?);
        if !index.is_member(wallet) {
            return Err(TreeError::NotAMember(wallet.clone()));
        }

        let order = index.subtree_wallets(wallet);

        let lookups = order.iter().map(|w| {
            let w = w.clone();
            async move {
                self.ledger
                    .volume_and_count(&w)
                    .await
                    .map(|stats| (w, stats))
            }
        });
        let stats: BTreeMap<WalletId, VolumeAndCount> =
            try_join_all(lookups).await?.into_iter().collect();

        // Reversed breadth-first order is a post-order: every child view is
        // assembled before its parent asks for it.
        let mut built: BTreeMap<WalletId, NodeView> = BTreeMap::new();
        for current in order.iter().rev() {
            let record = index
                .node(current)
                .expect("subtree wallet is present in the index");
            let children: Vec<NodeView> = index
                .children_of(current)
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            let stat = stats.get(current).copied().unwrap_or_default();

            built.insert(
                current.clone(),
                NodeView {
                    wallet: current.clone(),
                    tree_id: record.tree_id,
                    parent_wallet: record.parent_wallet.clone(),
                    commission_percent: record.commission_percent,
                    status: record.status,
                    total_volume: stat.volume,
                    total_transactions: stat.tx_count,
                    children,
                },
            );
        }

        Ok(built
            .remove(wallet)
            .expect("downline root view was assembled"))
    }

    /// A wallet's position within the forest, or None for a non-member.
    pub async fn wallet_info(
        &self,
        wallet: &WalletId,
    ) -> Result<Option<WalletAffiliateInfo>, TreeError> {
        let index = ForestIndex::build(self.repo.forest_snapshot().await?);
        let Some(node) = index.node(wallet) else {
            return Ok(None);
        };

        let level = index.depth_from_root(wallet).unwrap_or(0);
        Ok(Some(WalletAffiliateInfo {
            tree_id: node.tree_id,
            parent_wallet: node.parent_wallet.clone(),
            commission_percent: node.commission_percent,
            level,
        }))
    }
}
