//! Forest-wide reporting rollups.
//!
//! Read-only, like the aggregator: no transaction handles, one snapshot per
//! call.

use crate::db::Repository;
use crate::domain::{Decimal, ForestOverview, TopEarner, WalletId};
use crate::engine::TreeError;
use crate::ledger::OrderLedger;
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of entries in the top-earner ranking.
const TOP_EARNERS_LIMIT: usize = 10;

/// Builds rollups across the whole forest.
pub struct ForestReporter {
    repo: Arc<Repository>,
    ledger: Arc<dyn OrderLedger>,
}

impl ForestReporter {
    pub fn new(repo: Arc<Repository>, ledger: Arc<dyn OrderLedger>) -> Self {
        Self { repo, ledger }
    }

    /// Totals and top earners across every tree.
    ///
    /// Commission totals come from the reward ledger, summed in Rust for
    /// decimal precision. Volume comes from one order-ledger lookup per
    /// member wallet, issued concurrently. Ranking is deterministic: amount
    /// descending, ties broken by wallet ascending.
    pub async fn forest_overview(&self) -> Result<ForestOverview, TreeError> {
        let nodes = self.repo.forest_snapshot().await?;
        let total_trees = self.repo.count_trees().await?;
        let total_members = nodes.iter().filter(|n| !n.is_root()).count() as i64;

        let mut total_commission = Decimal::zero();
        let mut per_wallet: BTreeMap<WalletId, Decimal> = BTreeMap::new();
        for (wallet, amount) in self.repo.reward_amounts().await? {
            total_commission = total_commission + amount;
            let entry = per_wallet.entry(wallet).or_insert_with(Decimal::zero);
            *entry = *entry + amount;
        }

        let mut top_earners: Vec<TopEarner> = per_wallet
            .into_iter()
            .map(|(wallet, total_reward)| TopEarner {
                wallet,
                total_reward,
            })
            .collect();
        top_earners.sort_by(|a, b| {
            b.total_reward
                .cmp(&a.total_reward)
                .then_with(|| a.wallet.cmp(&b.wallet))
        });
        top_earners.truncate(TOP_EARNERS_LIMIT);

        let lookups = nodes.iter().map(|n| self.ledger.volume_and_count(&n.wallet));
        let mut total_volume = Decimal::zero();
        for stats in try_join_all(lookups).await? {
            total_volume = total_volume + stats.volume;
        }

        Ok(ForestOverview {
            total_trees,
            total_members,
            total_commission_distributed: total_commission,
            total_volume,
            top_earners,
        })
    }
}
