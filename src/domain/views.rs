//! Stable read-model shapes returned by the aggregator and reporting paths.
//!
//! Consumers (admin dashboards) depend on these fixed fields; keep the wire
//! names camelCase and additive-only.

use crate::domain::{Decimal, NodeStatus, Percent, TreeId, WalletId};
use serde::{Deserialize, Serialize};

/// One node in a downline view, with per-node trading statistics and its
/// children nested beneath it (wallet-ascending order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub wallet: WalletId,
    pub tree_id: TreeId,
    pub parent_wallet: Option<WalletId>,
    pub commission_percent: Percent,
    pub status: NodeStatus,
    pub total_volume: Decimal,
    pub total_transactions: i64,
    pub children: Vec<NodeView>,
}

impl NodeView {
    /// Number of nodes in the downline below this one. The node itself is
    /// not counted, so for a root view this equals the tree size minus one.
    pub fn count_total(&self) -> i64 {
        let mut count = 0;
        let mut stack: Vec<&NodeView> = self.children.iter().collect();
        while let Some(view) = stack.pop() {
            count += 1;
            stack.extend(view.children.iter());
        }
        count
    }

    /// Active nodes in the downline below this one, at every depth.
    pub fn count_active(&self) -> i64 {
        let mut count = 0;
        let mut stack: Vec<&NodeView> = self.children.iter().collect();
        while let Some(view) = stack.pop() {
            if view.status.is_active() {
                count += 1;
            }
            stack.extend(view.children.iter());
        }
        count
    }
}

/// A wallet's position within the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAffiliateInfo {
    pub tree_id: TreeId,
    pub parent_wallet: Option<WalletId>,
    pub commission_percent: Percent,
    /// Edge distance from the tree root: the root is 0, its direct referrals 1.
    pub level: u32,
}

/// One entry in the top-earner ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopEarner {
    pub wallet: WalletId,
    pub total_reward: Decimal,
}

/// Rollup across the whole forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestOverview {
    pub total_trees: i64,
    /// Non-root nodes across all trees.
    pub total_members: i64,
    pub total_commission_distributed: Decimal,
    pub total_volume: Decimal,
    pub top_earners: Vec<TopEarner>,
}
