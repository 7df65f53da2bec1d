//! Affiliate node: a wallet's membership record within exactly one tree.

use crate::domain::{NodeId, Percent, TimeMs, TreeId, WalletId};
use serde::{Deserialize, Serialize};

/// Activity status of a node.
///
/// An inactive node stays attached to its tree; it only drops out of active
/// member counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Inactive,
}

impl NodeStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, NodeStatus::Active)
    }

    /// Canonical string form, suitable for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Active => "active",
            NodeStatus::Inactive => "inactive",
        }
    }

    /// Parse the persisted form. Unknown strings map to None.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(NodeStatus::Active),
            "inactive" => Some(NodeStatus::Inactive),
            _ => None,
        }
    }
}

impl From<bool> for NodeStatus {
    fn from(active: bool) -> Self {
        if active {
            NodeStatus::Active
        } else {
            NodeStatus::Inactive
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One wallet's membership in the affiliate forest.
///
/// `parent_wallet == None` iff this node is its tree's root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateNode {
    pub id: NodeId,
    pub wallet: WalletId,
    pub tree_id: TreeId,
    pub parent_wallet: Option<WalletId>,
    pub commission_percent: Percent,
    pub status: NodeStatus,
    pub effective_from: TimeMs,
}

impl AffiliateNode {
    pub fn is_root(&self) -> bool {
        self.parent_wallet.is_none()
    }
}
