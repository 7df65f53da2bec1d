//! Affiliate tree: one hierarchy rooted at a single wallet.

use crate::domain::{Percent, TimeMs, TreeId, WalletId};
use serde::{Deserialize, Serialize};

/// One affiliate hierarchy. The root wallet's node carries the same percent
/// as `ceiling_percent`; no node in the tree may exceed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateTree {
    pub id: TreeId,
    pub root_wallet: WalletId,
    pub ceiling_percent: Percent,
    pub alias: String,
    pub created_at: TimeMs,
}
