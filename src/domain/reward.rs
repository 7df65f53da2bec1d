//! Reward ledger entry: immutable history of commission paid to a node.

use crate::domain::{Decimal, TimeMs, WalletId};
use serde::{Deserialize, Serialize};

/// One commission payment recorded by the trade-settlement path.
///
/// Entries are append-only; the engine reads them for statistics and never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub id: i64,
    pub wallet: WalletId,
    pub amount: Decimal,
    /// Opaque reference to the external trade that produced this commission.
    pub source_event_id: String,
    pub created_at: TimeMs,
}
