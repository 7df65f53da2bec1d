//! Mock order ledger for testing without network calls.

use super::{OrderLedger, OrderLedgerError, VolumeAndCount};
use crate::domain::{Decimal, WalletId};
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock order ledger that returns predefined per-wallet statistics.
///
/// Wallets without an entry report zero volume and zero transactions.
#[derive(Debug, Clone, Default)]
pub struct MockOrderLedger {
    stats: HashMap<WalletId, VolumeAndCount>,
}

impl MockOrderLedger {
    /// Create a new mock ledger with no recorded activity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record statistics for a wallet.
    pub fn with_stats(mut self, wallet: WalletId, volume: Decimal, tx_count: i64) -> Self {
        self.stats
            .insert(wallet, VolumeAndCount { volume, tx_count });
        self
    }
}

#[async_trait]
impl OrderLedger for MockOrderLedger {
    async fn volume_and_count(
        &self,
        wallet: &WalletId,
    ) -> Result<VolumeAndCount, OrderLedgerError> {
        Ok(self.stats.get(wallet).copied().unwrap_or_default())
    }
}
