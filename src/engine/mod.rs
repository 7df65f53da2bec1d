//! Affiliate forest engine: membership rules, transactional mutation,
//! read-only aggregation and reporting.

use crate::domain::{Decimal, Percent, WalletId};
use crate::ledger::OrderLedgerError;
use thiserror::Error;

pub mod aggregator;
pub mod membership;
pub mod mutator;
pub mod overview;

pub use aggregator::DownlineAggregator;
pub use membership::ForestIndex;
pub use mutator::{CommissionChange, StatusChange, TreeMutator};
pub use overview::ForestReporter;

/// Failures surfaced by the forest engine.
///
/// Everything except `Storage` and `Ledger` is a validation failure detected
/// before any write; mutations are single transactions, so no variant ever
/// describes a partially-applied state.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("wallet {0} is already a member of an affiliate tree")]
    AlreadyMember(WalletId),
    #[error("wallet {0} is not a member of any affiliate tree")]
    NotAMember(WalletId),
    #[error("a wallet cannot be its own referrer")]
    SelfReference,
    #[error("moving {wallet} under {new_parent} would create a cycle")]
    CycleDetected {
        wallet: WalletId,
        new_parent: WalletId,
    },
    #[error("wallet {0} roots a tree and cannot be re-parented")]
    RootImmutable(WalletId),
    #[error("wallet {0} does not root a tree")]
    NotRoot(WalletId),
    #[error("commission percent {0} is outside the range 0..=100")]
    InvalidPercent(Decimal),
    #[error("root percent {requested} is below the descendant floor {floor}")]
    BelowDescendantFloor { requested: Percent, floor: Percent },
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("order ledger failure: {0}")]
    Ledger(#[from] OrderLedgerError),
}
