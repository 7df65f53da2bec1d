//! Domain types for the affiliate commission forest.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Range-checked commission percents
//! - Domain primitives: TimeMs, WalletId, TreeId, NodeId
//! - Node, tree, and reward-ledger records
//! - Stable view shapes consumed by the read paths

pub mod decimal;
pub mod node;
pub mod percent;
pub mod primitives;
pub mod reward;
pub mod tree;
pub mod views;

pub use decimal::Decimal;
pub use node::{AffiliateNode, NodeStatus};
pub use percent::{Percent, PercentOutOfRange};
pub use primitives::{NodeId, TimeMs, TreeId, WalletId};
pub use reward::RewardEntry;
pub use tree::AffiliateTree;
pub use views::{ForestOverview, NodeView, TopEarner, WalletAffiliateInfo};
