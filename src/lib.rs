pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    AffiliateNode, AffiliateTree, Decimal, ForestOverview, NodeStatus, NodeView, Percent, TimeMs,
    TreeId, WalletId,
};
pub use engine::{DownlineAggregator, ForestIndex, ForestReporter, TreeError, TreeMutator};
pub use error::AppError;
pub use ledger::{HttpOrderLedger, MockOrderLedger, OrderLedger, VolumeAndCount};
