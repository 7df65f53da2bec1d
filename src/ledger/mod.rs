//! Order ledger collaborator: per-wallet trading statistics from the
//! external trade settlement system.
//!
//! The engine only ever reads from this collaborator, and never from inside
//! a mutating transaction.

use crate::domain::{Decimal, WalletId};
use async_trait::async_trait;
use std::fmt;

pub mod http;
pub mod mock;

pub use http::HttpOrderLedger;
pub use mock::MockOrderLedger;

/// Trading statistics for one wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeAndCount {
    pub volume: Decimal,
    pub tx_count: i64,
}

/// Order ledger trait for fetching per-wallet trade statistics.
///
/// Implementations must handle retry/backoff and rate limiting.
#[async_trait]
pub trait OrderLedger: Send + Sync + fmt::Debug {
    /// Total traded volume and transaction count for a wallet.
    ///
    /// Wallets unknown to the ledger yield zeroes, not an error.
    async fn volume_and_count(&self, wallet: &WalletId)
        -> Result<VolumeAndCount, OrderLedgerError>;
}

/// Error type for order ledger operations.
#[derive(Debug, Clone)]
pub enum OrderLedgerError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for OrderLedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderLedgerError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            OrderLedgerError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            OrderLedgerError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            OrderLedgerError::RateLimited => write!(f, "Rate limited"),
            OrderLedgerError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for OrderLedgerError {}
