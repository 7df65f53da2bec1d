//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by store:
//! - `nodes.rs` - Node store operations
//! - `trees.rs` - Tree store operations
//! - `rewards.rs` - Reward ledger operations
//!
//! Mutating flows run inside a single transaction: the tree mutator calls
//! `begin()` and passes the transaction connection to the associated
//! `fetch_*`/`insert_*`/`update_*` functions, so validation reads and writes
//! share one atomic scope. Read-only flows use the pool-backed methods.

mod nodes;
mod rewards;
mod trees;

use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Begin a transaction spanning multiple statements.
    ///
    /// Dropping the returned transaction without committing rolls back
    /// everything executed on it.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
