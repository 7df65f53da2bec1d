//! Transactional mutation of the affiliate forest.
//!
//! Every operation runs as one transaction: a forest snapshot is read inside
//! it, validated against the membership rules, and all writes land on the
//! same transaction. Dropping the transaction on any error rolls everything
//! back, so a half-migrated subtree is never observable.

use crate::db::Repository;
use crate::domain::{
    Decimal, NodeId, NodeStatus, Percent, TimeMs, TreeId, WalletId,
};
use crate::engine::{ForestIndex, TreeError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of `update_root_commission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionChange {
    pub old_percent: Percent,
    pub new_percent: Percent,
    /// Highest percent found among the root's descendants; the new ceiling
    /// may not go below it.
    pub descendant_floor: Percent,
}

/// Outcome of `set_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub old_status: NodeStatus,
    pub new_status: NodeStatus,
    /// Set when a root was deactivated: descendants stay independently
    /// active, so the caller should surface this to the operator.
    pub root_warning: bool,
}

/// The transactional core of the engine.
pub struct TreeMutator {
    repo: Arc<Repository>,
    /// Margin subtracted from the referrer's percent when a member attaches,
    /// floored at zero. Zero means new members inherit the referrer's percent.
    attach_margin: Percent,
}

impl TreeMutator {
    pub fn new(repo: Arc<Repository>, attach_margin: Percent) -> Self {
        Self {
            repo,
            attach_margin,
        }
    }

    /// Create a tree and its root node together.
    ///
    /// # Errors
    /// `AlreadyMember` if the root wallet is a node anywhere in the forest;
    /// `InvalidPercent` if the ceiling is outside [0, 100].
    pub async fn create_tree(
        &self,
        root_wallet: &WalletId,
        ceiling_percent: Decimal,
        alias: &str,
        now: TimeMs,
    ) -> Result<TreeId, TreeError> {
        let ceiling = Percent::try_new(ceiling_percent)
            .map_err(|_| TreeError::InvalidPercent(ceiling_percent))?;

        let mut tx = self.repo.begin().await?;
        let index = ForestIndex::build(Repository::fetch_forest(&mut tx).await?);

        if index.is_member(root_wallet) {
            return Err(TreeError::AlreadyMember(root_wallet.clone()));
        }

        let tree_id = Repository::insert_tree(&mut tx, root_wallet, ceiling, alias, now).await?;
        Repository::insert_node(
            &mut tx,
            root_wallet,
            tree_id,
            None,
            ceiling,
            NodeStatus::Active,
            now,
        )
        .await?;
        tx.commit().await?;

        info!(root = %root_wallet, tree = %tree_id, alias = %alias, "Affiliate tree created");
        Ok(tree_id)
    }

    /// Attach a new wallet under an existing member.
    ///
    /// The new node joins the referrer's tree with the referrer's percent
    /// minus the configured attach margin, so it never starts above its
    /// parent.
    ///
    /// # Errors
    /// `SelfReference`, `NotAMember` (referrer), `AlreadyMember` (new wallet).
    pub async fn attach_member(
        &self,
        referrer: &WalletId,
        new_wallet: &WalletId,
        now: TimeMs,
    ) -> Result<NodeId, TreeError> {
        if referrer == new_wallet {
            return Err(TreeError::SelfReference);
        }

        let mut tx = self.repo.begin().await?;
        let index = ForestIndex::build(Repository::fetch_forest(&mut tx).await?);

        let referrer_node = index
            .node(referrer)
            .ok_or_else(|| TreeError::NotAMember(referrer.clone()))?;
        if index.is_member(new_wallet) {
            return Err(TreeError::AlreadyMember(new_wallet.clone()));
        }

        let percent = referrer_node
            .commission_percent
            .saturating_sub(self.attach_margin);
        let node_id = Repository::insert_node(
            &mut tx,
            new_wallet,
            referrer_node.tree_id,
            Some(referrer),
            percent,
            NodeStatus::Active,
            now,
        )
        .await?;
        tx.commit().await?;

        info!(wallet = %new_wallet, referrer = %referrer, "Member attached");
        Ok(node_id)
    }

    /// Change a root's commission percent, updating the tree ceiling and the
    /// root node atomically.
    ///
    /// # Errors
    /// `NotRoot` if the wallet is absent or not a root; `InvalidPercent`;
    /// `BelowDescendantFloor` if any descendant already uses more than the
    /// requested percent.
    pub async fn update_root_commission(
        &self,
        root_wallet: &WalletId,
        new_percent: Decimal,
        now: TimeMs,
    ) -> Result<CommissionChange, TreeError> {
        let new_percent =
            Percent::try_new(new_percent).map_err(|_| TreeError::InvalidPercent(new_percent))?;

        let mut tx = self.repo.begin().await?;
        let index = ForestIndex::build(Repository::fetch_forest(&mut tx).await?);

        let node = index
            .node(root_wallet)
            .filter(|n| n.is_root())
            .ok_or_else(|| TreeError::NotRoot(root_wallet.clone()))?;

        let floor = index
            .max_descendant_percent(root_wallet)
            .unwrap_or_else(Percent::zero);
        if new_percent < floor {
            return Err(TreeError::BelowDescendantFloor {
                requested: new_percent,
                floor,
            });
        }

        Repository::update_tree_ceiling(&mut tx, node.tree_id, new_percent).await?;
        Repository::update_node_percent(&mut tx, root_wallet, new_percent, now).await?;
        tx.commit().await?;

        info!(
            root = %root_wallet,
            old = %node.commission_percent,
            new = %new_percent,
            "Root commission updated"
        );
        Ok(CommissionChange {
            old_percent: node.commission_percent,
            new_percent,
            descendant_floor: floor,
        })
    }

    /// Move a node and its whole subtree under a new parent, possibly in a
    /// different tree. Returns the number of descendants re-stamped.
    ///
    /// Within the transaction: the moved node's parent and tree are updated,
    /// every descendant's tree id is re-stamped breadth-first, and percents
    /// are re-aligned so no node in the moved subtree exceeds its new parent
    /// (the moved node takes the new parent's percent; descendants are
    /// clamped where the seam reset lowered their ancestor below them).
    ///
    /// # Errors
    /// `RootImmutable`, `NotAMember` (either wallet), `SelfReference`,
    /// `CycleDetected`.
    pub async fn change_flow(
        &self,
        wallet: &WalletId,
        new_parent: &WalletId,
        now: TimeMs,
    ) -> Result<u64, TreeError> {
        if wallet == new_parent {
            return Err(TreeError::SelfReference);
        }

        let mut tx = self.repo.begin().await?;
        let index = ForestIndex::build(Repository::fetch_forest(&mut tx).await?);

        let node = index
            .node(wallet)
            .ok_or_else(|| TreeError::NotAMember(wallet.clone()))?;
        if node.is_root() {
            return Err(TreeError::RootImmutable(wallet.clone()));
        }
        let parent_node = index
            .node(new_parent)
            .ok_or_else(|| TreeError::NotAMember(new_parent.clone()))?;
        if index.would_create_cycle(wallet, new_parent) {
            return Err(TreeError::CycleDetected {
                wallet: wallet.clone(),
                new_parent: new_parent.clone(),
            });
        }

        Repository::update_node_placement(&mut tx, wallet, new_parent, parent_node.tree_id, now)
            .await?;

        let mut effective: BTreeMap<WalletId, Percent> = BTreeMap::new();
        let mut descendants_moved = 0u64;

        // Breadth-first over the subtree guarantees a parent's effective
        // percent is known before its children are visited.
        for current in index.subtree_wallets(wallet) {
            let record = index
                .node(&current)
                .expect("subtree wallet is present in the index");

            let target = if current == *wallet {
                parent_node.commission_percent
            } else {
                let parent_effective = record
                    .parent_wallet
                    .as_ref()
                    .and_then(|p| effective.get(p).copied())
                    .unwrap_or(record.commission_percent);
                record.commission_percent.min(parent_effective)
            };
            effective.insert(current.clone(), target);

            if current != *wallet {
                Repository::update_node_tree(&mut tx, &current, parent_node.tree_id).await?;
                descendants_moved += 1;
            }
            if target != record.commission_percent {
                Repository::update_node_percent(&mut tx, &current, target, now).await?;
            }
        }

        tx.commit().await?;

        info!(
            wallet = %wallet,
            new_parent = %new_parent,
            descendants = descendants_moved,
            "Subtree re-parented"
        );
        Ok(descendants_moved)
    }

    /// Toggle a node's status. Idempotent; deactivating a root sets an
    /// advisory flag because descendants do not cascade.
    ///
    /// # Errors
    /// `NotAMember`.
    pub async fn set_status(
        &self,
        wallet: &WalletId,
        active: bool,
        now: TimeMs,
    ) -> Result<StatusChange, TreeError> {
        let mut tx = self.repo.begin().await?;
        let node = Repository::fetch_node(&mut tx, wallet)
            .await?
            .ok_or_else(|| TreeError::NotAMember(wallet.clone()))?;

        let new_status = NodeStatus::from(active);
        if new_status != node.status {
            Repository::update_node_status(&mut tx, wallet, new_status, now).await?;
        }
        tx.commit().await?;

        let root_warning = node.is_root() && !active;
        if root_warning {
            warn!(root = %wallet, "Root deactivated; descendants remain active");
        }
        Ok(StatusChange {
            old_status: node.status,
            new_status,
            root_warning,
        })
    }

    /// Append a commission reward for a member wallet, idempotently on the
    /// source event. Returns false when the event was already recorded.
    ///
    /// # Errors
    /// `NotAMember` if the wallet is not in the forest.
    pub async fn record_reward(
        &self,
        wallet: &WalletId,
        amount: Decimal,
        source_event_id: &str,
        now: TimeMs,
    ) -> Result<bool, TreeError> {
        let mut tx = self.repo.begin().await?;
        Repository::fetch_node(&mut tx, wallet)
            .await?
            .ok_or_else(|| TreeError::NotAMember(wallet.clone()))?;

        let recorded =
            Repository::insert_reward(&mut tx, wallet, amount, source_event_id, now).await?;
        tx.commit().await?;

        Ok(recorded)
    }
}
