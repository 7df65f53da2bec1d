//! Membership rules over an adjacency snapshot of the forest.
//!
//! Every operation builds a `ForestIndex` once from a single node-store read
//! and walks it with explicit work lists. Depth is unbounded, so none of the
//! traversals here use native recursion, and upward walks carry a visited set
//! so a corrupted parent chain cannot loop forever.

use crate::domain::{AffiliateNode, Percent, WalletId};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Adjacency snapshot of the whole forest: wallet to node record, plus
/// parent to children (wallet-ascending) lists.
#[derive(Debug, Clone)]
pub struct ForestIndex {
    nodes: BTreeMap<WalletId, AffiliateNode>,
    children: BTreeMap<WalletId, Vec<WalletId>>,
}

impl ForestIndex {
    /// Build the index from a forest snapshot.
    pub fn build(nodes: Vec<AffiliateNode>) -> Self {
        let mut map = BTreeMap::new();
        let mut children: BTreeMap<WalletId, Vec<WalletId>> = BTreeMap::new();

        for node in nodes {
            if let Some(parent) = &node.parent_wallet {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.wallet.clone());
            }
            map.insert(node.wallet.clone(), node);
        }

        for list in children.values_mut() {
            list.sort();
        }

        ForestIndex {
            nodes: map,
            children,
        }
    }

    /// Look up a node record by wallet.
    pub fn node(&self, wallet: &WalletId) -> Option<&AffiliateNode> {
        self.nodes.get(wallet)
    }

    /// True iff the wallet is a node anywhere in the forest.
    pub fn is_member(&self, wallet: &WalletId) -> bool {
        self.nodes.contains_key(wallet)
    }

    /// Direct children of a wallet, wallet-ascending.
    pub fn children_of(&self, wallet: &WalletId) -> &[WalletId] {
        self.children.get(wallet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walk parent pointers upward from `candidate`; true if `ancestor` is
    /// reached. `candidate == ancestor` is trivially true, which is what the
    /// cycle check relies on.
    pub fn is_descendant_of(&self, candidate: &WalletId, ancestor: &WalletId) -> bool {
        if candidate == ancestor {
            return true;
        }

        let mut visited: HashSet<&WalletId> = HashSet::new();
        let mut current = candidate;
        loop {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            match &node.parent_wallet {
                None => return false,
                Some(parent) => {
                    if parent == ancestor {
                        return true;
                    }
                    if !visited.insert(parent) {
                        return false;
                    }
                    current = parent;
                }
            }
        }
    }

    /// True iff attaching `wallet` under `proposed_parent` would make
    /// `wallet` an ancestor of its own parent.
    pub fn would_create_cycle(&self, wallet: &WalletId, proposed_parent: &WalletId) -> bool {
        self.is_descendant_of(proposed_parent, wallet)
    }

    /// Breadth-first order over the subtree rooted at `wallet`, including
    /// `wallet` itself. Siblings appear wallet-ascending, so the order is
    /// deterministic for a given forest.
    pub fn subtree_wallets(&self, wallet: &WalletId) -> Vec<WalletId> {
        let mut order = Vec::new();
        let mut seen: HashSet<&WalletId> = HashSet::new();
        let mut queue: VecDeque<&WalletId> = VecDeque::new();
        queue.push_back(wallet);
        seen.insert(wallet);

        while let Some(current) = queue.pop_front() {
            order.push(current.clone());
            for child in self.children_of(current) {
                if seen.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        order
    }

    /// Highest commission percent among the strict descendants of `wallet`.
    /// None when the wallet has no descendants.
    pub fn max_descendant_percent(&self, wallet: &WalletId) -> Option<Percent> {
        self.subtree_wallets(wallet)
            .into_iter()
            .filter(|w| w != wallet)
            .filter_map(|w| self.nodes.get(&w).map(|n| n.commission_percent))
            .max()
    }

    /// Edge distance from the tree root: 0 for the root itself, 1 for its
    /// direct referrals. None if the wallet is not a member.
    pub fn depth_from_root(&self, wallet: &WalletId) -> Option<u32> {
        self.node(wallet)?;

        let mut visited: HashSet<&WalletId> = HashSet::new();
        let mut current = wallet;
        let mut depth = 0u32;
        loop {
            let Some(node) = self.nodes.get(current) else {
                return Some(depth);
            };
            match &node.parent_wallet {
                None => return Some(depth),
                Some(parent) => {
                    if !visited.insert(parent) {
                        return Some(depth);
                    }
                    depth += 1;
                    current = parent;
                }
            }
        }
    }
}
