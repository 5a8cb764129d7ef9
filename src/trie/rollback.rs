//! trie/rollback — whole-tree checkpoints and per-node history rollback.
//!
//! Checkpoint creation takes only the root's read lock (descendants are
//! read-locked by the deep clone as it visits them); checkpoint rollback
//! takes only the root's write lock while the stored tree is copied back in.
//! Operations that already progressed past the root during a rollback observe
//! a torn mix of pre- and post-rollback state, a documented trade-off of the
//! root-only locking, not something this layer hides.

use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;

use crate::errors::TrieError;
use crate::metrics::{record_checkpoint_rollback, record_node_rollback};
use crate::node::NodeRef;

use super::core::Trie;

impl Trie {
    /// Deep-clone the whole tree into a new checkpoint; returns its id.
    pub fn create_checkpoint(&self) -> u64 {
        let root = self.root.read();
        self.checkpoints
            .create_checkpoint(&root, self.size.load(Ordering::SeqCst))
    }

    /// Restore the tree to the state recorded under `id`. The stored nodes
    /// are copied into fresh live nodes; checkpoint-owned nodes are never
    /// re-attached. Returns false when the id is unknown.
    pub fn rollback_to_checkpoint(&self, id: u64) -> bool {
        let Some(checkpoint) = self.checkpoints.get_checkpoint(id) else {
            warn!("rollback requested for unknown checkpoint {}", id);
            return false;
        };

        {
            let mut root = self.root.write();
            root.clear();
            let source = checkpoint.root().read();
            root.set_value(source.value().cloned());
            root.set_end_of_key(source.end_of_key());
            for (&c, child) in source.children().iter() {
                let child_guard = child.read();
                root.set_child(c, Arc::new(RwLock::new(child_guard.deep_clone())));
            }
        }

        self.size.store(checkpoint.size(), Ordering::SeqCst);
        self.bump_global_version();
        record_checkpoint_rollback();
        info!("rolled back to checkpoint {}", id);
        true
    }

    /// id -> recorded live-key count, for every retained checkpoint.
    pub fn list_checkpoints(&self) -> BTreeMap<u64, usize> {
        self.checkpoints
            .all()
            .iter()
            .map(|(&id, checkpoint)| (id, checkpoint.size()))
            .collect()
    }

    pub fn delete_checkpoint(&self, id: u64) -> bool {
        self.checkpoints.delete_checkpoint(id)
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.count()
    }

    pub fn latest_checkpoint_id(&self) -> Option<u64> {
        self.checkpoints.latest_id()
    }

    pub fn clear_all_checkpoints(&self) {
        self.checkpoints.clear_all();
    }

    /// Restore the node at `key` to its most recent recorded state. False
    /// when the node does not exist or has no history.
    pub fn rollback_node(&self, key: &str) -> Result<bool, TrieError> {
        Self::validate_key(key)?;
        let Some(node) = self.find_node(key) else {
            return Ok(false);
        };
        let rolled = {
            let mut guard = node.write();
            guard.rollback()
        };
        if rolled {
            self.bump_global_version();
            record_node_rollback();
        }
        Ok(rolled)
    }

    /// Restore the node at `key` to the history entry recorded with exactly
    /// `version`. False when the node is missing, the chain is empty, or no
    /// entry matches the version exactly.
    pub fn rollback_node_to_version(&self, key: &str, version: u64) -> Result<bool, TrieError> {
        Self::validate_key(key)?;
        let Some(node) = self.find_node(key) else {
            return Ok(false);
        };
        let rolled = {
            let mut guard = node.write();
            guard.rollback_to_version(version)
        };
        if rolled {
            self.bump_global_version();
            record_node_rollback();
        }
        Ok(rolled)
    }

    /// Recursively drop every node's history chain, freeing the memory held
    /// by per-node rollback state.
    pub fn clear_node_history(&self) {
        clear_history_recursive(&self.root);
    }
}

fn clear_history_recursive(node: &NodeRef) {
    let mut guard = node.write();
    guard.clear_history();
    for child in guard.children().values() {
        clear_history_recursive(child);
    }
}
