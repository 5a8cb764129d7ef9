//! trie/core — the Trie struct, construction and whole-structure operations.
//!
//! A Trie is one sentinel root node (never itself a key terminator, since empty
//! keys are rejected before any traversal), a live-key counter, a structure
//! version bumped only by rollback operations, and the embedded checkpoint
//! manager. There is no global lock: all coordination happens through the
//! per-node reader/writer locks and the strict parent-before-child
//! acquisition order.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::config::{TrieBuilder, TrieConfig};
use crate::errors::TrieError;
use crate::node::{new_node, NodeRef};
use crate::snapshots::CheckpointManager;

pub struct Trie {
    pub(crate) root: NodeRef,
    pub(crate) size: AtomicUsize,
    pub(crate) global_version: AtomicU64,
    pub(crate) checkpoints: CheckpointManager,
    config: TrieConfig,
}

impl Trie {
    /// Construct with default configuration (cannot fail).
    pub fn new() -> Self {
        Self::from_config_unchecked(TrieConfig::default())
    }

    /// Construct with an explicit configuration. The checkpoint retention
    /// bound must be greater than zero.
    pub fn with_config(config: TrieConfig) -> Result<Self, TrieError> {
        if config.max_checkpoints == 0 {
            return Err(TrieError::invalid_argument(
                "max checkpoints must be greater than 0",
            ));
        }
        Ok(Self::from_config_unchecked(config))
    }

    /// Builder entry point mirroring `TrieBuilder::new()`.
    pub fn builder() -> TrieBuilder {
        TrieBuilder::new()
    }

    fn from_config_unchecked(config: TrieConfig) -> Self {
        Self {
            root: new_node(),
            size: AtomicUsize::new(0),
            global_version: AtomicU64::new(0),
            checkpoints: CheckpointManager::new(config.max_checkpoints),
            config,
        }
    }

    pub fn config(&self) -> &TrieConfig {
        &self.config
    }

    /// Number of live keys.
    pub fn size(&self) -> usize {
        self.size.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Reset the whole tree and the live count under the root's write lock.
    /// Operations already past the root keep traversing their (now detached)
    /// subtree; this is the documented weak-consistency boundary.
    pub fn clear(&self) {
        let mut root = self.root.write();
        root.clear();
        self.size.store(0, Ordering::SeqCst);
    }

    /// Structure version: bumped by whole-tree and per-node rollback, never by
    /// ordinary insert/delete.
    pub fn get_global_version(&self) -> u64 {
        self.global_version.load(Ordering::SeqCst)
    }

    pub(crate) fn bump_global_version(&self) {
        self.global_version.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn validate_key(key: &str) -> Result<(), TrieError> {
        if key.is_empty() {
            return Err(TrieError::InvalidKey);
        }
        Ok(())
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}
