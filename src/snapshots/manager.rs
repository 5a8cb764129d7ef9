//! Checkpoint manager: create, look up, delete and list checkpoints.
//!
//! Ids come from a process-wide monotonically increasing generator. Retention
//! is bounded: once the count exceeds the configured capacity, the checkpoint
//! with the numerically smallest id is evicted until the bound holds.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use crate::metrics::{record_checkpoint_created, record_checkpoint_evicted};
use crate::node::NodeState;

use super::Checkpoint;

/// Global checkpoint id generator.
static CHECKPOINT_ID_GENERATOR: AtomicU64 = AtomicU64::new(0);

fn next_checkpoint_id() -> u64 {
    CHECKPOINT_ID_GENERATOR.fetch_add(1, Ordering::SeqCst) + 1
}

pub struct CheckpointManager {
    checkpoints: RwLock<BTreeMap<u64, Arc<Checkpoint>>>,
    max_checkpoints: usize,
}

impl CheckpointManager {
    /// The caller (Trie construction) is responsible for rejecting a zero
    /// capacity.
    pub fn new(max_checkpoints: usize) -> Self {
        Self {
            checkpoints: RwLock::new(BTreeMap::new()),
            max_checkpoints,
        }
    }

    /// Deep-clone `root` (the caller holds the live root's read lock;
    /// descendants are read-locked by the clone itself), store the copy under
    /// the next id, then evict smallest-id checkpoints until the count is
    /// within capacity. Returns the new id.
    pub fn create_checkpoint(&self, root: &NodeState, size: usize) -> u64 {
        let clone = Arc::new(RwLock::new(root.deep_clone()));
        let id = next_checkpoint_id();
        let checkpoint = Arc::new(Checkpoint::new(id, clone, size));

        let mut map = self.checkpoints.write();
        map.insert(id, checkpoint);
        while map.len() > self.max_checkpoints {
            if let Some((evicted, _)) = map.pop_first() {
                record_checkpoint_evicted();
                debug!(
                    "evicted checkpoint {} (retention bound {})",
                    evicted, self.max_checkpoints
                );
            }
        }
        drop(map);

        record_checkpoint_created();
        info!("checkpoint {} created ({} keys)", id, size);
        id
    }

    pub fn get_checkpoint(&self, id: u64) -> Option<Arc<Checkpoint>> {
        self.checkpoints.read().get(&id).cloned()
    }

    pub fn has_checkpoint(&self, id: u64) -> bool {
        self.checkpoints.read().contains_key(&id)
    }

    /// Remove if present; reports whether it existed.
    pub fn delete_checkpoint(&self, id: u64) -> bool {
        let existed = self.checkpoints.write().remove(&id).is_some();
        if existed {
            info!("checkpoint {} deleted", id);
        }
        existed
    }

    /// Defensive copy of the id -> checkpoint mapping.
    pub fn all(&self) -> BTreeMap<u64, Arc<Checkpoint>> {
        self.checkpoints.read().clone()
    }

    pub fn count(&self) -> usize {
        self.checkpoints.read().len()
    }

    /// Largest id currently retained, if any.
    pub fn latest_id(&self) -> Option<u64> {
        self.checkpoints.read().keys().next_back().copied()
    }

    pub fn clear_all(&self) {
        self.checkpoints.write().clear();
    }
}
