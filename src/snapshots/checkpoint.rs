//! An immutable point-in-time copy of the whole tree.

use crate::node::NodeRef;
use crate::util::now_millis;

/// Owned exclusively by the CheckpointManager. The stored root is a fully
/// independent deep clone: it never aliases live trie nodes, and rollback
/// copies it back out rather than re-attaching it.
#[derive(Debug)]
pub struct Checkpoint {
    id: u64,
    timestamp: u64,
    root: NodeRef,
    size: usize,
}

impl Checkpoint {
    pub(crate) fn new(id: u64, root: NodeRef, size: usize) -> Self {
        Self {
            id,
            timestamp: now_millis(),
            root,
            size,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Creation time, Unix milliseconds.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Live-key count recorded at creation.
    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn root(&self) -> &NodeRef {
        &self.root
    }
}
