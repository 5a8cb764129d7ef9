//! node — the unit of storage and of concurrency control.
//!
//! Each node sits behind its own reader/writer lock and owns:
//! - a character-keyed map of child nodes (BTreeMap, so every multi-result
//!   traversal observes ascending lexicographic order for free);
//! - an optional payload, meaningful only while the end-of-key flag is set;
//! - a version drawn from one process-wide generator, reassigned on every
//!   value/flag/clear mutation (child-map edits are not versioned);
//! - a backward-only chain of prior states for single-node rollback
//!   (see history.rs).
//!
//! Locking protocol: traversals couple locks strictly parent-before-child and
//! writers that must keep descending downgrade their write guard to a read
//! guard atomically (`ArcRwLockWriteGuard::downgrade`), so the node never
//! becomes invisible between operations. Mutators take `&mut self`, which
//! means they are only reachable through a held write guard.

mod history;

pub use history::HistoryEntry;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::lock_api::ArcRwLockReadGuard;
use parking_lot::{RawRwLock, RwLock};
use serde_json::Value;

use crate::metrics::record_node_deep_cloned;
use crate::util::now_millis;

/// Shared handle to a node. The tree is the only long-term owner; traversals
/// hold short-lived clones while coupling locks.
pub type NodeRef = Arc<RwLock<NodeState>>;

pub(crate) type ReadGuard = ArcRwLockReadGuard<RawRwLock, NodeState>;

/// Process-wide version generator shared by every node.
static VERSION_GENERATOR: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_version() -> u64 {
    VERSION_GENERATOR.fetch_add(1, Ordering::SeqCst) + 1
}

/// Allocate a fresh, empty node.
pub fn new_node() -> NodeRef {
    Arc::new(RwLock::new(NodeState::new()))
}

/// State of a single trie node, guarded by the node's RwLock.
#[derive(Debug)]
pub struct NodeState {
    children: BTreeMap<char, NodeRef>,
    value: Option<Value>,
    end_of_key: bool,
    version: u64,
    created_at: u64,
    modified_at: u64,
    history: Option<Box<HistoryEntry>>,
}

impl NodeState {
    pub fn new() -> Self {
        let now = now_millis();
        Self {
            children: BTreeMap::new(),
            value: None,
            end_of_key: false,
            version: next_version(),
            created_at: now,
            modified_at: now,
            history: None,
        }
    }

    // -------- read access (any guard) --------

    pub fn child(&self, c: char) -> Option<NodeRef> {
        self.children.get(&c).cloned()
    }

    pub fn has_child(&self, c: char) -> bool {
        self.children.contains_key(&c)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    pub fn children_keys(&self) -> impl Iterator<Item = char> + '_ {
        self.children.keys().copied()
    }

    pub fn children(&self) -> &BTreeMap<char, NodeRef> {
        &self.children
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn end_of_key(&self) -> bool {
        self.end_of_key
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn modified_at(&self) -> u64 {
        self.modified_at
    }

    // -------- mutation (write guard only) --------

    /// Idempotent: creates the child if absent, returns the (possibly
    /// pre-existing) child handle. Child-map edits are not versioned and push
    /// no history, matching the value/flag-only history contract.
    pub fn add_child(&mut self, c: char) -> NodeRef {
        self.children.entry(c).or_insert_with(new_node).clone()
    }

    pub fn set_child(&mut self, c: char, node: NodeRef) {
        self.children.insert(c, node);
    }

    pub fn remove_child(&mut self, c: char) {
        self.children.remove(&c);
    }

    /// Store (or clear, with `None`) the payload. Always pushes the
    /// pre-mutation state onto the history chain and advances the version.
    pub fn set_value(&mut self, value: Option<Value>) {
        self.push_history();
        self.value = value;
        self.touch();
    }

    /// Flip the end-of-key flag. No-op when unchanged: no history push, no
    /// version bump, so idempotent calls cannot inflate the chain.
    pub fn set_end_of_key(&mut self, end_of_key: bool) {
        if self.end_of_key != end_of_key {
            self.push_history();
            self.end_of_key = end_of_key;
            self.touch();
        }
    }

    /// Push history, then reset to an empty node: no payload, flag cleared,
    /// all children dropped.
    pub fn clear(&mut self) {
        self.push_history();
        self.children.clear();
        self.value = None;
        self.end_of_key = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.modified_at = now_millis();
        self.version = next_version();
    }

    // -------- checkpoint support --------

    /// Recursive deep copy producing fully independent nodes: fresh versions,
    /// empty history, no aliasing of live children. Each visited child is
    /// read-locked for the duration of copying its subtree (parent before
    /// child, root to leaf).
    pub fn deep_clone(&self) -> NodeState {
        record_node_deep_cloned();
        let mut clone = NodeState::new();
        clone.value = self.value.clone();
        clone.end_of_key = self.end_of_key;
        for (&c, child) in &self.children {
            let guard = child.read();
            clone
                .children
                .insert(c, Arc::new(RwLock::new(guard.deep_clone())));
        }
        clone
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}
