//! Per-node mutation history: a backward-only chain of prior states.
//!
//! Every entry captures the node's full pre-mutation state (payload, flag,
//! child map, version) tagged with the version that state carried. The chain
//! is pure persistent-history data: it is never shared between nodes and is
//! unbounded until explicitly cleared.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{NodeRef, NodeState};
use crate::metrics::record_history_push;
use crate::util::now_millis;

/// One prior state of a single node.
#[derive(Debug)]
pub struct HistoryEntry {
    version: u64,
    timestamp: u64,
    value: Option<Value>,
    end_of_key: bool,
    children: BTreeMap<char, NodeRef>,
    prev: Option<Box<HistoryEntry>>,
}

impl HistoryEntry {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl NodeState {
    /// Push the current state onto the chain, tagged with the current version.
    pub(super) fn push_history(&mut self) {
        record_history_push();
        self.history = Some(Box::new(HistoryEntry {
            version: self.version,
            timestamp: now_millis(),
            value: self.value.clone(),
            end_of_key: self.end_of_key,
            children: self.children.clone(),
            prev: self.history.take(),
        }));
    }

    /// Restore the most recent prior state, discarding that entry. Returns
    /// false (and changes nothing) when no history exists. The restore itself
    /// advances the version but records no new history entry.
    pub fn rollback(&mut self) -> bool {
        let Some(mut entry) = self.history.take() else {
            return false;
        };
        self.value = entry.value.take();
        self.end_of_key = entry.end_of_key;
        self.children = std::mem::take(&mut entry.children);
        self.history = entry.prev.take();
        self.touch();
        true
    }

    /// Restore the entry whose recorded version equals `target` exactly,
    /// discarding every newer entry and the match itself. Versions decrease
    /// strictly along the chain, so the first entry at or below `target`
    /// is the only candidate; anything other than an exact match leaves the
    /// node and its chain untouched and returns false.
    pub fn rollback_to_version(&mut self, target: u64) -> bool {
        let mut cursor = self.history.as_deref();
        let mut found = false;
        while let Some(entry) = cursor {
            if entry.version <= target {
                found = entry.version == target;
                break;
            }
            cursor = entry.prev.as_deref();
        }
        if !found {
            return false;
        }

        let mut cursor = self.history.take();
        while let Some(mut entry) = cursor {
            if entry.version == target {
                self.value = entry.value.take();
                self.end_of_key = entry.end_of_key;
                self.children = std::mem::take(&mut entry.children);
                self.history = entry.prev.take();
                self.touch();
                return true;
            }
            cursor = entry.prev.take();
        }
        false
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    /// Number of retained entries on the chain.
    pub fn history_depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.history.as_deref();
        while let Some(entry) = cursor {
            depth += 1;
            cursor = entry.prev.as_deref();
        }
        depth
    }

    /// Drop the whole chain for this node, freeing its memory.
    pub fn clear_history(&mut self) {
        self.history = None;
    }
}
