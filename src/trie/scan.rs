//! trie/scan — prefix queries: starts_with / search_by_prefix / autocomplete,
//! key listing, longest common prefix, and iteration entry points.
//!
//! All multi-result operations yield keys in ascending lexicographic order of
//! the character alphabet (a structural property of the BTreeMap child maps).
//! Nodes flagged end-of-key but holding no payload are silently skipped by
//! the traversal.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::TrieError;
use crate::iter::TrieIter;
use crate::metrics::{record_autocomplete, record_prefix_scan};
use crate::node::{NodeRef, ReadGuard};

use super::core::Trie;

impl Trie {
    /// Lock-coupled descent to the node at the end of `prefix`. All guards
    /// are released before the handle is returned; consumers re-lock per node
    /// as they traverse.
    pub(crate) fn find_node(&self, prefix: &str) -> Option<NodeRef> {
        let mut current: NodeRef = Arc::clone(&self.root);
        let mut guard: ReadGuard = current.read_arc();
        for c in prefix.chars() {
            let next = guard.child(c)?;
            let next_guard = next.read_arc();
            drop(guard);
            current = next;
            guard = next_guard;
        }
        drop(guard);
        Some(current)
    }

    /// True iff a node exists at the end of the prefix path. The empty prefix
    /// is always true.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.find_node(prefix).is_some()
    }

    /// Every `(full_key, value)` pair under `prefix`, ascending.
    pub fn search_by_prefix(&self, prefix: &str) -> Vec<(String, Value)> {
        record_prefix_scan();
        match self.find_node(prefix) {
            Some(node) => TrieIter::new(node, prefix.to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// Keys under `prefix`, ascending, capped at `limit` results.
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Result<Vec<String>, TrieError> {
        if limit == 0 {
            return Err(TrieError::invalid_argument("limit must be greater than 0"));
        }
        record_autocomplete();
        let Some(node) = self.find_node(prefix) else {
            return Ok(Vec::new());
        };
        Ok(TrieIter::new(node, prefix.to_string())
            .map(|(key, _)| key)
            .take(limit)
            .collect())
    }

    /// All live keys, ascending (prefix search with the empty prefix).
    pub fn get_all_keys(&self) -> Vec<String> {
        self.search_by_prefix("")
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// Descend while exactly one child exists and the current node does not
    /// complete a key, accumulating characters. Stops at branching, at a
    /// complete key, or at a dead end.
    pub fn longest_common_prefix(&self) -> String {
        let mut prefix = String::new();
        let mut guard: ReadGuard = self.root.read_arc();
        loop {
            if guard.end_of_key() || guard.children_count() != 1 {
                return prefix;
            }
            let Some((&c, next)) = guard.children().iter().next() else {
                return prefix;
            };
            let next = next.clone();
            let next_guard = next.read_arc();
            drop(guard);
            prefix.push(c);
            guard = next_guard;
        }
    }

    /// Fresh traversal over the whole tree: lazy, finite, ordered, and not
    /// point-consistent with concurrent mutations. Each call restarts.
    pub fn iter(&self) -> TrieIter {
        TrieIter::new(Arc::clone(&self.root), String::new())
    }
}
