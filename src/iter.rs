//! iter — depth-first, ascending-order traversal over a subtree.
//!
//! The iterator is lazy and single-pass: it holds an explicit stack of
//! `(node, accumulated_key)` frames and locks each node only while visiting
//! it (cloning the child handles out of the guard). It is therefore *not*
//! live: mutations made after construction are observed per-node, not
//! point-consistently. Every call to `Trie::iter()` / the prefix scans starts
//! a fresh traversal.
//!
//! Nodes flagged end-of-key without a payload are skipped.

use serde_json::Value;

use crate::node::NodeRef;

pub struct TrieIter {
    stack: Vec<(NodeRef, String)>,
    next_entry: Option<(String, Value)>,
}

impl TrieIter {
    pub(crate) fn new(root: NodeRef, initial_prefix: String) -> Self {
        let mut iter = Self {
            stack: vec![(root, initial_prefix)],
            next_entry: None,
        };
        iter.advance();
        iter
    }

    /// Pop frames until the next yieldable entry is found (or the stack runs
    /// dry). Children are pushed in descending character order so the
    /// smallest key pops first.
    fn advance(&mut self) {
        self.next_entry = None;
        while let Some((node, prefix)) = self.stack.pop() {
            let entry = {
                let guard = node.read();
                for (&c, child) in guard.children().iter().rev() {
                    let mut child_prefix = prefix.clone();
                    child_prefix.push(c);
                    self.stack.push((child.clone(), child_prefix));
                }
                if guard.end_of_key() {
                    guard.value().cloned()
                } else {
                    None
                }
            };
            if let Some(value) = entry {
                self.next_entry = Some((prefix, value));
                return;
            }
        }
    }
}

impl Iterator for TrieIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next_entry.take()?;
        self.advance();
        Some(entry)
    }
}
