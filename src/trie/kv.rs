//! trie/kv — point operations: insert / search / delete / has.
//!
//! All three walk the tree with lock coupling: hold the current node's read
//! guard, clone the child handle, acquire the child's read guard, only then
//! release the current node's. Write-path escalation re-checks under the
//! write lock (another thread may have created the child in the unlocked
//! window) and downgrades atomically before stepping further down.
//!
//! Delete keeps the whole visited chain read-locked so the bottom-up pruning
//! pass can re-validate each candidate under its parent's write lock.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::lock_api::ArcRwLockWriteGuard;
use serde_json::Value;

use crate::errors::TrieError;
use crate::metrics::{
    record_delete, record_delete_miss, record_insert_new, record_insert_overwrite,
    record_search_hit, record_search_miss,
};
use crate::node::{NodeRef, ReadGuard};

use super::core::Trie;

impl Trie {
    /// Insert `value` under `key`, overwriting any prior value
    /// (last-write-wins). A key that was not previously present increments
    /// the live count.
    pub fn insert(&self, key: &str, value: Value) -> Result<(), TrieError> {
        Self::validate_key(key)?;
        if value.is_null() {
            return Err(TrieError::InvalidValue);
        }

        let mut current: NodeRef = Arc::clone(&self.root);
        let mut guard: ReadGuard = current.read_arc();
        for c in key.chars() {
            let next = if let Some(n) = guard.child(c) {
                n
            } else {
                // Escalate: release read, acquire write, re-check (another
                // thread may have just created it), create if still absent,
                // downgrade so the node stays visible while stepping down.
                drop(guard);
                let mut w = current.write_arc();
                let n = w.add_child(c);
                guard = ArcRwLockWriteGuard::downgrade(w);
                n
            };
            let next_guard = next.read_arc();
            drop(guard);
            current = next;
            guard = next_guard;
        }

        drop(guard);
        let mut w = current.write_arc();
        let was_key = w.end_of_key();
        if !was_key {
            w.set_end_of_key(true);
            self.size.fetch_add(1, Ordering::SeqCst);
        }
        w.set_value(Some(value));
        drop(w);

        if was_key {
            record_insert_overwrite();
        } else {
            record_insert_new();
        }
        Ok(())
    }

    /// Pure read-path lookup. Returns the value only when the terminal node
    /// is a key terminator; `None` both for a missing path and for a path
    /// that exists without completing a key.
    pub fn search(&self, key: &str) -> Result<Option<Value>, TrieError> {
        Self::validate_key(key)?;

        let mut guard: ReadGuard = self.root.read_arc();
        for c in key.chars() {
            let Some(next) = guard.child(c) else {
                record_search_miss();
                return Ok(None);
            };
            // the owned guard keeps the child handle alive after the parent
            // guard is released
            let next_guard = next.read_arc();
            drop(guard);
            guard = next_guard;
        }

        let found = if guard.end_of_key() {
            guard.value().cloned()
        } else {
            None
        };
        if found.is_some() {
            record_search_hit();
        } else {
            record_search_miss();
        }
        Ok(found)
    }

    pub fn has(&self, key: &str) -> Result<bool, TrieError> {
        Ok(self.search(key)?.is_some())
    }

    /// Remove `key` if present: clear the terminator flag and payload, then
    /// prune the now-dangling path suffix bottom-up. Reports `false` with no
    /// side effects when the key is absent.
    pub fn delete(&self, key: &str) -> Result<bool, TrieError> {
        Self::validate_key(key)?;
        let chars: Vec<char> = key.chars().collect();

        // Walk down holding the entire chain read-locked.
        let mut nodes: Vec<NodeRef> = Vec::with_capacity(chars.len() + 1);
        let mut guards: Vec<Option<ReadGuard>> = Vec::with_capacity(chars.len() + 1);
        let root = Arc::clone(&self.root);
        let root_guard = root.read_arc();
        nodes.push(root);
        guards.push(Some(root_guard));
        for &c in &chars {
            let next = {
                let cur = guards.last().and_then(|g| g.as_ref());
                match cur.and_then(|g| g.child(c)) {
                    Some(n) => n,
                    None => {
                        record_delete_miss();
                        return Ok(false); // chain guards release on drop
                    }
                }
            };
            let next_guard = next.read_arc();
            nodes.push(next);
            guards.push(Some(next_guard));
        }

        // Escalate at the terminal.
        let last = nodes.len() - 1;
        guards[last] = None;
        let mut w = nodes[last].write_arc();
        let deleted = if w.end_of_key() {
            w.set_end_of_key(false);
            w.set_value(None);
            self.size.fetch_sub(1, Ordering::SeqCst);
            true
        } else {
            false
        };
        guards[last] = Some(ArcRwLockWriteGuard::downgrade(w));

        if !deleted {
            record_delete_miss();
            return Ok(false);
        }
        self.prune_path(&chars, &nodes, &mut guards);
        record_delete();
        Ok(true)
    }

    /// Walk back up the recorded chain from the leaf, unlinking nodes that
    /// are neither key terminators nor parents. Each removal re-validates the
    /// child under the parent's write lock, since a concurrent insert may have
    /// revived it between the check and the unlink. Stops at the first
    /// ancestor that must be retained.
    fn prune_path(
        &self,
        chars: &[char],
        nodes: &[NodeRef],
        guards: &mut [Option<ReadGuard>],
    ) {
        let mut idx = nodes.len() - 1;
        while idx > 0 {
            guards[idx] = None;
            let removable = {
                let w = nodes[idx].write_arc();
                !w.end_of_key() && !w.has_children()
            };
            if !removable {
                break;
            }

            guards[idx - 1] = None;
            let mut pw = nodes[idx - 1].write_arc();
            if let Some(live) = pw.child(chars[idx - 1]) {
                let lg = live.read_arc();
                if !lg.end_of_key() && !lg.has_children() {
                    pw.remove_child(chars[idx - 1]);
                }
                drop(lg);
            }
            guards[idx - 1] = Some(ArcRwLockWriteGuard::downgrade(pw));
            idx -= 1;
        }
    }
}
