//! Atomic multi-key operations: one command per key, reverse undo on failure.
//!
//! Each bulk call owns a private TransactionManager, so a failure unwind can
//! only ever pop this operation's commands. Undo failures during the unwind
//! are logged and the unwind continues; there is no automatic recovery
//! beyond reporting.

use log::{error, info, warn};
use serde_json::Value;

use crate::errors::TrieError;
use crate::metrics::record_bulk_unwind;
use crate::trie::Trie;

use super::{Command, TransactionManager};

/// Insert every entry or none of them. Returns the number applied.
pub fn bulk_insert_atomic(trie: &Trie, entries: &[(String, Value)]) -> Result<usize, TrieError> {
    let mut txn = TransactionManager::new();
    for (index, (key, value)) in entries.iter().enumerate() {
        let command = Command::insert(key.clone(), value.clone());
        if let Err(err) = txn.execute(trie, command) {
            warn!(
                "bulk insert failed at entry {} ({}): unwinding {} applied entries",
                index,
                err,
                txn.history_size()
            );
            unwind(trie, &mut txn);
            return Err(err);
        }
    }
    info!("bulk insert completed: {} entries applied atomically", entries.len());
    Ok(entries.len())
}

/// Delete every key or none of them. With `ignore_missing` false, a missing
/// key fails the whole operation up front; with it true, missing keys are
/// skipped. Returns the number actually deleted.
pub fn bulk_delete_atomic(
    trie: &Trie,
    keys: &[String],
    ignore_missing: bool,
) -> Result<usize, TrieError> {
    if !ignore_missing {
        for key in keys {
            if !trie.has(key)? {
                return Err(TrieError::KeyNotFound { key: key.clone() });
            }
        }
    }

    let mut txn = TransactionManager::new();
    let mut deleted = 0usize;
    for (index, key) in keys.iter().enumerate() {
        match trie.has(key) {
            Ok(true) => {
                let command = Command::delete(key.clone());
                if let Err(err) = txn.execute(trie, command) {
                    warn!(
                        "bulk delete failed at key {} ({}): unwinding {} applied entries",
                        index,
                        err,
                        txn.history_size()
                    );
                    unwind(trie, &mut txn);
                    return Err(err);
                }
                deleted += 1;
            }
            Ok(false) => {}
            Err(err) => {
                unwind(trie, &mut txn);
                return Err(err);
            }
        }
    }
    info!("bulk delete completed: {} entries deleted atomically", deleted);
    Ok(deleted)
}

fn unwind(trie: &Trie, txn: &mut TransactionManager) {
    record_bulk_unwind();
    while txn.can_undo() {
        if let Err(err) = txn.undo(trie) {
            error!("error during bulk unwind: {}", err);
        }
    }
}
