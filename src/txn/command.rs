//! A self-contained, invertible description of one key-level mutation.
//!
//! Commands capture the prior state they need immediately before executing:
//! an insert remembers whether the key was new (and the old value if not), a
//! delete remembers the removed value. A closed enum rather than an open
//! trait, since the set of invertible mutations is fixed.

use serde_json::Value;

use crate::errors::TrieError;
use crate::trie::Trie;

#[derive(Debug, Clone)]
pub enum Command {
    Insert {
        key: String,
        new_value: Value,
        old_value: Option<Value>,
        was_new_insert: bool,
    },
    Delete {
        key: String,
        deleted_value: Option<Value>,
        succeeded: bool,
    },
}

impl Command {
    pub fn insert(key: impl Into<String>, new_value: Value) -> Self {
        Command::Insert {
            key: key.into(),
            new_value,
            old_value: None,
            was_new_insert: false,
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Command::Delete {
            key: key.into(),
            deleted_value: None,
            succeeded: false,
        }
    }

    /// Capture the prior state, then apply the forward effect.
    pub fn execute(&mut self, trie: &Trie) -> Result<(), TrieError> {
        match self {
            Command::Insert {
                key,
                new_value,
                old_value,
                was_new_insert,
            } => {
                if trie.has(key)? {
                    *old_value = trie.search(key)?;
                    *was_new_insert = false;
                } else {
                    *was_new_insert = true;
                }
                trie.insert(key, new_value.clone())
            }
            Command::Delete {
                key,
                deleted_value,
                succeeded,
            } => {
                if trie.has(key)? {
                    *deleted_value = trie.search(key)?;
                    *succeeded = trie.delete(key)?;
                } else {
                    *succeeded = false;
                }
                Ok(())
            }
        }
    }

    /// Apply the inverse effect. Undoing an overwrite whose old value was
    /// absent is a no-op, the inherited asymmetry of the no-null-payload
    /// invariant.
    pub fn undo(&self, trie: &Trie) -> Result<(), TrieError> {
        match self {
            Command::Insert {
                key,
                old_value,
                was_new_insert,
                ..
            } => {
                if *was_new_insert {
                    trie.delete(key)?;
                } else if let Some(old) = old_value {
                    trie.insert(key, old.clone())?;
                }
                Ok(())
            }
            Command::Delete {
                key,
                deleted_value,
                succeeded,
            } => {
                if *succeeded {
                    if let Some(value) = deleted_value {
                        trie.insert(key, value.clone())?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Short description for logs.
    pub fn label(&self) -> String {
        match self {
            Command::Insert { key, .. } => format!("insert(key={})", key),
            Command::Delete { key, .. } => format!("delete(key={})", key),
        }
    }
}
