//! Two-stack undo/redo log over executed commands.
//!
//! Not internally synchronized: every method takes `&mut self`, so safe
//! concurrent use requires one manager per logical transaction scope (which
//! is how bulk.rs uses it). Executing a new command clears the redo stack.

use log::debug;

use crate::errors::TrieError;
use crate::metrics::{record_txn_command, record_txn_redo, record_txn_undo};
use crate::trie::Trie;

use super::Command;

#[derive(Debug, Default)]
pub struct TransactionManager {
    history: Vec<Command>,
    redo: Vec<Command>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the command's forward effect, push it onto the history stack and
    /// clear the redo stack. A command that fails is not recorded.
    pub fn execute(&mut self, trie: &Trie, mut command: Command) -> Result<(), TrieError> {
        command.execute(trie)?;
        debug!("executed {}", command.label());
        self.history.push(command);
        self.redo.clear();
        record_txn_command();
        Ok(())
    }

    /// Invert the most recent command, moving it to the redo stack. No-op on
    /// an empty history. If the inverse effect itself fails, the command is
    /// dropped; the manager offers no recovery beyond reporting the error.
    pub fn undo(&mut self, trie: &Trie) -> Result<(), TrieError> {
        if let Some(command) = self.history.pop() {
            command.undo(trie)?;
            debug!("undid {}", command.label());
            self.redo.push(command);
            record_txn_undo();
        }
        Ok(())
    }

    /// Re-run the most recently undone command, moving it back to the history
    /// stack. No-op on an empty redo stack.
    pub fn redo(&mut self, trie: &Trie) -> Result<(), TrieError> {
        if let Some(mut command) = self.redo.pop() {
            command.execute(trie)?;
            debug!("redid {}", command.label());
            self.history.push(command);
            record_txn_redo();
        }
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.redo.clear();
    }

    pub fn history_size(&self) -> usize {
        self.history.len()
    }
}
