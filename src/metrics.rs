//! Lightweight global metrics for Trellis.
//!
//! Thread-safe atomic counters for the subsystems:
//! - Point operations (insert / search / delete)
//! - Prefix queries (scan / autocomplete)
//! - Per-node history and rollback
//! - Checkpoints (create / evict / rollback / deep clone)
//! - Transactions (commands, undo/redo, bulk unwinds)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Point operations -----
static TRIE_INSERTS_NEW: AtomicU64 = AtomicU64::new(0);
static TRIE_INSERT_OVERWRITES: AtomicU64 = AtomicU64::new(0);
static TRIE_DELETES: AtomicU64 = AtomicU64::new(0);
static TRIE_DELETE_MISSES: AtomicU64 = AtomicU64::new(0);
static TRIE_SEARCH_HITS: AtomicU64 = AtomicU64::new(0);
static TRIE_SEARCH_MISSES: AtomicU64 = AtomicU64::new(0);

// ----- Prefix queries -----
static PREFIX_SCANS: AtomicU64 = AtomicU64::new(0);
static AUTOCOMPLETE_QUERIES: AtomicU64 = AtomicU64::new(0);

// ----- Node history -----
static HISTORY_PUSHES: AtomicU64 = AtomicU64::new(0);
static NODE_ROLLBACKS: AtomicU64 = AtomicU64::new(0);

// ----- Checkpoints -----
static CHECKPOINTS_CREATED: AtomicU64 = AtomicU64::new(0);
static CHECKPOINTS_EVICTED: AtomicU64 = AtomicU64::new(0);
static CHECKPOINT_ROLLBACKS: AtomicU64 = AtomicU64::new(0);
static NODES_DEEP_CLONED: AtomicU64 = AtomicU64::new(0);

// ----- Transactions -----
static TXN_COMMANDS_EXECUTED: AtomicU64 = AtomicU64::new(0);
static TXN_UNDOS: AtomicU64 = AtomicU64::new(0);
static TXN_REDOS: AtomicU64 = AtomicU64::new(0);
static BULK_UNWINDS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    // Point operations
    pub trie_inserts_new: u64,
    pub trie_insert_overwrites: u64,
    pub trie_deletes: u64,
    pub trie_delete_misses: u64,
    pub trie_search_hits: u64,
    pub trie_search_misses: u64,

    // Prefix queries
    pub prefix_scans: u64,
    pub autocomplete_queries: u64,

    // Node history
    pub history_pushes: u64,
    pub node_rollbacks: u64,

    // Checkpoints
    pub checkpoints_created: u64,
    pub checkpoints_evicted: u64,
    pub checkpoint_rollbacks: u64,
    pub nodes_deep_cloned: u64,

    // Transactions
    pub txn_commands_executed: u64,
    pub txn_undos: u64,
    pub txn_redos: u64,
    pub bulk_unwinds: u64,
}

impl MetricsSnapshot {
    pub fn search_hit_ratio(&self) -> f64 {
        let total = self.trie_search_hits + self.trie_search_misses;
        if total == 0 {
            0.0
        } else {
            self.trie_search_hits as f64 / total as f64
        }
    }

    pub fn avg_nodes_per_checkpoint(&self) -> f64 {
        if self.checkpoints_created == 0 {
            0.0
        } else {
            self.nodes_deep_cloned as f64 / self.checkpoints_created as f64
        }
    }
}

// ----- Recorders (point operations) -----
pub fn record_insert_new() {
    TRIE_INSERTS_NEW.fetch_add(1, Ordering::Relaxed);
}
pub fn record_insert_overwrite() {
    TRIE_INSERT_OVERWRITES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_delete() {
    TRIE_DELETES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_delete_miss() {
    TRIE_DELETE_MISSES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_search_hit() {
    TRIE_SEARCH_HITS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_search_miss() {
    TRIE_SEARCH_MISSES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (prefix queries) -----
pub fn record_prefix_scan() {
    PREFIX_SCANS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_autocomplete() {
    AUTOCOMPLETE_QUERIES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (node history) -----
pub fn record_history_push() {
    HISTORY_PUSHES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_node_rollback() {
    NODE_ROLLBACKS.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (checkpoints) -----
pub fn record_checkpoint_created() {
    CHECKPOINTS_CREATED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_checkpoint_evicted() {
    CHECKPOINTS_EVICTED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_checkpoint_rollback() {
    CHECKPOINT_ROLLBACKS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_node_deep_cloned() {
    NODES_DEEP_CLONED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (transactions) -----
pub fn record_txn_command() {
    TXN_COMMANDS_EXECUTED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_txn_undo() {
    TXN_UNDOS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_txn_redo() {
    TXN_REDOS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_bulk_unwind() {
    BULK_UNWINDS.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        trie_inserts_new: TRIE_INSERTS_NEW.load(Ordering::Relaxed),
        trie_insert_overwrites: TRIE_INSERT_OVERWRITES.load(Ordering::Relaxed),
        trie_deletes: TRIE_DELETES.load(Ordering::Relaxed),
        trie_delete_misses: TRIE_DELETE_MISSES.load(Ordering::Relaxed),
        trie_search_hits: TRIE_SEARCH_HITS.load(Ordering::Relaxed),
        trie_search_misses: TRIE_SEARCH_MISSES.load(Ordering::Relaxed),

        prefix_scans: PREFIX_SCANS.load(Ordering::Relaxed),
        autocomplete_queries: AUTOCOMPLETE_QUERIES.load(Ordering::Relaxed),

        history_pushes: HISTORY_PUSHES.load(Ordering::Relaxed),
        node_rollbacks: NODE_ROLLBACKS.load(Ordering::Relaxed),

        checkpoints_created: CHECKPOINTS_CREATED.load(Ordering::Relaxed),
        checkpoints_evicted: CHECKPOINTS_EVICTED.load(Ordering::Relaxed),
        checkpoint_rollbacks: CHECKPOINT_ROLLBACKS.load(Ordering::Relaxed),
        nodes_deep_cloned: NODES_DEEP_CLONED.load(Ordering::Relaxed),

        txn_commands_executed: TXN_COMMANDS_EXECUTED.load(Ordering::Relaxed),
        txn_undos: TXN_UNDOS.load(Ordering::Relaxed),
        txn_redos: TXN_REDOS.load(Ordering::Relaxed),
        bulk_unwinds: BULK_UNWINDS.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    TRIE_INSERTS_NEW.store(0, Ordering::Relaxed);
    TRIE_INSERT_OVERWRITES.store(0, Ordering::Relaxed);
    TRIE_DELETES.store(0, Ordering::Relaxed);
    TRIE_DELETE_MISSES.store(0, Ordering::Relaxed);
    TRIE_SEARCH_HITS.store(0, Ordering::Relaxed);
    TRIE_SEARCH_MISSES.store(0, Ordering::Relaxed);

    PREFIX_SCANS.store(0, Ordering::Relaxed);
    AUTOCOMPLETE_QUERIES.store(0, Ordering::Relaxed);

    HISTORY_PUSHES.store(0, Ordering::Relaxed);
    NODE_ROLLBACKS.store(0, Ordering::Relaxed);

    CHECKPOINTS_CREATED.store(0, Ordering::Relaxed);
    CHECKPOINTS_EVICTED.store(0, Ordering::Relaxed);
    CHECKPOINT_ROLLBACKS.store(0, Ordering::Relaxed);
    NODES_DEEP_CLONED.store(0, Ordering::Relaxed);

    TXN_COMMANDS_EXECUTED.store(0, Ordering::Relaxed);
    TXN_UNDOS.store(0, Ordering::Relaxed);
    TXN_REDOS.store(0, Ordering::Relaxed);
    BULK_UNWINDS.store(0, Ordering::Relaxed);
}
