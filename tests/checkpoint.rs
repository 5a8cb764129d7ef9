use anyhow::Result;
use serde_json::json;

use Trellis::{Trie, TrieConfig};

#[test]
fn checkpoint_roundtrip_restores_exact_state() -> Result<()> {
    let trie = Trie::new();
    trie.insert("original", json!("value1"))?;

    let id = trie.create_checkpoint();
    trie.insert("new", json!("value2"))?;
    trie.delete("original")?;
    assert!(!trie.has("original")?);

    assert!(trie.rollback_to_checkpoint(id));
    assert_eq!(trie.search("original")?, Some(json!("value1")));
    assert!(!trie.has("new")?);
    assert_eq!(trie.size(), 1);
    Ok(())
}

#[test]
fn rollback_unknown_checkpoint_is_false() -> Result<()> {
    let trie = Trie::new();
    trie.insert("stays", json!(1))?;
    assert!(!trie.rollback_to_checkpoint(u64::MAX));
    assert!(trie.has("stays")?);
    Ok(())
}

#[test]
fn checkpoint_is_isolated_from_live_mutations() -> Result<()> {
    let trie = Trie::new();
    trie.insert("a", json!("before"))?;
    let id = trie.create_checkpoint();

    // mutate heavily after the checkpoint
    trie.insert("a", json!("after"))?;
    for i in 0..50 {
        trie.insert(&format!("filler{:02}", i), json!(i))?;
    }
    trie.clear();

    assert!(trie.rollback_to_checkpoint(id));
    assert_eq!(trie.search("a")?, Some(json!("before")));
    assert_eq!(trie.size(), 1);
    assert_eq!(trie.get_all_keys(), vec!["a"]);
    Ok(())
}

#[test]
fn rollback_produces_fresh_nodes_reusable_checkpoint() -> Result<()> {
    // rolling back twice from the same checkpoint must work: the stored tree
    // is copied out, never re-attached
    let trie = Trie::new();
    trie.insert("k", json!(1))?;
    let id = trie.create_checkpoint();

    trie.delete("k")?;
    assert!(trie.rollback_to_checkpoint(id));
    trie.insert("extra", json!(2))?;
    assert!(trie.rollback_to_checkpoint(id));
    assert_eq!(trie.get_all_keys(), vec!["k"]);
    assert_eq!(trie.size(), 1);
    Ok(())
}

#[test]
fn retention_evicts_lowest_ids() -> Result<()> {
    let trie = Trie::with_config(TrieConfig::default().with_max_checkpoints(3))?;
    trie.insert("x", json!(1))?;

    let ids: Vec<u64> = (0..5).map(|_| trie.create_checkpoint()).collect();
    assert_eq!(trie.checkpoint_count(), 3);

    let listed = trie.list_checkpoints();
    assert!(!listed.contains_key(&ids[0]), "oldest evicted");
    assert!(!listed.contains_key(&ids[1]), "second oldest evicted");
    for id in &ids[2..] {
        assert!(listed.contains_key(id));
    }
    assert_eq!(trie.latest_checkpoint_id(), Some(ids[4]));
    // evicted checkpoints cannot be rolled back to
    assert!(!trie.rollback_to_checkpoint(ids[0]));
    Ok(())
}

#[test]
fn checkpoint_ids_strictly_increase() -> Result<()> {
    let trie = Trie::new();
    let a = trie.create_checkpoint();
    let b = trie.create_checkpoint();
    let c = trie.create_checkpoint();
    assert!(a < b && b < c);
    Ok(())
}

#[test]
fn list_checkpoints_reports_recorded_sizes() -> Result<()> {
    let trie = Trie::new();
    trie.insert("one", json!(1))?;
    let id1 = trie.create_checkpoint();
    trie.insert("two", json!(2))?;
    trie.insert("three", json!(3))?;
    let id2 = trie.create_checkpoint();

    let listed = trie.list_checkpoints();
    assert_eq!(listed.get(&id1), Some(&1));
    assert_eq!(listed.get(&id2), Some(&3));
    Ok(())
}

#[test]
fn delete_and_clear_checkpoints() -> Result<()> {
    let trie = Trie::new();
    let id = trie.create_checkpoint();
    assert!(trie.delete_checkpoint(id));
    assert!(!trie.delete_checkpoint(id), "second delete misses");
    assert!(!trie.rollback_to_checkpoint(id));

    let a = trie.create_checkpoint();
    let b = trie.create_checkpoint();
    assert_eq!(trie.checkpoint_count(), 2);
    trie.clear_all_checkpoints();
    assert_eq!(trie.checkpoint_count(), 0);
    assert_eq!(trie.latest_checkpoint_id(), None);
    assert!(!trie.rollback_to_checkpoint(a));
    assert!(!trie.rollback_to_checkpoint(b));
    Ok(())
}

#[test]
fn global_version_bumps_only_on_rollback() -> Result<()> {
    let trie = Trie::new();
    trie.insert("k", json!(1))?;
    let id = trie.create_checkpoint();
    let v0 = trie.get_global_version();

    trie.insert("other", json!(2))?;
    assert_eq!(trie.get_global_version(), v0, "checkpoint creation/insert do not bump");

    assert!(trie.rollback_to_checkpoint(id));
    assert_eq!(trie.get_global_version(), v0 + 1);
    Ok(())
}

#[test]
fn rollback_restores_deep_structure() -> Result<()> {
    let trie = Trie::new();
    for key in ["can", "candle", "candy", "cane"] {
        trie.insert(key, json!(key))?;
    }
    let id = trie.create_checkpoint();
    trie.clear();

    assert!(trie.rollback_to_checkpoint(id));
    assert_eq!(trie.get_all_keys(), vec!["can", "candle", "candy", "cane"]);
    assert_eq!(trie.longest_common_prefix(), "can");
    for key in ["can", "candle", "candy", "cane"] {
        assert_eq!(trie.search(key)?, Some(json!(key)));
    }
    Ok(())
}
