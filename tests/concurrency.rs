use anyhow::Result;
use serde_json::json;

use Trellis::Trie;

const THREADS: usize = 8;
const KEYS_PER_THREAD: usize = 250;

#[test]
fn concurrent_disjoint_inserts_all_land() -> Result<()> {
    let trie = Trie::new();

    std::thread::scope(|s| {
        for t in 0..THREADS {
            let trie = &trie;
            s.spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("t{:02}-key{:04}", t, i);
                    trie.insert(&key, json!(i)).expect("insert");
                }
            });
        }
    });

    assert_eq!(trie.size(), THREADS * KEYS_PER_THREAD);
    for t in 0..THREADS {
        for i in 0..KEYS_PER_THREAD {
            let key = format!("t{:02}-key{:04}", t, i);
            assert_eq!(trie.search(&key)?, Some(json!(i)), "missing {}", key);
        }
    }
    Ok(())
}

#[test]
fn concurrent_inserts_through_shared_prefix_paths() -> Result<()> {
    // every thread hammers the same interior path, exercising the
    // write-escalate / re-check / downgrade sequence on shared nodes
    let trie = Trie::new();

    std::thread::scope(|s| {
        for t in 0..THREADS {
            let trie = &trie;
            s.spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("shared-prefix-{:04}-{:02}", i, t);
                    trie.insert(&key, json!(t)).expect("insert");
                }
            });
        }
    });

    assert_eq!(trie.size(), THREADS * KEYS_PER_THREAD);
    assert_eq!(
        trie.autocomplete("shared-prefix-", 5)?.len(),
        5,
        "prefix subtree intact"
    );
    Ok(())
}

#[test]
fn concurrent_insert_delete_churn_settles_empty() -> Result<()> {
    let trie = Trie::new();

    std::thread::scope(|s| {
        for t in 0..THREADS {
            let trie = &trie;
            s.spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("churn-{:02}-{:04}", t, i);
                    trie.insert(&key, json!(1)).expect("insert");
                    assert!(trie.delete(&key).expect("delete"), "own key present");
                }
            });
        }
    });

    assert_eq!(trie.size(), 0);
    assert!(trie.get_all_keys().is_empty());
    Ok(())
}

#[test]
fn readers_run_against_writers() -> Result<()> {
    let trie = Trie::new();
    for i in 0..100 {
        trie.insert(&format!("stable-{:03}", i), json!(i))?;
    }

    std::thread::scope(|s| {
        for t in 0..4 {
            let trie = &trie;
            s.spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("writer-{}-{:04}", t, i);
                    trie.insert(&key, json!(i)).expect("insert");
                }
            });
        }
        for _ in 0..4 {
            let trie = &trie;
            s.spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("stable-{:03}", i % 100);
                    assert!(trie.search(&key).expect("search").is_some());
                    let _ = trie.search_by_prefix("stable-");
                    let _ = trie.longest_common_prefix();
                }
            });
        }
    });

    assert_eq!(trie.size(), 100 + 4 * KEYS_PER_THREAD);
    for i in 0..100 {
        assert!(trie.has(&format!("stable-{:03}", i))?);
    }
    Ok(())
}

#[test]
fn checkpoints_taken_during_concurrent_inserts() -> Result<()> {
    // Mid-flight checkpoints observe the documented weak-consistency boundary
    // (writers past the root keep mutating while the clone walks), so this
    // only asserts they can be created and rolled back to. A quiescent
    // checkpoint taken after the writers join must restore exactly.
    let trie = Trie::new();

    std::thread::scope(|s| {
        for t in 0..4 {
            let trie = &trie;
            s.spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("cp-{}-{:04}", t, i);
                    trie.insert(&key, json!(i)).expect("insert");
                }
            });
        }
        s.spawn(|| {
            for _ in 0..5 {
                let id = trie.create_checkpoint();
                assert!(trie.checkpoint_count() > 0);
                assert!(id > 0);
            }
        });
    });

    let quiescent = trie.create_checkpoint();
    trie.insert("post-checkpoint", json!(true))?;
    assert!(trie.rollback_to_checkpoint(quiescent));
    assert_eq!(trie.size(), 4 * KEYS_PER_THREAD);
    assert_eq!(trie.get_all_keys().len(), 4 * KEYS_PER_THREAD);
    assert!(!trie.has("post-checkpoint")?);
    Ok(())
}
