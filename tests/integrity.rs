//! Randomized model comparison: a scripted mix of inserts, overwrites and
//! deletes against a BTreeMap reference model, checking point lookups,
//! ordering, size and prefix queries after every batch.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::{json, Value};

use Trellis::Trie;

const BATCHES: usize = 40;
const OPS_PER_BATCH: usize = 50;

fn random_key(rng: &mut oorandom::Rand64) -> String {
    // short alphabet and short keys force heavy path sharing
    let len = 1 + (rng.rand_u64() % 6) as usize;
    (0..len)
        .map(|_| char::from(b'a' + (rng.rand_u64() % 4) as u8))
        .collect()
}

#[test]
fn randomized_ops_match_reference_model() -> Result<()> {
    let mut rng = oorandom::Rand64::new(0xDECAF_BAD);
    let trie = Trie::new();
    let mut model: BTreeMap<String, Value> = BTreeMap::new();

    for batch in 0..BATCHES {
        for _ in 0..OPS_PER_BATCH {
            let key = random_key(&mut rng);
            match rng.rand_u64() % 3 {
                0 | 1 => {
                    let value = json!(rng.rand_u64());
                    trie.insert(&key, value.clone())?;
                    model.insert(key, value);
                }
                _ => {
                    let expected = model.remove(&key).is_some();
                    assert_eq!(
                        trie.delete(&key)?,
                        expected,
                        "delete({}) disagreed in batch {}",
                        key,
                        batch
                    );
                }
            }
        }

        assert_eq!(trie.size(), model.len(), "size diverged in batch {}", batch);

        // full ordered listing matches the model exactly
        let got: Vec<(String, Value)> = trie.search_by_prefix("");
        let want: Vec<(String, Value)> =
            model.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(got, want, "ordered listing diverged in batch {}", batch);

        // spot-check point lookups and a prefix query
        let probe = random_key(&mut rng);
        assert_eq!(trie.search(&probe)?, model.get(&probe).cloned());
        let prefix = "a";
        let keys: Vec<String> = trie
            .search_by_prefix(prefix)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        let want_keys: Vec<String> = model
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        assert_eq!(keys, want_keys, "prefix listing diverged in batch {}", batch);
    }

    // after the churn, pruning must have kept the tree minimal: clearing the
    // model and the trie key-by-key ends at the sentinel root only
    let keys: Vec<String> = model.keys().cloned().collect();
    for key in keys {
        assert!(trie.delete(&key)?);
    }
    assert_eq!(trie.size(), 0);
    assert!(trie.get_all_keys().is_empty());
    assert_eq!(trie.longest_common_prefix(), "");
    Ok(())
}
