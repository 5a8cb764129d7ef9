use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};
use std::time::Instant;

use Trellis::{metrics, Trie, TrieConfig};

/// Simple deterministic PRNG (SplitMix64). Enough for benches; not
/// cryptographic.
#[derive(Clone)]
struct Rng64 {
    state: u64,
}

impl Rng64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Trellis micro-benchmark CLI
///
/// Examples:
///   trellis_bench --n 200000 --threads 8
///   trellis_bench --n 100000 --value-size 64 --checkpoints 5 --json
#[derive(Parser, Debug)]
#[command(name = "trellis_bench", version, about = "Trellis micro-bench CLI")]
struct Opt {
    /// Total keys to load
    #[arg(long, default_value_t = 100_000)]
    n: usize,

    /// Writer/reader threads for the threaded phases
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Payload string size (bytes)
    #[arg(long, default_value_t = 64)]
    value_size: usize,

    /// Number of prefix-scan queries
    #[arg(long, default_value_t = 10_000)]
    prefix_queries: usize,

    /// Autocomplete result cap per query
    #[arg(long, default_value_t = 10)]
    autocomplete_limit: usize,

    /// Checkpoints to create (and roll back once at the end)
    #[arg(long, default_value_t = 3)]
    checkpoints: usize,

    /// Max retained checkpoints
    #[arg(long, default_value_t = 10)]
    max_checkpoints: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 0xC0FFEE)]
    seed: u64,

    /// Emit a JSON report instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Suppress per-phase output (totals only)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

struct Phase {
    name: &'static str,
    ops: usize,
    secs: f64,
}

impl Phase {
    fn tput(&self) -> f64 {
        if self.secs > 0.0 {
            self.ops as f64 / self.secs
        } else {
            0.0
        }
    }
}

fn bench_key(rng: &mut Rng64, tid: usize) -> String {
    format!("k{:02}-{:016x}", tid, rng.next_u64())
}

fn bench_value(size: usize) -> Value {
    Value::String("v".repeat(size.max(1)))
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::parse();

    let trie = Trie::with_config(
        TrieConfig::default().with_max_checkpoints(opt.max_checkpoints.max(1)),
    )?;
    let threads = opt.threads.max(1);
    let per_thread = opt.n / threads;
    let mut phases: Vec<Phase> = Vec::new();

    // ----- load -----
    let start = Instant::now();
    std::thread::scope(|s| {
        for tid in 0..threads {
            let trie = &trie;
            let value_size = opt.value_size;
            let seed = opt.seed;
            s.spawn(move || {
                let mut rng = Rng64::new(seed ^ (tid as u64).wrapping_mul(0x9E37));
                for _ in 0..per_thread {
                    let key = bench_key(&mut rng, tid);
                    trie.insert(&key, bench_value(value_size))
                        .expect("bench insert");
                }
            });
        }
    });
    phases.push(Phase {
        name: "load",
        ops: per_thread * threads,
        secs: start.elapsed().as_secs_f64(),
    });

    // ----- point gets (hits) -----
    let start = Instant::now();
    let mut hits = 0usize;
    {
        // thread 0 seeded exactly as in the load phase, so every probe hits
        let mut rng = Rng64::new(opt.seed);
        for _ in 0..per_thread {
            let key = bench_key(&mut rng, 0);
            if trie.search(&key)?.is_some() {
                hits += 1;
            }
        }
    }
    phases.push(Phase {
        name: "get_hit",
        ops: per_thread,
        secs: start.elapsed().as_secs_f64(),
    });

    // ----- point gets (misses) -----
    let start = Instant::now();
    {
        let mut rng = Rng64::new(!opt.seed);
        for _ in 0..per_thread {
            let key = format!("miss-{:016x}", rng.next_u64());
            let _ = trie.search(&key)?;
        }
    }
    phases.push(Phase {
        name: "get_miss",
        ops: per_thread,
        secs: start.elapsed().as_secs_f64(),
    });

    // ----- prefix scans + autocomplete -----
    let start = Instant::now();
    let mut yielded = 0usize;
    for i in 0..opt.prefix_queries {
        let prefix = format!("k{:02}", i % threads);
        yielded += trie.autocomplete(&prefix, opt.autocomplete_limit)?.len();
    }
    phases.push(Phase {
        name: "autocomplete",
        ops: opt.prefix_queries,
        secs: start.elapsed().as_secs_f64(),
    });

    // ----- checkpoints -----
    let start = Instant::now();
    let mut last_checkpoint = 0u64;
    for _ in 0..opt.checkpoints.max(1) {
        last_checkpoint = trie.create_checkpoint();
    }
    let rolled_back = trie.rollback_to_checkpoint(last_checkpoint);
    phases.push(Phase {
        name: "checkpoint",
        ops: opt.checkpoints.max(1) + 1,
        secs: start.elapsed().as_secs_f64(),
    });

    let m = metrics::snapshot();

    if opt.json {
        let report = json!({
            "config": {
                "n": opt.n,
                "threads": threads,
                "value_size": opt.value_size,
                "max_checkpoints": opt.max_checkpoints,
            },
            "phases": phases.iter().map(|p| json!({
                "name": p.name,
                "ops": p.ops,
                "secs": p.secs,
                "ops_per_sec": p.tput(),
            })).collect::<Vec<_>>(),
            "size": trie.size(),
            "hits": hits,
            "autocomplete_yielded": yielded,
            "rolled_back": rolled_back,
            "metrics": m,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !opt.quiet {
        for p in &phases {
            println!(
                "[{:>12}] {:>9} ops in {:>7.3}s  ({:>10.0} ops/s)",
                p.name,
                p.ops,
                p.secs,
                p.tput()
            );
        }
    }
    println!("Bench summary:");
    println!("  keys_live              = {}", trie.size());
    println!("  point_hits             = {}", hits);
    println!("  autocomplete_yielded   = {}", yielded);
    println!("  checkpoint_rolled_back = {}", rolled_back);
    println!("Metrics:");
    println!("  inserts_new            = {}", m.trie_inserts_new);
    println!("  insert_overwrites      = {}", m.trie_insert_overwrites);
    println!("  search_hit_ratio       = {:.2}%", m.search_hit_ratio() * 100.0);
    println!("  prefix_scans           = {}", m.prefix_scans);
    println!("  autocomplete_queries   = {}", m.autocomplete_queries);
    println!("  history_pushes         = {}", m.history_pushes);
    println!("  checkpoints_created    = {}", m.checkpoints_created);
    println!("  checkpoints_evicted    = {}", m.checkpoints_evicted);
    println!("  nodes_deep_cloned      = {}", m.nodes_deep_cloned);
    println!(
        "  avg_nodes_per_ckpt     = {:.1}",
        m.avg_nodes_per_checkpoint()
    );

    Ok(())
}
