//! Lookup-structure benchmark.
//!
//! Measures the average time of a successful key lookup in three structures
//! at increasing key counts:
//!
//! - `BTreeMap`: ordered tree, the shape of the date index
//! - `HashMap`: hash table, the shape of the name indices
//! - sorted `Vec` + binary search: a perfectly balanced search tree laid
//!   out flat
//!
//! Keys are inserted in shuffled order and looked up in a second, independent
//! shuffle. Results are written as a whitespace-separated table:
//!
//! ```text
//! Average lookup times in: nanoseconds
//!
//! BTreeMap HashMap SortedVec
//! 41.2 18.9 35.7
//! ...
//! ```
//!
//! The three header lines are fixed, so plotting tools can skip them and read
//! one row per measured size.

use std::collections::{BTreeMap, HashMap};
use std::hint::black_box;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::bail;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::BenchConfig;

/// Title line of the results file.
pub const RESULTS_TITLE: &str = "Average lookup times in: nanoseconds";

/// Column-name line of the results file.
pub const RESULTS_COLUMNS: &str = "BTreeMap HashMap SortedVec";

/// Average lookup time per structure for one key count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupTimes {
    /// Number of keys inserted and looked up.
    pub keys: usize,
    pub btree_ns: f64,
    pub hash_ns: f64,
    pub sorted_vec_ns: f64,
}

/// Key counts measured for the given parameters.
pub fn sizes(params: &BenchConfig) -> anyhow::Result<Vec<usize>> {
    if params.step == 0 {
        bail!("benchmark step must be greater than zero");
    }
    if params.start == 0 || params.start > params.stop {
        bail!(
            "benchmark range {}..={} is empty or starts at zero",
            params.start,
            params.stop
        );
    }
    Ok((params.start..=params.stop).step_by(params.step).collect())
}

/// Run the benchmark for every size in `params`.
///
/// `progress` receives `(sizes_done, sizes_total)` after each size.
pub fn run(
    params: &BenchConfig,
    progress: Option<&dyn Fn(u64, u64)>,
) -> anyhow::Result<Vec<LookupTimes>> {
    let sizes = sizes(params)?;
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        sizes = sizes.len(),
        start = params.start,
        stop = params.stop,
        step = params.step,
        "Running lookup benchmark"
    );

    let total = sizes.len() as u64;
    let mut results = Vec::with_capacity(sizes.len());
    for (done, &n) in sizes.iter().enumerate() {
        let times = measure(n, &mut rng);
        debug!(?times, "Measured");
        results.push(times);
        if let Some(cb) = progress {
            cb(done as u64 + 1, total);
        }
    }
    Ok(results)
}

/// Measure all three structures with `n` keys.
pub fn measure(n: usize, rng: &mut StdRng) -> LookupTimes {
    let mut insert_keys: Vec<u64> = (0..n as u64).collect();
    insert_keys.shuffle(rng);
    let mut find_keys = insert_keys.clone();
    find_keys.shuffle(rng);

    let btree: BTreeMap<u64, u64> = insert_keys.iter().map(|&k| (k, k)).collect();
    let btree_ns = average_ns(&find_keys, |k| btree.get(&k).copied());

    let hash: HashMap<u64, u64> = insert_keys.iter().map(|&k| (k, k)).collect();
    let hash_ns = average_ns(&find_keys, |k| hash.get(&k).copied());

    let mut sorted: Vec<(u64, u64)> = insert_keys.iter().map(|&k| (k, k)).collect();
    sorted.sort_unstable_by_key(|&(k, _)| k);
    let sorted_vec_ns = average_ns(&find_keys, |k| {
        sorted
            .binary_search_by_key(&k, |&(key, _)| key)
            .ok()
            .map(|i| sorted[i].1)
    });

    LookupTimes {
        keys: n,
        btree_ns,
        hash_ns,
        sorted_vec_ns,
    }
}

fn average_ns(keys: &[u64], lookup: impl Fn(u64) -> Option<u64>) -> f64 {
    if keys.is_empty() {
        return 0.0;
    }
    let start = Instant::now();
    for &k in keys {
        black_box(lookup(black_box(k)));
    }
    start.elapsed().as_nanos() as f64 / keys.len() as f64
}

/// Write results in the three-column text format.
pub fn write_results(results: &[LookupTimes], path: &Path) -> anyhow::Result<()> {
    let mut out = BufWriter::new(std::fs::File::create(path)?);
    writeln!(out, "{RESULTS_TITLE}")?;
    writeln!(out)?;
    writeln!(out, "{RESULTS_COLUMNS}")?;
    for r in results {
        writeln!(out, "{} {} {}", r.btree_ns, r.hash_ns, r.sorted_vec_ns)?;
    }
    out.flush()?;
    info!(path = %path.display(), rows = results.len(), "Wrote lookup results");
    Ok(())
}
