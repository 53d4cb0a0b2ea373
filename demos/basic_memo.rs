use memokit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cache = LruCache::new(2)?;

    cache.get_or_compute("alpha", || expensive_len("alpha"));
    cache.get_or_compute("beta", || expensive_len("beta"));
    println!("hit alpha: {}", cache.get_or_compute("alpha", || unreachable!()));
    cache.get_or_compute("gamma", || expensive_len("gamma"));
    println!("contains beta? {}", cache.contains("beta"));

    let mut distance = Memoized::with_capacity(
        |&(x, y): &(i64, i64)| ((x * x + y * y) as f64).sqrt(),
        DEFAULT_CAPACITY,
    )?;
    distance.call((3, 4));
    distance.call((3, 4));
    println!("distance cache: {:?}", distance.cache_info());

    Ok(())
}

fn expensive_len(s: &str) -> usize {
    println!("computing {s}");
    s.len()
}

// Expected output:
// computing alpha
// computing beta
// hit alpha: 5
// computing gamma
// contains beta? false
// distance cache: CacheStats { hits: 1, misses: 1, capacity: 128, current_size: 1 }
//
// Explanation: capacity=2; the hit on "alpha" makes it MRU, so inserting
// "gamma" evicts "beta". Run with RUST_LOG=memokit=trace to see evictions.
