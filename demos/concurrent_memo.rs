use std::thread;
use std::time::Duration;

use memokit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cache: ConcurrentLruCache<u32, String> = MemoBuilder::new(8).build_concurrent()?;

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let cache = cache.clone();
            thread::spawn(move || {
                for key in 0..12u32 {
                    let page = cache.get_or_compute(key % 6, || {
                        thread::sleep(Duration::from_millis(5));
                        format!("page-{}", key % 6)
                    });
                    if key == 0 {
                        println!("worker {id} got {page}");
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            eprintln!("worker panicked");
        }
    }

    // 6 distinct keys fit in capacity 8, so each is computed exactly once.
    let stats = cache.stats();
    println!(
        "hits={} misses={} size={}/{} hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.current_size,
        stats.capacity,
        stats.hit_rate()
    );
    Ok(())
}
