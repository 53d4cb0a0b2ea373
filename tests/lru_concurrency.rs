// ==============================================
// CONCURRENT LRU CACHE TESTS (integration)
// ==============================================
//
// Multi-threaded checks for ConcurrentLruCache. Lookups are serialized
// under one write lock, so these tests look for lost counter updates,
// duplicate computations for a resident key and capacity overshoot.

#![cfg(feature = "concurrency")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use memokit::prelude::*;

mod serialization {
    use super::*;

    #[test]
    fn each_key_computed_once_when_it_fits() {
        let cache: ConcurrentLruCache<u64, u64> = ConcurrentLruCache::new(64).unwrap();
        let computes = Arc::new(AtomicUsize::new(0));
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cache = cache.clone();
                let computes = Arc::clone(&computes);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for key in 0..32u64 {
                        let v = cache.get_or_compute(key, || {
                            computes.fetch_add(1, Ordering::Relaxed);
                            key + 1
                        });
                        assert_eq!(*v, key + 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(computes.load(Ordering::Relaxed), 32);
        let stats = cache.stats();
        assert_eq!(stats.misses, 32);
        assert_eq!(stats.hits, (threads as u64 - 1) * 32);
    }

    #[test]
    fn counters_match_call_count_under_contention() {
        let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(10).unwrap();
        let threads = 6u32;
        let per_thread = 400u32;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..per_thread {
                        let key = (i * 13 + t * 5) % 37;
                        let v = cache.get_or_compute(key, || format!("v{key}"));
                        assert_eq!(*v, format!("v{key}"));
                        assert!(cache.len() <= 10);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.lookups(), u64::from(threads * per_thread));
        assert!(stats.current_size <= stats.capacity);
        cache.check_invariants().unwrap();
    }
}

mod failures {
    use super::*;

    #[test]
    fn concurrent_failures_leave_no_entries() {
        let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for key in 0..50u32 {
                        let res = cache.try_get_or_compute(key + t * 100, || Err::<u32, _>(key));
                        assert_eq!(res.unwrap_err(), key);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats {
            hits: 0,
            misses: 0,
            capacity: 4,
            current_size: 0,
        });
    }

    #[test]
    fn panicking_compute_does_not_poison_cache() {
        let cache: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(4).unwrap();
        cache.get_or_compute(1, || 1);

        let worker = cache.clone();
        let joined = thread::spawn(move || {
            worker.get_or_compute(2, || panic!("compute blew up"));
        })
        .join();
        assert!(joined.is_err());

        // parking_lot locks do not poison; the cache stays usable and unchanged.
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains(&2));
        assert_eq!(*cache.get_or_compute(2, || 2), 2);
        cache.check_invariants().unwrap();
    }
}
