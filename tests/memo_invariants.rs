// ==============================================
// MEMOIZING CACHE INVARIANT TESTS (integration)
// ==============================================
//
// Behavioral properties of the public API exercised through random and
// scripted workloads: capacity bound, hit/miss accounting, LRU eviction
// order and the no-mutation guarantee for failed computations.

use std::collections::HashMap;

use memokit::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn resident_keys<V>(cache: &LruCache<u32, V>) -> Vec<u32> {
    cache.iter().map(|(k, _)| *k).collect()
}

// ==============================================
// Capacity Bound
// ==============================================

mod capacity_bound {
    use super::*;

    #[test]
    fn size_never_exceeds_capacity_under_random_workload() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for capacity in [1usize, 2, 7, 64] {
            let mut cache = LruCache::new(capacity).unwrap();
            for _ in 0..5_000 {
                let key: u32 = rng.random_range(0..(capacity as u32 * 3));
                let v = *cache.get_or_compute(key, || key ^ 0xABCD);
                assert_eq!(v, key ^ 0xABCD);
                assert!(cache.len() <= capacity);
            }
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn stats_report_capacity_and_size() {
        let mut cache = LruCache::new(3).unwrap();
        for k in 0..10u32 {
            cache.get_or_compute(k, || k);
        }
        let stats = cache.stats();
        assert_eq!(stats.capacity, 3);
        assert_eq!(stats.current_size, 3);
        assert_eq!(resident_keys(&cache), vec![9, 8, 7]);
    }
}

// ==============================================
// Hit / Miss Accounting
// ==============================================

mod accounting {
    use super::*;

    #[test]
    fn hits_plus_misses_equals_calls() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cache = LruCache::new(16).unwrap();
        let mut calls = 0u64;
        let mut computes = 0u64;
        for _ in 0..2_000 {
            let key: u32 = rng.random_range(0..40);
            cache.get_or_compute(key, || {
                computes += 1;
                key
            });
            calls += 1;
        }
        let stats = cache.stats();
        assert_eq!(stats.lookups(), calls);
        assert_eq!(stats.misses, computes);
    }

    #[test]
    fn evicted_key_is_miss_resident_key_is_hit() {
        let capacity = 4;
        let mut cache = LruCache::new(capacity).unwrap();
        for k in 0..capacity as u32 {
            cache.get_or_compute(k, || k);
        }
        cache.get_or_compute(3, || unreachable!());
        assert_eq!(cache.stats().hits, 1);

        cache.get_or_compute(100, || 100);
        assert!(!cache.contains(&0));
        let misses_before = cache.stats().misses;
        cache.get_or_compute(0, || 0);
        assert_eq!(cache.stats().misses, misses_before + 1);
    }

    #[test]
    fn matches_recompute_oracle() {
        // Every value handed out must equal a fresh computation.
        let mut rng = StdRng::seed_from_u64(99);
        let mut cache: LruCache<u32, String> = LruCache::new(8).unwrap();
        let oracle = |k: u32| format!("value-{k}");
        let mut seen: HashMap<u32, usize> = HashMap::new();
        for _ in 0..1_000 {
            let key = rng.random_range(0..20);
            *seen.entry(key).or_default() += 1;
            assert_eq!(cache.get_or_compute(key, || oracle(key)), &oracle(key));
        }
        assert!(seen.len() > 8);
    }
}

// ==============================================
// LRU Order
// ==============================================

mod lru_order {
    use super::*;

    #[test]
    fn accessed_key_survives_next_eviction() {
        let mut cache = LruCache::new(2).unwrap();
        let stat = |c: &LruCache<char, u8>| {
            let s = c.stats();
            (s.hits, s.misses, s.capacity, s.current_size)
        };

        cache.get_or_compute('A', || 1);
        assert_eq!(stat(&cache), (0, 1, 2, 1));
        cache.get_or_compute('B', || 2);
        assert_eq!(stat(&cache), (0, 2, 2, 2));
        cache.get_or_compute('A', || 1);
        assert_eq!(stat(&cache), (1, 2, 2, 2));
        cache.get_or_compute('C', || 3);
        assert_eq!(stat(&cache), (1, 3, 2, 2));
        cache.get_or_compute('B', || 2);
        assert_eq!(stat(&cache), (1, 4, 2, 2));
        assert!(!cache.contains(&'A'));
    }

    #[test]
    fn single_capacity_holds_latest_key() {
        let mut cache = LruCache::new(1).unwrap();
        cache.get_or_compute(1u32, || "k1");
        cache.get_or_compute(2u32, || "k2");
        assert_eq!(resident_keys(&cache), vec![2]);
        let before = cache.stats().misses;
        cache.get_or_compute(1, || "k1");
        assert_eq!(cache.stats().misses, before + 1);
    }

    #[test]
    fn peek_lru_names_next_victim() {
        let mut cache = LruCache::new(3).unwrap();
        for k in [5u32, 6, 7] {
            cache.get_or_compute(k, || k);
        }
        cache.get_or_compute(5, || 5);
        let (&victim, _) = cache.peek_lru().unwrap();
        assert_eq!(victim, 6);
        cache.get_or_compute(8, || 8);
        assert!(!cache.contains(&victim));
    }
}

// ==============================================
// Failed Computations
// ==============================================

mod compute_failure {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum FetchError {
        Unavailable(u32),
    }

    #[test]
    fn failure_keeps_contents_order_and_counters() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut cache = LruCache::new(5).unwrap();
        for _ in 0..500 {
            let key: u32 = rng.random_range(0..12);
            let fail = rng.random_bool(0.3);
            let was_resident = cache.contains(&key);
            let before_keys = resident_keys(&cache);
            let before_stats = cache.stats();

            let res = cache.try_get_or_compute(key, || {
                if fail { Err(FetchError::Unavailable(key)) } else { Ok(key * 2) }
            })
            .copied();

            match res {
                Ok(v) => assert_eq!(v, key * 2),
                Err(err) => {
                    assert!(!was_resident);
                    assert_eq!(err, FetchError::Unavailable(key));
                    assert_eq!(resident_keys(&cache), before_keys);
                    assert_eq!(cache.stats(), before_stats);
                },
            }
        }
        cache.check_invariants().unwrap();
    }
}

// ==============================================
// Memoized Functions
// ==============================================

mod memoized {
    use super::*;

    #[test]
    fn composite_key_distinguishes_all_arguments() {
        let mut calls = 0;
        let mut area = Memoized::new(|&(w, h): &(u32, u32)| {
            calls += 1;
            w * h
        });
        assert_eq!(*area.call((2, 3)), 6);
        assert_eq!(*area.call((2, 4)), 8);
        assert_eq!(*area.call((2, 3)), 6);
        let info = area.cache_info();
        assert_eq!((info.hits, info.misses), (1, 2));
        drop(area);
        assert_eq!(calls, 2);
    }

    #[test]
    fn stats_provider_is_uniform() {
        fn lookups(p: &impl StatsProvider) -> u64 {
            p.stats().lookups()
        }

        let mut memo = MemoBuilder::new(4).memoize(|x: &u32| x + 1).unwrap();
        memo.call(1);
        memo.call(1);
        let mut cache = MemoBuilder::new(4).build::<u32, u32>().unwrap();
        cache.get_or_compute(1, || 1);

        assert_eq!(lookups(&memo), 2);
        assert_eq!(lookups(&cache), 1);
    }
}
