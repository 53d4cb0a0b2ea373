#![no_main]

use libfuzzer_sys::fuzz_target;
use memokit::policy::lru::LruCache;
use std::collections::VecDeque;

// Drives try_get_or_compute with arbitrary keys and failure flags, checking
// order and counters against a VecDeque model (front = most recently used).
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 16) + 1;

    let mut cache: LruCache<u8, u16> = LruCache::new(capacity).unwrap();
    let mut model: VecDeque<u8> = VecDeque::new();
    let (mut hits, mut misses) = (0u64, 0u64);

    for &byte in ops {
        let key = byte & 0x3f;
        let fail = byte & 0x80 != 0;

        let res = cache
            .try_get_or_compute(key, || if fail { Err(()) } else { Ok(u16::from(key) * 3) })
            .copied();

        match model.iter().position(|&k| k == key) {
            Some(pos) => {
                hits += 1;
                model.remove(pos);
                model.push_front(key);
                assert_eq!(res, Ok(u16::from(key) * 3));
            }
            None if fail => assert_eq!(res, Err(())),
            None => {
                misses += 1;
                model.push_front(key);
                if model.len() > capacity {
                    model.pop_back();
                }
                assert_eq!(res, Ok(u16::from(key) * 3));
            }
        }

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (hits, misses));
        assert_eq!(stats.current_size, model.len());
        assert!(cache.iter().map(|(k, _)| *k).eq(model.iter().copied()));
    }

    assert!(cache.check_invariants().is_ok());
});
