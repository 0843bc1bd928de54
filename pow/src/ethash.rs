use log::debug;
use lru::LruCache;
use numext_fixed_hash::H256;
use numext_fixed_uint::U256;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::boundary::{boundary_to_difficulty, difficulty_to_boundary};
use crate::cache::Cache;
use crate::hashimoto::{hashimoto_light, recover_boundary};
use crate::params::{dataset_size, get_epoch};
use crate::types::{Header, RawHeader, Seal};
use crate::{BlockNumber, PowEngine};

/// Number of recent epoch caches kept resident.
pub const EPOCH_CACHE_SIZE: usize = 6;

/// The Ethash engine: verification and single-nonce sealing over an LRU of
/// recent epoch caches.
///
/// The map holds one `OnceCell` slot per epoch and its lock only covers
/// membership and eviction. A miss inserts an empty slot, releases the
/// lock, and builds into the cell: fetches racing on the same new epoch
/// wait on that one in-flight build, while epochs already resident stay
/// reachable throughout. Slots are `Arc`s, so evicting an epoch never
/// frees a buffer an in-flight computation still reads.
pub struct Ethash {
    caches: Mutex<LruCache<u64, Arc<OnceCell<Cache>>>>,
}

impl Default for Ethash {
    fn default() -> Self {
        Self::new()
    }
}

impl Ethash {
    pub fn new() -> Self {
        Ethash {
            caches: Mutex::new(LruCache::new(EPOCH_CACHE_SIZE)),
        }
    }

    fn cache(&self, epoch: u64) -> Arc<OnceCell<Cache>> {
        self.memoize(epoch, || Cache::build(epoch))
    }

    fn memoize<F: FnOnce() -> Cache>(&self, epoch: u64, build: F) -> Arc<OnceCell<Cache>> {
        let slot = {
            let mut caches = self.caches.lock();
            if let Some(slot) = caches.get(&epoch) {
                Arc::clone(slot)
            } else {
                let slot = Arc::new(OnceCell::new());
                caches.put(epoch, Arc::clone(&slot));
                slot
            }
        };
        // The map lock is released; only fetches of this same epoch wait
        // here, and exactly one of them runs the build.
        slot.get_or_init(build);
        slot
    }

    /// Compute the mix digest and final value for one nonce, synthesizing
    /// dataset elements from the epoch cache of `number`.
    pub fn light_compute(
        &self,
        number: BlockNumber,
        pow_hash: &H256,
        nonce: u64,
    ) -> (H256, H256) {
        let slot = self.cache(get_epoch(number));
        let cache = slot.get().expect("filled on fetch");
        hashimoto_light(dataset_size(number), cache.data(), pow_hash, nonce)
    }
}

impl PowEngine for Ethash {
    fn init(&self, number: BlockNumber) {
        self.cache(get_epoch(number));
    }

    fn verify(&self, header: &Header) -> bool {
        if header.difficulty().is_zero() {
            debug!("difficulty is zero");
            return false;
        }
        let boundary = difficulty_to_boundary(header.difficulty());

        // A zero mix hash carries no commitment, so only the final value is
        // checked.
        let check_mix = header.mix_hash() != &H256::zero();
        if check_mix {
            let recovered = recover_boundary(header.pow_hash(), header.nonce(), header.mix_hash());
            if &boundary_to_difficulty(&recovered) < header.difficulty() {
                debug!(
                    "recovered boundary {:#x} misses difficulty {:#x}",
                    recovered,
                    header.difficulty()
                );
                return false;
            }
        }

        let (mix, value) = self.light_compute(header.number(), header.pow_hash(), header.nonce());
        if check_mix && &mix != header.mix_hash() {
            debug!(
                "mix mismatch: expected {:#x}, got {:#x}",
                header.mix_hash(),
                mix
            );
            return false;
        }

        let value = U256::from_big_endian(value.as_bytes()).expect("bound checked");
        value < boundary
    }

    fn solve(&self, header: &RawHeader, nonce: u64) -> Option<Seal> {
        let boundary = difficulty_to_boundary(header.difficulty());
        let (mix, value) = self.light_compute(header.number(), header.pow_hash(), nonce);
        let value = U256::from_big_endian(value.as_bytes()).expect("bound checked");
        if value < boundary {
            Some(Seal::new(nonce, mix))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn tiny_cache(epoch: u64) -> Cache {
        Cache::from_parts(epoch, vec![epoch as u8; 64])
    }

    #[test]
    fn memoize_builds_once_per_epoch() {
        let ethash = Ethash::new();
        let first = ethash.memoize(5, || tiny_cache(5));
        let second = ethash.memoize(5, || panic!("cache must not be rebuilt"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.get().expect("filled on fetch").epoch(), 5);
    }

    #[test]
    fn racing_fetches_share_one_build() {
        let ethash = Arc::new(Ethash::new());
        let builds = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (ethash, builds) = (Arc::clone(&ethash), Arc::clone(&builds));
                thread::spawn(move || {
                    ethash.memoize(7, || {
                        builds.fetch_add(1, Ordering::SeqCst);
                        tiny_cache(7)
                    })
                })
            })
            .collect();
        let slots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        for slot in &slots[1..] {
            assert!(Arc::ptr_eq(&slots[0], slot));
        }
    }

    #[test]
    fn epoch_caches_are_bounded() {
        let ethash = Ethash::new();
        for epoch in 0..20 {
            ethash.memoize(epoch, || tiny_cache(epoch));
        }
        let mut caches = ethash.caches.lock();
        assert_eq!(caches.len(), EPOCH_CACHE_SIZE);
        // Least recently used epochs are the ones gone.
        assert!(caches.get(&0).is_none());
        assert!(caches.get(&19).is_some());
    }

    #[test]
    fn eviction_leaves_held_handles_intact() {
        let ethash = Ethash::new();
        let held = ethash.memoize(0, || tiny_cache(0));
        for epoch in 1..=20 {
            ethash.memoize(epoch, || tiny_cache(epoch));
        }
        assert!(ethash.caches.lock().get(&0).is_none());
        assert_eq!(held.get().expect("filled on fetch").data(), &[0u8; 64][..]);
    }

    #[test]
    fn recently_used_epoch_survives_eviction() {
        let ethash = Ethash::new();
        for epoch in 0..EPOCH_CACHE_SIZE as u64 {
            ethash.memoize(epoch, || tiny_cache(epoch));
        }
        // Touch epoch 0, then overflow by one: the stale epoch 1 goes.
        ethash.memoize(0, || panic!("cache must not be rebuilt"));
        ethash.memoize(100, || tiny_cache(100));
        let mut caches = ethash.caches.lock();
        assert!(caches.get(&0).is_some());
        assert!(caches.get(&1).is_none());
    }

    #[test]
    fn zero_difficulty_is_rejected_without_cache_work() {
        let ethash = Ethash::new();
        let header = RawHeader::new(0, U256::zero(), H256::from([3u8; 32]))
            .with_seal(Seal::new(1, H256::zero()));
        assert!(!ethash.verify(&header));
        assert_eq!(ethash.caches.lock().len(), 0);
    }

    // With an absurd difficulty the recovered value check fails before any
    // cache is built.
    #[test]
    fn hopeless_seal_is_rejected_without_cache_work() {
        let ethash = Ethash::new();
        let header = RawHeader::new(0, U256::max_value(), H256::from([3u8; 32]))
            .with_seal(Seal::new(1, H256::from([9u8; 32])));
        assert!(!ethash.verify(&header));
        assert_eq!(ethash.caches.lock().len(), 0);
    }

    // Mainnet block 1. Builds the real 16 MiB epoch-0 cache, so it is not
    // part of ordinary test runs.
    #[test]
    #[ignore = "builds the full epoch-0 cache"]
    fn mainnet_block_1() {
        let mut pow_hash = [0u8; 32];
        faster_hex::hex_decode(
            b"85913a3057ea8bec78cd916871ca73802e77724e014dda65add3405d02240eb7",
            &mut pow_hash,
        )
        .unwrap();
        let mut mix_hash = [0u8; 32];
        faster_hex::hex_decode(
            b"969b900de27b6ac6a67742365dd65f55a0526c41fd18e1b16f1a1215c2e66f59",
            &mut mix_hash,
        )
        .unwrap();
        let nonce = 0x539b_d497_9fef_1ec4;
        let difficulty = U256::from(0x3_ff80_0000u64);

        let ethash = Ethash::new();
        let raw = RawHeader::new(1, difficulty, H256::from(pow_hash));

        let (mix, value) = ethash.light_compute(1, raw.pow_hash(), nonce);
        assert_eq!(mix, H256::from(mix_hash));
        assert_eq!(
            faster_hex::hex_string(value.as_bytes()).unwrap(),
            "000000002bc095dd4de049873e6302c3f14a7f2e5b5a1f60cdf1f1798164d610"
        );

        let header = raw.clone().with_seal(Seal::new(nonce, H256::from(mix_hash)));
        assert!(ethash.verify(&header));

        // The same nonce through the sealing path yields the same seal.
        let seal = ethash.solve(&raw, nonce).expect("nonce meets the boundary");
        assert_eq!(seal.mix_hash(), &H256::from(mix_hash));

        // Wrong nonce fails, as does a demand the value cannot meet.
        let wrong_nonce = raw
            .clone()
            .with_seal(Seal::new(nonce + 1, H256::from(mix_hash)));
        assert!(!ethash.verify(&wrong_nonce));

        let absurd = RawHeader::new(1, U256::max_value(), H256::from(pow_hash))
            .with_seal(Seal::new(nonce, H256::from(mix_hash)));
        assert!(!ethash.verify(&absurd));
    }
}
