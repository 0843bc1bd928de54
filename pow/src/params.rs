//! Epoch parameter derivation.
//!
//! Every size the algorithm depends on is a pure function of the block
//! number: the epoch index selects a seed hash, a cache size and a dataset
//! size, and both sizes are rounded down to a prime number of rows so that
//! the pseudorandom accesses cover the whole buffer.

use ethash_hash::keccak_256;
use numext_fixed_hash::H256;
use serde::{Deserialize, Serialize};

use crate::BlockNumber;

pub const WORD_BYTES: usize = 4;
pub const HASH_BYTES: usize = 64;
pub const MIX_BYTES: usize = 128;
pub const DATASET_PARENTS: u32 = 256;
pub const CACHE_ROUNDS: usize = 3;
pub const ACCESSES: usize = 64;
pub const EPOCH_LENGTH: u64 = 30_000;
pub const DATASET_BYTES_INIT: u64 = 1 << 30;
pub const DATASET_BYTES_GROWTH: u64 = 1 << 23;
pub const CACHE_BYTES_INIT: u64 = 1 << 24;
pub const CACHE_BYTES_GROWTH: u64 = 1 << 17;
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Derived sizes and seed for one epoch, exposed for tools and diagnostics.
#[derive(Clone, Serialize, Deserialize, Eq, PartialEq, Debug)]
pub struct EpochParams {
    pub cache_size: u64,
    pub dataset_size: u64,
    pub seed_hash: H256,
}

/// Epoch index for a block number.
pub fn get_epoch(number: BlockNumber) -> u64 {
    number / EPOCH_LENGTH
}

/// Cache size in bytes for the epoch of `number`; `cache_size / HASH_BYTES`
/// is prime.
pub fn cache_size(number: BlockNumber) -> u64 {
    let epoch = checked_epoch(number);
    let mut size = CACHE_BYTES_INIT + CACHE_BYTES_GROWTH * epoch - HASH_BYTES as u64;
    while !is_prime(size / HASH_BYTES as u64) {
        size -= 2 * HASH_BYTES as u64;
    }
    size
}

/// Full dataset size in bytes for the epoch of `number`;
/// `dataset_size / MIX_BYTES` is prime.
pub fn dataset_size(number: BlockNumber) -> u64 {
    let epoch = checked_epoch(number);
    let mut size = DATASET_BYTES_INIT + DATASET_BYTES_GROWTH * epoch - MIX_BYTES as u64;
    while !is_prime(size / MIX_BYTES as u64) {
        size -= 2 * MIX_BYTES as u64;
    }
    size
}

/// Seed hash for the epoch of `number`: Keccak-256 iterated epoch times
/// over 32 zero bytes.
pub fn seed_hash(number: BlockNumber) -> H256 {
    let mut seed = [0u8; 32];
    for _ in 0..get_epoch(number) {
        seed = keccak_256(seed);
    }
    H256::from(seed)
}

pub fn epoch_params(number: BlockNumber) -> EpochParams {
    EpochParams {
        cache_size: cache_size(number),
        dataset_size: dataset_size(number),
        seed_hash: seed_hash(number),
    }
}

fn checked_epoch(number: BlockNumber) -> u64 {
    let epoch = get_epoch(number);
    // The growth formulas stay within u64 for the first 2^32 epochs only.
    assert!(
        epoch <= u64::from(u32::MAX),
        "block number {} is beyond the supported epoch range",
        number
    );
    epoch
}

/// Trial division by 2 and 3, then by 6k ± 1 up to the square root.
pub(crate) fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    if n % 3 == 0 {
        return n == 3;
    }
    let mut k = 5u64;
    while k.checked_mul(k).map_or(false, |square| square <= n) {
        if n % k == 0 || n % (k + 2) == 0 {
            return false;
        }
        k += 6;
    }
    true
}
