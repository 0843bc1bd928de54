//! Epoch cache construction.
//!
//! The cache is the small seed-derived buffer from which dataset elements
//! are recomputed during light verification. Rows are 64-byte hashes: the
//! first is Keccak-512 of the seed, each next row hashes the previous one,
//! and three RandMemoHash passes then rewrite every row from its left
//! neighbor and a pseudorandomly chosen partner. The passes mutate the
//! buffer sequentially in place; a row rewritten earlier in a pass is read
//! in its new form by later rows.

use byteorder::{ByteOrder, LittleEndian};
use ethash_hash::keccak_512;
use numext_fixed_hash::H256;

use crate::params::{cache_size, seed_hash, CACHE_ROUNDS, EPOCH_LENGTH, HASH_BYTES};

/// Fill `data` with the cache derived from `seed`. The buffer length must
/// be a non-zero multiple of 64 bytes.
pub fn generate_cache(data: &mut [u8], seed: &H256) {
    assert!(
        !data.is_empty() && data.len() % HASH_BYTES == 0,
        "cache length must be a non-zero multiple of {}",
        HASH_BYTES
    );
    let n = data.len() / HASH_BYTES;

    let first = keccak_512(seed.as_bytes());
    data[..HASH_BYTES].copy_from_slice(&first);
    for i in 1..n {
        let (prev, rest) = data.split_at_mut(i * HASH_BYTES);
        let row = keccak_512(&prev[(i - 1) * HASH_BYTES..]);
        rest[..HASH_BYTES].copy_from_slice(&row);
    }

    let mut mixed = [0u8; HASH_BYTES];
    for _ in 0..CACHE_ROUNDS {
        for i in 0..n {
            let partner = (LittleEndian::read_u32(&data[i * HASH_BYTES..]) as usize % n) * HASH_BYTES;
            let neighbor = ((i + n - 1) % n) * HASH_BYTES;
            for j in 0..HASH_BYTES {
                mixed[j] = data[neighbor + j] ^ data[partner + j];
            }
            let row = keccak_512(mixed);
            data[i * HASH_BYTES..(i + 1) * HASH_BYTES].copy_from_slice(&row);
        }
    }
}

/// One epoch's cache. Built once, then shared read-only behind `Arc` by
/// every verification that lands in the epoch.
pub struct Cache {
    epoch: u64,
    data: Vec<u8>,
}

impl Cache {
    /// Build the consensus cache for `epoch`.
    pub fn build(epoch: u64) -> Cache {
        let number = epoch * EPOCH_LENGTH;
        let mut data = vec![0u8; cache_size(number) as usize];
        generate_cache(&mut data, &seed_hash(number));
        Cache { epoch, data }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(epoch: u64, data: Vec<u8>) -> Cache {
        Cache { epoch, data }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethash_hash::keccak_256;
    use proptest::prelude::*;

    // 1 KiB cache grown from a zero seed; the digests pin the whole buffer.
    #[test]
    fn small_cache_from_zero_seed() {
        let mut data = vec![0u8; 1024];
        generate_cache(&mut data, &H256::zero());

        let mut row0 = [0u8; 64];
        faster_hex::hex_decode(
            b"7ce2991c951f7bf4c4c1bb119887ee07871eb5339d7b97b8588e85c742de90e5\
              bafd5bbe6ce93a134fb6be9ad3e30db99d9528a2ea7846833f52e9ca119b6b54",
            &mut row0,
        )
        .unwrap();
        assert_eq!(&data[..64], &row0[..]);

        assert_eq!(
            faster_hex::hex_string(&keccak_256(&data)).unwrap(),
            "92591c70a0fb6058340313346356b789f333ae1e1eb20ae12e005ad5e922a2ac"
        );
    }

    #[test]
    #[should_panic(expected = "multiple of 64")]
    fn rejects_unaligned_buffer() {
        let mut data = vec![0u8; 96];
        generate_cache(&mut data, &H256::zero());
    }

    proptest! {
        #[test]
        fn deterministic_for_any_seed(seed in any::<[u8; 32]>(), rows in 4usize..32) {
            let seed = H256::from(seed);
            let mut a = vec![0u8; rows * HASH_BYTES];
            let mut b = vec![0u8; rows * HASH_BYTES];
            generate_cache(&mut a, &seed);
            generate_cache(&mut b, &seed);
            prop_assert_eq!(a, b);
        }
    }
}
