//! The Hashimoto mixer.
//!
//! Given the sealed header's pow hash and a nonce, the mixer walks the
//! dataset with 64 data-dependent accesses, folds every fetched pair of
//! elements into a 128-byte mix with the FNV mixer, compresses the mix to
//! 32 bytes and hashes it into the final value compared against the
//! difficulty boundary.
//!
//! The element accessor is a plain function parameter: verification binds
//! it to cache-backed synthesis, full clients may bind it to a materialized
//! dataset, and both must produce identical output.

use byteorder::{ByteOrder, LittleEndian};
use ethash_hash::{keccak_256, keccak_512};
use numext_fixed_hash::H256;

use crate::dataset::calc_dataset_item;
use crate::params::{ACCESSES, FNV_PRIME, HASH_BYTES, MIX_BYTES, WORD_BYTES};

const MIX_WORDS: usize = MIX_BYTES / WORD_BYTES;
const MIX_HASHES: usize = MIX_BYTES / HASH_BYTES;
const SEED_WORDS: usize = HASH_BYTES / WORD_BYTES;

/// Fowler-Noll-Vo derived mixer, in wrapping u32 arithmetic.
pub fn fnv(a: u32, b: u32) -> u32 {
    a.wrapping_mul(FNV_PRIME) ^ b
}

/// Combine pow hash and nonce to the seed preimage, in little endian.
pub fn pow_message(pow_hash: &H256, nonce: u64) -> [u8; 40] {
    let mut message = [0; 40];
    message[0..32].copy_from_slice(pow_hash.as_bytes());
    LittleEndian::write_u64(&mut message[32..40], nonce);
    message
}

/// Run the mixer over a dataset of `full_size` bytes reached through
/// `lookup`. Returns the 32-byte mix digest and the final value.
pub fn hashimoto<F>(pow_hash: &H256, nonce: u64, full_size: u64, lookup: F) -> (H256, H256)
where
    F: Fn(u32) -> [u8; HASH_BYTES],
{
    // Element pairs in the dataset; every access fetches one aligned pair.
    let pairs = (full_size / MIX_BYTES as u64) as u32;

    let seed = keccak_512(pow_message(pow_hash, nonce));
    let seed_head = LittleEndian::read_u32(&seed);
    let mut seed_words = [0u32; SEED_WORDS];
    LittleEndian::read_u32_into(&seed, &mut seed_words);

    let mut mix = [0u32; MIX_WORDS];
    for (i, word) in mix.iter_mut().enumerate() {
        *word = seed_words[i % SEED_WORDS];
    }

    let mut fetched = [0u8; MIX_BYTES];
    let mut fetched_words = [0u32; MIX_WORDS];
    for i in 0..ACCESSES {
        let p = (fnv(i as u32 ^ seed_head, mix[i % MIX_WORDS]) % pairs) * MIX_HASHES as u32;
        for j in 0..MIX_HASHES {
            let element = lookup(p + j as u32);
            fetched[j * HASH_BYTES..(j + 1) * HASH_BYTES].copy_from_slice(&element);
        }
        LittleEndian::read_u32_into(&fetched, &mut fetched_words);
        for w in 0..MIX_WORDS {
            mix[w] = fnv(mix[w], fetched_words[w]);
        }
    }

    let mut compressed = [0u32; MIX_WORDS / 4];
    for (i, quad) in mix.chunks_exact(4).enumerate() {
        compressed[i] = fnv(fnv(fnv(quad[0], quad[1]), quad[2]), quad[3]);
    }
    let mut digest = [0u8; 32];
    LittleEndian::write_u32_into(&compressed, &mut digest);

    let mut preimage = [0u8; 96];
    preimage[..64].copy_from_slice(&seed);
    preimage[64..].copy_from_slice(&digest);
    let value = keccak_256(preimage);

    (H256::from(digest), H256::from(value))
}

/// Hashimoto with elements synthesized from the epoch cache, the mode the
/// verifier runs in.
pub fn hashimoto_light(full_size: u64, cache: &[u8], pow_hash: &H256, nonce: u64) -> (H256, H256) {
    hashimoto(pow_hash, nonce, full_size, |index| {
        calc_dataset_item(cache, index)
    })
}

/// Recompute the final value from the seed and a claimed mix digest,
/// without touching the dataset. A seal whose recovered value already
/// misses the boundary can be rejected before any cache work.
pub fn recover_boundary(pow_hash: &H256, nonce: u64, mix: &H256) -> H256 {
    let seed = keccak_512(pow_message(pow_hash, nonce));
    let mut preimage = [0u8; 96];
    preimage[..64].copy_from_slice(&seed);
    preimage[64..].copy_from_slice(mix.as_bytes());
    H256::from(keccak_256(preimage))
}
