//! On-demand dataset element synthesis.
//!
//! The full dataset is never kept resident during verification: any 64-byte
//! element can be recomputed from the epoch cache by folding 256
//! pseudorandomly selected parent rows into a running mix.

use byteorder::{ByteOrder, LittleEndian};
use ethash_hash::keccak_512;

use crate::hashimoto::fnv;
use crate::params::{DATASET_PARENTS, HASH_BYTES, WORD_BYTES};

const HASH_WORDS: usize = HASH_BYTES / WORD_BYTES;

/// Recompute the dataset element at `index` from the cache.
pub fn calc_dataset_item(cache: &[u8], index: u32) -> [u8; HASH_BYTES] {
    let n = cache.len() / HASH_BYTES;

    let row = (index as usize % n) * HASH_BYTES;
    let mut mix = [0u8; HASH_BYTES];
    mix.copy_from_slice(&cache[row..row + HASH_BYTES]);

    let head = LittleEndian::read_u32(&mix) ^ index;
    LittleEndian::write_u32(&mut mix, head);
    mix = keccak_512(mix);

    let mut words = [0u32; HASH_WORDS];
    LittleEndian::read_u32_into(&mix, &mut words);

    let mut parent_words = [0u32; HASH_WORDS];
    for k in 0..DATASET_PARENTS {
        let parent = (fnv(index ^ k, words[k as usize % HASH_WORDS]) as usize % n) * HASH_BYTES;
        LittleEndian::read_u32_into(&cache[parent..parent + HASH_BYTES], &mut parent_words);
        for w in 0..HASH_WORDS {
            words[w] = fnv(words[w], parent_words[w]);
        }
    }

    LittleEndian::write_u32_into(&words, &mut mix);
    keccak_512(mix)
}

/// Materialize a full dataset buffer element by element, for clients that
/// trade memory for lookup speed. The buffer length must be a multiple of
/// 64 bytes.
pub fn generate_dataset(dataset: &mut [u8], cache: &[u8]) {
    assert!(
        dataset.len() % HASH_BYTES == 0,
        "dataset length must be a multiple of {}",
        HASH_BYTES
    );
    for (i, element) in dataset.chunks_exact_mut(HASH_BYTES).enumerate() {
        element.copy_from_slice(&calc_dataset_item(cache, i as u32));
    }
}
