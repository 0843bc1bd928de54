//! Ethash proof-of-work.
//!
//! The crate covers the whole light-verification pipeline: epoch parameter
//! derivation, cache construction, on-demand dataset element synthesis, the
//! Hashimoto mixer, and an engine that verifies sealed headers (and seals
//! nonces for the miner) over a bounded set of recent epoch caches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod boundary;
mod cache;
mod dataset;
mod dummy;
mod ethash;
mod hashimoto;
mod params;
mod types;

pub use crate::boundary::{boundary_to_difficulty, difficulty_to_boundary};
pub use crate::cache::{generate_cache, Cache};
pub use crate::dataset::{calc_dataset_item, generate_dataset};
pub use crate::dummy::DummyPowEngine;
pub use crate::ethash::{Ethash, EPOCH_CACHE_SIZE};
pub use crate::hashimoto::{fnv, hashimoto, hashimoto_light, pow_message, recover_boundary};
pub use crate::params::{
    cache_size, dataset_size, epoch_params, get_epoch, seed_hash, EpochParams, ACCESSES,
    CACHE_BYTES_GROWTH, CACHE_BYTES_INIT, CACHE_ROUNDS, DATASET_BYTES_GROWTH, DATASET_BYTES_INIT,
    DATASET_PARENTS, EPOCH_LENGTH, FNV_PRIME, HASH_BYTES, MIX_BYTES, WORD_BYTES,
};
pub use crate::types::{Header, RawHeader, Seal};

/// Consensus block number.
pub type BlockNumber = u64;

/// The PoW engine traits bundled
#[derive(Clone, Serialize, Deserialize, Eq, PartialEq, Hash, Debug)]
#[serde(tag = "func", content = "params")]
pub enum Pow {
    /// Mocking dummy PoW engine
    Dummy,
    /// The Ethash PoW engine
    Ethash,
}

impl fmt::Display for Pow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pow::Dummy => write!(f, "Dummy"),
            Pow::Ethash => write!(f, "Ethash"),
        }
    }
}

impl Pow {
    /// Allocates a new engine instance
    pub fn engine(&self) -> Arc<dyn PowEngine> {
        match *self {
            Pow::Dummy => Arc::new(DummyPowEngine),
            Pow::Ethash => Arc::new(Ethash::new()),
        }
    }

    /// Determine whether this engine is dummy(mocking)
    pub fn is_dummy(&self) -> bool {
        *self == Pow::Dummy
    }
}

/// A trait for PoW engine, bundling verification and single-nonce sealing
pub trait PowEngine: Send + Sync {
    /// Build the epoch cache for `number` ahead of use
    fn init(&self, number: BlockNumber);

    /// Verify a sealed header
    fn verify(&self, header: &Header) -> bool;

    /// Try one nonce against the header; the seal when it meets the boundary
    fn solve(&self, header: &RawHeader, nonce: u64) -> Option<Seal>;
}
