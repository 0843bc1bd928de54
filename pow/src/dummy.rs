use numext_fixed_hash::H256;

use crate::types::{Header, RawHeader, Seal};
use crate::{BlockNumber, PowEngine};

/// Mocking dummy PoW engine: every header verifies and every nonce seals,
/// with a zero mix. Used by dev chains and fast miner tests.
pub struct DummyPowEngine;

impl PowEngine for DummyPowEngine {
    fn init(&self, _number: BlockNumber) {}

    fn verify(&self, _header: &Header) -> bool {
        true
    }

    fn solve(&self, _header: &RawHeader, nonce: u64) -> Option<Seal> {
        Some(Seal::new(nonce, H256::zero()))
    }
}
