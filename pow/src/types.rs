//! Header views consumed by the engine.
//!
//! The verifier is opaque to full header structure: the canonical seal-less
//! encoding and its Keccak-256 pow hash are produced by the encoding layer,
//! and only the fields the proof-of-work touches are carried here.

use numext_fixed_hash::H256;
use numext_fixed_uint::U256;
use serde::{Deserialize, Serialize};

pub use crate::BlockNumber;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
pub struct Seal {
    nonce: u64,
    mix_hash: H256,
}

impl Seal {
    pub fn new(nonce: u64, mix_hash: H256) -> Self {
        Seal { nonce, mix_hash }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn mix_hash(&self) -> &H256 {
        &self.mix_hash
    }

    pub fn destruct(self) -> (u64, H256) {
        let Seal { nonce, mix_hash } = self;
        (nonce, mix_hash)
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
pub struct RawHeader {
    /// Genesis number is 0, child block number is parent block number + 1.
    number: BlockNumber,
    /// Block difficulty.
    difficulty: U256,
    /// Keccak-256 of the canonical seal-less header encoding, supplied by
    /// the encoding layer.
    pow_hash: H256,
}

impl RawHeader {
    pub fn new(number: BlockNumber, difficulty: U256, pow_hash: H256) -> Self {
        RawHeader {
            number,
            difficulty,
            pow_hash,
        }
    }

    pub fn number(&self) -> BlockNumber {
        self.number
    }

    pub fn difficulty(&self) -> &U256 {
        &self.difficulty
    }

    pub fn pow_hash(&self) -> &H256 {
        &self.pow_hash
    }

    pub fn with_seal(self, seal: Seal) -> Header {
        Header { raw: self, seal }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
pub struct Header {
    raw: RawHeader,
    /// proof seal
    seal: Seal,
}

impl Header {
    pub fn raw(&self) -> &RawHeader {
        &self.raw
    }

    pub fn seal(&self) -> &Seal {
        &self.seal
    }

    pub fn number(&self) -> BlockNumber {
        self.raw.number
    }

    pub fn difficulty(&self) -> &U256 {
        &self.raw.difficulty
    }

    pub fn pow_hash(&self) -> &H256 {
        &self.raw.pow_hash
    }

    pub fn nonce(&self) -> u64 {
        self.seal.nonce
    }

    pub fn mix_hash(&self) -> &H256 {
        &self.seal.mix_hash
    }
}
