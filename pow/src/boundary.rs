//! Difficulty boundary arithmetic: `f(x) = floor(2^256 / x)`.
//!
//! A proof is valid when its 32-byte value, read as an unsigned big-endian
//! integer, is strictly below the boundary of the header's difficulty. The
//! division runs through a 512-bit numerator because 2^256 itself does not
//! fit a `U256`; inputs at or below one saturate to the maximum.

use numext_fixed_hash::H256;
use numext_fixed_uint::prelude::UintConvert;
use numext_fixed_uint::{u512, U256, U512};

const ONE: U256 = U256::one();
// ONE << 256
const HSPACE: U512 = u512!("0x10000000000000000000000000000000000000000000000000000000000000000");

pub fn difficulty_to_boundary(difficulty: &U256) -> U256 {
    if difficulty.le(&ONE) {
        U256::max_value()
    } else {
        let (difficulty, _): (U512, bool) = difficulty.convert_into();
        (HSPACE / difficulty).convert_into().0
    }
}

pub fn boundary_to_difficulty(boundary: &H256) -> U256 {
    let boundary: U256 = boundary.into();
    if boundary.le(&ONE) {
        U256::max_value()
    } else {
        let (boundary, _): (U512, bool) = boundary.convert_into();
        (HSPACE / boundary).convert_into().0
    }
}
