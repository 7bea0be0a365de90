mod base;
mod bigint;
mod bits;
mod div;
mod limbs;
mod mul;
mod operand;
mod radix;
mod sample;

#[cfg(test)]
mod test_utils;

pub use base::Base;
pub use bigint::{BigInteger, Sign, MAX_MAG_LENGTH};
pub use operand::Operand;

/// Operand sizes, in limbs, at which the arithmetic engines switch
/// algorithms.
pub mod thresholds {
    pub use super::div::{BURNIKEL_ZIEGLER_OFFSET, BURNIKEL_ZIEGLER_THRESHOLD};
    pub use super::mul::{
        KARATSUBA_SQUARE_THRESHOLD, KARATSUBA_THRESHOLD, TOOM_COOK_SQUARE_THRESHOLD,
        TOOM_COOK_THRESHOLD,
    };
    pub use super::radix::SCHOENHAGE_BASE_CONVERSION_THRESHOLD;
}
