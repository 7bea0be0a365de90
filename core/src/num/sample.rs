use std::iter;

use crate::error::ArbintError;
use crate::num::bigint::{BigInteger, Sign, MAX_MAG_LENGTH};
use crate::num::limbs::LIMB_BITS;
use crate::random::Random;

impl BigInteger {
    /// A uniformly distributed value in `[0, 2^num_bits)`, drawing limbs from
    /// `source` most significant first.
    pub fn random<R: Random + ?Sized>(num_bits: i64, source: &mut R) -> Result<Self, ArbintError> {
        let bits = u64::try_from(num_bits).map_err(|_| ArbintError::NegativeBitCount(num_bits))?;
        let limb_bits = LIMB_BITS as u64;
        let limb_count = bits.div_ceil(limb_bits);
        let num_limbs = usize::try_from(limb_count).map_err(|_| ArbintError::Overflow)?;
        if num_limbs > MAX_MAG_LENGTH {
            return Err(ArbintError::Overflow);
        }
        let mut mag: Vec<u32> = iter::repeat_with(|| source.random_u32())
            .take(num_limbs)
            .collect();
        let excess = limb_count * limb_bits - bits;
        if let Some(top) = mag.first_mut() {
            *top &= u32::MAX >> excess;
        }
        Self::new_checked(Sign::Positive, mag)
    }
}
