//! Bit-level queries, answered in terms of the two's-complement view of a
//! value. Each derived quantity is computed at most once per instance.

use std::sync::OnceLock;

use crate::num::bigint::BigInteger;
use crate::num::limbs::LIMB_BITS;

/// Lazily computed per-instance values. The value they describe never
/// changes, so a cell is never reset once filled.
#[derive(Debug, Default)]
pub(crate) struct Memo {
    bit_length: OnceLock<u64>,
    bit_count: OnceLock<u64>,
    lowest_set_bit: OnceLock<Option<u64>>,
    /// Index of the first nonzero limb, counting from the least significant.
    first_nonzero_limb: OnceLock<usize>,
}

pub(crate) fn magnitude_bit_length(mag: &[u32]) -> u64 {
    match mag.iter().position(|&limb| limb != 0) {
        None => 0,
        Some(top) => {
            let limbs = (mag.len() - top) as u64;
            (limbs - 1) * LIMB_BITS as u64 + u64::from(u32::BITS - mag[top].leading_zeros())
        }
    }
}

fn is_power_of_two(mag: &[u32]) -> bool {
    match mag.split_first() {
        Some((top, rest)) => top.is_power_of_two() && rest.iter().all(|&limb| limb == 0),
        None => false,
    }
}

impl BigInteger {
    /// The number of bits in the minimal two's-complement representation,
    /// excluding the sign bit.
    ///
    /// For positive values this is the ordinary binary length. A negative
    /// power of two needs one bit less than its magnitude: `-2^k` has
    /// bit length `k`.
    pub fn bit_length(&self) -> u64 {
        *self.memo().bit_length.get_or_init(|| {
            let mag = self.magnitude();
            let len = magnitude_bit_length(mag);
            if self.is_negative() && is_power_of_two(mag) {
                len - 1
            } else {
                len
            }
        })
    }

    /// The number of bits in the two's-complement representation that differ
    /// from the sign bit.
    pub fn bit_count(&self) -> u64 {
        *self.memo().bit_count.get_or_init(|| {
            let ones: u64 = self
                .magnitude()
                .iter()
                .map(|limb| u64::from(limb.count_ones()))
                .sum();
            match self.lowest_set_bit() {
                // -x == !(x - 1): the borrow clears the lowest set bit and sets
                // every zero below it
                Some(trailing_zeros) if self.is_negative() => ones + trailing_zeros - 1,
                _ => ones,
            }
        })
    }

    /// Index of the rightmost one bit, or `None` for zero.
    pub fn lowest_set_bit(&self) -> Option<u64> {
        *self.memo().lowest_set_bit.get_or_init(|| {
            let mag = self.magnitude();
            if mag.is_empty() {
                return None;
            }
            let index = self.first_nonzero_limb();
            let limb = mag[mag.len() - 1 - index];
            Some(index as u64 * LIMB_BITS as u64 + u64::from(limb.trailing_zeros()))
        })
    }

    fn first_nonzero_limb(&self) -> usize {
        *self.memo().first_nonzero_limb.get_or_init(|| {
            self.magnitude()
                .iter()
                .rev()
                .position(|&limb| limb != 0)
                .unwrap_or(0)
        })
    }

    fn magnitude_bit(&self, n: u64) -> bool {
        let mag = self.magnitude();
        let Ok(index) = usize::try_from(n / LIMB_BITS as u64) else {
            return false;
        };
        if index >= mag.len() {
            return false;
        }
        mag[mag.len() - 1 - index] & (1 << (n % LIMB_BITS as u64)) != 0
    }

    /// Whether bit `n` of the two's-complement representation is set.
    /// Negative values have infinitely many leading one bits.
    pub fn test_bit(&self, n: u64) -> bool {
        if !self.is_negative() {
            return self.magnitude_bit(n);
        }
        match self.lowest_set_bit() {
            Some(lowest) if n < lowest => false,
            Some(lowest) if n == lowest => true,
            _ => !self.magnitude_bit(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::num::bigint::BigInteger;

    fn big(n: i64) -> BigInteger {
        BigInteger::value_of(n)
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(big(0).bit_length(), 0);
        assert_eq!(big(1).bit_length(), 1);
        assert_eq!(big(-1).bit_length(), 0);
        assert_eq!(big(255).bit_length(), 8);
        assert_eq!(big(256).bit_length(), 9);
        assert_eq!(big(-256).bit_length(), 8);
        assert_eq!(big(-257).bit_length(), 9);
        for k in 0..63 {
            assert_eq!(big(-(1 << k)).bit_length(), k);
            assert_eq!(big((1 << k) - 1).bit_length(), k);
        }
    }

    #[test]
    fn test_bit_count() {
        assert_eq!(big(0).bit_count(), 0);
        assert_eq!(big(7).bit_count(), 3);
        assert_eq!(big(-1).bit_count(), 0);
        // ...11110
        assert_eq!(big(-2).bit_count(), 1);
        // ...11000
        assert_eq!(big(-8).bit_count(), 3);
        // ...10110
        assert_eq!(big(-10).bit_count(), 2);
        for n in [-1000_i64, -65, 12, 1 << 40, -(1 << 40) - 3] {
            let expected = if n < 0 { (!n).count_ones() } else { n.count_ones() };
            assert_eq!(big(n).bit_count(), u64::from(expected), "{}", n);
        }
    }

    #[test]
    fn test_lowest_set_bit() {
        assert_eq!(big(0).lowest_set_bit(), None);
        assert_eq!(big(1).lowest_set_bit(), Some(0));
        assert_eq!(big(-12).lowest_set_bit(), Some(2));
        assert_eq!(big(1 << 40).lowest_set_bit(), Some(40));
    }

    #[test]
    fn test_test_bit() {
        for n in [0_i64, 5, -5, -1, -8, 1 << 33, -(1 << 33) + 7, i64::MIN + 1] {
            let value = big(n);
            for bit in 0..64 {
                assert_eq!(value.test_bit(bit), (n >> bit) & 1 == 1, "{} bit {}", n, bit);
            }
            assert_eq!(value.test_bit(1000), n < 0);
        }
    }

    #[test]
    fn values_are_cached() {
        let value = big(-96);
        assert_eq!(value.bit_length(), 7);
        assert_eq!(value.bit_length(), 7);
        let shared = value.clone();
        assert_eq!(shared.lowest_set_bit(), Some(5));
        // ...10100000
        assert_eq!(shared.bit_count(), 6);
    }
}
