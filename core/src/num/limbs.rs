//! Unsigned arithmetic on magnitudes stored as big-endian `u32` limbs
//! (most significant limb first).
//!
//! Functions that return a `Vec<u32>` always return it in canonical form,
//! i.e. without leading zero limbs. Inputs may carry leading zeros unless
//! stated otherwise.

use std::cmp::Ordering;

pub(crate) const LIMB_BITS: usize = 32;

#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
pub(crate) const fn truncate(n: u64) -> u32 {
    n as u32
}

/// Computes `a * b + carry` exactly, returning `(high, low)`.
pub(crate) fn mul_with_carry(a: u32, b: u32, carry: u32) -> (u32, u32) {
    let wide = u64::from(a) * u64::from(b) + u64::from(carry);
    (truncate(wide >> 32), truncate(wide))
}

/// Computes `a * b + addend + carry` exactly, returning `(high, low)`.
/// The result always fits in 64 bits.
pub(crate) fn mul_add_with_carry(a: u32, b: u32, addend: u32, carry: u32) -> (u32, u32) {
    let wide = u64::from(a) * u64::from(b) + u64::from(addend) + u64::from(carry);
    (truncate(wide >> 32), truncate(wide))
}

pub(crate) fn strip_leading_zeros(mag: &[u32]) -> &[u32] {
    let start = mag.iter().position(|&limb| limb != 0).unwrap_or(mag.len());
    &mag[start..]
}

pub(crate) fn trim(mut mag: Vec<u32>) -> Vec<u32> {
    let start = mag.iter().position(|&limb| limb != 0).unwrap_or(mag.len());
    if start != 0 {
        mag.drain(..start);
    }
    mag
}

pub(crate) fn from_u64(n: u64) -> Vec<u32> {
    trim(vec![truncate(n >> 32), truncate(n)])
}

/// Unsigned comparison. A shorter (stripped) magnitude is always smaller.
pub(crate) fn cmp(x: &[u32], y: &[u32]) -> Ordering {
    let x = strip_leading_zeros(x);
    let y = strip_leading_zeros(y);
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

pub(crate) fn add(x: &[u32], y: &[u32]) -> Vec<u32> {
    let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };
    let offset = long.len() - short.len();
    let mut result = Vec::with_capacity(long.len() + 1);
    result.extend_from_slice(long);
    let mut carry = 0;
    for i in (0..result.len()).rev() {
        let addend = if i >= offset { short[i - offset] } else { 0 };
        if i < offset && carry == 0 {
            break;
        }
        let sum = u64::from(result[i]) + u64::from(addend) + carry;
        result[i] = truncate(sum);
        carry = sum >> 32;
    }
    if carry != 0 {
        result.insert(0, truncate(carry));
    }
    trim(result)
}

/// Computes `big - little`. The caller guarantees `big >= little`.
pub(crate) fn sub(big: &[u32], little: &[u32]) -> Vec<u32> {
    let big = strip_leading_zeros(big);
    let little = strip_leading_zeros(little);
    debug_assert!(cmp(big, little) != Ordering::Less, "magnitude would be negative");
    let offset = big.len() - little.len();
    let mut result = big.to_vec();
    let mut borrow = false;
    for i in (0..result.len()).rev() {
        if i < offset && !borrow {
            break;
        }
        let subtrahend = if i >= offset { little[i - offset] } else { 0 };
        let (diff, b1) = result[i].overflowing_sub(subtrahend);
        let (diff, b2) = diff.overflowing_sub(u32::from(borrow));
        result[i] = diff;
        borrow = b1 || b2;
    }
    debug_assert!(!borrow);
    trim(result)
}

/// Computes `limbs = limbs * multiplier + addend` in place and returns the
/// carry out of the most significant limb.
pub(crate) fn mul_add_limb(limbs: &mut [u32], multiplier: u32, addend: u32) -> u32 {
    let mut carry = 0;
    for limb in limbs.iter_mut().rev() {
        let (high, low) = mul_with_carry(*limb, multiplier, carry);
        *limb = low;
        carry = high;
    }
    let product_carry = carry;
    let mut carry = addend;
    for limb in limbs.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let (sum, overflowed) = limb.overflowing_add(carry);
        *limb = sum;
        carry = u32::from(overflowed);
    }
    product_carry + carry
}

/// Divides by a single nonzero limb, returning `(quotient, remainder)`.
pub(crate) fn divide_by_limb(mag: &[u32], divisor: u32) -> (Vec<u32>, u32) {
    debug_assert_ne!(divisor, 0);
    let divisor = u64::from(divisor);
    let mut quotient = Vec::with_capacity(mag.len());
    let mut rem = 0;
    for &limb in mag {
        let current = rem << 32 | u64::from(limb);
        quotient.push(truncate(current / divisor));
        rem = current % divisor;
    }
    (trim(quotient), truncate(rem))
}

/// Shifts left by `shift` bits.
pub(crate) fn shl(mag: &[u32], shift: usize) -> Vec<u32> {
    let mag = strip_leading_zeros(mag);
    if mag.is_empty() {
        return vec![];
    }
    let limb_shift = shift / LIMB_BITS;
    let bit_shift = shift % LIMB_BITS;
    let mut result = Vec::with_capacity(mag.len() + limb_shift + 1);
    if bit_shift == 0 {
        result.extend_from_slice(mag);
    } else {
        let high = mag[0] >> (LIMB_BITS - bit_shift);
        if high != 0 {
            result.push(high);
        }
        for (i, &limb) in mag.iter().enumerate() {
            let next = mag.get(i + 1).copied().unwrap_or(0);
            result.push(limb << bit_shift | next >> (LIMB_BITS - bit_shift));
        }
    }
    result.resize(result.len() + limb_shift, 0);
    result
}

/// Shifts right by `shift` bits, discarding the bits shifted out.
pub(crate) fn shr(mag: &[u32], shift: usize) -> Vec<u32> {
    let mag = strip_leading_zeros(mag);
    let limb_shift = shift / LIMB_BITS;
    let bit_shift = shift % LIMB_BITS;
    if limb_shift >= mag.len() {
        return vec![];
    }
    let kept = &mag[..mag.len() - limb_shift];
    if bit_shift == 0 {
        return kept.to_vec();
    }
    let mut result = Vec::with_capacity(kept.len());
    let mut prev = 0;
    for &limb in kept {
        result.push(prev << (LIMB_BITS - bit_shift) | limb >> bit_shift);
        prev = limb;
    }
    trim(result)
}

/// Multiplies by `B^n` where `B = 2^32`.
pub(crate) fn shl_limbs(mag: &[u32], n: usize) -> Vec<u32> {
    let mag = strip_leading_zeros(mag);
    if mag.is_empty() {
        return vec![];
    }
    let mut result = Vec::with_capacity(mag.len() + n);
    result.extend_from_slice(mag);
    result.resize(mag.len() + n, 0);
    result
}

/// The `n` least significant limbs, stripped.
pub(crate) fn lower(mag: &[u32], n: usize) -> &[u32] {
    if mag.len() <= n {
        strip_leading_zeros(mag)
    } else {
        strip_leading_zeros(&mag[mag.len() - n..])
    }
}

/// Everything above the `n` least significant limbs, i.e. `mag / B^n`.
pub(crate) fn upper(mag: &[u32], n: usize) -> &[u32] {
    if mag.len() <= n {
        &[]
    } else {
        strip_leading_zeros(&mag[..mag.len() - n])
    }
}
