//! Magnitude multiplication: schoolbook, Karatsuba and Toom-Cook-3, with
//! separate squaring variants.
//!
//! All strategies compute the same exact product; the thresholds only decide
//! which one is fastest for a given operand size.

use std::cmp::{max, Ordering};

use crate::num::limbs::{self, mul_add_with_carry, truncate, LIMB_BITS};

/// Operands with fewer limbs than this use schoolbook multiplication.
pub const KARATSUBA_THRESHOLD: usize = 80;
/// Operands with at least this many limbs use Toom-Cook-3.
pub const TOOM_COOK_THRESHOLD: usize = 240;
pub const KARATSUBA_SQUARE_THRESHOLD: usize = 128;
pub const TOOM_COOK_SQUARE_THRESHOLD: usize = 216;

pub(crate) fn multiply(x: &[u32], y: &[u32]) -> Vec<u32> {
    let x = limbs::strip_leading_zeros(x);
    let y = limbs::strip_leading_zeros(y);
    if x.is_empty() || y.is_empty() {
        return vec![];
    }
    let n = max(x.len(), y.len());
    // a single-limb operand gains nothing from splitting
    if n < KARATSUBA_THRESHOLD || x.len() == 1 || y.len() == 1 {
        schoolbook(x, y)
    } else if n < TOOM_COOK_THRESHOLD {
        tracing::trace!(limbs = n, "karatsuba multiply");
        karatsuba(x, y)
    } else {
        tracing::trace!(limbs = n, "toom-cook-3 multiply");
        toom_cook_3(x, y)
    }
}

pub(crate) fn square(x: &[u32]) -> Vec<u32> {
    let x = limbs::strip_leading_zeros(x);
    if x.is_empty() {
        return vec![];
    }
    if x.len() < KARATSUBA_SQUARE_THRESHOLD {
        schoolbook_square(x)
    } else if x.len() < TOOM_COOK_SQUARE_THRESHOLD {
        tracing::trace!(limbs = x.len(), "karatsuba square");
        karatsuba_square(x)
    } else {
        tracing::trace!(limbs = x.len(), "toom-cook-3 square");
        toom_cook_3_square(x)
    }
}

pub(crate) fn schoolbook(x: &[u32], y: &[u32]) -> Vec<u32> {
    let mut z = vec![0; x.len() + y.len()];
    for (i, &yi) in y.iter().enumerate().rev() {
        if yi == 0 {
            continue;
        }
        let mut carry = 0;
        for (j, &xj) in x.iter().enumerate().rev() {
            let k = i + j + 1;
            let (high, low) = mul_add_with_carry(xj, yi, z[k], carry);
            z[k] = low;
            carry = high;
        }
        z[i] = carry;
    }
    limbs::trim(z)
}

/// Schoolbook squaring: every cross product `x[i] * x[j]` with `i < j` is
/// computed once and doubled, then the diagonal squares are added.
pub(crate) fn schoolbook_square(x: &[u32]) -> Vec<u32> {
    let n = x.len();
    let mut z = vec![0; 2 * n];
    for i in (0..n).rev() {
        let xi = x[i];
        if xi == 0 {
            continue;
        }
        let mut carry = 0;
        for j in (i + 1..n).rev() {
            let k = i + j + 1;
            let (high, low) = mul_add_with_carry(x[j], xi, z[k], carry);
            z[k] = low;
            carry = high;
        }
        z[2 * i + 1] = carry;
    }

    for k in 0..z.len() {
        let next = z.get(k + 1).copied().unwrap_or(0);
        z[k] = z[k] << 1 | next >> (LIMB_BITS - 1);
    }

    let mut carry = 0;
    for i in (0..n).rev() {
        let sq = u64::from(x[i]) * u64::from(x[i]);
        let low = u64::from(z[2 * i + 1]) + (sq & 0xffff_ffff) + carry;
        z[2 * i + 1] = truncate(low);
        carry = low >> 32;
        let high = u64::from(z[2 * i]) + (sq >> 32) + carry;
        z[2 * i] = truncate(high);
        carry = high >> 32;
    }
    debug_assert_eq!(carry, 0);
    limbs::trim(z)
}

pub(crate) fn karatsuba(x: &[u32], y: &[u32]) -> Vec<u32> {
    let half = max(x.len(), y.len()).div_ceil(2);
    let (xh, xl) = (limbs::upper(x, half), limbs::lower(x, half));
    let (yh, yl) = (limbs::upper(y, half), limbs::lower(y, half));

    let z2 = multiply(xh, yh);
    let z0 = multiply(xl, yl);
    let z1 = multiply(&limbs::add(xh, xl), &limbs::add(yh, yl));
    let middle = limbs::sub(&limbs::sub(&z1, &z2), &z0);

    let high = limbs::add(&limbs::shl_limbs(&z2, half), &middle);
    limbs::add(&limbs::shl_limbs(&high, half), &z0)
}

pub(crate) fn karatsuba_square(x: &[u32]) -> Vec<u32> {
    let half = x.len().div_ceil(2);
    let (xh, xl) = (limbs::upper(x, half), limbs::lower(x, half));

    let z2 = square(xh);
    let z0 = square(xl);
    let z1 = square(&limbs::add(xh, xl));
    let middle = limbs::sub(&limbs::sub(&z1, &z2), &z0);

    let high = limbs::add(&limbs::shl_limbs(&z2, half), &middle);
    limbs::add(&limbs::shl_limbs(&high, half), &z0)
}

/// The three Toom-Cook slices of `x`, most significant first, for a slice
/// width of `k` limbs.
fn toom_slices(x: &[u32], k: usize) -> (Signed, Signed, Signed) {
    let high = limbs::upper(x, 2 * k);
    let middle = limbs::lower(limbs::upper(x, k), k);
    let low = limbs::lower(x, k);
    (Signed::from(high), Signed::from(middle), Signed::from(low))
}

/// Toom-Cook-3 with evaluation points 0, 1, -1, 2 and infinity, using
/// Bodrato's interpolation sequence.
pub(crate) fn toom_cook_3(x: &[u32], y: &[u32]) -> Vec<u32> {
    let k = max(x.len(), y.len()).div_ceil(3);
    let (a2, a1, a0) = toom_slices(x, k);
    let (b2, b1, b0) = toom_slices(y, k);

    let v0 = a0.mul(&b0);
    let da1 = a2.add(&a0);
    let db1 = b2.add(&b0);
    let vm1 = da1.sub(&a1).mul(&db1.sub(&b1));
    let da1 = da1.add(&a1);
    let db1 = db1.add(&b1);
    let v1 = da1.mul(&db1);
    let v2 = da1
        .add(&a2)
        .shl(1)
        .sub(&a0)
        .mul(&db1.add(&b2).shl(1).sub(&b0));
    let vinf = a2.mul(&b2);

    interpolate(&v0, &v1, &vm1, &v2, &vinf, k)
}

pub(crate) fn toom_cook_3_square(x: &[u32]) -> Vec<u32> {
    let k = x.len().div_ceil(3);
    let (a2, a1, a0) = toom_slices(x, k);

    let v0 = a0.square();
    let da1 = a2.add(&a0);
    let vm1 = da1.sub(&a1).square();
    let da1 = da1.add(&a1);
    let v1 = da1.square();
    let v2 = da1.add(&a2).shl(1).sub(&a0).square();
    let vinf = a2.square();

    interpolate(&v0, &v1, &vm1, &v2, &vinf, k)
}

fn interpolate(v0: &Signed, v1: &Signed, vm1: &Signed, v2: &Signed, vinf: &Signed, k: usize) -> Vec<u32> {
    let t2 = v2.sub(vm1).div3_exact();
    let tm1 = v1.sub(vm1).half_exact();
    let t1 = v1.sub(v0);
    let t2 = t2.sub(&t1).half_exact();
    let t1 = t1.sub(&tm1).sub(vinf);
    let t2 = t2.sub(&vinf.shl(1));
    let tm1 = tm1.sub(&t2);

    let shift = k * LIMB_BITS;
    let result = vinf
        .shl(shift)
        .add(&t2)
        .shl(shift)
        .add(&t1)
        .shl(shift)
        .add(&tm1)
        .shl(shift)
        .add(v0);
    debug_assert!(!result.negative);
    result.mag
}

/// A signed magnitude, only used for Toom-Cook intermediates, which can go
/// negative during evaluation and interpolation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Signed {
    negative: bool,
    mag: Vec<u32>,
}

impl From<&[u32]> for Signed {
    fn from(mag: &[u32]) -> Self {
        Self::new(false, limbs::strip_leading_zeros(mag).to_vec())
    }
}

impl Signed {
    fn new(negative: bool, mag: Vec<u32>) -> Self {
        let negative = negative && !mag.is_empty();
        Self { negative, mag }
    }

    fn add_with_sign(&self, other: &Self, other_negative: bool) -> Self {
        if self.negative == other_negative {
            return Self::new(self.negative, limbs::add(&self.mag, &other.mag));
        }
        match limbs::cmp(&self.mag, &other.mag) {
            Ordering::Equal => Self::default(),
            Ordering::Greater => Self::new(self.negative, limbs::sub(&self.mag, &other.mag)),
            Ordering::Less => Self::new(other_negative, limbs::sub(&other.mag, &self.mag)),
        }
    }

    fn add(&self, other: &Self) -> Self {
        self.add_with_sign(other, other.negative)
    }

    fn sub(&self, other: &Self) -> Self {
        self.add_with_sign(other, !other.negative)
    }

    fn mul(&self, other: &Self) -> Self {
        Self::new(self.negative != other.negative, multiply(&self.mag, &other.mag))
    }

    fn square(&self) -> Self {
        Self::new(false, square(&self.mag))
    }

    fn shl(&self, bits: usize) -> Self {
        Self::new(self.negative, limbs::shl(&self.mag, bits))
    }

    fn half_exact(&self) -> Self {
        debug_assert!(self.mag.last().map_or(true, |limb| limb & 1 == 0));
        Self::new(self.negative, limbs::shr(&self.mag, 1))
    }

    fn div3_exact(&self) -> Self {
        let (quotient, rem) = limbs::divide_by_limb(&self.mag, 3);
        debug_assert_eq!(rem, 0);
        Self::new(self.negative, quotient)
    }
}
