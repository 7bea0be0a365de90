//! Magnitude division: Knuth's Algorithm D for small and unbalanced
//! operands, Burnikel-Ziegler recursive division for large ones.

use std::cmp::Ordering;

use crate::num::bits::magnitude_bit_length;
use crate::num::limbs::{self, truncate, LIMB_BITS};
use crate::num::mul;

/// Divisors with fewer limbs than this always use Knuth division.
pub const BURNIKEL_ZIEGLER_THRESHOLD: usize = 80;
/// Burnikel-Ziegler is only used when the dividend is at least this many
/// limbs longer than the divisor.
pub const BURNIKEL_ZIEGLER_OFFSET: usize = 40;

/// Returns `(quotient, remainder)` of two magnitudes. `b` must be nonzero.
pub(crate) fn divide(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let a = limbs::strip_leading_zeros(a);
    let b = limbs::strip_leading_zeros(b);
    debug_assert!(!b.is_empty(), "division by zero");
    if b.len() < BURNIKEL_ZIEGLER_THRESHOLD
        || a.len().saturating_sub(b.len()) < BURNIKEL_ZIEGLER_OFFSET
    {
        knuth(a, b)
    } else {
        tracing::trace!(
            dividend = a.len(),
            divisor = b.len(),
            "burnikel-ziegler division"
        );
        burnikel_ziegler(a, b)
    }
}

#[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn low_limb(n: i64) -> u32 {
    n as u32
}

/// Knuth, TAOCP vol. 2, section 4.3.1, Algorithm D.
pub(crate) fn knuth(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let a = limbs::strip_leading_zeros(a);
    let b = limbs::strip_leading_zeros(b);
    match limbs::cmp(a, b) {
        Ordering::Less => return (vec![], a.to_vec()),
        Ordering::Equal => return (vec![1], vec![]),
        Ordering::Greater => (),
    }
    if let [divisor] = b {
        let (quotient, rem) = limbs::divide_by_limb(a, *divisor);
        return (quotient, if rem == 0 { vec![] } else { vec![rem] });
    }

    // normalize so the top bit of the divisor is set
    let shift = b[0].leading_zeros() as usize;
    let v = limbs::shl(b, shift);
    debug_assert_eq!(v.len(), b.len());
    let mut u = limbs::shl(a, shift);
    if u.len() == a.len() {
        u.insert(0, 0);
    }

    let n = v.len();
    let m = u.len() - n - 1;
    let v1 = u64::from(v[0]);
    let v2 = u64::from(v[1]);
    let limb_max = u64::from(u32::MAX);
    let mut q = vec![0; m + 1];

    for j in 0..=m {
        let numerator = u64::from(u[j]) << 32 | u64::from(u[j + 1]);
        let mut qhat = numerator / v1;
        let mut rhat = numerator % v1;
        while qhat > limb_max || qhat * v2 > (rhat << 32 | u64::from(u[j + 2])) {
            qhat -= 1;
            rhat += v1;
            if rhat > limb_max {
                break;
            }
        }

        // multiply and subtract qhat * v from the current window
        let mut borrow: i64 = 0;
        for i in (0..n).rev() {
            let product = qhat * u64::from(v[i]);
            let t = i64::from(u[j + 1 + i]) - borrow - i64::from(truncate(product));
            u[j + 1 + i] = low_limb(t);
            borrow = i64::from(truncate(product >> 32)) - (t >> 32);
        }
        let t = i64::from(u[j]) - borrow;
        u[j] = low_limb(t);

        if t < 0 {
            // qhat was one too large: add the divisor back
            qhat -= 1;
            let mut carry = 0;
            for i in (0..n).rev() {
                let sum = u64::from(u[j + 1 + i]) + u64::from(v[i]) + carry;
                u[j + 1 + i] = truncate(sum);
                carry = sum >> 32;
            }
            u[j] = u[j].wrapping_add(truncate(carry));
        }
        q[j] = truncate(qhat);
    }

    (limbs::trim(q), limbs::shr(&u[m + 1..], shift))
}

/// Burnikel and Ziegler, "Fast Recursive Division", MPI-I-98-1-022.
pub(crate) fn burnikel_ziegler(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let a = limbs::strip_leading_zeros(a);
    let b = limbs::strip_leading_zeros(b);
    if limbs::cmp(a, b) == Ordering::Less {
        return (vec![], a.to_vec());
    }

    // block size n = j * m, with m the smallest power of two above r / threshold
    let r = b.len();
    let m = 1_usize << (usize::BITS - (r / BURNIKEL_ZIEGLER_THRESHOLD).leading_zeros());
    let n = r.div_ceil(m) * m;
    let n_bits = n * LIMB_BITS;

    // shift both operands so the divisor fills exactly n limbs with its top bit set
    let sigma = n_bits - bit_length_usize(b);
    let b_shifted = limbs::shl(b, sigma);
    let a_shifted = limbs::shl(a, sigma);
    debug_assert_eq!(b_shifted.len(), n);

    // t blocks hold the dividend plus one extra bit, so the top block is below b
    let t = ((bit_length_usize(&a_shifted) + n_bits) / n_bits).max(2);

    let mut z = limbs::upper(&a_shifted, (t - 2) * n).to_vec();
    let mut quotient = Vec::with_capacity(t * n);
    for i in (1..t - 1).rev() {
        let (qi, ri) = divide_2n_1n(&z, &b_shifted);
        z = limbs::add(&limbs::shl_limbs(&ri, n), block(&a_shifted, i - 1, n));
        push_block(&mut quotient, &qi, n);
    }
    let (qi, ri) = divide_2n_1n(&z, &b_shifted);
    push_block(&mut quotient, &qi, n);

    (limbs::trim(quotient), limbs::shr(&ri, sigma))
}

fn bit_length_usize(mag: &[u32]) -> usize {
    usize::try_from(magnitude_bit_length(mag)).unwrap_or(usize::MAX)
}

/// Block `index` (0 is least significant) of `n` limbs each.
fn block(a: &[u32], index: usize, n: usize) -> &[u32] {
    let below = index * n;
    if below >= a.len() {
        return &[];
    }
    let end = a.len() - below;
    limbs::strip_leading_zeros(&a[end.saturating_sub(n)..end])
}

/// Appends `value` zero-padded to exactly `n` limbs.
fn push_block(quotient: &mut Vec<u32>, value: &[u32], n: usize) {
    debug_assert!(value.len() <= n);
    quotient.resize(quotient.len() + n - value.len(), 0);
    quotient.extend_from_slice(value);
}

/// Divides `a` (at most 2n limbs) by `b` (exactly n limbs, top bit set),
/// requiring `a < b * B^n`.
fn divide_2n_1n(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let n = b.len();
    if n % 2 != 0 || n < BURNIKEL_ZIEGLER_THRESHOLD {
        return knuth(a, b);
    }
    let half = n / 2;

    let (q1, r1) = divide_3n_2n(limbs::upper(a, half), b);
    let (q2, r2) = divide_3n_2n(&limbs::add(&limbs::shl_limbs(&r1, half), limbs::lower(a, half)), b);

    (limbs::add(&limbs::shl_limbs(&q1, half), &q2), r2)
}

/// Divides `a` (at most 3 half-blocks) by `b` (two half-blocks), requiring
/// `a < b * B^(n/2)`.
fn divide_3n_2n(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let half = b.len() / 2;
    let a1 = limbs::upper(a, 2 * half);
    let a12 = limbs::upper(a, half);
    let b1 = limbs::upper(b, half);
    let b2 = limbs::lower(b, half);

    let (mut q, r_hat) = if limbs::cmp(a1, b1) == Ordering::Less {
        divide_2n_1n(a12, b1)
    } else {
        // q = B^half - 1, so r = a12 - q * b1 = a12 + b1 - b1 * B^half
        let q = vec![u32::MAX; half];
        let r = limbs::sub(&limbs::add(a12, b1), &limbs::shl_limbs(b1, half));
        (q, r)
    };

    let d = mul::multiply(&q, b2);
    let mut r = limbs::add(&limbs::shl_limbs(&r_hat, half), limbs::lower(a, half));
    while limbs::cmp(&r, &d) == Ordering::Less {
        r = limbs::add(&r, b);
        q = limbs::sub(&q, &[1]);
    }
    (q, limbs::sub(&r, &d))
}
