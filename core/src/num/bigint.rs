use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::sync::{Arc, OnceLock};

use crate::error::ArbintError;
use crate::num::bits::{magnitude_bit_length, Memo};
use crate::num::limbs::{self, LIMB_BITS};
use crate::num::operand::Operand;
use crate::num::{div, mul};
use crate::result::AResult;

/// The largest number of limbs a magnitude may have, i.e. values are limited
/// to `2^31` bits.
pub const MAX_MAG_LENGTH: usize = (1 << 31) / LIMB_BITS;

const MAX_BITS: u64 = 1 << 31;

/// Magnitudes up to this value are served from a shared table.
const SMALL_VALUE_MAX: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Negative => -1,
            Self::Zero => 0,
            Self::Positive => 1,
        }
    }

    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Zero => Self::Zero,
            Self::Positive => Self::Negative,
        }
    }

    /// The sign of a product of values with signs `self` and `other`.
    #[must_use]
    pub fn product(self, other: Self) -> Self {
        match (self, other) {
            (Self::Zero, _) | (_, Self::Zero) => Self::Zero,
            (a, b) if a == b => Self::Positive,
            _ => Self::Negative,
        }
    }
}

/// An immutable arbitrary-precision signed integer.
///
/// Values are stored as a sign and a canonical big-endian magnitude of
/// `u32` limbs. Cloning is cheap: clones share the same storage, including
/// lazily computed bit-level properties.
#[derive(Clone)]
pub struct BigInteger {
    inner: Arc<Repr>,
}

#[derive(Debug)]
struct Repr {
    sign: Sign,
    mag: Vec<u32>,
    memo: Memo,
}

struct SmallValues {
    positive: [BigInteger; SMALL_VALUE_MAX + 1],
    negative: [BigInteger; SMALL_VALUE_MAX + 1],
}

fn small_values() -> &'static SmallValues {
    static SMALL_VALUES: OnceLock<SmallValues> = OnceLock::new();
    SMALL_VALUES.get_or_init(|| {
        tracing::debug!(max = SMALL_VALUE_MAX, "building small value table");
        let build = |sign: Sign| -> [BigInteger; SMALL_VALUE_MAX + 1] {
            std::array::from_fn(|n| {
                // n is at most SMALL_VALUE_MAX
                let limb = u32::try_from(n).unwrap_or(u32::MAX);
                BigInteger::from_canonical(sign, limbs::trim(vec![limb]))
            })
        };
        SmallValues {
            positive: build(Sign::Positive),
            negative: build(Sign::Negative),
        }
    })
}

impl BigInteger {
    /// Wraps a magnitude that is already canonical and within range. An empty
    /// magnitude always produces zero, whatever `sign` says.
    pub(crate) fn from_canonical(sign: Sign, mag: Vec<u32>) -> Self {
        debug_assert!(mag.first() != Some(&0), "magnitude has leading zeros");
        debug_assert!(mag.len() <= MAX_MAG_LENGTH, "magnitude is too long");
        let sign = if mag.is_empty() { Sign::Zero } else { sign };
        Self {
            inner: Arc::new(Repr {
                sign,
                mag,
                memo: Memo::default(),
            }),
        }
    }

    /// Strips leading zeros and checks the length limit.
    pub(crate) fn new_checked(sign: Sign, mag: Vec<u32>) -> AResult<Self> {
        let mag = limbs::trim(mag);
        if mag.len() > MAX_MAG_LENGTH {
            return Err(ArbintError::Overflow);
        }
        Ok(Self::from_canonical(sign, mag))
    }

    /// Builds a value from a sign and a big-endian magnitude, which may have
    /// leading zero limbs.
    ///
    /// `Sign::Zero` must come with an all-zero magnitude, and a nonzero sign
    /// with a nonzero one.
    pub fn from_magnitude(sign: Sign, magnitude: Vec<u32>) -> Result<Self, ArbintError> {
        let mag = limbs::trim(magnitude);
        if (sign == Sign::Zero) != mag.is_empty() {
            return Err(ArbintError::SignMagnitudeMismatch);
        }
        Self::new_checked(sign, mag)
    }

    pub fn value_of(n: i64) -> Self {
        let abs = n.unsigned_abs();
        if let Ok(index) = usize::try_from(abs) {
            if index <= SMALL_VALUE_MAX {
                let table = small_values();
                return if n < 0 {
                    table.negative[index].clone()
                } else {
                    table.positive[index].clone()
                };
            }
        }
        let sign = if n < 0 { Sign::Negative } else { Sign::Positive };
        Self::from_canonical(sign, limbs::from_u64(abs))
    }

    pub fn zero() -> Self {
        small_values().positive[0].clone()
    }

    pub fn one() -> Self {
        small_values().positive[1].clone()
    }

    pub fn two() -> Self {
        small_values().positive[2].clone()
    }

    pub fn ten() -> Self {
        small_values().positive[10].clone()
    }

    pub fn negative_one() -> Self {
        small_values().negative[1].clone()
    }

    pub(crate) fn memo(&self) -> &Memo {
        &self.inner.memo
    }

    pub fn sign(&self) -> Sign {
        self.inner.sign
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        self.sign().as_i32()
    }

    pub fn is_zero(&self) -> bool {
        self.sign() == Sign::Zero
    }

    pub fn is_negative(&self) -> bool {
        self.sign() == Sign::Negative
    }

    /// The canonical big-endian magnitude. Empty for zero.
    pub fn magnitude(&self) -> &[u32] {
        &self.inner.mag
    }

    fn is_same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn add<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Self, ArbintError> {
        let other = other.into().resolve();
        self.add_signed(&other, other.sign())
    }

    pub fn subtract<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Self, ArbintError> {
        let other = other.into().resolve();
        self.add_signed(&other, other.sign().negate())
    }

    /// Adds the magnitude of `other` carrying `other_sign` in place of its own.
    fn add_signed(&self, other: &Self, other_sign: Sign) -> AResult<Self> {
        if other_sign == Sign::Zero {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(if other_sign == other.sign() {
                other.clone()
            } else {
                other.negate()
            });
        }
        if self.sign() == other_sign {
            return Self::new_checked(
                other_sign,
                limbs::add(self.magnitude(), other.magnitude()),
            );
        }
        Ok(match limbs::cmp(self.magnitude(), other.magnitude()) {
            Ordering::Equal => Self::zero(),
            Ordering::Greater => Self::from_canonical(
                self.sign(),
                limbs::sub(self.magnitude(), other.magnitude()),
            ),
            Ordering::Less => Self::from_canonical(
                other_sign,
                limbs::sub(other.magnitude(), self.magnitude()),
            ),
        })
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        Self::from_canonical(self.sign().negate(), self.magnitude().to_vec())
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            self.clone()
        }
    }

    pub fn multiply<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Self, ArbintError> {
        let other = other.into().resolve();
        if self.is_same_instance(&other) {
            return self.square();
        }
        if self.is_zero() || other.is_zero() {
            return Ok(Self::zero());
        }
        if self.magnitude().len() + other.magnitude().len() > MAX_MAG_LENGTH + 1 {
            return Err(ArbintError::Overflow);
        }
        Self::new_checked(
            self.sign().product(other.sign()),
            mul::multiply(self.magnitude(), other.magnitude()),
        )
    }

    pub fn square(&self) -> Result<Self, ArbintError> {
        if self.is_zero() {
            return Ok(Self::zero());
        }
        if 2 * self.magnitude().len() > MAX_MAG_LENGTH + 1 {
            return Err(ArbintError::Overflow);
        }
        Self::new_checked(Sign::Positive, mul::square(self.magnitude()))
    }

    /// Truncating division: the quotient is rounded towards zero and the
    /// remainder has the sign of `self` (or is zero).
    pub fn divide_and_remainder<'a>(
        &self,
        other: impl Into<Operand<'a>>,
    ) -> Result<(Self, Self), ArbintError> {
        let other = other.into().resolve();
        if other.is_zero() {
            return Err(ArbintError::DivideByZero);
        }
        let (quotient, remainder) = div::divide(self.magnitude(), other.magnitude());
        Ok((
            Self::from_canonical(self.sign().product(other.sign()), quotient),
            Self::from_canonical(self.sign(), remainder),
        ))
    }

    pub fn divide<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Self, ArbintError> {
        Ok(self.divide_and_remainder(other)?.0)
    }

    pub fn remainder<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Self, ArbintError> {
        Ok(self.divide_and_remainder(other)?.1)
    }

    /// The residue of `self` modulo a positive `modulus`, in `[0, modulus)`.
    pub fn modulo<'a>(&self, modulus: impl Into<Operand<'a>>) -> Result<Self, ArbintError> {
        let modulus = modulus.into().resolve();
        if modulus.sign() != Sign::Positive {
            return Err(ArbintError::NonPositiveModulus);
        }
        let remainder = self.remainder(&*modulus)?;
        if remainder.is_negative() {
            remainder.add(&*modulus)
        } else {
            Ok(remainder)
        }
    }

    /// Raises `self` to `exponent`. `x^0` is one for every `x`, including zero.
    pub fn pow(&self, exponent: u32) -> Result<Self, ArbintError> {
        if exponent == 0 {
            return Ok(Self::one());
        }
        if self.is_zero() || exponent == 1 {
            return Ok(self.clone());
        }
        let sign = if self.is_negative() && exponent % 2 == 1 {
            Sign::Negative
        } else {
            Sign::Positive
        };

        // the result has more than (bits - 1) * exponent bits
        let bits = magnitude_bit_length(self.magnitude());
        if (bits - 1).saturating_mul(u64::from(exponent)) >= MAX_BITS {
            return Err(ArbintError::Overflow);
        }

        // factor out the powers of two and apply them as a single shift
        let twos = self.lowest_set_bit().unwrap_or(0);
        let shift_bits = twos * u64::from(exponent);
        let shift = usize::try_from(shift_bits).map_err(|_| ArbintError::Overflow)?;
        let twos = usize::try_from(twos).map_err(|_| ArbintError::Overflow)?;
        let mut base = limbs::shr(self.magnitude(), twos);
        let mut result = vec![1];
        let mut remaining = exponent;
        loop {
            if remaining & 1 == 1 {
                result = mul::multiply(&result, &base);
            }
            remaining >>= 1;
            if remaining == 0 {
                break;
            }
            base = mul::square(&base);
        }
        if magnitude_bit_length(&result) + shift_bits > MAX_BITS {
            return Err(ArbintError::Overflow);
        }
        Self::new_checked(sign, limbs::shl(&result, shift))
    }

    /// Computes `self * 2^n`.
    pub fn shift_left(&self, n: u64) -> Result<Self, ArbintError> {
        if self.is_zero() || n == 0 {
            return Ok(self.clone());
        }
        if magnitude_bit_length(self.magnitude()).saturating_add(n) > MAX_BITS {
            return Err(ArbintError::Overflow);
        }
        let shift = usize::try_from(n).map_err(|_| ArbintError::Overflow)?;
        Self::new_checked(self.sign(), limbs::shl(self.magnitude(), shift))
    }

    /// Computes `floor(self / 2^n)`, i.e. an arithmetic shift: negative
    /// values round towards negative infinity.
    #[must_use]
    pub fn shift_right(&self, n: u64) -> Self {
        if self.is_zero() || n == 0 {
            return self.clone();
        }
        let bits = magnitude_bit_length(self.magnitude());
        if n >= bits {
            return if self.is_negative() {
                Self::negative_one()
            } else {
                Self::zero()
            };
        }
        // n < bits, so it fits
        let shift = usize::try_from(n).unwrap_or(usize::MAX);
        let mut mag = limbs::shr(self.magnitude(), shift);
        let lost_one_bits = self.lowest_set_bit().is_some_and(|lowest| lowest < n);
        if self.is_negative() && lost_one_bits {
            mag = limbs::add(&mag, &[1]);
        }
        Self::from_canonical(self.sign(), mag)
    }

    /// The greatest common divisor of `|self|` and `|other|`. `gcd(0, 0)` is
    /// zero.
    #[must_use]
    pub fn gcd<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        let other = other.into().resolve();
        let mut a = self.magnitude().to_vec();
        let mut b = other.magnitude().to_vec();
        while !b.is_empty() {
            let (_, remainder) = div::divide(&a, &b);
            a = b;
            b = remainder;
        }
        Self::from_canonical(Sign::Positive, a)
    }

    pub fn compare_to<'a>(&self, other: impl Into<Operand<'a>>) -> Ordering {
        self.cmp(&other.into().resolve())
    }
}

impl Default for BigInteger {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for BigInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_same_instance(other) {
            return Ordering::Equal;
        }
        self.sign()
            .cmp(&other.sign())
            .then_with(|| match self.sign() {
                Sign::Zero => Ordering::Equal,
                Sign::Positive => limbs::cmp(self.magnitude(), other.magnitude()),
                Sign::Negative => limbs::cmp(other.magnitude(), self.magnitude()),
            })
    }
}

impl PartialOrd for BigInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BigInteger {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_instance(other)
            || (self.sign() == other.sign() && self.magnitude() == other.magnitude())
    }
}

impl Eq for BigInteger {}

impl Hash for BigInteger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sign().hash(state);
        self.magnitude().hash(state);
    }
}

impl Neg for BigInteger {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Neg for &BigInteger {
    type Output = BigInteger;

    fn neg(self) -> BigInteger {
        self.negate()
    }
}

impl From<i64> for BigInteger {
    fn from(n: i64) -> Self {
        Self::value_of(n)
    }
}

impl From<i32> for BigInteger {
    fn from(n: i32) -> Self {
        Self::value_of(n.into())
    }
}

impl From<u32> for BigInteger {
    fn from(n: u32) -> Self {
        Self::value_of(n.into())
    }
}

impl From<u64> for BigInteger {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(small) => Self::value_of(small),
            Err(_) => Self::from_canonical(Sign::Positive, limbs::from_u64(n)),
        }
    }
}

impl fmt::Debug for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "BigInteger {{ sign: {:?}, magnitude: {:x?} }}", self.sign(), self.magnitude())
        } else {
            write!(f, "{}", self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInteger {
        BigInteger::value_of(n)
    }

    #[test]
    fn small_values_are_shared() {
        assert!(BigInteger::value_of(7).is_same_instance(&BigInteger::value_of(7)));
        assert!(BigInteger::value_of(-16).is_same_instance(&BigInteger::value_of(-16)));
        assert!(BigInteger::ten().is_same_instance(&big(10)));
        assert!(!big(17).is_same_instance(&big(17)));
        assert_eq!(big(17), big(17));
        assert_eq!(BigInteger::negative_one().signum(), -1);
        assert_eq!(BigInteger::zero().sign(), Sign::Zero);
        assert!(BigInteger::zero().magnitude().is_empty());
    }

    #[test]
    fn test_value_of() {
        assert_eq!(big(i64::MIN).magnitude(), &[0x8000_0000, 0]);
        assert_eq!(big(i64::MAX).magnitude(), &[0x7fff_ffff, u32::MAX]);
        assert_eq!(big(1 << 32).magnitude(), &[1, 0]);
        assert_eq!(BigInteger::from(u64::MAX).magnitude(), &[u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_from_magnitude() {
        let value = BigInteger::from_magnitude(Sign::Negative, vec![0, 0, 5]).unwrap();
        assert_eq!(value, big(-5));
        assert_eq!(
            BigInteger::from_magnitude(Sign::Zero, vec![0, 0]).unwrap(),
            BigInteger::zero()
        );
        assert_eq!(
            BigInteger::from_magnitude(Sign::Zero, vec![1]),
            Err(ArbintError::SignMagnitudeMismatch)
        );
        assert_eq!(
            BigInteger::from_magnitude(Sign::Positive, vec![0]),
            Err(ArbintError::SignMagnitudeMismatch)
        );
    }

    #[test]
    fn magnitude_too_long() {
        let mut mag = vec![0_u32; MAX_MAG_LENGTH + 1];
        mag[0] = 1;
        assert_eq!(
            BigInteger::from_magnitude(Sign::Positive, mag),
            Err(ArbintError::Overflow)
        );
    }

    #[test]
    fn test_addition() {
        assert_eq!(big(2).add(3).unwrap(), big(5));
        assert_eq!(big(-2).add(3).unwrap(), big(1));
        assert_eq!(big(2).add(-3).unwrap(), big(-1));
        assert_eq!(big(-2).add(-3).unwrap(), big(-5));
        assert_eq!(big(5).add(-5).unwrap(), BigInteger::zero());
        assert_eq!(big(0).add(-5).unwrap(), big(-5));
        assert_eq!(big(i64::MAX).add(1).unwrap().magnitude(), &[0x8000_0000, 0]);
        let carry = BigInteger::from(u64::MAX).add(1).unwrap();
        assert_eq!(carry.magnitude(), &[1, 0, 0]);
    }

    #[test]
    fn test_subtraction() {
        assert_eq!(big(2).subtract(3).unwrap(), big(-1));
        assert_eq!(big(-2).subtract(-3).unwrap(), big(1));
        assert_eq!(big(0).subtract(7).unwrap(), big(-7));
        assert_eq!(big(0).subtract(-7).unwrap(), big(7));
        assert_eq!(big(7).subtract(0).unwrap(), big(7));
        let x = big(1 << 40);
        assert_eq!(x.subtract(&x).unwrap(), BigInteger::zero());
    }

    #[test]
    fn test_negate_and_abs() {
        assert_eq!(-big(4), big(-4));
        assert_eq!(-&big(-4), big(4));
        assert_eq!(big(0).negate(), big(0));
        assert_eq!(big(-9).abs(), big(9));
        assert_eq!(big(9).abs(), big(9));
    }

    #[test]
    fn test_multiplication() {
        assert_eq!(big(6).multiply(7).unwrap(), big(42));
        assert_eq!(big(-6).multiply(7).unwrap(), big(-42));
        assert_eq!(big(-6).multiply(-7).unwrap(), big(42));
        assert_eq!(big(-6).multiply(0).unwrap(), big(0));
        let x = big(-(1 << 40));
        let square = x.multiply(&x).unwrap();
        assert_eq!(square, BigInteger::one().shift_left(80).unwrap());
        assert_eq!(square, x.square().unwrap());
    }

    #[test]
    fn test_division() {
        for (a, b) in [(7_i64, 2_i64), (-7, 2), (7, -2), (-7, -2), (1, 5), (0, 3), (100, 10)] {
            let (q, r) = big(a).divide_and_remainder(b).unwrap();
            assert_eq!(q, big(a / b), "{} / {}", a, b);
            assert_eq!(r, big(a % b), "{} % {}", a, b);
        }
        assert_eq!(big(1).divide(0), Err(ArbintError::DivideByZero));
        assert_eq!(big(0).remainder(0), Err(ArbintError::DivideByZero));
    }

    #[test]
    fn test_modulo() {
        assert_eq!(big(-7).modulo(3).unwrap(), big(2));
        assert_eq!(big(7).modulo(3).unwrap(), big(1));
        assert_eq!(big(-6).modulo(3).unwrap(), big(0));
        assert_eq!(big(5).modulo(0), Err(ArbintError::NonPositiveModulus));
        assert_eq!(big(5).modulo(-3), Err(ArbintError::NonPositiveModulus));
    }

    #[test]
    fn test_pow() {
        assert_eq!(big(0).pow(0).unwrap(), big(1));
        assert_eq!(big(0).pow(5).unwrap(), big(0));
        assert_eq!(big(3).pow(4).unwrap(), big(81));
        assert_eq!(big(-2).pow(3).unwrap(), big(-8));
        assert_eq!(big(-2).pow(4).unwrap(), big(16));
        assert_eq!(big(12).pow(5).unwrap(), big(248_832));
        assert_eq!(big(-1).pow(u32::MAX).unwrap(), big(-1));
        assert_eq!(big(10).pow(18).unwrap(), big(1_000_000_000_000_000_000));
        assert_eq!(
            big(2).pow(100).unwrap(),
            BigInteger::one().shift_left(100).unwrap()
        );
        assert_eq!(big(2).pow(u32::MAX), Err(ArbintError::Overflow));
        assert_eq!(big(10).pow(1 << 30), Err(ArbintError::Overflow));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(big(3).shift_left(33).unwrap(), big(3 << 33));
        assert_eq!(big(-3).shift_left(1).unwrap(), big(-6));
        assert_eq!(big(1).shift_left(MAX_BITS), Err(ArbintError::Overflow));
        for n in [0_i64, 1, 7, -1, -7, -8, -9, 1 << 40, -(1 << 40) - 1] {
            for shift in [0_u64, 1, 3, 32, 45, 63, 200] {
                let expected = if shift >= 64 { n >> 63 } else { n >> shift };
                assert_eq!(big(n).shift_right(shift), big(expected), "{} >> {}", n, shift);
            }
        }
    }

    #[test]
    fn test_gcd() {
        assert_eq!(big(12).gcd(18), big(6));
        assert_eq!(big(-12).gcd(18), big(6));
        assert_eq!(big(0).gcd(-5), big(5));
        assert_eq!(big(0).gcd(0), big(0));
        assert_eq!(big(17).gcd(5), big(1));
    }

    #[test]
    fn test_ordering() {
        let mut values = vec![big(5), big(-3), big(0), big(1 << 40), big(-(1 << 40)), big(-2)];
        values.sort();
        assert_eq!(
            values,
            vec![big(-(1 << 40)), big(-3), big(-2), big(0), big(5), big(1 << 40)]
        );
        assert_eq!(big(4).compare_to(4), Ordering::Equal);
        assert_eq!(big(-4).compare_to(3), Ordering::Less);
        assert_eq!(big(4).max(big(-9)), big(4));
        assert_eq!(big(4).min(big(-9)), big(-9));
    }

    #[test]
    fn test_signs() {
        assert_eq!(Sign::Negative.product(Sign::Negative), Sign::Positive);
        assert_eq!(Sign::Negative.product(Sign::Positive), Sign::Negative);
        assert_eq!(Sign::Zero.product(Sign::Negative), Sign::Zero);
        assert_eq!(Sign::Positive.negate(), Sign::Negative);
        assert!(Sign::Negative < Sign::Zero && Sign::Zero < Sign::Positive);
    }

    #[test]
    fn values_are_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<BigInteger>();
    }
}
