//! Conversion between integers and their textual form in radixes 2 to 36.

use std::array;
use std::fmt;
use std::str::FromStr;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::error::ArbintError;
use crate::num::base::{self, check_radix};
use crate::num::bigint::{BigInteger, Sign};
use crate::num::bits::magnitude_bit_length;
use crate::num::{div, limbs, mul};
use crate::result::AResult;

/// Magnitudes with at least this many limbs are formatted by recursive
/// splitting instead of repeated short division.
pub const SCHOENHAGE_BASE_CONVERSION_THRESHOLD: usize = 20;

/// Parsed numerals whose size estimate reaches this many bits are rejected
/// before any allocation.
const MAX_ESTIMATED_BITS: u64 = 1 << 32;

pub(crate) fn parse(text: &str, radix: u32) -> AResult<BigInteger> {
    check_radix(radix)?;
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (Sign::Negative, &text[1..]),
        Some(b'+') => (Sign::Positive, &text[1..]),
        _ => (Sign::Positive, text),
    };
    if digits.is_empty() {
        return Err(ArbintError::EmptyNumeral);
    }
    if digits.contains(['+', '-']) {
        return Err(ArbintError::MisplacedSign);
    }
    if let Some(digit) = digits.chars().find(|c| !c.is_ascii()) {
        return Err(ArbintError::IllegalDigit { digit, radix });
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(BigInteger::zero());
    }

    let num_digits = u64::try_from(digits.len()).map_err(|_| ArbintError::Overflow)?;
    let num_bits = num_digits
        .checked_mul(base::bits_per_digit(radix))
        .map(|scaled| (scaled >> 10) + 1)
        .filter(|&bits| bits < MAX_ESTIMATED_BITS)
        .ok_or(ArbintError::Overflow)?;
    let num_limbs = usize::try_from(num_bits.div_ceil(32)).map_err(|_| ArbintError::Overflow)?;
    let mut mag = vec![0; num_limbs];

    // the first group takes the leftover digits so every later group is full
    let group_len = usize::try_from(base::digits_per_limb(radix)).unwrap_or(1);
    let first_len = match digits.len() % group_len {
        0 => group_len,
        short => short,
    };
    let (first, rest) = digits.split_at(first_len);
    if let Some(last) = mag.last_mut() {
        *last = parse_group(first, radix)?;
    }
    let super_radix = base::super_radix(radix);
    for group in rest.as_bytes().chunks(group_len) {
        // chunks of an ASCII string are valid UTF-8
        let group = std::str::from_utf8(group).unwrap_or_default();
        let carry = limbs::mul_add_limb(&mut mag, super_radix, parse_group(group, radix)?);
        debug_assert_eq!(carry, 0, "parse buffer too small");
    }
    BigInteger::new_checked(sign, mag)
}

fn parse_group(group: &str, radix: u32) -> AResult<u32> {
    group.chars().try_fold(0, |value, c| {
        Ok(value * radix + base::digit_value(c, radix)?)
    })
}

fn ln_radix(radix: u32) -> f64 {
    static LN: OnceLock<[f64; 37]> = OnceLock::new();
    let table = LN.get_or_init(|| array::from_fn(|r| f64::from(u32::try_from(r).unwrap_or(0)).ln()));
    table[usize::try_from(radix).unwrap_or(0)]
}

/// Returns `radix^(2^exponent)`, extending the process-wide cache on demand.
/// The cache for each radix only ever grows.
pub(crate) fn radix_power(radix: u32, exponent: usize) -> BigInteger {
    static POWERS: OnceLock<[RwLock<Vec<BigInteger>>; 37]> = OnceLock::new();
    let powers = POWERS.get_or_init(|| {
        tracing::debug!("building radix power cache");
        array::from_fn(|r| {
            let radix = i64::try_from(r).unwrap_or(0);
            RwLock::new(vec![BigInteger::value_of(radix)])
        })
    });
    let slot = &powers[usize::try_from(radix).unwrap_or(0)];
    {
        let cached = slot.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(power) = cached.get(exponent) {
            return power.clone();
        }
    }
    let mut cached = slot.write().unwrap_or_else(PoisonError::into_inner);
    // another thread may have extended the table in between
    if cached.len() <= exponent {
        tracing::debug!(radix, from = cached.len(), to = exponent + 1, "extending radix power cache");
    }
    while cached.len() <= exponent {
        let next = match cached.last() {
            Some(last) => mul::square(last.magnitude()),
            None => vec![radix],
        };
        cached.push(BigInteger::from_canonical(Sign::Positive, next));
    }
    cached[exponent].clone()
}

/// The `k` for which `radix^(2^k)` splits a number of `bits` bits into two
/// roughly equal halves of digits.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn split_exponent(bits: u64, radix: u32) -> usize {
    let digits = bits as f64 * std::f64::consts::LN_2 / ln_radix(radix);
    (digits.log2() - 1.0).round().max(0.0) as usize
}

/// Writes `mag` in `radix`, zero-padded to at least `digits` digits.
fn write_magnitude(out: &mut String, mag: &[u32], radix: u32, digits: usize) {
    if mag.len() < SCHOENHAGE_BASE_CONVERSION_THRESHOLD {
        write_small(out, mag, radix, digits);
        return;
    }
    let k = split_exponent(magnitude_bit_length(mag), radix);
    tracing::trace!(limbs = mag.len(), radix, k, "recursive radix conversion");
    let divisor = radix_power(radix, k);
    let (high, low) = div::divide(mag, divisor.magnitude());
    let low_digits = 1 << k;
    write_magnitude(out, &high, radix, digits.saturating_sub(low_digits));
    write_magnitude(out, &low, radix, low_digits);
}

/// Repeated short division by the super radix. Every group except the most
/// significant is padded to a full group of digits.
fn write_small(out: &mut String, mag: &[u32], radix: u32, digits: usize) {
    let super_radix = base::super_radix(radix);
    let group_len = usize::try_from(base::digits_per_limb(radix)).unwrap_or(1);

    let mut groups = vec![];
    let mut rest = limbs::strip_leading_zeros(mag).to_vec();
    while !rest.is_empty() {
        let (quotient, group) = limbs::divide_by_limb(&rest, super_radix);
        groups.push(group);
        rest = quotient;
    }

    let mut text = String::new();
    if let Some((&top, lower)) = groups.split_last() {
        push_limb(&mut text, top, radix, 0);
        for &group in lower.iter().rev() {
            push_limb(&mut text, group, radix, group_len);
        }
    }
    pad_zeros(out, digits.saturating_sub(text.len()));
    out.push_str(&text);
}

fn push_limb(out: &mut String, mut value: u32, radix: u32, width: usize) {
    let mut reversed = vec![];
    while value != 0 {
        reversed.push(base::digit_as_char(value % radix));
        value /= radix;
    }
    pad_zeros(out, width.saturating_sub(reversed.len()));
    out.extend(reversed.iter().rev());
}

fn pad_zeros(out: &mut String, count: usize) {
    out.extend(std::iter::repeat('0').take(count));
}

/// Digits of `mag` without a sign. Zero is `"0"`.
fn magnitude_digits(mag: &[u32], radix: u32) -> String {
    if mag.is_empty() {
        return "0".to_string();
    }
    let mut out = String::new();
    write_magnitude(&mut out, mag, radix, 0);
    out
}

pub(crate) fn format(value: &BigInteger, radix: u32) -> AResult<String> {
    check_radix(radix)?;
    let digits = magnitude_digits(value.magnitude(), radix);
    Ok(if value.is_negative() {
        format!("-{}", digits)
    } else {
        digits
    })
}

impl BigInteger {
    /// Parses an optionally signed numeral in `radix`. Letters may be in
    /// either case.
    pub fn from_str_radix(text: &str, radix: u32) -> Result<Self, ArbintError> {
        parse(text, radix)
    }

    /// Formats the value in `radix` with lower case letters and a leading
    /// `-` for negative values.
    pub fn to_str_radix(&self, radix: u32) -> Result<String, ArbintError> {
        format(self, radix)
    }
}

impl FromStr for BigInteger {
    type Err = ArbintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, 10)
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "", &magnitude_digits(self.magnitude(), 10))
    }
}

impl fmt::LowerHex for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0x", &magnitude_digits(self.magnitude(), 16))
    }
}

impl fmt::UpperHex for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = magnitude_digits(self.magnitude(), 16).to_ascii_uppercase();
        f.pad_integral(!self.is_negative(), "0x", &digits)
    }
}

impl fmt::Octal for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0o", &magnitude_digits(self.magnitude(), 8))
    }
}

impl fmt::Binary for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0b", &magnitude_digits(self.magnitude(), 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::test_utils::{random_magnitude, rng, structured_magnitudes};

    #[track_caller]
    fn parse_ok(text: &str, radix: u32) -> BigInteger {
        BigInteger::from_str_radix(text, radix).unwrap()
    }

    #[test]
    fn parse_small_numbers() {
        assert_eq!(parse_ok("0", 10), BigInteger::zero());
        assert_eq!(parse_ok("-0000", 10), BigInteger::zero());
        assert_eq!(parse_ok("+42", 10), BigInteger::value_of(42));
        assert_eq!(parse_ok("-42", 10), BigInteger::value_of(-42));
        assert_eq!(parse_ok("00017", 10), BigInteger::value_of(17));
        assert_eq!(parse_ok("ff", 16), BigInteger::value_of(255));
        assert_eq!(parse_ok("FF", 16), BigInteger::value_of(255));
        assert_eq!(parse_ok("-101", 2), BigInteger::value_of(-5));
        assert_eq!(parse_ok("9223372036854775807", 10), BigInteger::value_of(i64::MAX));
        assert_eq!(parse_ok("-9223372036854775808", 10), BigInteger::value_of(i64::MIN));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(BigInteger::from_str_radix("", 10), Err(ArbintError::EmptyNumeral));
        assert_eq!(BigInteger::from_str_radix("-", 10), Err(ArbintError::EmptyNumeral));
        assert_eq!(BigInteger::from_str_radix("+", 10), Err(ArbintError::EmptyNumeral));
        assert_eq!(BigInteger::from_str_radix("1-2", 10), Err(ArbintError::MisplacedSign));
        assert_eq!(BigInteger::from_str_radix("--1", 10), Err(ArbintError::MisplacedSign));
        assert_eq!(BigInteger::from_str_radix("+-1", 10), Err(ArbintError::MisplacedSign));
        assert_eq!(
            BigInteger::from_str_radix("12a", 10),
            Err(ArbintError::IllegalDigit { digit: 'a', radix: 10 })
        );
        assert_eq!(
            BigInteger::from_str_radix("1\u{661}", 10),
            Err(ArbintError::IllegalDigit { digit: '\u{661}', radix: 10 })
        );
        assert_eq!(
            BigInteger::from_str_radix(" 1", 10),
            Err(ArbintError::IllegalDigit { digit: ' ', radix: 10 })
        );
        assert_eq!(BigInteger::from_str_radix("1", 1), Err(ArbintError::BaseTooSmall(1)));
        assert_eq!(BigInteger::from_str_radix("1", 37), Err(ArbintError::BaseTooLarge(37)));
    }

    #[test]
    fn format_small_numbers() {
        assert_eq!(BigInteger::zero().to_str_radix(10).unwrap(), "0");
        assert_eq!(BigInteger::value_of(-255).to_str_radix(16).unwrap(), "-ff");
        assert_eq!(BigInteger::value_of(5).to_str_radix(2).unwrap(), "101");
        assert_eq!(BigInteger::value_of(1_000_000_000).to_string(), "1000000000");
        assert_eq!(BigInteger::value_of(i64::MIN).to_string(), "-9223372036854775808");
        assert_eq!(BigInteger::value_of(35).to_str_radix(36).unwrap(), "z");
        assert_eq!(BigInteger::one().to_str_radix(0), Err(ArbintError::BaseTooSmall(0)));
        assert_eq!(BigInteger::one().to_str_radix(40), Err(ArbintError::BaseTooLarge(40)));
    }

    #[test]
    fn inner_groups_are_padded() {
        let value = parse_ok("1000000000000000000000000000001", 10);
        assert_eq!(value.to_string(), "1000000000000000000000000000001");
        let value = parse_ok("100000000000000000000000000000000000000000000000000", 2);
        assert_eq!(value.to_str_radix(2).unwrap(), "100000000000000000000000000000000000000000000000000");
    }

    #[test]
    fn canonical_case() {
        let value = parse_ok("ZZZZZZZZ", 36);
        assert_eq!(value.to_str_radix(36).unwrap(), "zzzzzzzz");
        assert_eq!(value, parse_ok("zzzzzzzz", 36));
    }

    #[test]
    fn recursive_formatting_agrees_with_iterative() {
        let mut rng = rng(3);
        let mut cases: Vec<Vec<u32>> = [20, 21, 40, 77, 160]
            .into_iter()
            .map(|limbs| random_magnitude(&mut rng, limbs))
            .collect();
        cases.extend(structured_magnitudes(45));
        for mag in &cases {
            for radix in [2, 7, 10, 16, 36] {
                let mut recursive = String::new();
                write_magnitude(&mut recursive, mag, radix, 0);
                let mut iterative = String::new();
                write_small(&mut iterative, mag, radix, 0);
                assert_eq!(recursive, iterative, "{} limbs in base {}", mag.len(), radix);
            }
        }
    }

    #[test]
    fn round_trips() {
        let mut rng = rng(4);
        for limbs in [1, 2, 5, 19, 20, 64, 150] {
            let mag = random_magnitude(&mut rng, limbs);
            let value = BigInteger::from_magnitude(Sign::Negative, mag).unwrap();
            for radix in 2..=36 {
                let text = value.to_str_radix(radix).unwrap();
                assert_eq!(parse_ok(&text, radix), value, "{} limbs in base {}", limbs, radix);
            }
        }
    }

    #[test]
    fn powers_are_cached() {
        assert_eq!(radix_power(10, 0), BigInteger::value_of(10));
        assert_eq!(radix_power(10, 3), BigInteger::value_of(100_000_000));
        assert_eq!(radix_power(3, 2), BigInteger::value_of(81));
        let big = radix_power(10, 6);
        assert_eq!(big.to_string().len(), 65);
        assert_eq!(radix_power(10, 6), big);
    }

    #[test]
    fn formatter_flags() {
        let value = BigInteger::value_of(-42);
        assert_eq!(format!("{}", value), "-42");
        assert_eq!(format!("{:>6}", value), "   -42");
        assert_eq!(format!("{:06}", value), "-00042");
        assert_eq!(format!("{:+}", BigInteger::value_of(42)), "+42");
        assert_eq!(format!("{:x}", BigInteger::value_of(255)), "ff");
        assert_eq!(format!("{:#x}", BigInteger::value_of(255)), "0xff");
        assert_eq!(format!("{:X}", BigInteger::value_of(-255)), "-FF");
        assert_eq!(format!("{:o}", BigInteger::value_of(8)), "10");
        assert_eq!(format!("{:#b}", BigInteger::value_of(5)), "0b101");
        assert_eq!(format!("{:?}", value), "-42");
        assert_eq!("-42".parse::<BigInteger>().unwrap(), value);
    }
}
