use std::fmt;

use crate::error::ArbintError;
use crate::result::AResult;

pub(crate) const MIN_RADIX: u32 = 2;
pub(crate) const MAX_RADIX: u32 = 36;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `BITS_PER_DIGIT[r]` is an upper bound on `log2(r) * 1024`, used to size
/// the limb buffer before parsing.
const BITS_PER_DIGIT: [u64; 37] = [
    0, 0, 1024, 1624, 2048, 2378, 2648, 2875, 3072, 3247, 3402, 3543, 3672, 3790, 3899, 4001,
    4096, 4186, 4271, 4350, 4426, 4498, 4567, 4633, 4696, 4756, 4814, 4870, 4923, 4975, 5025,
    5074, 5120, 5166, 5210, 5253, 5295,
];

/// `DIGIT_GROUPS[r]` is the largest `d` with `r^d` fitting in one limb.
const DIGIT_GROUPS: [u32; 37] = {
    let mut groups = [0; 37];
    let mut radix = 2;
    while radix < 37 {
        let mut power: u64 = radix;
        let mut digits = 0;
        while power <= u32::MAX as u64 {
            power *= radix;
            digits += 1;
        }
        groups[radix as usize] = digits;
        radix += 1;
    }
    groups
};

/// A radix together with the notation used to mark it in text.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Base {
    /// Binary with 0b prefix
    Binary,
    /// Octal with 0o prefix
    Octal,
    /// Decimal with no prefix
    Decimal,
    /// Hex with 0x prefix
    Hex,
    /// Custom base between 2 and 36 (inclusive), written as base#number
    Custom(u8),
}

impl Base {
    pub fn from_radix(radix: u32) -> Result<Self, ArbintError> {
        Ok(match check_radix(radix)? {
            2 => Self::Binary,
            8 => Self::Octal,
            10 => Self::Decimal,
            16 => Self::Hex,
            other => Self::Custom(u8::try_from(other).map_err(|_| ArbintError::BaseTooLarge(other))?),
        })
    }

    pub fn radix(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
            Self::Custom(b) => b.into(),
        }
    }

    pub fn write_prefix(self, f: &mut impl fmt::Write) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "0b")?,
            Self::Octal => write!(f, "0o")?,
            Self::Decimal => (),
            Self::Hex => write!(f, "0x")?,
            Self::Custom(b) => write!(f, "{}#", b)?,
        }
        Ok(())
    }

    /// Recognises a `0b`, `0o` or `0x` prefix, or a `radix#` prefix, after an
    /// optional sign. Returns the base and the remaining text with the sign
    /// moved in front of the digits.
    pub fn split_prefix(text: &str) -> Result<Option<(Self, String)>, ArbintError> {
        let (sign, rest) = match text.strip_prefix(['+', '-']) {
            Some(rest) => (&text[..1], rest),
            None => ("", text),
        };
        let lower = rest.get(..2).map(str::to_ascii_lowercase);
        let fixed = match lower.as_deref() {
            Some("0b") => Some(Self::Binary),
            Some("0o") => Some(Self::Octal),
            Some("0x") => Some(Self::Hex),
            _ => None,
        };
        if let Some(base) = fixed {
            return Ok(Some((base, format!("{}{}", sign, &rest[2..]))));
        }
        let Some((radix, digits)) = rest.split_once('#') else {
            return Ok(None);
        };
        let radix = radix.parse::<u32>().map_err(|_| ArbintError::IllegalDigit {
            digit: radix.chars().find(|c| !c.is_ascii_digit()).unwrap_or('#'),
            radix: 10,
        })?;
        Ok(Some((Self::from_radix(radix)?, format!("{}{}", sign, digits))))
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Octal => write!(f, "octal"),
            Self::Decimal => write!(f, "decimal"),
            Self::Hex => write!(f, "hex"),
            Self::Custom(b) => write!(f, "base {}", b),
        }
    }
}

pub(crate) fn check_radix(radix: u32) -> AResult<u32> {
    if radix < MIN_RADIX {
        Err(ArbintError::BaseTooSmall(radix))
    } else if radix > MAX_RADIX {
        Err(ArbintError::BaseTooLarge(radix))
    } else {
        Ok(radix)
    }
}

fn index(radix: u32) -> usize {
    usize::try_from(radix).unwrap_or(usize::MAX)
}

pub(crate) fn digits_per_limb(radix: u32) -> u32 {
    DIGIT_GROUPS[index(radix)]
}

/// `radix^digits_per_limb(radix)`, the largest power of the radix that fits a
/// limb.
pub(crate) fn super_radix(radix: u32) -> u32 {
    radix.pow(digits_per_limb(radix))
}

pub(crate) fn bits_per_digit(radix: u32) -> u64 {
    BITS_PER_DIGIT[index(radix)]
}

/// Value of an ASCII digit in `radix`, accepting either letter case.
pub(crate) fn digit_value(c: char, radix: u32) -> AResult<u32> {
    c.to_digit(radix)
        .ok_or(ArbintError::IllegalDigit { digit: c, radix })
}

pub(crate) fn digit_as_char(digit: u32) -> char {
    DIGITS
        .get(index(digit))
        .map_or('?', |&byte| char::from(byte))
}
