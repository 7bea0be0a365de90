use std::{error, fmt};

/// Errors returned by `arbint-core`.
///
/// Every fallible operation either returns a fully valid value or one of
/// these, never a partially constructed integer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArbintError {
    /// The numeral contained no digits.
    EmptyNumeral,
    /// A `+` or `-` appeared somewhere other than the first character,
    /// or more than once.
    MisplacedSign,
    IllegalDigit {
        digit: char,
        radix: u32,
    },
    /// The sign was zero but the magnitude was not, or vice versa.
    SignMagnitudeMismatch,
    BaseTooSmall(u32),
    BaseTooLarge(u32),
    NegativeBitCount(i64),
    /// The modulus of a `modulo` operation was zero or negative.
    NonPositiveModulus,
    /// The result would need more than `MAX_MAG_LENGTH` limbs.
    Overflow,
    DivideByZero,
}

/// The category an [`ArbintError`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed textual or raw input.
    Format,
    /// An argument outside its accepted domain.
    Range,
    Overflow,
    DivideByZero,
}

impl ArbintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyNumeral
            | Self::MisplacedSign
            | Self::IllegalDigit { .. }
            | Self::SignMagnitudeMismatch => ErrorKind::Format,
            Self::BaseTooSmall(_)
            | Self::BaseTooLarge(_)
            | Self::NegativeBitCount(_)
            | Self::NonPositiveModulus => ErrorKind::Range,
            Self::Overflow => ErrorKind::Overflow,
            Self::DivideByZero => ErrorKind::DivideByZero,
        }
    }
}

impl fmt::Display for ArbintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNumeral => write!(f, "zero length integer"),
            Self::MisplacedSign => write!(f, "a sign may only appear once, at the start"),
            Self::IllegalDigit { digit, radix } => {
                write!(f, "'{}' is not a valid digit in base {}", digit, radix)
            }
            Self::SignMagnitudeMismatch => write!(f, "sign and magnitude disagree about zero"),
            Self::BaseTooSmall(_) => write!(f, "base must be at least 2"),
            Self::BaseTooLarge(_) => write!(f, "base cannot be larger than 36"),
            Self::NegativeBitCount(n) => write!(f, "bit count must be non-negative, got {}", n),
            Self::NonPositiveModulus => write!(f, "modulus must be positive"),
            Self::Overflow => write!(f, "integer would overflow supported range"),
            Self::DivideByZero => write!(f, "division by zero"),
        }
    }
}

impl error::Error for ArbintError {}
