//! Immutable arbitrary-precision signed integers.
//!
//! ```
//! use arbint_core::BigInteger;
//!
//! let a: BigInteger = "-170141183460469231731687303715884105728".parse().unwrap();
//! let b = BigInteger::from_str_radix("80000000000000000000000000000000", 16).unwrap();
//! assert!(a.add(&b).unwrap().is_zero());
//! assert_eq!(a.bit_length(), 127);
//! ```

#![forbid(unsafe_code)]

mod error;
mod num;
mod random;
mod result;

pub use error::{ArbintError, ErrorKind};
pub use num::{thresholds, Base, BigInteger, Operand, Sign, MAX_MAG_LENGTH};
pub use random::Random;

const fn get_version_as_str() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns the current version of `arbint-core`.
#[must_use]
pub fn get_version() -> String {
    get_version_as_str().to_string()
}
