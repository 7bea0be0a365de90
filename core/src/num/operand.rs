use std::borrow::Cow;

use crate::num::bigint::BigInteger;

/// The right-hand side of an arithmetic operation: either an existing
/// [`BigInteger`] or a native integer.
///
/// Every combinator on [`BigInteger`] accepts `impl Into<Operand>`, so both
/// `a.add(&b)` and `a.add(5)` work without a separate entry point.
#[derive(Copy, Clone, Debug)]
pub enum Operand<'a> {
    Big(&'a BigInteger),
    Small(i64),
}

impl<'a> Operand<'a> {
    pub(crate) fn resolve(self) -> Cow<'a, BigInteger> {
        match self {
            Self::Big(value) => Cow::Borrowed(value),
            Self::Small(n) => Cow::Owned(BigInteger::value_of(n)),
        }
    }
}

impl<'a> From<&'a BigInteger> for Operand<'a> {
    fn from(value: &'a BigInteger) -> Self {
        Self::Big(value)
    }
}

impl From<i64> for Operand<'_> {
    fn from(n: i64) -> Self {
        Self::Small(n)
    }
}

impl From<i32> for Operand<'_> {
    fn from(n: i32) -> Self {
        Self::Small(n.into())
    }
}

impl From<u32> for Operand<'_> {
    fn from(n: u32) -> Self {
        Self::Small(n.into())
    }
}
