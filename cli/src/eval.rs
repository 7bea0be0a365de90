//! A small reverse Polish notation evaluator over `BigInteger`s.

use std::fmt;

use arbint_core::{ArbintError, Base, BigInteger, Random};

#[derive(Debug, PartialEq, Eq)]
pub enum EvalError {
    Arbint(ArbintError),
    StackUnderflow { op: String, needed: usize, found: usize },
    UnknownToken(String),
    ArgumentOutOfRange { op: String, value: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arbint(e) => write!(f, "{e}"),
            Self::StackUnderflow { op, needed, found } => write!(
                f,
                "`{}` needs {} value(s) but the stack has {}",
                op, needed, found
            ),
            Self::UnknownToken(token) => write!(f, "unknown token `{}`", token),
            Self::ArgumentOutOfRange { op, value } => {
                write!(f, "{} is out of range for `{}`", value, op)
            }
        }
    }
}

impl From<ArbintError> for EvalError {
    fn from(e: ArbintError) -> Self {
        Self::Arbint(e)
    }
}

/// Parses an integer literal. A `0b`/`0o`/`0x` or `radix#` prefix overrides
/// `default_base`.
pub fn parse_literal(token: &str, default_base: Base) -> Result<BigInteger, ArbintError> {
    match Base::split_prefix(token)? {
        Some((base, digits)) => BigInteger::from_str_radix(&digits, base.radix()),
        None => BigInteger::from_str_radix(token, default_base.radix()),
    }
}

pub fn format_value(value: &BigInteger, base: Base, show_prefix: bool) -> String {
    // the radix of a `Base` is always valid
    let digits = value.abs().to_str_radix(base.radix()).unwrap_or_default();
    let mut result = String::new();
    if value.is_negative() {
        result.push('-');
    }
    if show_prefix {
        // writing to a String cannot fail
        let _ = base.write_prefix(&mut result);
    }
    result.push_str(&digits);
    result
}

fn to_u64(value: &BigInteger) -> Option<u64> {
    if value.is_negative() {
        return None;
    }
    match value.magnitude() {
        [] => Some(0),
        [low] => Some(u64::from(*low)),
        [high, low] => Some(u64::from(*high) << 32 | u64::from(*low)),
        _ => None,
    }
}

fn to_i64(value: &BigInteger) -> Option<i64> {
    let abs = to_u64(&value.abs())?;
    if value.is_negative() {
        0_i64.checked_sub_unsigned(abs)
    } else {
        i64::try_from(abs).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    values: Vec<BigInteger>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[BigInteger] {
        &self.values
    }

    /// Evaluates every token on `line`. The stack is only modified if the whole
    /// line succeeds.
    pub fn eval_line(
        &mut self,
        line: &str,
        input_base: Base,
        random: &mut dyn Random,
    ) -> Result<(), EvalError> {
        let mut scratch = self.clone();
        for token in line.split_whitespace() {
            tracing::trace!(token, "evaluating token");
            scratch.eval_token(token, input_base, random)?;
        }
        *self = scratch;
        Ok(())
    }

    fn pop_n<const N: usize>(&mut self, op: &str) -> Result<[BigInteger; N], EvalError> {
        let found = self.values.len();
        if found < N {
            return Err(EvalError::StackUnderflow {
                op: op.to_string(),
                needed: N,
                found,
            });
        }
        let popped = self.values.split_off(found - N);
        popped.try_into().map_err(|_| EvalError::StackUnderflow {
            op: op.to_string(),
            needed: N,
            found,
        })
    }

    fn push_bool(&mut self, value: bool) {
        self.values.push(BigInteger::value_of(i64::from(value)));
    }

    fn push_u64(&mut self, value: u64) {
        self.values.push(BigInteger::from(value));
    }

    fn eval_token(
        &mut self,
        token: &str,
        input_base: Base,
        random: &mut dyn Random,
    ) -> Result<(), EvalError> {
        let out_of_range = |value: &BigInteger| EvalError::ArgumentOutOfRange {
            op: token.to_string(),
            value: value.to_string(),
        };
        match token {
            "+" | "-" | "*" | "/" | "%" | "mod" | "gcd" | "cmp" | "divrem" => {
                let [a, b] = self.pop_n::<2>(token)?;
                match token {
                    "+" => self.values.push(a.add(&b)?),
                    "-" => self.values.push(a.subtract(&b)?),
                    "*" => self.values.push(a.multiply(&b)?),
                    "/" => self.values.push(a.divide(&b)?),
                    "%" => self.values.push(a.remainder(&b)?),
                    "mod" => self.values.push(a.modulo(&b)?),
                    "gcd" => self.values.push(a.gcd(&b)),
                    "cmp" => self.values.push(BigInteger::value_of(match a.cmp(&b) {
                        std::cmp::Ordering::Less => -1,
                        std::cmp::Ordering::Equal => 0,
                        std::cmp::Ordering::Greater => 1,
                    })),
                    _ => {
                        let (q, r) = a.divide_and_remainder(&b)?;
                        self.values.push(q);
                        self.values.push(r);
                    }
                }
            }
            "^" => {
                let [base, exponent] = self.pop_n::<2>(token)?;
                let exponent = to_u64(&exponent)
                    .and_then(|e| u32::try_from(e).ok())
                    .ok_or_else(|| out_of_range(&exponent))?;
                self.values.push(base.pow(exponent)?);
            }
            "<<" | ">>" | "testbit" => {
                let [value, n] = self.pop_n::<2>(token)?;
                let n = to_u64(&n).ok_or_else(|| out_of_range(&n))?;
                match token {
                    "<<" => self.values.push(value.shift_left(n)?),
                    ">>" => self.values.push(value.shift_right(n)),
                    _ => self.push_bool(value.test_bit(n)),
                }
            }
            "neg" | "abs" | "sq" | "bitlen" | "bitcount" | "lsb" | "dup" | "drop" => {
                let [value] = self.pop_n::<1>(token)?;
                match token {
                    "neg" => self.values.push(value.negate()),
                    "abs" => self.values.push(value.abs()),
                    "sq" => self.values.push(value.square()?),
                    "bitlen" => self.push_u64(value.bit_length()),
                    "bitcount" => self.push_u64(value.bit_count()),
                    // zero has no set bit
                    "lsb" => match value.lowest_set_bit() {
                        Some(index) => self.push_u64(index),
                        None => self.values.push(BigInteger::negative_one()),
                    },
                    "dup" => {
                        self.values.push(value.clone());
                        self.values.push(value);
                    }
                    _ => (),
                }
            }
            "rand" => {
                let [bits] = self.pop_n::<1>(token)?;
                let bits = to_i64(&bits).ok_or_else(|| out_of_range(&bits))?;
                self.values.push(BigInteger::random(bits, random)?);
            }
            "swap" => {
                let [a, b] = self.pop_n::<2>(token)?;
                self.values.push(b);
                self.values.push(a);
            }
            "clear" => self.values.clear(),
            literal => match parse_literal(literal, input_base) {
                Ok(value) => self.values.push(value),
                Err(_) if literal.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') => {
                    return Err(EvalError::UnknownToken(literal.to_string()));
                }
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }

    pub fn format(&self, base: Base, show_prefix: bool) -> String {
        self.values
            .iter()
            .map(|value| format_value(value, base, show_prefix))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(u32);

    impl Random for Fixed {
        fn random_u32(&mut self) -> u32 {
            self.0
        }
    }

    #[track_caller]
    fn eval(line: &str) -> String {
        let mut stack = Stack::new();
        stack.eval_line(line, Base::Decimal, &mut Fixed(u32::MAX)).unwrap();
        stack.format(Base::Decimal, true)
    }

    #[track_caller]
    fn eval_err(line: &str) -> EvalError {
        let mut stack = Stack::new();
        stack
            .eval_line(line, Base::Decimal, &mut Fixed(0))
            .unwrap_err()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("2 3 +"), "5");
        assert_eq!(eval("2 3 -"), "-1");
        assert_eq!(eval("6 7 *"), "42");
        assert_eq!(eval("-7 2 /"), "-3");
        assert_eq!(eval("-7 2 %"), "-1");
        assert_eq!(eval("-7 2 mod"), "1");
        assert_eq!(eval("-7 2 divrem"), "-3 -1");
        assert_eq!(eval("2 100 ^"), "1267650600228229401496703205376");
        assert_eq!(eval("12 18 gcd"), "6");
        assert_eq!(eval("1 2 cmp 2 2 cmp 3 2 cmp"), "-1 0 1");
    }

    #[test]
    fn bits_and_shifts() {
        assert_eq!(eval("1 100 << 98 >>"), "4");
        assert_eq!(eval("-5 1 >>"), "-3");
        assert_eq!(eval("-256 bitlen"), "8");
        assert_eq!(eval("-8 bitcount"), "3");
        assert_eq!(eval("40 lsb 0 lsb"), "3 -1");
        assert_eq!(eval("-8 3 testbit -8 2 testbit"), "1 0");
        assert_eq!(eval("-4 sq neg abs"), "16");
    }

    #[test]
    fn stack_operations() {
        assert_eq!(eval("1 2 swap"), "2 1");
        assert_eq!(eval("1 dup"), "1 1");
        assert_eq!(eval("1 2 drop"), "1");
        assert_eq!(eval("1 2 clear 3"), "3");
        assert_eq!(eval(""), "");
    }

    #[test]
    fn literals_with_prefixes() {
        assert_eq!(eval("0xff 0b101 0o17 -36#z"), "255 5 15 -35");
        let mut stack = Stack::new();
        stack.eval_line("ff 10", Base::Hex, &mut Fixed(0)).unwrap();
        assert_eq!(stack.format(Base::Hex, true), "0xff 0x10");
        assert_eq!(stack.format(Base::Custom(3), true), "3#100110 3#121");
        assert_eq!(stack.format(Base::Binary, false), "11111111 10000");
    }

    #[test]
    fn random_values() {
        assert_eq!(eval("12 rand"), "4095");
        assert_eq!(eval("0 rand"), "0");
        assert_eq!(
            eval_err("-1 rand"),
            EvalError::Arbint(ArbintError::NegativeBitCount(-1))
        );
    }

    #[test]
    fn errors() {
        assert_eq!(eval_err("1 0 /"), EvalError::Arbint(ArbintError::DivideByZero));
        assert_eq!(
            eval_err("1 +"),
            EvalError::StackUnderflow {
                op: "+".to_string(),
                needed: 2,
                found: 1
            }
        );
        assert_eq!(eval_err("sqrt"), EvalError::UnknownToken("sqrt".to_string()));
        assert_eq!(
            eval_err("12x"),
            EvalError::Arbint(ArbintError::IllegalDigit { digit: 'x', radix: 10 })
        );
        assert_eq!(
            eval_err("2 -1 ^"),
            EvalError::ArgumentOutOfRange {
                op: "^".to_string(),
                value: "-1".to_string()
            }
        );
        assert_eq!(
            eval_err("1 0 /").to_string(),
            "division by zero"
        );
    }

    #[test]
    fn failed_lines_leave_the_stack_untouched() {
        let mut stack = Stack::new();
        let mut random = Fixed(0);
        stack.eval_line("1 2", Base::Decimal, &mut random).unwrap();
        assert!(stack.eval_line("3 + 0 /", Base::Decimal, &mut random).is_err());
        assert_eq!(stack.format(Base::Decimal, true), "1 2");
        assert_eq!(stack.values().len(), 2);
    }

    #[test]
    fn small_conversions() {
        assert_eq!(to_u64(&BigInteger::from(u64::MAX)), Some(u64::MAX));
        assert_eq!(to_u64(&BigInteger::value_of(-1)), None);
        assert_eq!(to_i64(&BigInteger::value_of(i64::MIN)), Some(i64::MIN));
        assert_eq!(to_i64(&BigInteger::from(u64::MAX)), None);
    }
}
