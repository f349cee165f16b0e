//! Arbitrary exponent decimal numbers.

use crate::Number;
use decimal_rs::DecimalParseError;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Possible errors that can arise during dealing with number.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NumberError {
    Overflow,
    FormatError,
}

impl fmt::Display for NumberError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberError::Overflow => write!(f, "numeric overflow"),
            NumberError::FormatError => write!(f, "invalid number literal"),
        }
    }
}

impl Error for NumberError {}

/// A decimal number `sign × significand × 10^exponent`.
///
/// Equality is structural: `1e1` and `10e0` are different values.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BigNumber {
    significand: u64,
    exponent: i32,
    negative: bool,
}

impl BigNumber {
    #[inline]
    pub const fn new(significand: u64, exponent: i32, negative: bool) -> Self {
        Self {
            significand,
            exponent,
            negative,
        }
    }

    #[inline]
    pub const fn significand(&self) -> u64 {
        self.significand
    }

    #[inline]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Converts to the nearest `f64`; precision loss for extreme exponents is accepted.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        let magnitude = self.significand as f64 * 10f64.powi(self.exponent);
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Returns the exact integer value, or `None` if the number has a fractional part or does
    /// not fit in `i128`.
    pub fn to_i128(&self) -> Option<i128> {
        if self.significand == 0 {
            return Some(0);
        }

        let magnitude = if self.exponent >= 0 {
            10i128
                .checked_pow(self.exponent as u32)?
                .checked_mul(self.significand as i128)?
        } else {
            // 10^20 already exceeds every non-zero u64, so the remainder cannot be zero past it.
            let divisor = 10u64.checked_pow(self.exponent.unsigned_abs())?;
            if self.significand % divisor != 0 {
                return None;
            }
            (self.significand / divisor) as i128
        };

        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// Converts to an arbitrary-precision [`Number`]. Values too small for it become zero.
    #[inline]
    pub fn to_number(&self) -> Result<Number, NumberError> {
        Number::from_str(&self.to_string()).map_or_else(
            |e| match e {
                DecimalParseError::Underflow => Ok(Number::ZERO),
                DecimalParseError::Overflow => Err(NumberError::Overflow),
                _ => Err(NumberError::FormatError),
            },
            Ok,
        )
    }
}

impl fmt::Display for BigNumber {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.significand)?;
        if self.exponent != 0 {
            write!(f, "e{}", self.exponent)?;
        }
        Ok(())
    }
}

impl FromStr for BigNumber {
    type Err = NumberError;

    /// Parses decimal text such as `-12.50e3`. Leading and trailing zeros are normalized away,
    /// so `-12.50e3` becomes significand `125`, exponent `2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let mut pos = 0;

        let negative = match bytes.first() {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };

        let mut digits: Vec<u8> = Vec::with_capacity(bytes.len());
        let mut fraction_len: i64 = 0;
        let mut seen_dot = false;
        while let Some(&b) = bytes.get(pos) {
            match b {
                b'0'..=b'9' => {
                    digits.push(b - b'0');
                    if seen_dot {
                        fraction_len += 1;
                    }
                }
                b'.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            pos += 1;
        }
        if digits.is_empty() {
            return Err(NumberError::FormatError);
        }

        let mut exponent: i64 = 0;
        if let Some(b'e' | b'E') = bytes.get(pos) {
            let text = &s[pos + 1..];
            if text.is_empty() {
                return Err(NumberError::FormatError);
            }
            exponent = text.parse::<i64>().map_err(|e| match e.kind() {
                std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => NumberError::Overflow,
                _ => NumberError::FormatError,
            })?;
            pos = bytes.len();
        }
        if pos != bytes.len() {
            return Err(NumberError::FormatError);
        }

        let first = digits.iter().position(|d| *d != 0);
        let first = match first {
            Some(first) => first,
            None => return Ok(BigNumber::new(0, 0, false)),
        };
        let mut last = digits.len();
        while digits[last - 1] == 0 {
            last -= 1;
        }
        let trailing_zeros = (digits.len() - last) as i64;

        let mut significand: u64 = 0;
        for d in &digits[first..last] {
            significand = significand
                .checked_mul(10)
                .and_then(|v| v.checked_add(*d as u64))
                .ok_or(NumberError::Overflow)?;
        }

        let exponent = exponent
            .checked_sub(fraction_len)
            .and_then(|e| e.checked_add(trailing_zeros))
            .ok_or(NumberError::Overflow)?;
        let exponent = i32::try_from(exponent).map_err(|_| NumberError::Overflow)?;

        Ok(BigNumber::new(significand, exponent, negative))
    }
}

impl TryFrom<&Number> for BigNumber {
    type Error = NumberError;

    #[inline]
    fn try_from(value: &Number) -> Result<Self, Self::Error> {
        BigNumber::from_str(&value.to_string())
    }
}

impl TryFrom<BigNumber> for Number {
    type Error = NumberError;

    #[inline]
    fn try_from(value: BigNumber) -> Result<Self, Self::Error> {
        value.to_number()
    }
}
