//! Arbitrary-precision decimal numbers.
//!
//! A [`BigDecimal`] is an unscaled [`BigInt`] and a scale: the value is
//! `unscaled * 10^-scale`. The scale is part of the value, so `1.0` and `1.00`
//! are different decimals, which is what lets the binary and USO encodings
//! reproduce the input exactly.

use num_bigint::BigInt;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An arbitrary-precision decimal: `unscaled * 10^-scale`.
///
/// # Examples
///
/// ```rust
/// use ubo::BigDecimal;
///
/// let price: BigDecimal = "19.990".parse().unwrap();
/// assert_eq!(price.scale(), 3);
/// assert_eq!(price.to_string(), "19.990");
///
/// let large: BigDecimal = "12e3".parse().unwrap();
/// assert_eq!(large.scale(), -3);
/// assert_eq!(large.to_string(), "12e3");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i32,
}

impl BigDecimal {
    #[must_use]
    pub fn new(unscaled: BigInt, scale: i32) -> Self {
        BigDecimal { unscaled, scale }
    }

    #[inline]
    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> i32 {
        self.scale
    }
}

impl From<BigInt> for BigDecimal {
    fn from(value: BigInt) -> Self {
        BigDecimal::new(value, 0)
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        BigDecimal::new(BigInt::from(value), 0)
    }
}

impl fmt::Display for BigDecimal {
    /// Plain notation unless the scale is negative or the adjusted exponent
    /// (`digits - 1 - scale`) drops below -6, in which case the unscaled value
    /// is written with an exponent that restores the scale exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale < 0 {
            return write!(f, "{}e{}", self.unscaled, -(self.scale as i64));
        }

        let digits = self.unscaled.magnitude().to_string();
        let adjusted = digits.len() as i64 - 1 - i64::from(self.scale);
        if adjusted < -6 {
            return write!(f, "{}e{}", self.unscaled, -i64::from(self.scale));
        }

        let sign = if self.unscaled.sign() == num_bigint::Sign::Minus {
            "-"
        } else {
            ""
        };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl FromStr for BigDecimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::invalid_data(format!("invalid decimal literal '{}'", s));

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };
        let (negative, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let mut unscaled = BigInt::from_str(&digits).map_err(|_| invalid())?;
        if negative {
            unscaled = -unscaled;
        }

        let exponent: i64 = match exponent {
            Some(exp) => exp.parse().map_err(|_| invalid())?,
            None => 0,
        };
        let scale = i32::try_from(frac_part.len() as i64 - exponent).map_err(|_| invalid())?;

        Ok(BigDecimal::new(unscaled, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_round_trips() {
        for literal in ["0", "1.50", "-0.05", "123456789012345678901234567890.1", "12e3", "-7e1"] {
            assert_eq!(dec(literal).to_string(), literal);
        }
    }

    #[test]
    fn test_small_values_use_exponent() {
        assert_eq!(dec("0.000001").to_string(), "0.000001");
        assert_eq!(BigDecimal::new(BigInt::from(1), 7).to_string(), "1e-7");
        assert_eq!(dec("1e-7"), BigDecimal::new(BigInt::from(1), 7));

        for value in [
            BigDecimal::new(BigInt::from(1), i32::MAX),
            BigDecimal::new(BigInt::from(-5), 1_000_000),
            BigDecimal::new(BigInt::from(3), i32::MIN),
        ] {
            let text = value.to_string();
            assert!(text.len() < 20, "{}", text);
            assert_eq!(dec(&text), value);
        }
    }

    #[test]
    fn test_scale_is_significant() {
        assert_ne!(dec("1.0"), dec("1.00"));
        assert_eq!(dec("0.05"), BigDecimal::new(BigInt::from(5), 2));
        assert_eq!(dec("1.5e3"), BigDecimal::new(BigInt::from(15), -2));
    }

    #[test]
    fn test_rejects_garbage() {
        for literal in ["", "-", ".", "1.2.3", "abc", "1e", "1ex"] {
            assert!(literal.parse::<BigDecimal>().is_err(), "{}", literal);
        }
    }
}
