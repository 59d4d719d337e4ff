/// Decimal arithmetic for token amounts and power scores.
///
/// PRECISION MODEL:
/// `Decimal` wraps `bigdecimal::BigDecimal`, so addition, subtraction,
/// multiplication and integer exponentiation are exact. Division is the only
/// lossy operation and always takes an explicit number of fractional places and
/// a rounding mode. `checked_div` uses the default division context of the
/// big-number library the staking UI was built on (20 fractional places,
/// ROUND_HALF_UP); the power and yield formulas depend on that exact context to
/// reproduce historical outputs digit for digit.
///
/// No floating point is used anywhere. Large deposit terms make 67^n and 66^n
/// grow without bound and any f64 path diverges from the chain's integer math.
use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};
use core::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{Pow, Signed, Zero};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fractional places kept by `checked_div`.
pub const DEFAULT_DIV_PLACES: u32 = 20;

/// Rounding applied by `checked_div`.
pub const DEFAULT_ROUNDING: RoundingMode = RoundingMode::HalfUp;

/// Largest exponent magnitude the parser accepts in `1e<exp>` notation.
pub const MAX_PARSE_EXPONENT: u64 = 1_000;

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Rounding policies, numbered with the conventional big-number library codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Away from zero.
    Up = 0,
    /// Toward zero.
    Down = 1,
    /// Toward positive infinity.
    Ceil = 2,
    /// Toward negative infinity.
    Floor = 3,
    /// Nearest neighbour, ties away from zero.
    HalfUp = 4,
    /// Nearest neighbour, ties toward zero.
    HalfDown = 5,
    /// Nearest neighbour, ties to the even neighbour.
    HalfEven = 6,
    /// Nearest neighbour, ties toward positive infinity.
    HalfCeil = 7,
    /// Nearest neighbour, ties toward negative infinity.
    HalfFloor = 8,
}

impl RoundingMode {
    /// Map a numeric code (as carried in calldata) back to a mode.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => RoundingMode::Up,
            1 => RoundingMode::Down,
            2 => RoundingMode::Ceil,
            3 => RoundingMode::Floor,
            4 => RoundingMode::HalfUp,
            5 => RoundingMode::HalfDown,
            6 => RoundingMode::HalfEven,
            7 => RoundingMode::HalfCeil,
            8 => RoundingMode::HalfFloor,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// The bigdecimal mode that rounds a value of the given sign the same way.
    /// HalfCeil and HalfFloor have no direct counterpart and depend on the sign.
    fn for_sign(self, negative: bool) -> bigdecimal::RoundingMode {
        use bigdecimal::RoundingMode as Big;
        match self {
            RoundingMode::Up => Big::Up,
            RoundingMode::Down => Big::Down,
            RoundingMode::Ceil => Big::Ceiling,
            RoundingMode::Floor => Big::Floor,
            RoundingMode::HalfUp => Big::HalfUp,
            RoundingMode::HalfDown => Big::HalfDown,
            RoundingMode::HalfEven => Big::HalfEven,
            RoundingMode::HalfCeil if negative => Big::HalfDown,
            RoundingMode::HalfCeil => Big::HalfUp,
            RoundingMode::HalfFloor if negative => Big::HalfUp,
            RoundingMode::HalfFloor => Big::HalfDown,
        }
    }
}

fn pow10(exp: u64) -> BigInt {
    Pow::pow(BigInt::from(10u8), exp)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDecimalError {
    #[error("empty decimal literal")]
    Empty,
    #[error("invalid exponent in decimal literal: {0:?}")]
    InvalidExponent(String),
    #[error("invalid decimal literal: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Decimal
// ---------------------------------------------------------------------------

/// Equality and ordering compare values, so `1.50 == 1.5`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn zero() -> Self {
        Decimal::default()
    }

    /// Interpret an integer as a value carrying `scale` fractional digits,
    /// e.g. `from_scaled_integer(1_500, 3) == 1.5`.
    pub fn from_scaled_integer(mantissa: BigInt, scale: u32) -> Self {
        Decimal(BigDecimal::new(mantissa, i64::from(scale)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    pub fn abs(&self) -> Decimal {
        Decimal(self.0.abs())
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// Drop trailing zeros.
    pub fn normalized(&self) -> Decimal {
        Decimal(self.0.normalized())
    }

    /// Round to `places` fractional digits.
    pub fn round(&self, places: u32, mode: RoundingMode) -> Decimal {
        Decimal(self.0.with_scale_round(i64::from(places), mode.for_sign(self.is_negative())))
    }

    /// `self / rhs` rounded to `places` fractional digits. `None` if `rhs` is zero.
    pub fn div_rounded(&self, rhs: &Decimal, places: u32, mode: RoundingMode) -> Option<Decimal> {
        if rhs.is_zero() {
            return None;
        }
        let (a, a_scale) = self.0.as_bigint_and_exponent();
        let (b, b_scale) = rhs.0.as_bigint_and_exponent();

        // Truncated quotient with one guard digit:
        //   (a / 10^sa) / (b / 10^sb) × 10^g  =  a × 10^(sb - sa + g) / b
        let guard = i64::from(places) + 1;
        let shift = b_scale - a_scale + guard;
        let (numerator, denominator) = if shift >= 0 {
            (a * pow10(shift.unsigned_abs()), b)
        } else {
            (a, b * pow10(shift.unsigned_abs()))
        };
        let (quotient, remainder) = numerator.div_rem(&denominator);

        // A non-zero sticky digit marks an inexact quotient, so the final
        // rounding never mistakes it for an exact tie.
        let truncated = if remainder.is_zero() {
            BigDecimal::new(quotient, guard)
        } else {
            let sticky = if numerator.is_negative() == denominator.is_negative() { 1 } else { -1 };
            BigDecimal::new(quotient * 10 + sticky, guard + 1)
        };
        Some(Decimal(truncated).round(places, mode))
    }

    /// Division in the default context: 20 fractional digits, ROUND_HALF_UP.
    pub fn checked_div(&self, rhs: &Decimal) -> Option<Decimal> {
        self.div_rounded(rhs, DEFAULT_DIV_PLACES, DEFAULT_ROUNDING)
    }

    /// Integer part of `self / rhs`, truncated toward zero.
    pub fn div_trunc(&self, rhs: &Decimal) -> Option<Decimal> {
        self.div_rounded(rhs, 0, RoundingMode::Down)
    }

    /// Remainder of truncated division; carries the sign of `self`.
    pub fn rem(&self, rhs: &Decimal) -> Option<Decimal> {
        let quotient = self.div_trunc(rhs)?;
        Some(self - &(&quotient * rhs))
    }

    pub fn pow(&self, exp: u32) -> Decimal {
        let (mantissa, scale) = self.0.as_bigint_and_exponent();
        Decimal(BigDecimal::new(Pow::pow(mantissa, exp), scale * i64::from(exp)))
    }

    /// Mantissa of the value expressed with exactly `scale` fractional digits,
    /// rounding with `mode` if precision has to be dropped.
    pub fn to_scaled_integer(&self, scale: u32, mode: RoundingMode) -> BigInt {
        let (mantissa, _) = self.round(scale, mode).0.with_scale(i64::from(scale)).into_bigint_and_exponent();
        mantissa
    }

    /// Fixed-point notation with exactly `places` fractional digits.
    pub fn to_fixed(&self, places: u32, mode: RoundingMode) -> String {
        let (sign, integer, fraction) = self.fixed_parts(places, mode);
        if fraction.is_empty() {
            format!("{sign}{integer}")
        } else {
            format!("{sign}{integer}.{fraction}")
        }
    }

    /// Like `to_fixed`, with the integer part grouped in threes by `,`.
    pub fn to_format(&self, places: u32, mode: RoundingMode) -> String {
        let (sign, integer, fraction) = self.fixed_parts(places, mode);

        let len = integer.len();
        let mut grouped = String::with_capacity(len + len / 3);
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if fraction.is_empty() {
            format!("{sign}{grouped}")
        } else {
            format!("{sign}{grouped}.{fraction}")
        }
    }

    /// Sign, integer digits and fractional digits after rounding to `places`.
    fn fixed_parts(&self, places: u32, mode: RoundingMode) -> (&'static str, String, String) {
        let mantissa = self.to_scaled_integer(places, mode);
        let sign = if mantissa.is_negative() { "-" } else { "" };
        let digits = mantissa.magnitude().to_str_radix(10);
        let scale = places as usize;
        if scale == 0 {
            return (sign, digits, String::new());
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (integer, fraction) = padded.split_at(padded.len() - scale);
        (sign, integer.to_owned(), fraction.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                fn from(v: $t) -> Self {
                    Decimal::from_scaled_integer(BigInt::from(v), 0)
                }
            }
        )*
    };
}

impl_from_int!(u8, u32, u64, u128, i32, i64, i128);

impl From<BigInt> for Decimal {
    fn from(v: BigInt) -> Self {
        Decimal::from_scaled_integer(v, 0)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Plain or scientific notation. The exponent is bounded before bigdecimal
    /// sees it, so hostile literals fail instead of exhausting memory.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (significand, exponent) = match s.split_once(['e', 'E']) {
            Some((significand, exponent)) => (significand, Some(exponent)),
            None => (s, None),
        };

        let unsigned = significand.strip_prefix(['+', '-']).unwrap_or(significand);
        if unsigned.is_empty() || unsigned == "." {
            return Err(ParseDecimalError::Empty);
        }

        if let Some(exponent) = exponent {
            let value = exponent
                .parse::<i64>()
                .map_err(|_| ParseDecimalError::InvalidExponent(exponent.to_owned()))?;
            if value.unsigned_abs() > MAX_PARSE_EXPONENT {
                return Err(ParseDecimalError::InvalidExponent(exponent.to_owned()));
            }
        }

        BigDecimal::from_str(s)
            .map(Decimal)
            .map_err(|e| ParseDecimalError::Invalid(e.to_string()))
    }
}

/// Plain notation without trailing zeros.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, scale) = self.0.normalized().as_bigint_and_exponent();
        let places = u32::try_from(scale.max(0)).map_err(|_| fmt::Error)?;
        f.write_str(&self.to_fixed(places, RoundingMode::Down))
    }
}

// ---------------------------------------------------------------------------
// Exact arithmetic operators
// ---------------------------------------------------------------------------

macro_rules! forward_binop {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl $trait<&Decimal> for &Decimal {
                type Output = Decimal;
                fn $method(self, rhs: &Decimal) -> Decimal {
                    Decimal((&self.0).$method(&rhs.0))
                }
            }

            impl $trait<&Decimal> for Decimal {
                type Output = Decimal;
                fn $method(self, rhs: &Decimal) -> Decimal {
                    Decimal(self.0.$method(&rhs.0))
                }
            }

            impl $trait<Decimal> for Decimal {
                type Output = Decimal;
                fn $method(self, rhs: Decimal) -> Decimal {
                    Decimal(self.0.$method(rhs.0))
                }
            }
        )*
    };
}

forward_binop!(Add::add, Sub::sub, Mul::mul);

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_plain_and_fractional() {
        assert_eq!(d("1000"), Decimal::from(1_000u64));
        assert_eq!(d("1.5"), Decimal::from_scaled_integer(BigInt::from(15), 1));
        assert_eq!(d("-0.25").to_string(), "-0.25");
        assert_eq!(d(".5").to_string(), "0.5");
        assert_eq!(d("7.").to_string(), "7");
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(d("1e18"), Decimal::from(1_000_000_000_000_000_000u128));
        assert_eq!(d("2.5E-3").to_string(), "0.0025");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Decimal>(), Err(ParseDecimalError::Empty));
        assert_eq!(".".parse::<Decimal>(), Err(ParseDecimalError::Empty));
        assert!(matches!("12a".parse::<Decimal>(), Err(ParseDecimalError::Invalid(_))));
        assert!(matches!("1e".parse::<Decimal>(), Err(ParseDecimalError::InvalidExponent(_))));
        assert!(matches!("1.2.3".parse::<Decimal>(), Err(ParseDecimalError::Invalid(_))));
    }

    /// Exponents that would overflow the scale are errors, not panics.
    #[test]
    fn test_parse_rejects_extreme_exponents() {
        for literal in ["1e-9223372036854775808", "1.5e-9223372036854775808", "1e9223372036854775807"] {
            assert!(
                matches!(literal.parse::<Decimal>(), Err(ParseDecimalError::InvalidExponent(_))),
                "{literal} must be rejected",
            );
        }
    }

    /// A huge but representable exponent is refused before any digits are built.
    #[test]
    fn test_parse_caps_exponent_magnitude() {
        assert!(matches!("1e4294967295".parse::<Decimal>(), Err(ParseDecimalError::InvalidExponent(_))));
        assert!(matches!("1e-1001".parse::<Decimal>(), Err(ParseDecimalError::InvalidExponent(_))));
        assert!("1e1000".parse::<Decimal>().is_ok());
        assert_eq!(d("1e-1000").round(0, RoundingMode::Up), d("1"));
    }

    /// Equality ignores trailing zeros.
    #[test]
    fn test_equality_is_scale_independent() {
        assert_eq!(d("1.50"), d("1.5"));
        assert!(d("0.1") < d("0.10000000000000000001"));
    }

    #[test]
    fn test_checked_div_default_context() {
        // 3000 / 700 = 4.285714285714285714285714…, the 21st digit rounds half up.
        assert_eq!(d("3000").checked_div(&d("700")).unwrap(), d("4.28571428571428571429"));
        // 2 / 3 keeps 20 places.
        assert_eq!(d("2").checked_div(&d("3")).unwrap(), d("0.66666666666666666667"));
        assert!(d("1").checked_div(&Decimal::zero()).is_none());
    }

    /// An inexact quotient just above a tie must not round as a tie.
    #[test]
    fn test_div_rounded_inexact_near_tie() {
        // 1 / 8 = 0.125 exactly: a true tie at 2 places.
        assert_eq!(d("1").div_rounded(&d("8"), 2, RoundingMode::HalfDown).unwrap(), d("0.12"));
        // 1001 / 8000 = 0.125125: above the tie.
        assert_eq!(d("1001").div_rounded(&d("8000"), 2, RoundingMode::HalfDown).unwrap(), d("0.13"));
        // 1 / 3 at 0 places rounds Up to 1 and Down to 0.
        assert_eq!(d("1").div_rounded(&d("3"), 0, RoundingMode::Up).unwrap(), d("1"));
        assert_eq!(d("-1").div_rounded(&d("3"), 0, RoundingMode::Floor).unwrap(), d("-1"));
        assert_eq!(d("-1").div_rounded(&d("3"), 0, RoundingMode::Ceil).unwrap(), d("0"));
    }

    #[test]
    fn test_div_trunc_and_rem() {
        assert_eq!(d("67").div_trunc(&d("66")).unwrap(), d("1"));
        assert_eq!(d("67").rem(&d("66")).unwrap(), d("1"));
        // Remainder follows the dividend's sign.
        assert_eq!(d("-7").rem(&d("2")).unwrap(), d("-1"));
        assert_eq!(d("-7").div_trunc(&d("2")).unwrap(), d("-3"));
    }

    #[test]
    fn test_round_modes_on_tie() {
        let tie = d("2.5");
        assert_eq!(tie.round(0, RoundingMode::Up), d("3"));
        assert_eq!(tie.round(0, RoundingMode::Down), d("2"));
        assert_eq!(tie.round(0, RoundingMode::Ceil), d("3"));
        assert_eq!(tie.round(0, RoundingMode::Floor), d("2"));
        assert_eq!(tie.round(0, RoundingMode::HalfUp), d("3"));
        assert_eq!(tie.round(0, RoundingMode::HalfDown), d("2"));
        assert_eq!(tie.round(0, RoundingMode::HalfEven), d("2"));
        assert_eq!(tie.round(0, RoundingMode::HalfCeil), d("3"));
        assert_eq!(tie.round(0, RoundingMode::HalfFloor), d("2"));
    }

    #[test]
    fn test_round_modes_on_negative_tie() {
        let tie = d("-2.5");
        assert_eq!(tie.round(0, RoundingMode::Up), d("-3"));
        assert_eq!(tie.round(0, RoundingMode::Down), d("-2"));
        assert_eq!(tie.round(0, RoundingMode::Ceil), d("-2"));
        assert_eq!(tie.round(0, RoundingMode::Floor), d("-3"));
        assert_eq!(tie.round(0, RoundingMode::HalfUp), d("-3"));
        assert_eq!(tie.round(0, RoundingMode::HalfDown), d("-2"));
        assert_eq!(tie.round(0, RoundingMode::HalfEven), d("-2"));
        assert_eq!(tie.round(0, RoundingMode::HalfCeil), d("-2"));
        assert_eq!(tie.round(0, RoundingMode::HalfFloor), d("-3"));
    }

    #[test]
    fn test_round_half_even_odd_quotient() {
        assert_eq!(d("3.5").round(0, RoundingMode::HalfEven), d("4"));
        assert_eq!(d("0.125").round(2, RoundingMode::HalfEven), d("0.12"));
    }

    #[test]
    fn test_round_up_never_touches_exact_values() {
        assert_eq!(d("1.20").round(1, RoundingMode::Up), d("1.2"));
        assert_eq!(d("7").round(3, RoundingMode::Up).to_fixed(3, RoundingMode::Up), "7.000");
    }

    #[test]
    fn test_pow_is_exact() {
        assert_eq!(d("67").pow(2), d("4489"));
        assert_eq!(d("1.1").pow(2), d("1.21"));
        assert_eq!(d("66").pow(0), d("1"));
    }

    #[test]
    fn test_to_fixed_pads_and_rounds() {
        assert_eq!(d("0.1").to_fixed(9, RoundingMode::Down), "0.100000000");
        assert_eq!(d("0.0076142131979695431472").to_fixed(9, RoundingMode::Down), "0.007614213");
        assert_eq!(d("523809523.80952380952").to_fixed(0, RoundingMode::HalfUp), "523809524");
        assert_eq!(d("-0.004").to_fixed(2, RoundingMode::HalfUp), "0.00");
    }

    #[test]
    fn test_to_format_groups_thousands() {
        assert_eq!(d("1234567.891").to_format(2, RoundingMode::Down), "1,234,567.89");
        assert_eq!(d("999").to_format(0, RoundingMode::Down), "999");
        assert_eq!(d("1000").to_format(0, RoundingMode::Down), "1,000");
        assert_eq!(d("-123456").to_format(1, RoundingMode::Down), "-123,456.0");
    }

    #[test]
    fn test_scaled_integer_round_trip() {
        let v = d("0.023350253807106598985");
        let scaled = v.to_scaled_integer(9, RoundingMode::Down);
        assert_eq!(scaled, BigInt::from(23_350_253u64));
        assert_eq!(Decimal::from_scaled_integer(scaled, 9), d("0.023350253"));
    }

    #[test]
    fn test_is_integer() {
        assert!(d("5.000").is_integer());
        assert!(!d("5.001").is_integer());
    }

    #[test]
    fn test_rounding_mode_codes() {
        for code in 0u8..=8 {
            assert_eq!(RoundingMode::from_code(code).map(RoundingMode::code), Some(code));
        }
        assert_eq!(RoundingMode::from_code(9), None);
    }
}
