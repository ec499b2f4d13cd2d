// ============================================================================
// Big Fixed-Point
// Arbitrary-precision binary fixed-point arithmetic with explicit precision
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Signed fixed-point number of unbounded magnitude.
///
/// Internally stores `value × 2^frac_bits` as a `BigInt`. The number of
/// fractional bits is carried by every value rather than configured
/// globally, so values at different precisions can coexist in one process.
/// Binary operations require both operands to share `frac_bits`.
///
/// # Rounding
/// Shifts and divisions round toward negative infinity. Decimal rendering
/// truncates toward zero; decimal parsing rounds to nearest.
///
/// # Example
/// ```
/// use bbp_pi::numeric::BigFixed;
///
/// let quarter = BigFixed::from_ratio(1, 4, 64)?;
/// assert_eq!(quarter.to_decimal_string(2)?, "0.25");
///
/// let parsed = BigFixed::parse_decimal("0.25", 64)?;
/// assert_eq!(parsed, quarter);
/// # Ok::<(), bbp_pi::numeric::NumericError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigFixed {
    mantissa: BigInt,
    frac_bits: u64,
}

/// log10(2) scaled by 10^5, for sizing decimal output from a bit count
const LOG10_2_SCALED: u64 = 30_103;

/// Fractional digits kept when approximating with `rust_decimal`
const APPROXIMATION_DIGITS: usize = 18;

fn shift_amount(bits: u64) -> NumericResult<usize> {
    usize::try_from(bits).map_err(|_| NumericError::Overflow)
}

fn pow10(n: usize) -> NumericResult<BigInt> {
    let exponent = u32::try_from(n).map_err(|_| NumericError::Overflow)?;
    Ok(BigInt::from(10u32).pow(exponent))
}

fn is_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl BigFixed {
    // ========================================================================
    // Construction
    // ========================================================================

    /// The additive identity at the given precision.
    pub fn zero(frac_bits: u64) -> Self {
        Self {
            mantissa: BigInt::zero(),
            frac_bits,
        }
    }

    /// Create from a raw scaled mantissa.
    pub fn from_raw(mantissa: BigInt, frac_bits: u64) -> Self {
        Self {
            mantissa,
            frac_bits,
        }
    }

    /// Create from an integer value.
    ///
    /// # Errors
    /// Returns `Overflow` if `frac_bits` does not fit a shift amount.
    pub fn from_integer(value: i64, frac_bits: u64) -> NumericResult<Self> {
        let shift = shift_amount(frac_bits)?;
        Ok(Self::from_raw(BigInt::from(value) << shift, frac_bits))
    }

    /// Create `numerator / denominator`, rounded down to `frac_bits`.
    ///
    /// # Errors
    /// Returns `DivisionByZero` when `denominator` is zero.
    pub fn from_ratio(numerator: u64, denominator: u64, frac_bits: u64) -> NumericResult<Self> {
        if denominator == 0 {
            return Err(NumericError::DivisionByZero);
        }
        let shift = shift_amount(frac_bits)?;
        let scaled = BigInt::from(numerator) << shift;
        Ok(Self::from_raw(
            scaled.div_floor(&BigInt::from(denominator)),
            frac_bits,
        ))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The raw scaled mantissa (`value × 2^frac_bits`).
    #[inline]
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Number of fractional bits carried by this value.
    #[inline]
    pub const fn frac_bits(&self) -> u64 {
        self.frac_bits
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Integer part, truncated toward zero.
    pub fn integer_part(&self) -> NumericResult<BigInt> {
        let (int_part, _) = self.split_magnitude(0)?;
        Ok(if self.is_negative() { -int_part } else { int_part })
    }

    /// Decimal digits needed to show every fractional bit.
    pub fn display_digits(&self) -> usize {
        let digits = self.frac_bits.saturating_mul(LOG10_2_SCALED) / 100_000 + 1;
        usize::try_from(digits).unwrap_or(usize::MAX)
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Exact addition.
    ///
    /// # Errors
    /// Returns `ScaleMismatch` if the operands differ in precision.
    pub fn checked_add(&self, rhs: &Self) -> NumericResult<Self> {
        self.ensure_same_scale(rhs)?;
        Ok(Self::from_raw(&self.mantissa + &rhs.mantissa, self.frac_bits))
    }

    /// Exact subtraction.
    ///
    /// # Errors
    /// Returns `ScaleMismatch` if the operands differ in precision.
    pub fn checked_sub(&self, rhs: &Self) -> NumericResult<Self> {
        self.ensure_same_scale(rhs)?;
        Ok(Self::from_raw(&self.mantissa - &rhs.mantissa, self.frac_bits))
    }

    /// Divide by `base^exponent`, rounding down.
    ///
    /// Powers of two reduce to a right shift; any other base materializes
    /// the power as a big integer.
    ///
    /// # Errors
    /// - `DivisionByZero` for a zero base with a positive exponent
    /// - `Overflow` if the exponent exceeds the machine range
    pub fn checked_div_pow(&self, base: u64, exponent: u64) -> NumericResult<Self> {
        if exponent == 0 || base == 1 {
            return Ok(self.clone());
        }
        if base == 0 {
            return Err(NumericError::DivisionByZero);
        }

        if base.is_power_of_two() {
            let shift = u64::from(base.trailing_zeros())
                .checked_mul(exponent)
                .ok_or(NumericError::Overflow)?;
            let shift = shift_amount(shift)?;
            return Ok(Self::from_raw(&self.mantissa >> shift, self.frac_bits));
        }

        let exponent = u32::try_from(exponent).map_err(|_| NumericError::Overflow)?;
        let divisor = BigInt::from(base).pow(exponent);
        Ok(Self::from_raw(
            self.mantissa.div_floor(&divisor),
            self.frac_bits,
        ))
    }

    /// Absolute difference `|self - rhs|`.
    ///
    /// # Errors
    /// Returns `ScaleMismatch` if the operands differ in precision.
    pub fn abs_diff(&self, rhs: &Self) -> NumericResult<Self> {
        let diff = self.checked_sub(rhs)?;
        Ok(Self::from_raw(diff.mantissa.abs(), self.frac_bits))
    }

    fn ensure_same_scale(&self, rhs: &Self) -> NumericResult<()> {
        if self.frac_bits == rhs.frac_bits {
            Ok(())
        } else {
            Err(NumericError::ScaleMismatch)
        }
    }

    // ========================================================================
    // Decimal Conversion
    // ========================================================================

    /// Integer part and the first `frac_digits` decimal digits of `|self|`,
    /// both truncated.
    fn split_magnitude(&self, frac_digits: usize) -> NumericResult<(BigInt, BigInt)> {
        let shift = shift_amount(self.frac_bits)?;
        let magnitude = self.mantissa.abs();
        let int_part = &magnitude >> shift;
        let remainder = &magnitude - (&int_part << shift);
        let scaled = (remainder * pow10(frac_digits)?) >> shift;
        Ok((int_part, scaled))
    }

    /// Render as a base-10 fixed-point string with exactly `frac_digits`
    /// fractional digits, truncated toward zero.
    ///
    /// A minus sign is emitted only for values whose rendering is nonzero.
    pub fn to_decimal_string(&self, frac_digits: usize) -> NumericResult<String> {
        let (int_part, scaled) = self.split_magnitude(frac_digits)?;
        let negative = self.is_negative() && !(int_part.is_zero() && scaled.is_zero());
        let sign = if negative { "-" } else { "" };

        if frac_digits == 0 {
            return Ok(format!("{}{}", sign, int_part));
        }

        let digits = scaled.to_string();
        let padding = "0".repeat(frac_digits.saturating_sub(digits.len()));
        Ok(format!("{}{}.{}{}", sign, int_part, padding, digits))
    }

    /// First `count` fractional decimal digits of `|self|`, truncated.
    pub fn fractional_digits(&self, count: usize) -> NumericResult<String> {
        let (_, scaled) = self.split_magnitude(count)?;
        let digits = scaled.to_string();
        Ok(format!(
            "{}{}",
            "0".repeat(count.saturating_sub(digits.len())),
            digits
        ))
    }

    /// Parse a base-10 fixed-point string at the given precision.
    ///
    /// Accepts an optional sign, integer digits, and an optional radix point
    /// followed by any number of fractional digits. The fraction is rounded
    /// to the nearest representable value.
    ///
    /// # Examples
    /// - "3" -> 3
    /// - "0.25" -> 0.25
    /// - "-1.5" -> -1.5
    /// - ".5" -> 0.5
    pub fn parse_decimal(text: &str, frac_bits: u64) -> NumericResult<Self> {
        let text = text.trim();
        let (negative, unsigned) = if let Some(rest) = text.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = text.strip_prefix('+') {
            (false, rest)
        } else {
            (false, text)
        };

        let (int_str, frac_str) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_str.is_empty() && frac_str.is_empty() {
            return Err(NumericError::InvalidInput);
        }
        if !is_ascii_digits(int_str) || !is_ascii_digits(frac_str) {
            return Err(NumericError::InvalidInput);
        }

        let shift = shift_amount(frac_bits)?;
        let int_val = if int_str.is_empty() {
            BigInt::zero()
        } else {
            BigInt::parse_bytes(int_str.as_bytes(), 10).ok_or(NumericError::InvalidInput)?
        };
        let mut mantissa = int_val << shift;

        if !frac_str.is_empty() {
            let frac_val =
                BigInt::parse_bytes(frac_str.as_bytes(), 10).ok_or(NumericError::InvalidInput)?;
            let scale = pow10(frac_str.len())?;
            let half = &scale >> 1usize;
            mantissa += ((frac_val << shift) + half).div_floor(&scale);
        }

        if negative {
            mantissa = -mantissa;
        }
        Ok(Self::from_raw(mantissa, frac_bits))
    }

    /// Convert to `rust_decimal::Decimal`.
    ///
    /// This is intended for display/debugging only; digits past the
    /// eighteenth fractional place are dropped.
    ///
    /// # Errors
    /// Returns `Overflow` if the integer part does not fit a `Decimal`.
    pub fn to_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        let text = self.to_decimal_string(APPROXIMATION_DIGITS)?;
        rust_decimal::Decimal::from_str(&text).map_err(|_| NumericError::Overflow)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialOrd for BigFixed {
    /// Values at different precisions are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.frac_bits == other.frac_bits {
            Some(self.mantissa.cmp(&other.mantissa))
        } else {
            None
        }
    }
}

impl Neg for BigFixed {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_raw(-self.mantissa, self.frac_bits)
    }
}

impl fmt::Debug for BigFixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigFixed<{}>({})", self.frac_bits, self)
    }
}

impl fmt::Display for BigFixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal_string(self.display_digits()) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}/2^{}", self.mantissa, self.frac_bits),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BITS: u64 = 128;

    #[test]
    fn test_zero() {
        let zero = BigFixed::zero(BITS);
        assert!(zero.is_zero());
        assert_eq!(zero.frac_bits(), BITS);
        assert_eq!(zero.to_decimal_string(5).unwrap(), "0.00000");
    }

    #[test]
    fn test_from_integer() {
        let x = BigFixed::from_integer(3, BITS).unwrap();
        assert_eq!(x.integer_part().unwrap(), BigInt::from(3));
        assert_eq!(x.to_decimal_string(3).unwrap(), "3.000");

        let y = BigFixed::from_integer(-7, BITS).unwrap();
        assert!(y.is_negative());
        assert_eq!(y.integer_part().unwrap(), BigInt::from(-7));
    }

    #[test]
    fn test_from_ratio_exact() {
        let quarter = BigFixed::from_ratio(1, 4, BITS).unwrap();
        assert_eq!(quarter.to_decimal_string(4).unwrap(), "0.2500");
    }

    #[test]
    fn test_from_ratio_truncates() {
        let third = BigFixed::from_ratio(1, 3, BITS).unwrap();
        assert_eq!(third.to_decimal_string(10).unwrap(), "0.3333333333");

        let two_thirds = BigFixed::from_ratio(2, 3, BITS).unwrap();
        assert_eq!(two_thirds.to_decimal_string(10).unwrap(), "0.6666666666");
    }

    #[test]
    fn test_from_ratio_division_by_zero() {
        assert_eq!(
            BigFixed::from_ratio(1, 0, BITS),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_checked_add_and_sub() {
        let a = BigFixed::from_ratio(1, 2, BITS).unwrap();
        let b = BigFixed::from_ratio(1, 4, BITS).unwrap();

        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.to_decimal_string(2).unwrap(), "0.75");

        let diff = b.checked_sub(&a).unwrap();
        assert!(diff.is_negative());
        assert_eq!(diff.to_decimal_string(2).unwrap(), "-0.25");
    }

    #[test]
    fn test_scale_mismatch() {
        let a = BigFixed::from_integer(1, 64).unwrap();
        let b = BigFixed::from_integer(1, 65).unwrap();
        assert_eq!(a.checked_add(&b), Err(NumericError::ScaleMismatch));
        assert_eq!(a.checked_sub(&b), Err(NumericError::ScaleMismatch));
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn test_div_pow_shift_matches_generic_division() {
        let x = BigFixed::from_integer(5, BITS).unwrap();
        let by_shift = x.checked_div_pow(16, 3).unwrap();
        let by_two = x.checked_div_pow(2, 12).unwrap();
        assert_eq!(by_shift, by_two);

        let by_ten = BigFixed::from_integer(1, BITS)
            .unwrap()
            .checked_div_pow(10, 3)
            .unwrap();
        assert_eq!(by_ten.to_decimal_string(3).unwrap(), "0.000");
        assert_eq!(by_ten.to_decimal_string(6).unwrap(), "0.000999");
    }

    #[test]
    fn test_div_pow_edge_cases() {
        let x = BigFixed::from_integer(9, BITS).unwrap();
        assert_eq!(x.checked_div_pow(16, 0).unwrap(), x);
        assert_eq!(x.checked_div_pow(1, 40).unwrap(), x);
        assert_eq!(x.checked_div_pow(0, 2), Err(NumericError::DivisionByZero));

        // Shifted past every bit
        assert!(x.checked_div_pow(16, 100).unwrap().is_zero());
    }

    #[test]
    fn test_abs_diff() {
        let a = BigFixed::from_ratio(1, 8, BITS).unwrap();
        let b = BigFixed::from_ratio(3, 8, BITS).unwrap();
        assert_eq!(a.abs_diff(&b).unwrap(), b.abs_diff(&a).unwrap());
        assert_eq!(a.abs_diff(&b).unwrap().to_decimal_string(2).unwrap(), "0.25");
    }

    #[test]
    fn test_negative_display_suppresses_negative_zero() {
        let tiny = -BigFixed::from_raw(BigInt::from(1), BITS);
        assert_eq!(tiny.to_decimal_string(3).unwrap(), "0.000");
    }

    #[test]
    fn test_parse_decimal() {
        let x = BigFixed::parse_decimal("3.25", BITS).unwrap();
        assert_eq!(x, BigFixed::from_ratio(13, 4, BITS).unwrap());

        let y = BigFixed::parse_decimal("-0.5", BITS).unwrap();
        assert_eq!(y, -BigFixed::from_ratio(1, 2, BITS).unwrap());

        let z = BigFixed::parse_decimal("+.5", BITS).unwrap();
        assert_eq!(z, BigFixed::from_ratio(1, 2, BITS).unwrap());

        let w = BigFixed::parse_decimal("42", BITS).unwrap();
        assert_eq!(w.integer_part().unwrap(), BigInt::from(42));
    }

    #[test]
    fn test_parse_decimal_invalid() {
        for bad in ["", "-", ".", "1.2.3", "abc", "1e5", "0x10", "1 .5"] {
            assert_eq!(
                BigFixed::parse_decimal(bad, BITS),
                Err(NumericError::InvalidInput),
                "input {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rounds_to_nearest() {
        // 0.1 is not dyadic; the parsed value must sit within half an ulp
        let x = BigFixed::parse_decimal("0.1", 8).unwrap();
        // 0.1 * 256 = 25.6 -> 26
        assert_eq!(x.mantissa(), &BigInt::from(26));
    }

    #[test]
    fn test_fractional_digits() {
        let x = BigFixed::parse_decimal("3.0625", BITS).unwrap();
        assert_eq!(x.fractional_digits(6).unwrap(), "062500");
        assert_eq!(x.fractional_digits(2).unwrap(), "06");
    }

    #[test]
    fn test_to_decimal() {
        let x = BigFixed::from_ratio(1, 8, BITS).unwrap();
        let d = x.to_decimal().unwrap();
        assert_eq!(d, rust_decimal::Decimal::new(125, 3));
    }

    #[test]
    fn test_display_uses_all_fractional_bits() {
        let x = BigFixed::from_ratio(1, 2, 10).unwrap();
        // 10 bits -> 4 decimal digits
        assert_eq!(x.display_digits(), 4);
        assert_eq!(x.to_string(), "0.5000");
        assert_eq!(format!("{:?}", x), "BigFixed<10>(0.5000)");
    }

    #[test]
    fn test_ordering() {
        let a = BigFixed::from_ratio(1, 3, BITS).unwrap();
        let b = BigFixed::from_ratio(1, 2, BITS).unwrap();
        assert!(a < b);
        assert!(b > a);
    }
}
