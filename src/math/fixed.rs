//! 8.24 fixed-point numbers
//!
//! Every value in the renderer is a scaled integer: `raw = round(v * 2^24)`.
//! Multiplication and division widen to 64 bits before rescaling, so results
//! are bit-identical on every platform.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use serde::{Serialize, Deserialize};

/// Number of fractional bits
pub const FRACTION_BITS: u32 = 24;

/// Fixed-point number with 8 integer bits and 24 fractional bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << FRACTION_BITS);
    pub const HALF: Fixed = Fixed(1 << (FRACTION_BITS - 1));
    /// Smallest representable step (2^-24)
    pub const EPSILON: Fixed = Fixed(1);
    /// Saturating sentinel for positive overflow and x / 0 with x >= 0
    pub const MAX: Fixed = Fixed(i32::MAX);
    /// Saturating sentinel for negative overflow and x / 0 with x < 0
    pub const MIN: Fixed = Fixed(i32::MIN);

    /// Construct from a whole number. Values outside -128..=127 wrap.
    pub const fn from_int(value: i32) -> Self {
        Fixed(value.wrapping_shl(FRACTION_BITS))
    }

    /// Construct from the raw scaled representation
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// Raw scaled representation
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, rounded towards negative infinity
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACTION_BITS
    }

    /// `num / den` as a fixed-point value. A zero denominator or a quotient
    /// outside the 8.24 range returns `MAX`/`MIN`.
    pub fn from_ratio(num: i32, den: i32) -> Self {
        if den == 0 {
            return if num >= 0 { Fixed::MAX } else { Fixed::MIN };
        }
        saturate(((num as i64) << FRACTION_BITS) / den as i64)
    }

    pub fn abs(self) -> Self {
        Fixed(self.0.wrapping_abs())
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply: widen to 64 bits, multiply, arithmetic shift right by 24.
    /// An out-of-range product returns `MAX`/`MIN`.
    pub fn mul(self, rhs: Fixed) -> Fixed {
        saturate((self.0 as i64 * rhs.0 as i64) >> FRACTION_BITS)
    }

    /// Divide: widen the numerator, shift left by 24, integer divide.
    /// A zero denominator or an out-of-range quotient returns `MAX`/`MIN`.
    pub fn div(self, rhs: Fixed) -> Fixed {
        if rhs.0 == 0 {
            return if self.0 >= 0 { Fixed::MAX } else { Fixed::MIN };
        }
        saturate(((self.0 as i64) << FRACTION_BITS) / rhs.0 as i64)
    }

    /// Square root of a non-negative value (negative input yields zero)
    pub fn sqrt(self) -> Fixed {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        // sqrt(raw * 2^24) keeps the 2^24 scale
        Fixed(isqrt((self.0 as u64) << FRACTION_BITS) as i32)
    }

    pub fn min(self, other: Fixed) -> Fixed {
        if self.0 <= other.0 { self } else { other }
    }

    pub fn max(self, other: Fixed) -> Fixed {
        if self.0 >= other.0 { self } else { other }
    }

    pub fn clamp(self, lo: Fixed, hi: Fixed) -> Fixed {
        self.max(lo).min(hi)
    }
}

/// Narrow a widened raw value, clamping to `MIN`/`MAX`
fn saturate(raw: i64) -> Fixed {
    Fixed(raw.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Bit-by-bit integer square root (floor)
pub(crate) fn isqrt(mut n: u64) -> u64 {
    let mut result = 0u64;
    let mut bit = 1u64 << 62;
    while bit > n {
        bit >>= 2;
    }
    while bit != 0 {
        if n >= result + bit {
            n -= result + bit;
            result = (result >> 1) + bit;
        } else {
            result >>= 1;
        }
        bit >>= 2;
    }
    result
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Integer part plus four decimal places, no floats involved
        let neg = self.0 < 0;
        let mag = (self.0 as i64).unsigned_abs();
        let whole = mag >> FRACTION_BITS;
        let frac = ((mag & ((1 << FRACTION_BITS) - 1)) * 10_000) >> FRACTION_BITS;
        write!(f, "{}{}.{:04}", if neg { "-" } else { "" }, whole, frac)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}

impl Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed::div(self, rhs)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed {
    fn mul_assign(&mut self, rhs: Fixed) {
        *self = Fixed::mul(*self, rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for raw in [0, 1, -1, 0x0123_4567, -0x0765_4321, i32::MAX, i32::MIN] {
            let a = Fixed::from_raw(raw);
            assert_eq!(Fixed::from_raw(a.raw()), a);
        }
        assert_eq!(Fixed::from_int(3).raw(), 3 << 24);
        assert_eq!(Fixed::from_int(-2).to_int(), -2);
    }

    #[test]
    fn test_mul_div_inverse() {
        let values = [
            Fixed::from_raw(0x0180_0000),
            Fixed::from_raw(-0x0234_5678),
            Fixed::from_raw(0x0000_1234),
            Fixed::from_int(7),
            Fixed::from_raw(-0x0012_3456),
        ];
        let divisors = [
            Fixed::ONE,
            Fixed::from_int(3),
            Fixed::from_raw(-0x0280_0000),
            Fixed::from_raw(0x0123_4567),
            Fixed::from_int(-5),
        ];
        for &a in &values {
            for &b in &divisors {
                let back = (a * b) / b;
                assert!((back.raw() - a.raw()).abs() <= 1, "{} * {} / {} = {}", a, b, b, back);
            }
        }
    }

    #[test]
    fn test_mul_matches_real_product() {
        assert_eq!(Fixed::from_int(2) * Fixed::HALF, Fixed::ONE);
        assert_eq!(Fixed::from_int(-3) * Fixed::from_int(4), Fixed::from_int(-12));
        assert_eq!(Fixed::from_int(1) / Fixed::from_int(4), Fixed::from_raw(1 << 22));
    }

    #[test]
    fn test_divide_by_zero_saturates() {
        assert_eq!(Fixed::ONE / Fixed::ZERO, Fixed::MAX);
        assert_eq!(Fixed::ZERO / Fixed::ZERO, Fixed::MAX);
        assert_eq!(-Fixed::ONE / Fixed::ZERO, Fixed::MIN);
        // Quotient too large for 8 integer bits
        assert_eq!(Fixed::from_int(100) / Fixed::from_raw(1), Fixed::MAX);
        assert_eq!(Fixed::from_int(-100) / Fixed::from_raw(1), Fixed::MIN);
    }

    #[test]
    fn test_mul_overflow_saturates() {
        assert_eq!(Fixed::from_int(100) * Fixed::from_int(100), Fixed::MAX);
        assert_eq!(Fixed::from_int(-100) * Fixed::from_int(100), Fixed::MIN);
        assert_eq!(Fixed::MIN * Fixed::MIN, Fixed::MAX);
        assert_eq!(Fixed::from_int(-100) * Fixed::HALF, Fixed::from_int(-50));
    }

    #[test]
    fn test_from_ratio() {
        assert_eq!(Fixed::from_ratio(13, 2), Fixed::from_raw(13 << 23));
        assert_eq!(Fixed::from_ratio(-3, 4), Fixed::from_raw(-3 << 22));
        // Numerator beyond the integer range, quotient inside it
        assert_eq!(Fixed::from_ratio(200, 2), Fixed::from_int(100));
        assert_eq!(Fixed::from_ratio(-1000, 10), Fixed::from_int(-100));
        assert_eq!(Fixed::from_ratio(1000, 1), Fixed::MAX);
        assert_eq!(Fixed::from_ratio(-1000, 1), Fixed::MIN);
        assert_eq!(Fixed::from_ratio(1, 0), Fixed::MAX);
        assert_eq!(Fixed::from_ratio(-1, 0), Fixed::MIN);
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(Fixed::from_int(4).sqrt(), Fixed::from_int(2));
        assert_eq!(Fixed::from_int(9).sqrt(), Fixed::from_int(3));
        assert_eq!(Fixed::from_int(-1).sqrt(), Fixed::ZERO);
        let root = Fixed::from_int(2).sqrt();
        assert!((root.raw() - 0x016A_09E6).abs() <= 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Fixed::from_int(5).to_string(), "5.0000");
        assert_eq!(Fixed::HALF.to_string(), "0.5000");
        assert_eq!((-Fixed::HALF).to_string(), "-0.5000");
    }
}
