//! # Traits
//!
//! The tableau is kept fraction free: every value is an integer and rows are rescaled by their
//! greatest common divisor whenever they are combined. The integer type is therefore required
//! to support exact division, gcd computations and a sign query, on top of the usual ring
//! operations.
//!
//! Fixed width integers are accepted, but the caller takes responsibility for the range of the
//! intermediate values. Arbitrary precision is available through `BigInt`.
use std::fmt::{Debug, Display};
use std::ops::{AddAssign, MulAssign, SubAssign};

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

/// Signed integers that the tableau can be computed with.
///
/// All operations are in place where possible, such that arbitrary precision implementations
/// don't need to allocate for temporaries.
pub trait IntType:
    Clone +
    Debug +
    Display +
    Eq +
    Ord +
    Zero +
    One +
    From<i64> +
    for<'r> AddAssign<&'r Self> +
    for<'r> SubAssign<&'r Self> +
    for<'r> MulAssign<&'r Self> +
{
    /// Sign of the number.
    ///
    /// # Return value
    ///
    /// `-1`, `0` or `1`.
    fn sign(&self) -> i32;

    /// Replace the number by its additive inverse.
    fn negate(&mut self);

    /// Greatest common divisor.
    ///
    /// # Return value
    ///
    /// A non negative number, which is zero only when both `self` and `other` are zero.
    fn gcd_with(&self, other: &Self) -> Self;

    /// Divide by a number that is known to divide `self`.
    ///
    /// # Arguments
    ///
    /// * `divisor`: Non zero, divides `self` without remainder.
    fn div_assign_exact(&mut self, divisor: &Self);

    /// Multiply by a machine sized integer.
    fn mul_small(&mut self, factor: i64);

    /// Convert to an arbitrary precision integer.
    fn to_big_int(&self) -> BigInt;

    /// Convert from an arbitrary precision integer.
    ///
    /// # Return value
    ///
    /// `None` if the value is out of range for this type.
    fn from_big_int(value: &BigInt) -> Option<Self>;

    /// Whether the number is strictly smaller than zero.
    fn is_negative(&self) -> bool {
        self.sign() < 0
    }

    /// Whether the number is strictly larger than zero.
    fn is_positive(&self) -> bool {
        self.sign() > 0
    }

    /// Least common multiple of two positive numbers.
    fn lcm_with(&self, other: &Self) -> Self {
        debug_assert!(self.is_positive() && other.is_positive());

        let gcd = self.gcd_with(other);
        let mut result = self.clone();
        result.div_assign_exact(&gcd);
        result *= other;
        result
    }
}

macro_rules! int_type_primitive {
    ($t:ty, $to:ident) => {
        impl IntType for $t {
            fn sign(&self) -> i32 {
                self.signum() as i32
            }

            fn negate(&mut self) {
                *self = -*self;
            }

            fn gcd_with(&self, other: &Self) -> Self {
                Integer::gcd(self, other)
            }

            fn div_assign_exact(&mut self, divisor: &Self) {
                debug_assert_ne!(*divisor, 0);
                debug_assert_eq!(*self % divisor, 0);

                *self /= divisor;
            }

            fn mul_small(&mut self, factor: i64) {
                *self *= factor as $t;
            }

            fn to_big_int(&self) -> BigInt {
                BigInt::from(*self)
            }

            fn from_big_int(value: &BigInt) -> Option<Self> {
                value.$to()
            }
        }
    }
}

int_type_primitive!(i64, to_i64);
int_type_primitive!(i128, to_i128);

impl IntType for BigInt {
    fn sign(&self) -> i32 {
        match BigInt::sign(self) {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    fn negate(&mut self) {
        *self = -std::mem::take(self);
    }

    fn gcd_with(&self, other: &Self) -> Self {
        Integer::gcd(self, other)
    }

    fn div_assign_exact(&mut self, divisor: &Self) {
        debug_assert!(!divisor.is_zero());
        debug_assert!((&*self % divisor).is_zero());

        *self /= divisor;
    }

    fn mul_small(&mut self, factor: i64) {
        *self *= factor;
    }

    fn to_big_int(&self) -> BigInt {
        self.clone()
    }

    fn from_big_int(value: &BigInt) -> Option<Self> {
        Some(value.clone())
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;

    use crate::data::number_types::traits::IntType;

    #[test]
    fn sign_and_negate() {
        let mut x = -5_i64;
        assert_eq!(x.sign(), -1);
        x.negate();
        assert_eq!(x, 5);
        assert_eq!(0_i128.sign(), 0);

        let mut y = BigInt::from(-12);
        assert_eq!(IntType::sign(&y), -1);
        y.negate();
        assert_eq!(y, BigInt::from(12));
        assert!(y.is_positive());
    }

    #[test]
    fn gcd_is_non_negative() {
        assert_eq!((-12_i64).gcd_with(&18), 6);
        assert_eq!(0_i64.gcd_with(&0), 0);
        assert_eq!(0_i64.gcd_with(&-7), 7);
        assert_eq!(BigInt::from(-12).gcd_with(&BigInt::from(-18)), BigInt::from(6));
    }

    #[test]
    fn exact_arithmetic() {
        let mut x = 42_i128;
        x.div_assign_exact(&-7);
        assert_eq!(x, -6);
        x.mul_small(-3);
        assert_eq!(x, 18);
        assert_eq!(4_i64.lcm_with(&6), 12);

        let big = BigInt::from(i64::MAX) * BigInt::from(4);
        assert_eq!(i64::from_big_int(&big), None);
        assert_eq!(i128::from_big_int(&big), Some(i64::MAX as i128 * 4));
    }
}
