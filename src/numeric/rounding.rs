// ============================================================================
// Rounding
// Round-half-up integer division on scaled values
// ============================================================================

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happens to digits that fall beyond the decimal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingPolicy {
    /// A discarded fraction of one half or more rounds away from zero
    #[default]
    HalfUp,
    /// Discarded digits are dropped (round toward zero)
    Truncate,
}

impl RoundingPolicy {
    #[inline]
    pub fn is_rounded(self) -> bool {
        matches!(self, RoundingPolicy::HalfUp)
    }
}

/// 10^n as a big integer.
pub(crate) fn pow10(n: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), n as usize)
}

/// Divide `dividend` by `divisor`, rounding per `policy`.
///
/// The truncating quotient is moved one unit away from zero when
/// `2·|remainder| >= |divisor|`. The direction follows the sign of the exact
/// quotient, so `-7/2`, `7/-2` and `-7/-2` round to `-4`, `-4` and `4`.
///
/// The caller guarantees `divisor` is non-zero.
pub(crate) fn div_round_half_up(dividend: &BigInt, divisor: &BigInt, policy: RoundingPolicy) -> BigInt {
    debug_assert!(!divisor.is_zero(), "rounding division by zero");

    let (quotient, remainder) = dividend.div_rem(divisor);
    if !policy.is_rounded() || remainder.is_zero() {
        return quotient;
    }

    let twice_remainder = remainder.magnitude().clone() * 2u32;
    if twice_remainder < *divisor.magnitude() {
        return quotient;
    }

    // remainder != 0 implies dividend != 0, so both signs are meaningful here
    if dividend.is_negative() == divisor.is_negative() {
        quotient + BigInt::one()
    } else {
        quotient - BigInt::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div(a: i64, b: i64, policy: RoundingPolicy) -> i64 {
        let q = div_round_half_up(&BigInt::from(a), &BigInt::from(b), policy);
        i64::try_from(q).unwrap()
    }

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0), BigInt::from(1));
        assert_eq!(pow10(3), BigInt::from(1000));
        assert_eq!(pow10(32).to_string(), format!("1{}", "0".repeat(32)));
    }

    #[test]
    fn test_half_rounds_away_from_zero_in_all_quadrants() {
        let p = RoundingPolicy::HalfUp;
        assert_eq!(div(7, 2, p), 4);
        assert_eq!(div(-7, 2, p), -4);
        assert_eq!(div(7, -2, p), -4);
        assert_eq!(div(-7, -2, p), 4);
    }

    #[test]
    fn test_below_half_keeps_truncated_quotient() {
        let p = RoundingPolicy::HalfUp;
        assert_eq!(div(10, 3, p), 3);
        assert_eq!(div(-10, 3, p), -3);
        assert_eq!(div(10, -3, p), -3);
        assert_eq!(div(-10, -3, p), 3);
    }

    #[test]
    fn test_above_half_rounds_up_in_magnitude() {
        let p = RoundingPolicy::HalfUp;
        assert_eq!(div(11, 3, p), 4);
        assert_eq!(div(-11, 3, p), -4);
        assert_eq!(div(11, -3, p), -4);
        assert_eq!(div(-11, -3, p), 4);
    }

    #[test]
    fn test_truncate_policy() {
        let p = RoundingPolicy::Truncate;
        assert_eq!(div(7, 2, p), 3);
        assert_eq!(div(-7, 2, p), -3);
        assert_eq!(div(11, -3, p), -3);
    }

    #[test]
    fn test_exact_division() {
        assert_eq!(div(12, 4, RoundingPolicy::HalfUp), 3);
        assert_eq!(div(0, 5, RoundingPolicy::HalfUp), 0);
        assert_eq!(div(-12, 4, RoundingPolicy::HalfUp), -3);
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(RoundingPolicy::default(), RoundingPolicy::HalfUp);
        assert!(RoundingPolicy::HalfUp.is_rounded());
        assert!(!RoundingPolicy::Truncate.is_rounded());
    }
}
