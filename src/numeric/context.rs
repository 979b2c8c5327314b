// ============================================================================
// Decimal Context
// Explicit rounding configuration for decimal construction and arithmetic
// ============================================================================

use super::decimal::Decimal;
use super::errors::{NumericError, NumericResult};
use super::parse::parse_scaled;
use super::rounding::{div_round_half_up, pow10, RoundingPolicy};
use num_traits::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rounding configuration applied when digits fall past the decimal scale.
///
/// The plain `Decimal` methods (`multiply`, `divide`, `FromStr`, ...) use
/// `DecimalContext::default()`, which rounds half-up. Build a context
/// explicitly to run the same operations under another policy.
///
/// # Example
/// ```rust
/// use market_primitives::numeric::{Decimal, DecimalContext};
///
/// let third: Decimal = DecimalContext::truncating().parse("0.333").unwrap();
/// let ctx = DecimalContext::default();
/// let one: Decimal = ctx.parse("1").unwrap();
/// assert!(ctx.multiply(&third, &Decimal::from(3)).less_than(&one));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecimalContext {
    pub rounding: RoundingPolicy,
}

impl DecimalContext {
    pub const fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    /// Context that drops excess digits instead of rounding them.
    pub const fn truncating() -> Self {
        Self::new(RoundingPolicy::Truncate)
    }

    /// Parse decimal text at scale `S`.
    ///
    /// # Errors
    /// Returns `InvalidDecimal` if the text is not a finite decimal number.
    pub fn parse<const S: u32>(&self, text: &str) -> NumericResult<Decimal<S>> {
        parse_scaled(text, S, self.rounding).map(Decimal::from_scaled)
    }

    /// Convert a float through its shortest decimal text.
    ///
    /// # Errors
    /// Returns `InvalidDecimal` for NaN and infinities.
    pub fn from_f64<const S: u32>(&self, value: f64) -> NumericResult<Decimal<S>> {
        if !value.is_finite() {
            return Err(NumericError::invalid(value.to_string()));
        }
        self.parse(&value.to_string())
    }

    /// Product of `a` and `b`, rescaled with this context's rounding.
    pub fn multiply<const S: u32>(&self, a: &Decimal<S>, b: &Decimal<S>) -> Decimal<S> {
        let product = a.scaled_value() * b.scaled_value();
        Decimal::from_scaled(div_round_half_up(&product, &pow10(S), self.rounding))
    }

    /// Quotient of `a` and `b`, rounded at the last scale digit.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `b` is zero.
    pub fn divide<const S: u32>(&self, a: &Decimal<S>, b: &Decimal<S>) -> NumericResult<Decimal<S>> {
        if b.scaled_value().is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let widened = a.scaled_value() * pow10(S);
        Ok(Decimal::from_scaled(div_round_half_up(
            &widened,
            b.scaled_value(),
            self.rounding,
        )))
    }

    /// Round `value` to `dp` fractional digits.
    ///
    /// A `dp` at or above the scale returns the value unchanged.
    pub fn round_dp<const S: u32>(&self, value: &Decimal<S>, dp: u32) -> Decimal<S> {
        if dp >= S {
            return value.clone();
        }
        let step = pow10(S - dp);
        let units = div_round_half_up(value.scaled_value(), &step, self.rounding);
        Decimal::from_scaled(units * step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type D4 = Decimal<4>;

    fn d4(s: &str) -> D4 {
        s.parse().unwrap()
    }

    #[test]
    fn test_policies_diverge_on_construction() {
        let rounded: D4 = DecimalContext::default().parse("1.00005").unwrap();
        let truncated: D4 = DecimalContext::truncating().parse("1.00005").unwrap();
        assert_eq!(rounded, d4("1.0001"));
        assert_eq!(truncated, d4("1"));
    }

    #[test]
    fn test_policies_diverge_on_multiply() {
        // 0.0015 * 0.5 = 0.00075
        let a = d4("0.0015");
        let b = d4("0.5");
        assert_eq!(DecimalContext::default().multiply(&a, &b), d4("0.0008"));
        assert_eq!(DecimalContext::truncating().multiply(&a, &b), d4("0.0007"));
    }

    #[test]
    fn test_policies_diverge_on_divide() {
        let two = d4("2");
        let three = d4("3");
        assert_eq!(
            DecimalContext::default().divide(&two, &three).unwrap(),
            d4("0.6667")
        );
        assert_eq!(
            DecimalContext::truncating().divide(&two, &three).unwrap(),
            d4("0.6666")
        );
    }

    #[test]
    fn test_divide_by_zero() {
        let result = DecimalContext::default().divide(&d4("1"), &D4::zero());
        assert_eq!(result, Err(NumericError::DivisionByZero));
    }

    #[test]
    fn test_from_f64() {
        let ctx = DecimalContext::default();
        let x: D4 = ctx.from_f64(0.1).unwrap();
        assert_eq!(x, d4("0.1"));
        let y: D4 = ctx.from_f64(-2.5).unwrap();
        assert_eq!(y, d4("-2.5"));
        assert!(ctx.from_f64::<4>(f64::NAN).is_err());
        assert!(ctx.from_f64::<4>(f64::INFINITY).is_err());
    }

    #[test]
    fn test_round_dp() {
        let ctx = DecimalContext::default();
        assert_eq!(ctx.round_dp(&d4("1.2345"), 2), d4("1.23"));
        assert_eq!(ctx.round_dp(&d4("1.235"), 2), d4("1.24"));
        assert_eq!(ctx.round_dp(&d4("-1.235"), 2), d4("-1.24"));
        assert_eq!(ctx.round_dp(&d4("2.5"), 0), d4("3"));
        assert_eq!(DecimalContext::truncating().round_dp(&d4("1.239"), 2), d4("1.23"));
        assert_eq!(ctx.round_dp(&d4("1.2345"), 9), d4("1.2345"));
    }
}
