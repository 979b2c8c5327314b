// ============================================================================
// Scaled Decimal
// Exact fixed-scale decimal arithmetic backed by a big integer
// ============================================================================

use super::context::DecimalContext;
use super::errors::{NumericError, NumericResult};
use super::rounding::{div_round_half_up, pow10, RoundingPolicy};
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Number of fractional digits kept by default.
pub const DEFAULT_SCALE: u32 = 32;

/// Largest mantissa `rust_decimal::Decimal` can hold (2^96 - 1), in bits.
const RUST_DECIMAL_MANTISSA_BITS: u64 = 96;

/// Largest scale `rust_decimal::Decimal` supports.
const RUST_DECIMAL_MAX_SCALE: u32 = 28;

/// Immutable fixed-scale decimal number.
///
/// Internally stores `value × 10^SCALE` as a `BigInt`, so the sign lives in
/// the integer and there is exactly one representation per real value.
/// Addition and subtraction are exact; multiplication and division round
/// half-up at the last scale digit unless a `DecimalContext` says otherwise.
///
/// # Type Parameter
/// - `SCALE`: Number of fractional digits. Default is 32.
///
/// # Example
/// ```rust
/// use market_primitives::numeric::Decimal;
///
/// let a: Decimal = "0.1".parse().unwrap();
/// let b: Decimal = "0.2".parse().unwrap();
/// assert!(a.add(&b).equals(&"0.3".parse().unwrap()));
/// assert_eq!(a.multiply(&b).to_string(), "0.02");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal<const SCALE: u32 = DEFAULT_SCALE> {
    scaled: BigInt,
}

impl<const SCALE: u32> Decimal<SCALE> {
    /// Zero value.
    pub fn zero() -> Self {
        Self::from_scaled(BigInt::zero())
    }

    /// One (1.0).
    pub fn one() -> Self {
        Self::from_scaled(pow10(SCALE))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from a raw scaled integer (`value × 10^SCALE`).
    #[inline]
    pub fn from_scaled(scaled: BigInt) -> Self {
        Self { scaled }
    }

    /// Create from a float through its shortest decimal text.
    ///
    /// # Errors
    /// Returns `InvalidDecimal` for NaN and infinities.
    pub fn from_f64(value: f64) -> NumericResult<Self> {
        DecimalContext::default().from_f64(value)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The raw scaled integer.
    #[inline]
    pub fn scaled_value(&self) -> &BigInt {
        &self.scaled
    }

    /// Integer part, truncated toward zero.
    pub fn integer_part(&self) -> BigInt {
        &self.scaled / pow10(SCALE)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.scaled.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.scaled.is_positive()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.scaled.is_negative()
    }

    /// -1, 0 or 1 according to the sign.
    pub fn signum(&self) -> Self {
        match self.scaled.sign() {
            Sign::Minus => -Self::one(),
            Sign::NoSign => Self::zero(),
            Sign::Plus => Self::one(),
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Exact sum.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_scaled(&self.scaled + &other.scaled)
    }

    /// Exact difference.
    pub fn subtract(&self, other: &Self) -> Self {
        Self::from_scaled(&self.scaled - &other.scaled)
    }

    /// Product, rounded half-up at the last scale digit.
    pub fn multiply(&self, other: &Self) -> Self {
        DecimalContext::default().multiply(self, other)
    }

    /// Quotient, rounded half-up at the last scale digit.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `other` is zero.
    pub fn divide(&self, other: &Self) -> NumericResult<Self> {
        DecimalContext::default().divide(self, other)
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self.clone()
        }
    }

    /// Round half-up to `dp` fractional digits.
    pub fn round_dp(&self, dp: u32) -> Self {
        DecimalContext::default().round_dp(self, dp)
    }

    /// Drop the fractional part.
    pub fn trunc(&self) -> Self {
        DecimalContext::truncating().round_dp(self, 0)
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    #[inline]
    pub fn equals(&self, other: &Self) -> bool {
        self.scaled == other.scaled
    }

    #[inline]
    pub fn greater_than(&self, other: &Self) -> bool {
        self.scaled > other.scaled
    }

    #[inline]
    pub fn less_than(&self, other: &Self) -> bool {
        self.scaled < other.scaled
    }

    #[inline]
    pub fn greater_than_or_equal(&self, other: &Self) -> bool {
        self.greater_than(other) || self.equals(other)
    }

    #[inline]
    pub fn less_than_or_equal(&self, other: &Self) -> bool {
        self.less_than(other) || self.equals(other)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Smallest of `values`, or `None` if there are none.
    pub fn min_of<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        values
            .into_iter()
            .reduce(|best, x| if x.less_than(best) { x } else { best })
            .cloned()
    }

    /// Largest of `values`, or `None` if there are none.
    pub fn max_of<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        values
            .into_iter()
            .reduce(|best, x| if x.greater_than(best) { x } else { best })
            .cloned()
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Nearest `f64`. Lossy; meant for indicators and display.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Convert to `rust_decimal::Decimal` for broker boundaries.
    ///
    /// Digits past `rust_decimal`'s 28-digit scale or 96-bit mantissa are
    /// rounded half-up.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the integer part alone does not fit.
    pub fn to_rust_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        let out_of_range = NumericError::OutOfRange {
            target: "rust_decimal::Decimal",
        };

        let mut scale = SCALE.min(RUST_DECIMAL_MAX_SCALE);
        let mut mantissa = div_round_half_up(
            &self.scaled,
            &pow10(SCALE - scale),
            RoundingPolicy::HalfUp,
        );
        while mantissa.bits() > RUST_DECIMAL_MANTISSA_BITS {
            if scale == 0 {
                return Err(out_of_range);
            }
            scale -= 1;
            mantissa = div_round_half_up(&mantissa, &BigInt::from(10u8), RoundingPolicy::HalfUp);
        }

        let mantissa = mantissa.to_i128().ok_or_else(|| out_of_range.clone())?;
        rust_decimal::Decimal::try_from_i128_with_scale(mantissa, scale)
            .map(|d| d.normalize())
            .map_err(|_| out_of_range)
    }
}

/// Absolute value of `x`.
pub fn abs<const S: u32>(x: &Decimal<S>) -> Decimal<S> {
    x.abs()
}

/// Smallest of `values`, or `None` if there are none.
pub fn min<'a, const S: u32, I>(values: I) -> Option<Decimal<S>>
where
    I: IntoIterator<Item = &'a Decimal<S>>,
{
    Decimal::min_of(values)
}

/// Largest of `values`, or `None` if there are none.
pub fn max<'a, const S: u32, I>(values: I) -> Option<Decimal<S>>
where
    I: IntoIterator<Item = &'a Decimal<S>>,
{
    Decimal::max_of(values)
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const S: u32> Default for Decimal<S> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<const S: u32> Neg for Decimal<S> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::from_scaled(-self.scaled)
    }
}

impl<const S: u32> Neg for &Decimal<S> {
    type Output = Decimal<S>;

    #[inline]
    fn neg(self) -> Self::Output {
        Decimal::from_scaled(-&self.scaled)
    }
}

// Operators are provided on references only so `a.add(&b)` keeps resolving to
// the inherent method and never consumes `a`.
impl<const S: u32> Add for &Decimal<S> {
    type Output = Decimal<S>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Decimal::add(self, rhs)
    }
}

impl<const S: u32> Sub for &Decimal<S> {
    type Output = Decimal<S>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl<const S: u32> Mul for &Decimal<S> {
    type Output = Decimal<S>;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs)
    }
}

impl<const S: u32> Sum for Decimal<S> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::from_scaled(iter.map(|d| d.scaled).sum())
    }
}

impl<'a, const S: u32> Sum<&'a Decimal<S>> for Decimal<S> {
    fn sum<I: Iterator<Item = &'a Decimal<S>>>(iter: I) -> Self {
        Self::from_scaled(iter.map(|d| &d.scaled).sum())
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl<const S: u32> From<$t> for Decimal<S> {
                #[inline]
                fn from(value: $t) -> Self {
                    Self::from_scaled(BigInt::from(value) * pow10(S))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize);

impl<const S: u32> From<BigInt> for Decimal<S> {
    /// Interprets `value` as a whole number, not a scaled value.
    fn from(value: BigInt) -> Self {
        Self::from_scaled(value * pow10(S))
    }
}

impl<const S: u32> From<rust_decimal::Decimal> for Decimal<S> {
    fn from(value: rust_decimal::Decimal) -> Self {
        let mantissa = BigInt::from(value.mantissa());
        let source_scale = value.scale();
        if source_scale <= S {
            Self::from_scaled(mantissa * pow10(S - source_scale))
        } else {
            Self::from_scaled(div_round_half_up(
                &mantissa,
                &pow10(source_scale - S),
                RoundingPolicy::HalfUp,
            ))
        }
    }
}

impl<const S: u32> TryFrom<f64> for Decimal<S> {
    type Error = NumericError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl<const S: u32> TryFrom<&str> for Decimal<S> {
    type Error = NumericError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl<const S: u32> TryFrom<String> for Decimal<S> {
    type Error = NumericError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl<const S: u32> FromStr for Decimal<S> {
    type Err = NumericError;

    /// Parse decimal text, rounding half-up past the scale.
    ///
    /// # Examples
    /// - "123" -> 123
    /// - "-0.001" -> -0.001
    /// - "1.5e-3" -> 0.0015
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecimalContext::default().parse(s)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const S: u32> fmt::Display for Decimal<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.scaled.magnitude().to_string();
        let scale = S as usize;

        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        let frac_part = frac_part.trim_end_matches('0');

        if self.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(int_part)?;
        if !frac_part.is_empty() {
            write!(f, ".{}", frac_part)?;
        }
        Ok(())
    }
}

impl<const S: u32> fmt::Debug for Decimal<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal<{}>({})", S, self)
    }
}

// ============================================================================
// Type Aliases for Common Use Cases
// ============================================================================

/// Instrument price
pub type Price = Decimal<DEFAULT_SCALE>;

/// Traded volume or lot size
pub type Volume = Decimal<DEFAULT_SCALE>;

/// Account balance, equity or P&L
pub type Money = Decimal<DEFAULT_SCALE>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_constants() {
        assert!(Decimal::<32>::zero().is_zero());
        assert_eq!(Decimal::<4>::one().scaled_value(), &BigInt::from(10_000));
        assert_eq!(Decimal::<32>::default(), Decimal::zero());
    }

    #[test]
    fn test_from_integer() {
        let x = Decimal::<9>::from(100);
        assert_eq!(x.scaled_value(), &BigInt::from(100_000_000_000i64));
        assert_eq!(x.integer_part(), BigInt::from(100));
        assert_eq!(x.to_string(), "100");
    }

    #[test]
    fn test_add_subtract_exact() {
        assert!(dec("0.1").add(&dec("0.2")).equals(&dec("0.3")));
        assert_eq!(dec("100").subtract(&dec("30")), dec("70"));
        assert_eq!(dec("30").subtract(&dec("100")), dec("-70"));
    }

    #[test]
    fn test_multiply() {
        assert_eq!(dec("2.5").multiply(&dec("4")), dec("10"));
        assert_eq!(dec("1.5").multiply(&dec("1.5")), dec("2.25"));
        assert_eq!(dec("-1.5").multiply(&dec("2")), dec("-3"));
        assert_eq!(dec("-1.5").multiply(&dec("-2")), dec("3"));
    }

    #[test]
    fn test_multiply_rounding_at_scale() {
        type D2 = Decimal<2>;
        let a: D2 = "0.05".parse().unwrap();
        // 0.05 * 0.05 = 0.0025 -> 0.00
        assert_eq!(a.multiply(&a), D2::zero());
        let b: D2 = "0.15".parse().unwrap();
        // 0.15 * 0.05 = 0.0075 -> 0.01
        assert_eq!(b.multiply(&a).to_string(), "0.01");
        assert_eq!((-&b).multiply(&a).to_string(), "-0.01");
    }

    #[test]
    fn test_divide() {
        assert_eq!(dec("10").divide(&dec("4")).unwrap(), dec("2.5"));
        assert_eq!(dec("-10").divide(&dec("4")).unwrap(), dec("-2.5"));
        let third = dec("1").divide(&dec("3")).unwrap();
        assert_eq!(third.to_string(), format!("0.{}", "3".repeat(32)));
        let two_thirds = dec("2").divide(&dec("3")).unwrap();
        assert_eq!(two_thirds.to_string(), format!("0.{}7", "6".repeat(31)));
        let neg = dec("-2").divide(&dec("3")).unwrap();
        assert_eq!(neg.to_string(), format!("-0.{}7", "6".repeat(31)));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            dec("1").divide(&Decimal::zero()),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_comparison() {
        let a = dec("100");
        let b = dec("50.5");

        assert!(a.greater_than(&b));
        assert!(b.less_than(&a));
        assert!(a.greater_than_or_equal(&a));
        assert!(a.less_than_or_equal(&a));
        assert!(!a.less_than_or_equal(&b));
        assert!(a > b);
        assert_eq!(a.clone().min(b.clone()), b);
    }

    #[test]
    fn test_min_max_scan_every_element() {
        let values: Vec<Decimal> = ["5", "1", "3"].iter().map(|s| dec(s)).collect();
        assert_eq!(Decimal::min_of(&values), Some(dec("1")));
        assert_eq!(Decimal::max_of(&values), Some(dec("5")));

        let values: Vec<Decimal> = ["2", "9", "-4", "7", "0.5"].iter().map(|s| dec(s)).collect();
        assert_eq!(min(&values), Some(dec("-4")));
        assert_eq!(max(&values), Some(dec("9")));
        assert_eq!(Decimal::<32>::min_of(&[]), None);
    }

    #[test]
    fn test_abs() {
        assert_eq!(abs(&dec("-2.5")), dec("2.5"));
        assert_eq!(dec("2.5").abs(), dec("2.5"));
        assert_eq!(Decimal::<32>::zero().abs(), Decimal::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(dec("123.456").to_string(), "123.456");
        assert_eq!(dec("0").to_string(), "0");
        assert_eq!(dec("-0.1").to_string(), "-0.1");
        assert_eq!(dec("10.500").to_string(), "10.5");
        assert_eq!(dec("7.").to_string(), "7");
        assert_eq!(dec("-0").to_string(), "0");
        assert_eq!(format!("{:?}", dec("1.5")), "Decimal<32>(1.5)");
        assert_eq!(Decimal::<0>::from(42).to_string(), "42");
    }

    #[test]
    fn test_construction_rounds_first_excess_digit() {
        let tail = "0".repeat(31);
        assert_eq!(dec(&format!("0.{tail}15")).to_string(), format!("0.{tail}2"));
        assert_eq!(dec(&format!("0.{tail}14")).to_string(), format!("0.{tail}1"));
        assert_eq!(dec(&format!("-0.{tail}15")).to_string(), format!("-0.{tail}2"));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            "not_a_number".parse::<Decimal>(),
            Err(NumericError::InvalidDecimal { .. })
        ));
        assert!(Decimal::<32>::try_from("").is_err());
        assert!(Decimal::<32>::try_from(f64::NAN).is_err());
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Decimal::<32>::try_from(0.1).unwrap(), dec("0.1"));
        assert_eq!(Decimal::<32>::from_f64(1e-7).unwrap(), dec("0.0000001"));
        assert_eq!(dec("0.25").to_f64(), 0.25);
    }

    #[test]
    fn test_rust_decimal_conversion() {
        let d = rust_decimal::Decimal::new(12345, 2); // 123.45
        let x = Decimal::<32>::from(d);
        assert_eq!(x, dec("123.45"));
        assert_eq!(x.to_rust_decimal().unwrap().to_string(), "123.45");

        let third = dec("1").divide(&dec("3")).unwrap();
        let rd = third.to_rust_decimal().unwrap();
        assert_eq!(rd.scale(), 28);

        let coarse = Decimal::<2>::from(rust_decimal::Decimal::new(12345, 3)); // 12.345
        assert_eq!(coarse.to_string(), "12.35");
    }

    #[test]
    fn test_rust_decimal_out_of_range() {
        let huge = dec(&format!("1{}", "0".repeat(40)));
        assert!(matches!(
            huge.to_rust_decimal(),
            Err(NumericError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_operators_and_sum() {
        let a = dec("1.25");
        let b = dec("0.75");
        assert_eq!(&a + &b, dec("2"));
        assert_eq!(&a - &b, dec("0.5"));
        assert_eq!(&a * &b, dec("0.9375"));
        assert_eq!(-a.clone(), dec("-1.25"));
        let total: Decimal = [a.clone(), b.clone()].iter().sum();
        assert_eq!(total, dec("2"));
        let owned_total: Decimal = vec![a, b].into_iter().sum();
        assert_eq!(owned_total, dec("2"));
    }

    #[test]
    fn test_round_trunc_signum() {
        assert_eq!(dec("2.345").round_dp(2), dec("2.35"));
        assert_eq!(dec("-2.9").trunc(), dec("-2"));
        assert_eq!(dec("-2.9").signum(), dec("-1"));
        assert_eq!(dec("0").signum(), dec("0"));
        assert_eq!(dec("3.1").signum(), dec("1"));
    }

    #[test]
    fn test_different_scales() {
        type D4 = Decimal<4>;
        let x: D4 = "123.4567".parse().unwrap();
        assert_eq!(x.scaled_value(), &BigInt::from(1_234_567));
        assert_eq!(x.to_string(), "123.4567");
    }
}
