// ============================================================================
// Decimal Text Parsing
// Converts decimal text into a scaled big integer
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::rounding::RoundingPolicy;
use num_bigint::BigInt;
use num_traits::One;

/// Largest exponent magnitude accepted in scientific notation.
const MAX_EXPONENT: i64 = 4096;

/// Parse `input` into `value × 10^scale`.
///
/// Accepts an optional sign, integer digits, an optional `.` with fractional
/// digits and an optional `e`/`E` exponent. Each segment may carry one
/// leading sign; a `-` on either marks the whole value negative (`"-0.5"`,
/// `"0.-5"` and `"-0.-5"` are the same value).
///
/// Fraction digits past `scale` are dropped. Under `RoundingPolicy::HalfUp`
/// the first dropped digit alone decides whether the magnitude is bumped by
/// one unit of least precision.
pub(crate) fn parse_scaled(input: &str, scale: u32, policy: RoundingPolicy) -> NumericResult<BigInt> {
    let text = input.trim();
    if text.is_empty() {
        return Err(NumericError::invalid(input));
    }

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(pos) => {
            let exponent: i64 = text[pos + 1..]
                .parse()
                .map_err(|_| NumericError::invalid(input))?;
            if exponent.abs() > MAX_EXPONENT {
                return Err(NumericError::invalid(input));
            }
            (&text[..pos], exponent)
        },
        None => (text, 0),
    };

    let (int_raw, frac_raw) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    let (int_negative, int_digits) = split_sign(int_raw);
    let (frac_negative, frac_digits) = split_sign(frac_raw);
    if !is_digits(int_digits) || !is_digits(frac_digits) {
        return Err(NumericError::invalid(input));
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err(NumericError::invalid(input));
    }
    let negative = int_negative || frac_negative;

    let (int_digits, frac_digits) = shift_point(int_digits, frac_digits, exponent);

    let scale = scale as usize;
    let mut digits = String::with_capacity(int_digits.len() + scale + 1);
    digits.push_str(&int_digits);
    let round_up = if frac_digits.len() > scale {
        digits.push_str(&frac_digits[..scale]);
        policy.is_rounded() && frac_digits.as_bytes()[scale] >= b'5'
    } else {
        digits.push_str(&frac_digits);
        digits.extend(std::iter::repeat_n('0', scale - frac_digits.len()));
        false
    };
    if digits.is_empty() {
        digits.push('0');
    }

    let mut magnitude: BigInt = digits.parse().map_err(|_| NumericError::invalid(input))?;
    if round_up {
        magnitude += BigInt::one();
    }

    Ok(if negative { -magnitude } else { magnitude })
}

/// Strip one leading sign. Returns `(negative, rest)`.
fn split_sign(segment: &str) -> (bool, &str) {
    if let Some(rest) = segment.strip_prefix('-') {
        (true, rest)
    } else {
        (false, segment.strip_prefix('+').unwrap_or(segment))
    }
}

#[inline]
fn is_digits(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit())
}

/// Move the decimal point `exponent` places to the right (left if negative).
fn shift_point(int_digits: &str, frac_digits: &str, exponent: i64) -> (String, String) {
    if exponent == 0 {
        return (int_digits.to_owned(), frac_digits.to_owned());
    }

    let all: String = [int_digits, frac_digits].concat();
    let point = int_digits.len() as i64 + exponent;

    if point <= 0 {
        let mut frac = "0".repeat(point.unsigned_abs() as usize);
        frac.push_str(&all);
        (String::new(), frac)
    } else if point as usize >= all.len() {
        let mut int = all;
        let pad = point as usize - int.len();
        int.push_str(&"0".repeat(pad));
        (int, String::new())
    } else {
        let (int, frac) = all.split_at(point as usize);
        (int.to_owned(), frac.to_owned())
    }
}
