// ============================================================================
// Numeric Errors
// Error types for scaled decimal construction and arithmetic
// ============================================================================

use thiserror::Error;

/// Errors that can occur while building or operating on a `Decimal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum NumericError {
    /// Input text or value is not a finite decimal number
    #[error("invalid decimal: could not parse {input:?}")]
    InvalidDecimal { input: String },

    /// Attempted division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Value does not fit the requested target representation
    #[error("value out of range for {target}")]
    OutOfRange { target: &'static str },
}

impl NumericError {
    pub(crate) fn invalid(input: impl Into<String>) -> Self {
        NumericError::InvalidDecimal {
            input: input.into(),
        }
    }
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::invalid("1.2x").to_string(),
            "invalid decimal: could not parse \"1.2x\""
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumericError::OutOfRange {
                target: "rust_decimal::Decimal"
            }
            .to_string(),
            "value out of range for rust_decimal::Decimal"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::DivisionByZero, NumericError::DivisionByZero);
        assert_ne!(NumericError::invalid("a"), NumericError::invalid("b"));
    }
}
