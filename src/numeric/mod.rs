// ============================================================================
// Numeric Module
// Exact fixed-scale decimal arithmetic for money, prices and volumes
// ============================================================================
//
// This module provides:
// - Decimal<SCALE>: Immutable decimal backed by a scaled BigInt
// - DecimalContext / RoundingPolicy: Explicit rounding configuration
// - NumericError: Error types for construction and arithmetic
// - Price/Volume/Money type aliases for common use cases
//
// Design principles:
// - No floating-point state; floats only enter through their decimal text
// - Fallible operations return Result (no panics)
// - One representation per real value, so equality is integer equality
// - Compile-time scale via const generics

mod context;
mod decimal;
mod errors;
mod parse;
mod rounding;

#[cfg(feature = "serde")]
mod serde_impl;

pub use context::DecimalContext;
pub use decimal::{abs, max, min, Decimal, Money, Price, Volume, DEFAULT_SCALE};
pub use errors::{NumericError, NumericResult};
pub use rounding::RoundingPolicy;
