// ============================================================================
// Market Primitives Library
// Exact decimal arithmetic and ordered event delivery for trading frameworks
// ============================================================================

//! # Market Primitives
//!
//! Leaf infrastructure shared by broker adapters, account models and
//! expert-advisor code.
//!
//! ## Features
//!
//! - **Exact decimals** backed by a scaled big integer (32 fractional digits)
//! - **Explicit rounding policy** (half-up or truncate) per `DecimalContext`
//! - **Ordered event emitter** with persistent and one-shot subscriptions
//! - **Async-aware dispatch** that awaits every listener (feature `async`)
//!
//! ## Example
//!
//! ```rust
//! use market_primitives::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! // Exact money arithmetic
//! let price: Price = "1.10".parse().unwrap();
//! let volume: Volume = "0.3".parse().unwrap();
//! assert_eq!(price.multiply(&volume).to_string(), "0.33");
//!
//! // Tick fan-out
//! let emitter = Emitter::new();
//! let ticks = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&ticks);
//! emitter.subscribe(names::TICK, move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//! emitter.notify_listeners(names::TICK, payload(json!({"bid": price.to_string()})));
//! assert_eq!(ticks.load(Ordering::SeqCst), 1);
//! ```

pub mod events;
pub mod numeric;

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::init_logging;

// Re-exports for convenience
pub mod prelude {
    pub use crate::events::{
        names, payload, DispatchMode, Emitter, EmitterConfig, Event, EventData, EventError,
        EventHandler, EventWaiter, ListenerId, LoggingEventHandler,
    };
    pub use crate::numeric::{
        Decimal, DecimalContext, Money, NumericError, Price, RoundingPolicy, Volume,
    };

    #[cfg(feature = "async")]
    pub use crate::events::AsyncEmitter;
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_fill_events_carry_exact_decimals() {
        let emitter = Emitter::new();
        let filled = Arc::new(parking_lot::Mutex::new(Money::zero()));

        let total = Arc::clone(&filled);
        emitter.subscribe(names::ORDER_FILLED, move |event| {
            let price: Price = event
                .get("price")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())
                .unwrap_or_default();
            let volume: Volume = event
                .get("volume")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())
                .unwrap_or_default();
            let mut total = total.lock();
            *total = total.add(&price.multiply(&volume));
        });

        for (price, volume) in [("1.1", "0.1"), ("1.2", "0.2"), ("0.7", "0.3")] {
            emitter.notify_listeners(
                names::ORDER_FILLED,
                payload(json!({"price": price, "volume": volume})),
            );
        }

        // 0.11 + 0.24 + 0.21
        assert_eq!(filled.lock().to_string(), "0.56");
    }
}
